//! Display helpers shared by the views.

use jiff::{Timestamp, tz::TimeZone};

pub fn format_date(ts: Option<Timestamp>) -> String {
    format_in(ts, "%b %d, %Y")
}

pub fn format_date_time(ts: Option<Timestamp>) -> String {
    format_in(ts, "%b %d, %Y %I:%M %p")
}

fn format_in(ts: Option<Timestamp>, pattern: &str) -> String {
    match ts {
        Some(ts) => ts.to_zoned(TimeZone::system()).strftime(pattern).to_string(),
        None => "N/A".to_string(),
    }
}

/// US dollars with thousands separators, e.g. `$15,430.00`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}${grouped}.{frac:02}")
}

/// Grams with two decimals.
pub fn format_weight(grams: f64) -> String {
    format!("{grams:.2}g")
}

/// Karat purity with one decimal.
pub fn format_carat(carat: f64) -> String {
    format!("{carat:.1}K")
}

/// Cut to `max_len` characters, appending `...` when something was removed.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Badge colour for a status word.
pub fn status_variant(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "active" | "approved" => "success",
        "inactive" | "rejected" => "danger",
        "pending" => "warning",
        _ => "secondary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dates_say_na() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date_time(None), "N/A");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(15430.0), "$15,430.00");
        assert_eq!(format_currency(98250.5), "$98,250.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-1234567.8), "-$1,234,567.80");
    }

    #[test]
    fn weight_and_carat() {
        assert_eq!(format_weight(12.5), "12.50g");
        assert_eq!(format_carat(18.0), "18.0K");
        assert_eq!(format_carat(21.64), "21.6K");
    }

    #[test]
    fn truncate_adds_ellipsis_only_when_cut() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_text("a longer sentence", 8), "a longer...");
    }

    #[test]
    fn status_variants() {
        assert_eq!(status_variant("Active"), "success");
        assert_eq!(status_variant("REJECTED"), "danger");
        assert_eq!(status_variant("pending"), "warning");
        assert_eq!(status_variant("archived"), "secondary");
    }
}
