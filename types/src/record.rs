use crate::format::{format_carat, format_currency, format_weight};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference data the console lists but does not interpret: branches,
/// warehouses, vendors, customers, sellers and warehouse transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Best human label: `name`, then `code`, then `reference`, then the id.
    pub fn label(&self) -> String {
        ["name", "code", "reference"]
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", self.id))
    }

    /// A scalar field rendered as text. Nested values and nulls are blank.
    /// Money, weight and purity fields get their unit, whether the backend
    /// sent a number or a decimal string.
    pub fn display(&self, key: &str) -> String {
        let value = self.fields.get(key);
        if let (Some(unit), Some(n)) = (unit_format(key), value.and_then(as_number)) {
            return unit(n);
        }

        match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(true)) => "Yes".to_string(),
            Some(Value::Bool(false)) => "No".to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    /// A scalar field as editable text, without display units.
    pub fn raw_text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// Build a create or update body from form text, giving each column the JSON
/// type it has in `sample`. Text that does not fit that type is sent as typed
/// so the server can report it; blank numbers and flags are sent as null.
pub fn record_payload(values: &[(String, String)], sample: &[Record]) -> Value {
    let body: Map<String, Value> = values
        .iter()
        .map(|(key, text)| {
            let kind = sample.iter().find_map(|r| r.fields.get(key));
            let text = text.trim();
            let value = match kind {
                Some(Value::Number(_) | Value::Bool(_)) if text.is_empty() => Value::Null,
                Some(Value::Number(_)) => text
                    .parse::<i64>()
                    .map(Value::from)
                    .or_else(|_| text.parse::<f64>().map(Value::from))
                    .unwrap_or_else(|_| Value::from(text)),
                Some(Value::Bool(_)) => text
                    .parse::<bool>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::from(text)),
                _ => Value::from(text),
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(body)
}

fn unit_format(key: &str) -> Option<fn(f64) -> String> {
    let key = key.to_lowercase();
    if key.contains("weight") {
        Some(format_weight)
    } else if key.contains("carat") || key.contains("karat") {
        Some(format_carat)
    } else if ["price", "amount", "balance", "cost"].iter().any(|w| key.contains(w)) {
        Some(format_currency)
    } else {
        None
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Scalar column names across `records`, in first-seen order, at most `limit`.
pub fn scalar_columns(records: &[Record], limit: usize) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for (key, value) in &record.fields {
            let scalar = matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_));
            if scalar && !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
                if columns.len() == limit {
                    return columns;
                }
            }
        }
    }
    columns
}
