mod components;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::Dashboard;

mod users;
pub use users::Users;

mod profile;
pub use profile::{ChangePassword, Profile};

mod reference;
pub use reference::ReferenceList;

mod placeholder;
pub use placeholder::{Inventory, Invoices, NotFound};
