pub mod admin;
mod auth;
mod dashboard;
mod history;
mod payments;
mod profile;
mod receipt;

pub use auth::{LoginPage, RegisterPage};
pub use dashboard::DashboardPage;
pub use history::HistoryPage;
pub use payments::PaymentsPage;
pub use profile::ProfilePage;
pub use receipt::{ReceiptLookup, ReceiptPage};
