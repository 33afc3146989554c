mod categories;
mod dashboard;
mod students;
mod transactions;

pub use categories::AdminCategoriesPage;
pub use dashboard::AdminDashboardPage;
pub use students::AdminStudentsPage;
pub use transactions::AdminTransactionsPage;
