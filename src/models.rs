use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Amounts within half a kobo of each other are treated as equal.
const KOBO_TOLERANCE: f64 = 0.005;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Student
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub matric_number: String,
    pub department: String,
    pub level: String,
    pub phone_number: String,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub deadline: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
}

impl OrderStatus {
    /// Gateway and backend spell success differently depending on the
    /// endpoint; anything unrecognised counts as failed.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" | "success" | "successful" | "paid" => OrderStatus::Completed,
            "pending" | "processing" | "initiated" => OrderStatus::Pending,
            _ => OrderStatus::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Completed => "Completed",
            OrderStatus::Failed => "Failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: String,
    pub student_id: Option<String>,
    pub category_id: Option<String>,
    pub category_title: Option<String>,
    pub original_amount: f64,
    pub gateway_fee: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_reference: String,
    pub transaction_reference: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    /// Present on admin transaction listings.
    pub student_name: Option<String>,
    pub student_matric: Option<String>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    pub fn reconciles(&self) -> bool {
        (self.original_amount + self.gateway_fee - self.total_amount).abs() < KOBO_TOLERANCE
    }

    pub fn display_title(&self) -> &str {
        self.category_title.as_deref().unwrap_or("Payment")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptCategory {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub order_id: String,
    pub receipt_number: Option<String>,
    pub category: ReceiptCategory,
    pub student: User,
    pub original_amount: f64,
    pub gateway_fee: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_reference: String,
    pub transaction_reference: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Receipt {
    pub fn number(&self) -> String {
        match &self.receipt_number {
            Some(n) if !n.is_empty() => n.clone(),
            _ => {
                let tail: String = self
                    .order_id
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .take(8)
                    .collect();
                format!("RCP-{}", tail.to_ascii_uppercase())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u32,
    pub page: u32,
    pub limit: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    /// Metadata for a response that carried no envelope at all.
    pub fn single(count: usize) -> Self {
        Self {
            total: count as u64,
            total_pages: 1,
            page: 1,
            limit: count.max(1) as u32,
            has_next: false,
            has_previous: false,
        }
    }

    /// How many rows page `page` holds: a full `limit` except on the last page.
    pub fn expected_len(&self, page: u32) -> u64 {
        if page == 0 || page > self.total_pages {
            return 0;
        }
        let limit = self.limit as u64;
        if page < self.total_pages {
            limit
        } else {
            self.total - limit * (self.total_pages as u64 - 1)
        }
    }

    pub fn first_row(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            (self.page.saturating_sub(1) as u64) * self.limit as u64 + 1
        }
    }

    pub fn last_row(&self) -> u64 {
        (self.page as u64 * self.limit as u64).min(self.total)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AdminStats {
    pub total_revenue: f64,
    pub total_transactions: u64,
    pub successful_payments: u64,
    pub pending_payments: u64,
    pub failed_payments: u64,
    pub students_registered: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Checkout {
    pub authorization_url: String,
    pub reference: String,
}

/// Login result: bearer token plus the signed-in profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub token: String,
    pub user: User,
}
