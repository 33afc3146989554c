//! Backend payload shapes and their mapping into the app's own models.
//!
//! The backend is not consistent about field names (snake_case vs
//! camelCase, `name` vs `title`, `amount` vs `original_amount`) or about
//! types (ids and amounts arrive as numbers or strings). Everything is
//! absorbed here; nothing past this module sees a raw payload.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::models::{
    AdminStats, Checkout, Credentials, Order, OrderStatus, PageOf, Pagination, PaymentCategory,
    Receipt, ReceiptCategory, Role, User,
};

pub trait Normalize {
    type Output;

    fn normalize(self) -> Self::Output;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Num(f64),
    Text(String),
    Flag(bool),
}

fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Text(s)) => Some(s),
        Some(Scalar::Num(n)) if n.fract() == 0.0 => Some(format!("{}", n as i64)),
        Some(Scalar::Num(n)) => Some(n.to_string()),
        Some(Scalar::Flag(b)) => Some(b.to_string()),
        None => None,
    })
}

fn opt_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Num(n)) => Some(n),
        Some(Scalar::Text(s)) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    })
}

fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(opt_amount(d)?.map(|n| n.max(0.0) as u64))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // naive timestamps from the backend are UTC
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|n| n.and_utc())
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref().and_then(parse_timestamp)
}

// Alternate snake_case spellings are separate fields, not aliases, since a
// payload may carry both. `resolved` folds them; the first spelling wins.

#[derive(Deserialize, Default)]
pub struct UserPayload {
    #[serde(default, deserialize_with = "opt_text", alias = "_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "matricNumber")]
    pub matric_number: Option<String>,
    #[serde(default)]
    pub matric_no: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub level: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl UserPayload {
    pub(crate) fn resolved(mut self) -> Self {
        self.id = self.id.or(self.user_id.take());
        self.full_name = self.full_name.or(self.name.take());
        self.matric_number = self.matric_number.or(self.matric_no.take());
        self.phone_number = self.phone_number.or(self.phone.take());
        self
    }

    /// Applies the fields present in this payload on top of `base`.
    pub fn merge_into(self, base: &User) -> User {
        let patch = self.resolved();
        User {
            id: patch.id.unwrap_or_else(|| base.id.clone()),
            email: patch.email.unwrap_or_else(|| base.email.clone()),
            full_name: patch.full_name.unwrap_or_else(|| base.full_name.clone()),
            matric_number: patch
                .matric_number
                .unwrap_or_else(|| base.matric_number.clone()),
            department: patch.department.unwrap_or_else(|| base.department.clone()),
            level: patch.level.unwrap_or_else(|| base.level.clone()),
            phone_number: patch
                .phone_number
                .unwrap_or_else(|| base.phone_number.clone()),
            role: patch.role.as_deref().map(Role::parse).unwrap_or(base.role),
            created_at: timestamp(patch.created_at).or(base.created_at),
        }
    }
}

impl Normalize for UserPayload {
    type Output = User;

    fn normalize(self) -> User {
        let user = self.resolved();
        User {
            id: user.id.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            full_name: user.full_name.unwrap_or_default(),
            matric_number: user.matric_number.unwrap_or_default(),
            department: user.department.unwrap_or_default(),
            level: user.level.unwrap_or_default(),
            phone_number: user.phone_number.unwrap_or_default(),
            role: user.role.as_deref().map(Role::parse).unwrap_or(Role::Student),
            created_at: timestamp(user.created_at),
        }
    }
}

#[derive(Deserialize)]
pub struct CategoryPayload {
    #[serde(default, deserialize_with = "opt_text", alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<String>,
    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl Normalize for CategoryPayload {
    type Output = PaymentCategory;

    fn normalize(self) -> PaymentCategory {
        PaymentCategory {
            id: self.id.unwrap_or_default(),
            title: self.title.or(self.name).unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            deadline: self.deadline.or(self.due_date).as_deref().and_then(parse_date),
            is_active: self.is_active.or(self.active).unwrap_or(true),
        }
    }
}

#[derive(Deserialize)]
pub struct OrderPayload {
    #[serde(default, deserialize_with = "opt_text", alias = "_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text", alias = "userId")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text", alias = "categoryId")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub payment_for_id: Option<String>,
    #[serde(default, alias = "paymentFor")]
    pub payment_for: Option<CategoryPayload>,
    #[serde(default)]
    pub category: Option<CategoryPayload>,
    #[serde(default, alias = "categoryName")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "opt_amount", alias = "originalAmount")]
    pub original_amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount", alias = "paystackCharge")]
    pub paystack_charge: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount", alias = "gatewayFee")]
    pub gateway_fee: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount", alias = "totalAmount")]
    pub total_amount: Option<f64>,
    #[serde(default, alias = "paymentStatus")]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "paymentReference")]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, alias = "transactionReference")]
    pub transaction_reference: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default, alias = "paidAt")]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub student: Option<UserPayload>,
    #[serde(default)]
    pub user: Option<UserPayload>,
    #[serde(default, alias = "userName")]
    pub student_name: Option<String>,
    #[serde(default, alias = "userMatric")]
    pub student_matric: Option<String>,
}

impl OrderPayload {
    fn resolved(mut self) -> Self {
        self.id = self.id.or(self.order_id.take());
        self.student_id = self.student_id.or(self.user_id.take());
        self.category_id = self.category_id.or(self.payment_for_id.take());
        self.payment_for = self.payment_for.or(self.category.take());
        self.original_amount = self.original_amount.or(self.amount.take());
        self.paystack_charge = self.paystack_charge.or(self.gateway_fee.take());
        self.payment_status = self.payment_status.or(self.status.take());
        self.payment_reference = self.payment_reference.or(self.reference.take());
        self.created_at = self.created_at.or(self.transaction_date.take());
        self.student = self.student.or(self.user.take());
        self
    }
}

/// Fills whichever of original/fee/total is missing from the other two.
fn settle_amounts(
    original: Option<f64>,
    fee: Option<f64>,
    total: Option<f64>,
) -> (f64, f64, f64) {
    match (original, fee, total) {
        (Some(o), Some(f), Some(t)) => (o, f, t),
        (Some(o), Some(f), None) => (o, f, o + f),
        (Some(o), None, Some(t)) => (o, (t - o).max(0.0), t),
        (None, Some(f), Some(t)) => (t - f, f, t),
        (Some(o), None, None) => (o, 0.0, o),
        (None, None, Some(t)) => (t, 0.0, t),
        (None, Some(f), None) => (0.0, f, f),
        (None, None, None) => (0.0, 0.0, 0.0),
    }
}

impl Normalize for OrderPayload {
    type Output = Order;

    fn normalize(self) -> Order {
        let order = self.resolved();
        let (original_amount, gateway_fee, total_amount) =
            settle_amounts(order.original_amount, order.paystack_charge, order.total_amount);
        let category = order.payment_for.map(Normalize::normalize);
        let student = order.student.map(Normalize::normalize);

        Order {
            id: order.id.unwrap_or_default(),
            student_id: order
                .student_id
                .or_else(|| student.as_ref().map(|s| s.id.clone())),
            category_id: order
                .category_id
                .or_else(|| category.as_ref().map(|c| c.id.clone())),
            category_title: order
                .category_name
                .or_else(|| category.as_ref().map(|c| c.title.clone())),
            original_amount,
            gateway_fee,
            total_amount,
            status: order
                .payment_status
                .as_deref()
                .map(OrderStatus::parse)
                .unwrap_or(OrderStatus::Pending),
            payment_reference: order.payment_reference.unwrap_or_default(),
            transaction_reference: order.transaction_reference.filter(|r| !r.is_empty()),
            created_at: timestamp(order.created_at),
            paid_at: timestamp(order.paid_at),
            student_name: order
                .student_name
                .or_else(|| student.as_ref().map(|s| s.full_name.clone())),
            student_matric: order
                .student_matric
                .or_else(|| student.as_ref().map(|s| s.matric_number.clone())),
        }
    }
}

/// The verify endpoint answers either with the order itself or with a
/// `{status, message, data}` envelope around a slimmer record.
pub fn normalize_verification(value: serde_json::Value) -> Result<Order, AppError> {
    let is_bare_order = value.get("payment_status").is_some() || value.get("id").is_some();
    if is_bare_order {
        let payload: OrderPayload = serde_json::from_value(value)?;
        return Ok(payload.normalize());
    }

    let envelope_status = value
        .get("status")
        .and_then(|s| s.as_str())
        .map(str::to_string);
    let Some(data) = value.get("data").cloned().filter(|d| d.is_object()) else {
        let message = value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unable to verify payment");
        return Err(AppError::Rejected(message.to_string()));
    };

    let mut payload: OrderPayload = serde_json::from_value(data)?;
    if payload.payment_status.is_none() && payload.status.is_none() {
        payload.payment_status = envelope_status;
    }
    Ok(payload.normalize())
}

#[derive(Deserialize)]
pub struct ReceiptPayload {
    #[serde(default, deserialize_with = "opt_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub order_id: Option<String>,
    #[serde(default, alias = "receiptNumber")]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryPayload>,
    #[serde(default)]
    pub payment_for: Option<CategoryPayload>,
    #[serde(default)]
    pub category_title: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub student: Option<UserPayload>,
    #[serde(default)]
    pub user: Option<UserPayload>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub original_amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub paystack_charge: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub gateway_fee: Option<f64>,
    #[serde(default, deserialize_with = "opt_amount")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub transaction_reference: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
}

impl ReceiptPayload {
    fn resolved(mut self) -> Self {
        self.id = self.id.or(self.order_id.take());
        self.category = self.category.or(self.payment_for.take());
        self.category_title = self.category_title.or(self.category_name.take());
        self.student = self.student.or(self.user.take());
        self.original_amount = self.original_amount.or(self.amount.take());
        self.paystack_charge = self.paystack_charge.or(self.gateway_fee.take());
        self.payment_status = self.payment_status.or(self.status.take());
        self.payment_reference = self.payment_reference.or(self.reference.take());
        self.created_at = self.created_at.or(self.transaction_date.take());
        self
    }
}

impl Normalize for ReceiptPayload {
    type Output = Receipt;

    fn normalize(self) -> Receipt {
        let receipt = self.resolved();
        let (original_amount, gateway_fee, total_amount) = settle_amounts(
            receipt.original_amount,
            receipt.paystack_charge,
            receipt.total_amount,
        );
        let category = match receipt.category {
            Some(c) => {
                let c = c.normalize();
                ReceiptCategory {
                    id: c.id,
                    title: c.title,
                    description: Some(c.description).filter(|d| !d.is_empty()),
                }
            }
            None => ReceiptCategory {
                id: String::new(),
                title: receipt
                    .category_title
                    .unwrap_or_else(|| "Payment".to_string()),
                description: None,
            },
        };

        Receipt {
            order_id: receipt.id.unwrap_or_default(),
            receipt_number: receipt.receipt_number,
            category,
            student: receipt.student.unwrap_or_default().normalize(),
            original_amount,
            gateway_fee,
            total_amount,
            status: receipt
                .payment_status
                .as_deref()
                .map(OrderStatus::parse)
                .unwrap_or(OrderStatus::Completed),
            payment_reference: receipt.payment_reference.unwrap_or_default(),
            transaction_reference: receipt.transaction_reference.filter(|r| !r.is_empty()),
            created_at: timestamp(receipt.created_at),
            paid_at: timestamp(receipt.paid_at),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct PaginationPayload {
    #[serde(
        default,
        deserialize_with = "opt_count",
        alias = "total_count",
        alias = "totalCount",
        alias = "total_items"
    )]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "opt_count", alias = "totalPages", alias = "pages")]
    pub total_pages: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_count",
        alias = "current_page",
        alias = "currentPage"
    )]
    pub page: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_count",
        alias = "per_page",
        alias = "page_size",
        alias = "pageSize"
    )]
    pub limit: Option<u64>,
    #[serde(default, alias = "hasNext")]
    pub has_next: Option<bool>,
    #[serde(default, alias = "has_prev", alias = "hasPrevious", alias = "hasPrev")]
    pub has_previous: Option<bool>,
}

impl PaginationPayload {
    fn into_pagination(self, count: usize, requested_limit: u32) -> Pagination {
        let limit = self
            .limit
            .map(|l| l as u32)
            .filter(|l| *l > 0)
            .unwrap_or(requested_limit.max(1));
        let total = self.total.unwrap_or(count as u64);
        let total_pages = self
            .total_pages
            .map(|p| p as u32)
            .unwrap_or_else(|| total.div_ceil(limit as u64) as u32);
        let page = self.page.map(|p| p as u32).unwrap_or(1).max(1);
        Pagination {
            total,
            total_pages,
            page,
            limit,
            has_next: self.has_next.unwrap_or(page < total_pages),
            has_previous: self.has_previous.unwrap_or(page > 1),
        }
    }
}

#[derive(Deserialize)]
pub struct EnvelopePayload<P> {
    #[serde(
        alias = "data",
        alias = "results",
        alias = "transactions",
        alias = "orders",
        alias = "students",
        alias = "categories"
    )]
    pub items: Vec<P>,
    #[serde(default, alias = "meta")]
    pub pagination: Option<PaginationPayload>,
    #[serde(flatten)]
    pub inline: PaginationPayload,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum ListPayload<P> {
    Bare(Vec<P>),
    Envelope(EnvelopePayload<P>),
}

impl<P: Normalize> ListPayload<P> {
    pub fn into_page(self, requested_limit: u32) -> PageOf<P::Output> {
        match self {
            ListPayload::Bare(items) => {
                let items: Vec<_> = items.into_iter().map(Normalize::normalize).collect();
                let pagination = Pagination::single(items.len());
                PageOf { items, pagination }
            }
            ListPayload::Envelope(envelope) => {
                let count = envelope.items.len();
                let meta = match envelope.pagination {
                    Some(p) => p,
                    None => envelope.inline,
                };
                PageOf {
                    items: envelope
                        .items
                        .into_iter()
                        .map(Normalize::normalize)
                        .collect(),
                    pagination: meta.into_pagination(count, requested_limit),
                }
            }
        }
    }

    pub fn into_items(self) -> Vec<P::Output> {
        match self {
            ListPayload::Bare(items) => items.into_iter().map(Normalize::normalize).collect(),
            ListPayload::Envelope(envelope) => envelope
                .items
                .into_iter()
                .map(Normalize::normalize)
                .collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginPayload {
    #[serde(alias = "token", alias = "accessToken")]
    pub access_token: String,
    pub user: UserPayload,
}

impl Normalize for LoginPayload {
    type Output = Credentials;

    fn normalize(self) -> Credentials {
        Credentials {
            token: self.access_token,
            user: self.user.normalize(),
        }
    }
}

/// `PUT /users/profile/*` answers `{user: {...}}` or the bare user.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ProfilePayload {
    Wrapped { user: UserPayload },
    Bare(UserPayload),
}

impl ProfilePayload {
    pub fn into_patch(self) -> UserPayload {
        match self {
            ProfilePayload::Wrapped { user } => user,
            ProfilePayload::Bare(user) => user,
        }
        .resolved()
    }
}

#[derive(Deserialize)]
pub struct CheckoutPayload {
    #[serde(alias = "authorizationUrl", alias = "checkout_url", alias = "payment_url")]
    pub authorization_url: String,
    #[serde(default, alias = "payment_reference", alias = "paymentReference")]
    pub reference: Option<String>,
}

impl Normalize for CheckoutPayload {
    type Output = Checkout;

    fn normalize(self) -> Checkout {
        Checkout {
            authorization_url: self.authorization_url,
            reference: self.reference.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
pub struct AdminStatsPayload {
    #[serde(default, deserialize_with = "opt_amount", alias = "totalRevenue")]
    pub total_revenue: Option<f64>,
    #[serde(default, deserialize_with = "opt_count", alias = "totalTransactions")]
    pub total_transactions: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_count",
        alias = "successfulPayments",
        alias = "completed_payments"
    )]
    pub successful_payments: Option<u64>,
    #[serde(default, deserialize_with = "opt_count", alias = "pendingPayments")]
    pub pending_payments: Option<u64>,
    #[serde(default, deserialize_with = "opt_count", alias = "failedPayments")]
    pub failed_payments: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_count",
        alias = "studentsRegistered",
        alias = "total_students"
    )]
    pub students_registered: Option<u64>,
}

impl Normalize for AdminStatsPayload {
    type Output = AdminStats;

    fn normalize(self) -> AdminStats {
        AdminStats {
            total_revenue: self.total_revenue.unwrap_or_default(),
            total_transactions: self.total_transactions.unwrap_or_default(),
            successful_payments: self.successful_payments.unwrap_or_default(),
            pending_payments: self.pending_payments.unwrap_or_default(),
            failed_payments: self.failed_payments.unwrap_or_default(),
            students_registered: self.students_registered.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub matric_number: String,
    pub phone_number: String,
    pub level: String,
    pub department: String,
    pub password: String,
    pub role: &'static str,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CategoryRequest {
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub deadline: String,
    pub is_active: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct OrderRequest {
    pub payment_for_id: String,
    pub callback_url: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ProfileRequest {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_accepts_both_spellings() {
        let snake: UserPayload = serde_json::from_value(json!({
            "id": 7, "email": "ada@uni.edu", "full_name": "Ada Obi",
            "matric_number": "CSC/2021/001", "phone_number": "0801", "level": 300,
            "role": "student"
        }))
        .unwrap();
        let camel: UserPayload = serde_json::from_value(json!({
            "id": "7", "email": "ada@uni.edu", "fullName": "Ada Obi",
            "matricNumber": "CSC/2021/001", "phone": "0801", "level": "300",
            "role": "student"
        }))
        .unwrap();
        assert_eq!(snake.normalize(), camel.normalize());
    }

    #[test]
    fn test_user_merge_keeps_missing_fields() {
        let base: User = serde_json::from_value::<UserPayload>(json!({
            "id": "u1", "email": "old@uni.edu", "full_name": "Old Name",
            "department": "Computer Science", "role": "admin"
        }))
        .unwrap()
        .normalize();
        let patch: UserPayload =
            serde_json::from_value(json!({ "fullName": "New Name" })).unwrap();
        let merged = patch.merge_into(&base);
        assert_eq!(merged.full_name, "New Name");
        assert_eq!(merged.email, "old@uni.edu");
        assert_eq!(merged.department, "Computer Science");
        assert_eq!(merged.role, Role::Admin);
    }

    #[test]
    fn test_category_amount_as_string() {
        let cat: CategoryPayload = serde_json::from_value(json!({
            "id": 3, "name": "NACOS Dues", "amount": "2000.00",
            "deadline": "2025-03-31T00:00:00", "isActive": false
        }))
        .unwrap();
        let cat = cat.normalize();
        assert_eq!(cat.id, "3");
        assert_eq!(cat.title, "NACOS Dues");
        assert_eq!(cat.amount, 2000.0);
        assert_eq!(cat.deadline, NaiveDate::from_ymd_opt(2025, 3, 31));
        assert!(!cat.is_active);
    }

    #[test]
    fn test_order_fills_total() {
        let order: OrderPayload = serde_json::from_value(json!({
            "id": "o1", "original_amount": 2000, "paystack_charge": 50,
            "payment_status": "completed", "payment_reference": "NACOS-TXN-001234",
            "payment_for": { "id": "c1", "title": "NACOS Dues", "amount": 2000 }
        }))
        .unwrap();
        let order = order.normalize();
        assert_eq!(order.total_amount, 2050.0);
        assert_eq!(order.category_id.as_deref(), Some("c1"));
        assert_eq!(order.category_title.as_deref(), Some("NACOS Dues"));
        assert!(order.reconciles());
    }

    #[test]
    fn test_verification_bare_order() {
        let order = normalize_verification(json!({
            "id": "o1", "payment_status": "completed", "original_amount": 2000,
            "paystack_charge": 50, "total_amount": 2050,
            "payment_reference": "NACOS-TXN-001234"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total_amount, 2050.0);
        assert_eq!(order.payment_reference, "NACOS-TXN-001234");
    }

    #[test]
    fn test_verification_envelope() {
        let order = normalize_verification(json!({
            "status": "pending",
            "message": "Payment is still being processed",
            "data": { "reference": "NACOS-TXN-9", "amount": 1500, "category_name": "Levy" }
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_reference, "NACOS-TXN-9");
        assert_eq!(order.category_title.as_deref(), Some("Levy"));
    }

    #[test]
    fn test_verification_envelope_without_data() {
        let err = normalize_verification(json!({
            "status": "failed", "message": "Transaction reference not found"
        }))
        .unwrap_err();
        assert_eq!(
            err,
            AppError::Rejected("Transaction reference not found".to_string())
        );
    }

    #[test]
    fn test_envelope_nested_pagination() {
        let list: ListPayload<CategoryPayload> = serde_json::from_value(json!({
            "items": [{ "id": 1, "title": "A", "amount": 10 }],
            "pagination": { "total_count": 21, "total_pages": 3, "current_page": 3,
                            "limit": 10, "has_next": false, "has_previous": true }
        }))
        .unwrap();
        let page = list.into_page(10);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total, 21);
        assert_eq!(page.pagination.page, 3);
        assert!(page.pagination.has_previous);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn test_envelope_flat_pagination() {
        let list: ListPayload<UserPayload> = serde_json::from_value(json!({
            "data": [{ "id": 1 }, { "id": 2 }],
            "total": 12, "page": 1, "limit": 2
        }))
        .unwrap();
        let page = list.into_page(10);
        assert_eq!(page.pagination.total_pages, 6);
        assert!(page.pagination.has_next);
        assert!(!page.pagination.has_previous);
    }

    #[test]
    fn test_bare_list() {
        let list: ListPayload<CategoryPayload> =
            serde_json::from_value(json!([{ "id": 1 }, { "id": 2 }])).unwrap();
        let page = list.into_page(10);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_receipt_projection() {
        let receipt: ReceiptPayload = serde_json::from_value(json!({
            "id": "o1",
            "category": { "id": "c1", "name": "NACOS Dues", "description": "" },
            "original_amount": 2000, "paystack_charge": 50, "total_amount": 2050,
            "status": "completed", "payment_reference": "NACOS-TXN-001234",
            "transaction_reference": "",
            "created_at": "2025-01-10T09:30:00Z",
            "student": { "id": "u1", "full_name": "Ada Obi", "matric_number": "CSC/2021/001" }
        }))
        .unwrap();
        let receipt = receipt.normalize();
        assert_eq!(receipt.category.title, "NACOS Dues");
        assert_eq!(receipt.category.description, None);
        assert_eq!(receipt.transaction_reference, None);
        assert_eq!(receipt.student.full_name, "Ada Obi");
        assert!(receipt.created_at.is_some());
    }

    #[test]
    fn test_profile_payload_shapes() {
        let wrapped: ProfilePayload =
            serde_json::from_value(json!({ "user": { "full_name": "A" } })).unwrap();
        let bare: ProfilePayload = serde_json::from_value(json!({ "fullName": "A" })).unwrap();
        assert_eq!(wrapped.into_patch().full_name.as_deref(), Some("A"));
        assert_eq!(bare.into_patch().full_name.as_deref(), Some("A"));
    }

    #[test]
    fn test_order_with_both_spellings() {
        let order: OrderPayload = serde_json::from_value(json!({
            "id": "o1", "amount": 2000, "original_amount": 2000,
            "gateway_fee": 50, "paystack_charge": 50,
            "status": "success", "payment_status": "completed",
            "reference": "NACOS-TXN-001234", "payment_reference": "NACOS-TXN-001234",
            "transaction_date": "2025-01-10T09:30:00Z", "created_at": "2025-01-10T09:30:00Z"
        }))
        .unwrap();
        let order = order.normalize();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.total_amount, 2050.0);
        assert_eq!(order.payment_reference, "NACOS-TXN-001234");
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_payment_status_outranks_status() {
        let order: OrderPayload = serde_json::from_value(json!({
            "status": "failed", "payment_status": "pending", "original_amount": 10
        }))
        .unwrap();
        assert_eq!(order.normalize().status, OrderStatus::Pending);
    }

    #[test]
    fn test_verification_with_both_status_keys() {
        let order = normalize_verification(json!({
            "id": "o1", "status": "success", "payment_status": "completed",
            "amount": 2000, "original_amount": 2000, "paystack_charge": 50,
            "total_amount": 2050, "payment_reference": "NACOS-TXN-001234"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.gateway_fee, 50.0);
        assert_eq!(order.total_amount, 2050.0);
    }

    #[test]
    fn test_envelope_data_status_outranks_envelope() {
        let order = normalize_verification(json!({
            "status": "success",
            "data": { "reference": "NACOS-TXN-9", "status": "pending" }
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_receipt_with_both_spellings() {
        let receipt: ReceiptPayload = serde_json::from_value(json!({
            "id": "o1", "order_id": "o1",
            "category": { "id": "c1", "title": "NACOS Dues", "name": "NACOS Dues" },
            "amount": 2000, "original_amount": 2000,
            "gateway_fee": 50, "paystack_charge": 50, "total_amount": 2050,
            "status": "completed", "payment_status": "completed",
            "reference": "NACOS-TXN-001234", "payment_reference": "NACOS-TXN-001234",
            "student": { "id": "u1", "user_id": "u1", "full_name": "Ada Obi", "name": "Ada Obi" }
        }))
        .unwrap();
        let receipt = receipt.normalize();
        assert_eq!(receipt.order_id, "o1");
        assert_eq!(receipt.category.title, "NACOS Dues");
        assert_eq!(receipt.total_amount, 2050.0);
        assert_eq!(receipt.payment_reference, "NACOS-TXN-001234");
        assert_eq!(receipt.student.full_name, "Ada Obi");
    }

    #[test]
    fn test_user_name_fallback_and_priority() {
        let user: UserPayload = serde_json::from_value(json!({
            "user_id": "u9", "name": "Display", "phone": "0802", "matric_no": "CSC/1"
        }))
        .unwrap();
        let user = user.normalize();
        assert_eq!(user.id, "u9");
        assert_eq!(user.full_name, "Display");
        assert_eq!(user.phone_number, "0802");
        assert_eq!(user.matric_number, "CSC/1");

        let both: UserPayload = serde_json::from_value(json!({
            "full_name": "Ada Obi", "name": "Ada"
        }))
        .unwrap();
        assert_eq!(both.normalize().full_name, "Ada Obi");
    }

    #[test]
    fn test_category_with_both_spellings() {
        let cat: CategoryPayload = serde_json::from_value(json!({
            "id": 1, "title": "Levy", "name": "Old", "deadline": "2025-03-31",
            "due_date": "2025-01-01", "is_active": false, "active": true
        }))
        .unwrap();
        let cat = cat.normalize();
        assert_eq!(cat.title, "Levy");
        assert_eq!(cat.deadline, NaiveDate::from_ymd_opt(2025, 3, 31));
        assert!(!cat.is_active);
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let ts = parse_timestamp("2025-01-10T09:30:00.123456").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-01-10T09:30:00.123456+00:00");
    }
}
