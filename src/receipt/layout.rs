//! What goes on a receipt and where, independent of how it is drawn.

use crate::format::{date_time, naira};
use crate::models::Receipt;

pub const SHEET_WIDTH: f64 = 800.0;
pub const MARGIN: f64 = 48.0;
pub const HEADER_HEIGHT: f64 = 150.0;
pub const SECTION_GAP: f64 = 28.0;
pub const SECTION_TITLE_HEIGHT: f64 = 34.0;
pub const ROW_HEIGHT: f64 = 30.0;
pub const TOTAL_HEIGHT: f64 = 72.0;
pub const FOOTER_HEIGHT: f64 = 96.0;
pub const LOGO_SIZE: f64 = 64.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub rows: Vec<Row>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptSheet {
    pub organisation: &'static str,
    pub title: &'static str,
    pub receipt_number: String,
    pub issued: String,
    pub sections: Vec<Section>,
    pub total: String,
    pub footer: &'static str,
    pub file_name: String,
    /// Image shown in the header, both on screen and in the PDF.
    pub logo: String,
}

fn row(label: &'static str, value: impl Into<String>) -> Row {
    Row {
        label,
        value: value.into(),
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "—".to_string()
    } else {
        value.to_string()
    }
}

impl ReceiptSheet {
    pub fn build(receipt: &Receipt, logo: &str) -> Self {
        let student = &receipt.student;
        let mut payment_rows = vec![
            row("Payment for", or_dash(&receipt.category.title)),
            row("Payment reference", or_dash(&receipt.payment_reference)),
        ];
        if let Some(txn) = &receipt.transaction_reference {
            payment_rows.push(row("Transaction reference", txn.clone()));
        }
        payment_rows.push(row("Status", receipt.status.label()));
        payment_rows.push(row("Initiated", date_time(receipt.created_at)));
        payment_rows.push(row("Paid", date_time(receipt.paid_at.or(receipt.created_at))));

        let reference = if receipt.payment_reference.is_empty() {
            receipt.number()
        } else {
            receipt.payment_reference.clone()
        };

        Self {
            organisation: "Nigeria Association of Computing Students",
            title: "PAYMENT RECEIPT",
            receipt_number: receipt.number(),
            issued: date_time(receipt.paid_at.or(receipt.created_at)),
            sections: vec![
                Section {
                    title: "Student",
                    rows: vec![
                        row("Full name", or_dash(&student.full_name)),
                        row("Matric number", or_dash(&student.matric_number)),
                        row("Department", or_dash(&student.department)),
                        row("Level", or_dash(&student.level)),
                        row("Email", or_dash(&student.email)),
                        row("Phone", or_dash(&student.phone_number)),
                    ],
                },
                Section {
                    title: "Payment",
                    rows: payment_rows,
                },
                Section {
                    title: "Amount",
                    rows: vec![
                        row("Amount", naira(receipt.original_amount)),
                        row("Processing fee", naira(receipt.gateway_fee)),
                    ],
                },
            ],
            total: naira(receipt.total_amount),
            footer: "This receipt was generated electronically and is valid without a signature.",
            file_name: format!("receipt-{}.pdf", sanitize(&reference)),
            logo: logo.to_string(),
        }
    }

    pub fn height(&self) -> f64 {
        let sections: f64 = self
            .sections
            .iter()
            .map(|s| SECTION_GAP + SECTION_TITLE_HEIGHT + ROW_HEIGHT * s.rows.len() as f64)
            .sum();
        HEADER_HEIGHT + sections + SECTION_GAP + TOTAL_HEIGHT + FOOTER_HEIGHT
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, ReceiptCategory, Role, User};

    fn receipt() -> Receipt {
        Receipt {
            order_id: "o1".into(),
            receipt_number: Some("RCP-0001".into()),
            category: ReceiptCategory {
                id: "c1".into(),
                title: "NACOS Dues".into(),
                description: None,
            },
            student: User {
                id: "u1".into(),
                email: "ada@uni.edu".into(),
                full_name: "Ada Obi".into(),
                matric_number: "CSC/2021/001".into(),
                department: "Computer Science".into(),
                level: "300".into(),
                phone_number: String::new(),
                role: Role::Student,
                created_at: None,
            },
            original_amount: 2000.0,
            gateway_fee: 50.0,
            total_amount: 2050.0,
            status: OrderStatus::Completed,
            payment_reference: "NACOS-TXN-001234".into(),
            transaction_reference: Some("T1234".into()),
            created_at: None,
            paid_at: None,
        }
    }

    #[test]
    fn test_sheet_contents() {
        let sheet = ReceiptSheet::build(&receipt(), "/nacos-logo.png");
        assert_eq!(sheet.logo, "/nacos-logo.png");
        assert_eq!(sheet.receipt_number, "RCP-0001");
        assert_eq!(sheet.total, "₦2,050.00");
        assert_eq!(sheet.file_name, "receipt-NACOS-TXN-001234.pdf");
        let payment = &sheet.sections[1];
        assert!(payment
            .rows
            .iter()
            .any(|r| r.label == "Transaction reference" && r.value == "T1234"));
        let student = &sheet.sections[0];
        assert!(student.rows.iter().any(|r| r.label == "Phone" && r.value == "—"));
    }

    #[test]
    fn test_height_grows_with_rows() {
        let with_txn = ReceiptSheet::build(&receipt(), "");
        let mut plain = receipt();
        plain.transaction_reference = None;
        let without_txn = ReceiptSheet::build(&plain, "");
        assert_eq!(with_txn.height() - without_txn.height(), ROW_HEIGHT);
    }

    #[test]
    fn test_file_name_is_sanitized() {
        assert_eq!(sanitize("ref/with space"), "ref-with-space");
    }
}
