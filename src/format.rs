use chrono::{DateTime, NaiveDate, Utc};

pub const NAIRA: &str = "₦";

const FEE_RATE: f64 = 0.015;
const FEE_FLAT: f64 = 100.0;
const FEE_FLAT_THRESHOLD: f64 = 2500.0;
const FEE_CAP: f64 = 2000.0;

fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    let s = value.abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

pub fn format_currency(amount: f64, symbol: &str) -> String {
    let kobo = (amount * 100.0).round() as i64;
    let sign = if kobo < 0 { "-" } else { "" };
    let kobo = kobo.abs();
    format!(
        "{}{}{}.{:02}",
        sign,
        symbol,
        format_with_commas(kobo / 100),
        kobo % 100
    )
}

pub fn naira(amount: f64) -> String {
    format_currency(amount, NAIRA)
}

/// Client-side guess at the checkout provider's surcharge. Display only:
/// the backend sets the fee that is actually charged.
pub fn estimate_gateway_fee(amount: f64) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }
    let mut fee = amount * FEE_RATE;
    if amount >= FEE_FLAT_THRESHOLD {
        fee += FEE_FLAT;
    }
    (fee.min(FEE_CAP) * 100.0).round() / 100.0
}

pub fn date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

pub fn date_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

pub fn deadline(day: Option<NaiveDate>) -> String {
    day.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "No deadline".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naira_formatting() {
        assert_eq!(naira(2050.0), "₦2,050.00");
        assert_eq!(naira(1234567.5), "₦1,234,567.50");
        assert_eq!(naira(0.0), "₦0.00");
        assert_eq!(naira(-30.25), "-₦30.25");
    }

    #[test]
    fn test_fee_below_flat_threshold() {
        assert_eq!(estimate_gateway_fee(2000.0), 30.0);
    }

    #[test]
    fn test_fee_with_flat_component() {
        assert_eq!(estimate_gateway_fee(5000.0), 175.0);
    }

    #[test]
    fn test_fee_is_capped() {
        assert_eq!(estimate_gateway_fee(500_000.0), 2000.0);
        assert_eq!(estimate_gateway_fee(0.0), 0.0);
    }

    #[test]
    fn test_deadline_text() {
        assert_eq!(deadline(NaiveDate::from_ymd_opt(2025, 3, 31)), "Mar 31, 2025");
        assert_eq!(deadline(None), "No deadline");
    }
}
