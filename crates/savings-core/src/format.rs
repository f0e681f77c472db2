//! Locale-independent currency rendering for plan figures.

const GROUPING_SEPARATOR: char = ',';
const DECIMAL_SEPARATOR: char = '.';
const DOLLAR_SYMBOL: &str = "$";

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Dollar formatting with `.` decimals and `,` thousands grouping.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format_amount(&self, amount: f64) -> String {
        format_currency(amount)
    }
}

/// Renders `amount` as dollars with two decimals: `1234.5` becomes `"$1,234.50"`.
///
/// Negative amounts keep the sign after the symbol (`"$-1,234.50"`). Non-finite
/// input renders as `"$0.00"`.
pub fn format_currency(amount: f64) -> String {
    format!("{}{}", DOLLAR_SYMBOL, format_amount(amount))
}

/// Two-decimal rendering with thousands grouping and no currency symbol.
pub fn format_amount(amount: f64) -> String {
    let value = if amount.is_finite() { amount } else { 0.0 };
    // Halves round away from zero.
    let cents = (value.abs() * 100.0).round();
    let whole = (cents / 100.0).trunc();
    let fraction = cents - whole * 100.0;
    let mut body = group_digits(&format!("{:.0}", whole), GROUPING_SEPARATOR);
    body.push(DECIMAL_SEPARATOR);
    body.push_str(&format!("{:02.0}", fraction));
    if value < 0.0 && cents > 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
