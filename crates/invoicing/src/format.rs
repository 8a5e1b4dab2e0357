//! Amount rendering in the `en-IN` style (`12,34,567.50`).

/// Fraction digits shown when the caller asks for fewer.
const DEFAULT_MAX_FRACTION_DIGITS: usize = 3;

/// Format `amount` with Indian digit grouping.
///
/// At least `min_fraction_digits` and at most
/// `max(min_fraction_digits, 3)` fraction digits are shown; zeros past the
/// minimum are dropped. Non-finite amounts render as `0`.
pub fn format_inr(amount: f64, min_fraction_digits: usize) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let max_fraction_digits = min_fraction_digits.max(DEFAULT_MAX_FRACTION_DIGITS);

    let fixed = format!("{:.*}", max_fraction_digits, amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut fraction = frac_part.trim_end_matches('0').to_string();
    while fraction.len() < min_fraction_digits {
        fraction.push('0');
    }

    let negative = amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');

    let mut out = String::with_capacity(fixed.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(&group_indian(int_part));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

/// Rupee-prefixed amount with two fraction digits, as shown on totals.
pub fn format_rupees(amount: f64) -> String {
    format!("₹{}", format_inr(amount, 2))
}

/// `1234567` -> `12,34,567`: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}
