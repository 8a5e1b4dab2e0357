//! Currency amounts in words, Indian numbering system.
//!
//! Digits are grouped as crore (2) | lakh (2) | thousand (2) | hundred (1) |
//! tens+ones (2), so the largest supported amount has nine digits.

use invoicedesk_core::{DomainError, DomainResult};

/// Largest amount [`number_to_words`] accepts.
pub const MAX_WORDS_AMOUNT: u64 = 999_999_999;

const ONES: [&str; 20] = [
    "",
    "One ",
    "Two ",
    "Three ",
    "Four ",
    "Five ",
    "Six ",
    "Seven ",
    "Eight ",
    "Nine ",
    "Ten ",
    "Eleven ",
    "Twelve ",
    "Thirteen ",
    "Fourteen ",
    "Fifteen ",
    "Sixteen ",
    "Seventeen ",
    "Eighteen ",
    "Nineteen ",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Words for `0..=99`. Every non-empty result ends with a space.
fn below_hundred(n: u64) -> String {
    let n = (n % 100) as usize;
    if n < ONES.len() {
        ONES[n].to_string()
    } else {
        format!("{} {}", TENS[n / 10], ONES[n % 10])
    }
}

/// Convert a whole amount into words.
///
/// Zero-valued groups are left out entirely and `0` itself yields an empty
/// string. "and" precedes a non-zero tens+ones group whenever anything was
/// written before it, e.g. `236` is `"Two Hundred and Thirty Six "` and
/// `1_500_050` is `"Fifteen Lakh and Fifty "`.
pub fn number_to_words(amount: u64) -> DomainResult<String> {
    if amount > MAX_WORDS_AMOUNT {
        return Err(DomainError::out_of_range(amount, MAX_WORDS_AMOUNT));
    }

    let groups = [
        (amount / 10_000_000, "Crore "),
        ((amount / 100_000) % 100, "Lakh "),
        ((amount / 1_000) % 100, "Thousand "),
        ((amount / 100) % 10, "Hundred "),
    ];

    let mut words = String::new();
    for (value, unit) in groups {
        if value != 0 {
            words.push_str(&below_hundred(value));
            words.push_str(unit);
        }
    }

    let rest = amount % 100;
    if rest != 0 {
        if !words.is_empty() {
            words.push_str("and ");
        }
        words.push_str(&below_hundred(rest));
    }

    Ok(words)
}

/// The "total in words" line of a printed invoice.
///
/// The total is rounded to whole rupees first (half away from zero).
pub fn amount_in_words(total: f64) -> DomainResult<String> {
    if !total.is_finite() || total < 0.0 {
        return Err(DomainError::validation(format!(
            "amount in words needs a finite, non-negative total (got {total})"
        )));
    }

    let rounded = total.round();
    if rounded > MAX_WORDS_AMOUNT as f64 {
        // Saturating cast; only used for the error message.
        return Err(DomainError::out_of_range(rounded as u64, MAX_WORDS_AMOUNT));
    }

    let words = number_to_words(rounded as u64)?;
    let words = words.trim_end();
    if words.is_empty() {
        Ok("Zero Rupees Only".to_string())
    } else {
        Ok(format!("{words} Rupees Only"))
    }
}
