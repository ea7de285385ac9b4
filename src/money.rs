//! Helpers for monetary amounts.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::Error;

/// Round `amount` to two fractional digits.
///
/// The store keeps amounts as REAL columns, so rounding happens here at the
/// validation boundary rather than in the schema.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Validate `amount` as an expense amount.
///
/// Expense amounts must be finite and positive; valid amounts are rounded
/// to cents.
///
/// # Errors
/// Returns [Error::InvalidAmount] for NaN, infinite, zero, or negative
/// values.
pub fn validate_expense_amount(amount: f64) -> Result<f64, Error> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(round_to_cents(amount))
}

/// Validate `amount` as a settable scalar (wallet funds).
///
/// # Errors
/// Returns [Error::InvalidAmount] for NaN or infinite values.
pub fn validate_finite_amount(amount: f64) -> Result<f64, Error> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(round_to_cents(amount))
}

/// Format an amount as a currency string, e.g. `$1,234.50`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

#[cfg(test)]
mod amount_tests {
    use crate::Error;

    use super::{round_to_cents, validate_expense_amount, validate_finite_amount};

    #[test]
    fn rounds_to_two_digits() {
        assert_eq!(round_to_cents(45.199_9), 45.2);
        assert_eq!(round_to_cents(0.005), 0.01);
    }

    #[test]
    fn accepts_positive_amounts() {
        assert_eq!(validate_expense_amount(45.20), Ok(45.2));
    }

    #[test]
    fn rejects_non_positive_expense_amounts() {
        assert_eq!(validate_expense_amount(0.0), Err(Error::InvalidAmount(0.0)));
        assert_eq!(
            validate_expense_amount(-1.5),
            Err(Error::InvalidAmount(-1.5))
        );
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(validate_expense_amount(f64::NAN).is_err());
        assert!(validate_expense_amount(f64::INFINITY).is_err());
        assert!(validate_finite_amount(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn wallet_amounts_may_be_negative() {
        assert_eq!(validate_finite_amount(-250.0), Ok(-250.0));
    }
}
