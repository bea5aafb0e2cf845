//! Display formatting shared by the server responses and the client.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits every crypto amount is shown with.
pub const CRYPTO_DECIMALS: u32 = 6;

/// Render `amount` with exactly `dp` fractional digits.
///
/// Built from the integer and fractional parts separately: a `Decimal`
/// with a long integer part cannot be rescaled to `dp` digits.
pub fn fixed(amount: Decimal, dp: u32) -> String {
    let rounded = amount
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let int_part = rounded.trunc().to_string();
    let int_part = int_part.split('.').next().unwrap_or("0");

    let frac_part = rounded.fract().to_string();
    let frac_digits = frac_part.split_once('.').map_or("", |(_, digits)| digits);

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    if dp == 0 {
        return format!("{sign}{int_part}");
    }
    format!("{sign}{int_part}.{frac_digits:0<width$}", width = dp as usize)
}

/// `0.061224 ETH`
pub fn format_crypto(amount: Decimal, symbol: &str) -> String {
    format!("{} {symbol}", fixed(amount, CRYPTO_DECIMALS))
}

/// US-dollar rendering with thousands separators, e.g. `$45,623.45`.
pub fn format_usd(amount: Decimal) -> String {
    let text = fixed(amount.abs(), 2);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}

/// Shorten an address to its first `head` characters and last four.
pub fn truncate_address(address: &str, head: usize) -> String {
    if address.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = address.chars().collect();
    let prefix: String = chars.iter().take(head).collect();
    let suffix: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{prefix}...{suffix}")
}

/// `m:ss`
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
