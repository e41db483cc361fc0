//! Fixed-point arithmetic shared by the vault contracts.
//!
//! Prices and allocation fractions are expressed with 18 decimals (`ONE`).
//! Token amounts and Shares are raw `i128` units, matching the Soroban token
//! interface.

/// 1.0 in 18-decimal fixed point.
pub const ONE: i128 = 1_000_000_000_000_000_000;

/// Largest decimal count whose power of ten fits an `i128`.
pub const MAX_DECIMALS: u32 = 38;

/// Computes `value * numerator / denominator`, rounding toward zero.
///
/// The intermediate product is carried in 256 bits, so only a quotient that
/// does not fit an `i128` fails. Returns `None` on overflow or when
/// `denominator` is zero.
pub fn mul_div(value: i128, numerator: i128, denominator: i128) -> Option<i128> {
    if denominator == 0 {
        return None;
    }
    if let Some(product) = value.checked_mul(numerator) {
        return product.checked_div(denominator);
    }

    let negative = (value < 0) ^ (numerator < 0) ^ (denominator < 0);
    let (hi, lo) = mul_wide(value.unsigned_abs(), numerator.unsigned_abs());
    let quotient = i128::try_from(div_wide(hi, lo, denominator.unsigned_abs())?).ok()?;
    Some(if negative { -quotient } else { quotient })
}

/// Full 256-bit product of two `u128`, as `(high, low)` halves.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (ll & MASK) | (mid << 64);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// Divides the 256-bit `(hi, lo)` by `d`. `None` if the quotient needs more
/// than 128 bits.
fn div_wide(mut hi: u128, mut lo: u128, d: u128) -> Option<u128> {
    if hi >= d {
        return None;
    }
    let mut quotient: u128 = 0;
    for _ in 0..128 {
        // hi < d holds on entry, so the shifted remainder is below 2d
        let carry = hi >> 127;
        hi = (hi << 1) | (lo >> 127);
        lo <<= 1;
        quotient <<= 1;
        if carry == 1 || hi >= d {
            hi = hi.wrapping_sub(d);
            quotient |= 1;
        }
    }
    Some(quotient)
}

/// Multiplies two 18-decimal fixed-point numbers.
pub fn mul_fixed(a: i128, b: i128) -> Option<i128> {
    mul_div(a, b, ONE)
}

/// `10^decimals`, or `None` past [`MAX_DECIMALS`].
pub fn pow10(decimals: u32) -> Option<i128> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    10_i128.checked_pow(decimals)
}

/// Normalizes a raw token amount into 18-decimal value units.
///
/// Formula: `value = amount * unit_value / 10^decimals`
///
/// Dividing by the asset's own precision makes equal value in tokens of
/// different precision produce equal results.
pub fn asset_value(amount: i128, unit_value: i128, decimals: u32) -> Option<i128> {
    mul_div(amount, unit_value, pow10(decimals)?)
}

/// Share of `part` in `whole`, expressed in 18-decimal fixed point.
pub fn ratio(part: i128, whole: i128) -> Option<i128> {
    mul_div(part, ONE, whole)
}
