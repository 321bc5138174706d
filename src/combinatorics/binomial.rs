//! Binomial coefficients with overflow detection

use super::PowerBase;
use crate::core::{Result, SVMError};

/// Number of ways to choose `k` of `n` items
///
/// Computed multiplicatively as `C(n, i) = C(n, i - 1) * (n - i + 1) / i`,
/// which keeps every intermediate value an exact integer.
///
/// # Errors
/// [`SVMError::RangeError`] if an intermediate product exceeds `u64`.
pub fn binomial(n: u64, k: u64) -> Result<u64> {
    if k > n {
        return Ok(0);
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 1..=k {
        result = result
            .checked_mul(n - k + i)
            .map(|product| product / i)
            .ok_or_else(|| SVMError::RangeError(format!("overflow in binomial({n}, {k})")))?;
    }
    Ok(result)
}

/// `C(n, k)` as a float
///
/// Same recurrence as [`binomial`], carried out in `f64`, so coefficients
/// beyond `u64::MAX` are still available (rounded) as long as they are finite.
/// Exact only while the result fits in the 53-bit mantissa.
///
/// # Errors
/// [`SVMError::RangeError`] if an intermediate product is not finite.
pub fn binomial_f64(n: u64, k: u64) -> Result<f64> {
    if k > n {
        return Ok(0.0);
    }
    let k = k.min(n - k);
    let mut result = 1.0_f64;
    for i in 1..=k {
        // Divide first; the running value then never exceeds the result
        result = (result / i as f64)
            .checked_product((n - k + i) as f64)
            .ok_or_else(|| SVMError::RangeError(format!("overflow in binomial({n}, {k})")))?;
    }
    Ok(result)
}
