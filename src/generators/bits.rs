//! Deterministic significand encoding, the `bits` generator.
//!
//! No search: the top seven significand bits are written most significant
//! first (`w` for a one bit, then `a`), each followed by a growing run of `da`
//! pairs, and the binary exponent is applied with plain `a`/`d` moves. The
//! result is the target truncated to seven significant bits. Edge reuse is
//! not checked.

use crate::lattice::Sign;

/// Fractional bits kept below the implicit leading one.
const PRECISION_BITS: u32 = 6;

pub fn encode_bits(number: f64) -> String {
    let mut pattern = String::from(Sign::of(number).prefix());
    if number == 0.0 {
        return pattern;
    }

    let bits = number.to_bits();
    let mut exponent = ((bits >> 52) & 0x7ff) as i64 - 1023;
    let mut mantissa = (bits & 0x000f_ffff_ffff_ffff) | (1 << 52);

    mantissa >>= 52 - PRECISION_BITS;
    // the loop below doubles once per bit, one more time than Horner needs
    exponent -= 1 + PRECISION_BITS as i64;

    let width = u64::BITS - mantissa.leading_zeros();
    let mut padding = String::from("da");
    for bit in (0..width).rev() {
        if (mantissa >> bit) & 1 == 1 {
            pattern.push('w');
        }
        pattern.push('a');
        pattern.push_str(&padding);
        padding.push_str("da");
    }

    let step = if exponent < 0 { 'd' } else { 'a' };
    pattern.extend(std::iter::repeat(step).take(exponent.unsigned_abs() as usize));
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::replay;

    #[test]
    fn encodes_dyadic_values_exactly() {
        for number in [1.0, 3.5, 0.25, 96.0, -2.5] {
            let walk = replay(&encode_bits(number)).unwrap();
            assert_eq!(walk.value, number, "{}", number);
        }
    }

    #[test]
    fn truncates_to_seven_significant_bits() {
        let walk = replay(&encode_bits(3.14)).unwrap();
        assert_eq!(walk.value, 3.125);
    }

    #[test]
    fn zero_is_the_prefix() {
        assert_eq!(encode_bits(0.0), "aqaa");
    }

    #[test]
    fn one_has_a_single_leading_bit() {
        let pattern = encode_bits(1.0);
        assert!(pattern.starts_with("aqaawada"));
        assert!(pattern.ends_with("ddddddd"));
    }
}
