use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

use crate::error::{PolyhedraError, Result};

/// Arbitrary-precision rational in lowest terms with a positive denominator.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rat(BigRational);

impl Rat {
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    pub fn new(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Self {
        Self(BigRational::new(numer.into(), denom.into()))
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self(BigRational::from_integer(value.into()))
    }

    /// The exact binary value of a finite float.
    pub fn from_f64(value: f64) -> Result<Self> {
        BigRational::from_float(value)
            .map(Self)
            .ok_or(PolyhedraError::NonFinite)
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_else(|| {
            let n = self.numer().to_f64().unwrap_or(f64::NAN);
            let d = self.denom().to_f64().unwrap_or(f64::NAN);
            n / d
        })
    }

    pub(crate) fn abs(&self) -> Self {
        Self(self.0.abs())
    }
}

fn invalid(token: &str) -> PolyhedraError {
    PolyhedraError::InvalidNumber {
        token: token.to_string(),
    }
}

/// Largest decimal exponent accepted in scientific notation.
const MAX_DECIMAL_EXPONENT: i64 = 10_000;

fn split_sign(token: &str) -> (bool, &str) {
    match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parses `[sign] digits`.
fn parse_int(token: &str, full: &str) -> Result<BigInt> {
    let (negative, digits) = split_sign(token);
    if !is_digits(digits) {
        return Err(invalid(full));
    }
    let value = BigInt::from_str(digits).map_err(|_| invalid(full))?;
    Ok(if negative { -value } else { value })
}

/// Parses `[sign] digits [. digits] [(e|E) [sign] digits]` exactly.
fn parse_decimal(token: &str) -> Result<BigRational> {
    let (negative, body) = split_sign(token);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => {
            let exp_str = &body[pos + 1..];
            let (exp_negative, exp_digits) = split_sign(exp_str);
            if !is_digits(exp_digits) {
                return Err(invalid(token));
            }
            let exp = i64::from_str(exp_digits)
                .ok()
                .filter(|e| *e <= MAX_DECIMAL_EXPONENT)
                .ok_or_else(|| invalid(token))?;
            (&body[..pos], if exp_negative { -exp } else { exp })
        }
        None => (body, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid(token));
    }
    if !int_part
        .bytes()
        .chain(frac_part.bytes())
        .all(|b| b.is_ascii_digit())
    {
        return Err(invalid(token));
    }

    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let mut numer = BigInt::from_str(&digits).map_err(|_| invalid(token))?;
    if negative {
        numer = -numer;
    }
    let shift = exponent
        .checked_sub(frac_part.len() as i64)
        .ok_or_else(|| invalid(token))?;
    let magnitude = u32::try_from(shift.unsigned_abs()).map_err(|_| invalid(token))?;
    let scale: BigInt = Pow::pow(BigInt::from(10u32), magnitude);
    Ok(if shift >= 0 {
        BigRational::from_integer(numer * scale)
    } else {
        BigRational::new(numer, scale)
    })
}

impl FromStr for Rat {
    type Err = PolyhedraError;

    /// Accepts integers, fractions `p/q`, decimals and scientific notation without rounding.
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        if token.is_empty() {
            return Err(invalid(s));
        }
        if let Some((n, d)) = token.split_once('/') {
            let numer = parse_int(n.trim(), token)?;
            let denom = parse_int(d.trim(), token)?;
            if denom.is_zero() {
                return Err(invalid(token));
            }
            return Ok(Self(BigRational::new(numer, denom)));
        }
        parse_decimal(token).map(Self)
    }
}

impl fmt::Display for Rat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl fmt::Debug for Rat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rat({self})")
    }
}

macro_rules! rat_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Rat {
            fn from(value: $t) -> Self {
                Self::from_integer(value)
            }
        })*
    };
}

rat_from_int!(i32, i64, u32, u64, usize, BigInt);

impl From<BigRational> for Rat {
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

macro_rules! rat_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Rat> for &Rat {
            type Output = Rat;

            fn $method(self, rhs: &Rat) -> Rat {
                Rat((&self.0).$method(&rhs.0))
            }
        }

        impl $trait for Rat {
            type Output = Rat;

            fn $method(self, rhs: Rat) -> Rat {
                Rat(self.0.$method(rhs.0))
            }
        }
    };
}

rat_binop!(Add, add);
rat_binop!(Sub, sub);
rat_binop!(Mul, mul);
rat_binop!(Div, div);

impl Neg for Rat {
    type Output = Rat;

    fn neg(self) -> Rat {
        Rat(-self.0)
    }
}

impl Neg for &Rat {
    type Output = Rat;

    fn neg(self) -> Rat {
        Rat(-&self.0)
    }
}

impl Zero for Rat {
    fn zero() -> Self {
        Self(BigRational::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rat {
    fn one() -> Self {
        Self(BigRational::one())
    }
}

/// Rescales `values` by a positive factor so they become coprime integers.
pub(crate) fn to_primitive_integers(values: &mut [Rat]) {
    let mut lcm = BigInt::one();
    for v in values.iter().filter(|v| !v.is_zero()) {
        lcm = lcm.lcm(v.denom());
    }
    let mut gcd = BigInt::zero();
    let scaled: Vec<BigInt> = values
        .iter()
        .map(|v| v.numer() * (&lcm / v.denom()))
        .collect();
    for n in &scaled {
        gcd = gcd.gcd(n);
    }
    if gcd.is_zero() {
        return;
    }
    for (slot, n) in values.iter_mut().zip(scaled) {
        *slot = Rat::from_integer(n / &gcd);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rat {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rat {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_DECIMAL_EXPONENT, Rat, to_primitive_integers};
    use crate::error::{ErrorKind, PolyhedraError};
    use num_traits::One;

    #[test]
    fn decimal_strings_are_exact() {
        assert_eq!("1.12".parse::<Rat>().unwrap(), Rat::new(28, 25));
        assert_eq!("-.5".parse::<Rat>().unwrap(), Rat::new(-1, 2));
        assert_eq!("5.".parse::<Rat>().unwrap(), Rat::from(5));
        assert_eq!("1.5e-3".parse::<Rat>().unwrap(), Rat::new(3, 2000));
        assert_eq!("2E2".parse::<Rat>().unwrap(), Rat::from(200));
        assert_eq!(" 6/-4 ".parse::<Rat>().unwrap(), Rat::new(-3, 2));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let bad_tokens = [
            "", ".", "1.2.3", "1/0", "abc", "1e", "--1", "1/2/3", "+", "+-5/2", "5/+-2", "1_000/3",
            "-/3", "1e+-2", "1_0",
        ];
        for bad in bad_tokens {
            assert!(bad.parse::<Rat>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn exponents_are_bounded() {
        let at_limit = format!("1e-{MAX_DECIMAL_EXPONENT}");
        let value = at_limit.parse::<Rat>().unwrap();
        assert!(value.numer().is_one());
        for huge in ["1e10001", "1e-20000000", "1e4000000000", "1e99999999999999999999"] {
            let err = huge.parse::<Rat>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "{huge}");
            assert!(matches!(err, PolyhedraError::InvalidNumber { .. }), "{huge}");
        }
    }

    #[test]
    fn floats_convert_to_their_binary_value() {
        let r = Rat::from_f64(1.12).unwrap();
        assert_ne!(r, Rat::new(28, 25));
        assert_eq!(r.to_f64(), 1.12);
        assert!(r.denom().bits() > 1);
        assert!(Rat::from_f64(f64::NAN).is_err());
        assert_eq!(Rat::from_f64(0.5).unwrap(), Rat::new(1, 2));
    }

    #[test]
    fn display_uses_lowest_terms() {
        assert_eq!(Rat::new(4, -6).to_string(), "-2/3");
        assert_eq!(Rat::from(7).to_string(), "7");
    }

    #[test]
    fn primitive_integers_keep_direction() {
        let mut v = vec![Rat::new(1, 2), Rat::new(-3, 4), Rat::from(0)];
        to_primitive_integers(&mut v);
        assert_eq!(v, vec![Rat::from(2), Rat::from(-3), Rat::from(0)]);
    }
}
