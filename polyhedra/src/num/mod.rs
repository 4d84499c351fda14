//! Numeric contract shared by the exact and floating number kinds.

mod rat;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub use rat::Rat;

use crate::error::{PolyhedraError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// Which number type a matrix or polyhedron carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum NumberKind {
    Rational,
    Float,
}

impl NumberKind {
    /// Keyword used in the `begin` block of cdd text.
    pub fn cdd_keyword(self) -> &'static str {
        match self {
            NumberKind::Rational => "rational",
            NumberKind::Float => "real",
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cdd_keyword())
    }
}

impl FromStr for NumberKind {
    type Err = PolyhedraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rational" | "integer" | "exact" => Ok(NumberKind::Rational),
            "real" | "float" | "floating" => Ok(NumberKind::Float),
            _ => Err(PolyhedraError::InvalidArgument {
                context: "unknown number kind",
            }),
        }
    }
}

/// Anything that carries exactly one [`NumberKind`].
pub trait NumberKindHolder {
    fn number_kind(&self) -> NumberKind;

    fn is_exact(&self) -> bool {
        self.number_kind() == NumberKind::Rational
    }
}

/// A raw row entry before it is committed to a number kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Rational(Rat),
    Text(String),
}

impl Literal {
    /// Exact-typed values and strings force the rational kind.
    pub fn forces_rational(&self) -> bool {
        matches!(self, Literal::Rational(_) | Literal::Text(_))
    }

    /// Kind inferred for a collection of literals.
    pub fn infer_kind<'a>(literals: impl IntoIterator<Item = &'a Literal>) -> NumberKind {
        if literals.into_iter().any(Literal::forces_rational) {
            NumberKind::Rational
        } else {
            NumberKind::Float
        }
    }
}

macro_rules! literal_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(impl From<$t> for Literal {
            fn from(value: $t) -> Self {
                Literal::$variant(value.into())
            }
        })*
    };
}

literal_from!(
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    Rat => Rational,
    String => Text,
    &str => Text,
);

pub trait Epsilon<N>: Clone + fmt::Debug + Send + Sync {
    fn sign(&self, value: &N) -> Sign;

    fn is_zero(&self, value: &N) -> bool {
        self.sign(value) == Sign::Zero
    }

    fn is_positive(&self, value: &N) -> bool {
        self.sign(value) == Sign::Positive
    }

    fn is_negative(&self, value: &N) -> bool {
        self.sign(value) == Sign::Negative
    }

    fn cmp(&self, a: &N, b: &N) -> Ordering;
}

/// Zero tolerance for exact arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExactEps;

impl Epsilon<Rat> for ExactEps {
    fn sign(&self, value: &Rat) -> Sign {
        match value.numer().sign() {
            num_bigint::Sign::Minus => Sign::Negative,
            num_bigint::Sign::NoSign => Sign::Zero,
            num_bigint::Sign::Plus => Sign::Positive,
        }
    }

    fn cmp(&self, a: &Rat, b: &Rat) -> Ordering {
        a.cmp(b)
    }
}

/// Absolute tolerance for floating sign tests and ray deduplication.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct F64Eps(f64);

impl F64Eps {
    pub const DEFAULT: f64 = 1e-9;

    pub fn new(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() {
            return Err(PolyhedraError::NonFinite);
        }
        if tolerance < 0.0 {
            return Err(PolyhedraError::InvalidArgument {
                context: "tolerance must be non-negative",
            });
        }
        Ok(Self(tolerance))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for F64Eps {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl Epsilon<f64> for F64Eps {
    fn sign(&self, value: &f64) -> Sign {
        if *value > self.0 {
            Sign::Positive
        } else if *value < -self.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    fn cmp(&self, a: &f64, b: &f64) -> Ordering {
        match self.sign(&(a - b)) {
            Sign::Negative => Ordering::Less,
            Sign::Zero => Ordering::Equal,
            Sign::Positive => Ordering::Greater,
        }
    }
}

/// Field operations the engine needs from a number type.
pub trait Num: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static {
    type Eps: Epsilon<Self> + Default;

    const KIND: NumberKind;

    fn zero() -> Self;
    fn one() -> Self;
    fn from_i64(value: i64) -> Self;
    fn from_literal(literal: &Literal) -> Result<Self>;

    fn ref_add(&self, other: &Self) -> Self;
    fn ref_sub(&self, other: &Self) -> Self;
    fn ref_mul(&self, other: &Self) -> Self;
    fn ref_div(&self, other: &Self) -> Self;
    fn ref_neg(&self) -> Self;
    fn abs(&self) -> Self;
    fn to_f64(&self) -> f64;

    fn default_eps() -> Self::Eps {
        Self::Eps::default()
    }

    fn parse_token(token: &str) -> Result<Self> {
        Self::from_literal(&Literal::Text(token.to_string()))
    }

    /// Rescales a direction by a positive factor into its canonical form.
    fn normalize_direction(values: &mut [Self], eps: &Self::Eps);
}

impl Num for Rat {
    type Eps = ExactEps;

    const KIND: NumberKind = NumberKind::Rational;

    fn zero() -> Self {
        <Rat as num_traits::Zero>::zero()
    }

    fn one() -> Self {
        <Rat as num_traits::One>::one()
    }

    fn from_i64(value: i64) -> Self {
        Rat::from(value)
    }

    fn from_literal(literal: &Literal) -> Result<Self> {
        match literal {
            Literal::Int(v) => Ok(Rat::from(*v)),
            Literal::Float(v) => Rat::from_f64(*v),
            Literal::Rational(v) => Ok(v.clone()),
            Literal::Text(t) => t.parse(),
        }
    }

    fn ref_add(&self, other: &Self) -> Self {
        self + other
    }

    fn ref_sub(&self, other: &Self) -> Self {
        self - other
    }

    fn ref_mul(&self, other: &Self) -> Self {
        self * other
    }

    fn ref_div(&self, other: &Self) -> Self {
        self / other
    }

    fn ref_neg(&self) -> Self {
        -self
    }

    fn abs(&self) -> Self {
        Rat::abs(self)
    }

    fn to_f64(&self) -> f64 {
        Rat::to_f64(self)
    }

    fn normalize_direction(values: &mut [Self], _eps: &ExactEps) {
        rat::to_primitive_integers(values);
    }
}

impl Num for f64 {
    type Eps = F64Eps;

    const KIND: NumberKind = NumberKind::Float;

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_i64(value: i64) -> Self {
        value as f64
    }

    fn from_literal(literal: &Literal) -> Result<Self> {
        let value = match literal {
            Literal::Int(v) => *v as f64,
            Literal::Float(v) => *v,
            Literal::Rational(v) => v.to_f64(),
            Literal::Text(t) => match t.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => t.parse::<Rat>()?.to_f64(),
            },
        };
        if !value.is_finite() {
            return Err(PolyhedraError::NonFinite);
        }
        Ok(value)
    }

    fn ref_add(&self, other: &Self) -> Self {
        self + other
    }

    fn ref_sub(&self, other: &Self) -> Self {
        self - other
    }

    fn ref_mul(&self, other: &Self) -> Self {
        self * other
    }

    fn ref_div(&self, other: &Self) -> Self {
        self / other
    }

    fn ref_neg(&self) -> Self {
        -self
    }

    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn normalize_direction(values: &mut [Self], eps: &F64Eps) {
        let scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        if scale <= eps.value() {
            values.iter_mut().for_each(|v| *v = 0.0);
            return;
        }
        for v in values.iter_mut() {
            *v /= scale;
            if eps.is_zero(v) {
                *v = 0.0;
            }
        }
    }
}
