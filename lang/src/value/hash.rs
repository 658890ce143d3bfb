use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::Value;
use crate::builtins::Callable;
use crate::error::RuntimeError;
use crate::protocols::Hashable;

// Numeric hashes reduce modulo the Mersenne prime 2^61 - 1, which lets
// integers, floats and booleans with equal values hash identically.
const MODULUS_BITS: u32 = 61;
const MODULUS: u64 = (1 << MODULUS_BITS) - 1;
const INFINITY_HASH: i64 = 314_159;
const NONE_HASH: i64 = 0x5c1d_7f35;

const XXPRIME_1: u64 = 11_400_714_785_074_694_791;
const XXPRIME_2: u64 = 14_029_467_366_897_019_727;
const XXPRIME_5: u64 = 2_870_177_450_012_600_261;

impl Hashable for Value {
    fn py_hash(&self) -> Result<i64, RuntimeError> {
        match self {
            Value::None => Ok(NONE_HASH),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Int(n) => Ok(hash_int(n)),
            Value::Float(f) => Ok(hash_float(f.0)),
            Value::Str(s) => Ok(hash_text(s)),
            Value::Tuple(tuple) => {
                let lanes = tuple
                    .values()
                    .iter()
                    .map(Hashable::py_hash)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(combine(&lanes))
            }
            Value::Range(range) => {
                // Equal ranges (same elements) must hash alike, whatever
                // their stop bound.
                let len = i64::try_from(range.len()).unwrap_or(i64::MAX);
                let start = if len > 0 { range.start } else { 0 };
                let step = if len > 1 { range.step } else { 0 };
                Ok(combine(&[len, start, step]))
            }
            Value::Type(tag) => Ok(hash_text(tag.name())),
            Value::Function(function) => match function.as_ref() {
                Callable::Builtin(id) => Ok(hash_text(id.name())),
                _ => Ok(identity_hash(self)),
            },
            Value::LazySequence(_) => Ok(identity_hash(self)),
            Value::List(_) | Value::Dict(_) | Value::Set(_) | Value::Object(_) => Err(
                RuntimeError::type_error(format!("unhashable type: '{}'", self.type_name())),
            ),
        }
    }
}

fn avoid_sentinel(hash: i64) -> i64 {
    if hash == -1 { -2 } else { hash }
}

fn hash_int(n: &BigInt) -> i64 {
    let residue = (n.magnitude() % BigUint::from(MODULUS)).to_u64().unwrap_or(0) as i64;
    let hash = if n.sign() == Sign::Minus { -residue } else { residue };
    avoid_sentinel(hash)
}

/// Hash of `x` reduced modulo 2^61 - 1 exactly, so integral floats hash like
/// the equal integer.
fn hash_float(x: f64) -> i64 {
    if x.is_nan() {
        return 0;
    }
    if x.is_infinite() {
        return if x > 0.0 { INFINITY_HASH } else { -INFINITY_HASH };
    }

    let (mut mantissa, mut exponent) = frexp(x.abs());
    let mut hash: u64 = 0;
    while mantissa != 0.0 {
        hash = ((hash << 28) & MODULUS) | (hash >> (MODULUS_BITS - 28));
        mantissa *= 268_435_456.0;
        exponent -= 28;
        let digit = mantissa as u64;
        mantissa -= digit as f64;
        hash += digit;
        if hash >= MODULUS {
            hash -= MODULUS;
        }
    }

    let bits = MODULUS_BITS as i32;
    let shift = (if exponent >= 0 {
        exponent % bits
    } else {
        bits - 1 - ((-1 - exponent) % bits)
    }) as u32;
    hash = ((hash << shift) & MODULUS) | (hash >> (MODULUS_BITS - shift));

    let hash = hash as i64;
    avoid_sentinel(if x < 0.0 { -hash } else { hash })
}

/// Splits a finite non-negative `x` into `m * 2^e` with `m` in `[0.5, 1)`.
fn frexp(x: f64) -> (f64, i32) {
    if x == 0.0 {
        return (0.0, 0);
    }
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    if biased == 0 {
        let (m, e) = frexp(x * 2f64.powi(54));
        return (m, e - 54);
    }
    let mantissa = f64::from_bits((bits & !(0x7ff << 52)) | (1022 << 52));
    (mantissa, biased - 1022)
}

fn hash_text(s: &str) -> i64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    avoid_sentinel(hasher.finish() as i64)
}

fn identity_hash(value: &Value) -> i64 {
    (value.identity() >> 4) as i64
}

/// Order-sensitive combination of element hashes (xxHash-style lanes).
fn combine(lanes: &[i64]) -> i64 {
    let mut acc = XXPRIME_5;
    for &lane in lanes {
        acc = acc.wrapping_add((lane as u64).wrapping_mul(XXPRIME_2));
        acc = acc.rotate_left(31);
        acc = acc.wrapping_mul(XXPRIME_1);
    }
    acc = acc.wrapping_add((lanes.len() as u64) ^ (XXPRIME_5 ^ 3_527_539));
    if acc == u64::MAX {
        return 1_546_275_796;
    }
    acc as i64
}

/// A value proven hashable, usable as a dict key or set member.
///
/// The hash is computed once at construction. Equality is the value's
/// own equality, so `1`, `1.0` and `True` denote the same key.
#[derive(Clone, Debug)]
pub struct HashKey {
    hash: i64,
    value: Value,
}

impl HashKey {
    /// Fails with `TypeError: unhashable type: '...'` for mutable values.
    pub fn new(value: Value) -> Result<Self, RuntimeError> {
        let hash = value.py_hash()?;
        Ok(Self { hash, value })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn hash_value(&self) -> i64 {
        self.hash
    }
}

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && (self.value.is(&other.value) || self.value == other.value)
    }
}

impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}
