use arrayvec::ArrayVec;
use std::{cell::RefCell, f64::consts::PI, fmt, rc::Rc};

use uuid::Uuid;

use crate::generator::Inputs;

pub const TAU: f64 = 2.0 * PI;
pub type Real = f64;
pub type Tag = Uuid;

/// Sample time. Just an unbounded counter starting at zero.
pub type SampleIndex = u64;

/// The largest number of values a vector node can produce per sample.
pub const MAX_POLY: usize = 128;

/// The working array a vector node writes into on each evaluation. Its
/// length is the active poly depth.
pub type Frame = ArrayVec<Real, MAX_POLY>;

/// Generate a unique tag for a generator.
pub fn mk_tag() -> Tag {
    Uuid::new_v4()
}

pub type Shared<T> = Rc<RefCell<T>>;

/// Convenience function for `Rc<RefCell<...>>`.
pub fn shared<T>(x: T) -> Shared<T> {
    Rc::new(RefCell::new(x))
}

/// Whether a generator produces exactly one value per sample or a vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Mono,
    Poly,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Mono => write!(f, "mono"),
            Arity::Poly => write!(f, "poly"),
        }
    }
}

/// Every generator kind implements `Signal`. A kind must override at least
/// one of `scalar` or `poly`; the defaults adapt each to the other, so a kind
/// that overrides neither recurses forever.
pub trait Signal {
    /// Output arity of the kind.
    fn arity(&self) -> Arity {
        Arity::Mono
    }

    /// The value at `index`. Vector kinds fold down to their first element.
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        let mut frame = Frame::new();
        self.poly(inputs, index, &mut frame);
        frame.first().copied().unwrap_or(0.0)
    }

    /// Fill `out` with the values at `index`. Scalar kinds produce a one
    /// element frame.
    fn poly(&mut self, inputs: &Inputs, index: SampleIndex, out: &mut Frame) {
        out.clear();
        out.push(self.scalar(inputs, index));
    }

    /// Number of values `poly` will produce.
    fn depth(&self, _inputs: &Inputs) -> usize {
        1
    }

    /// Return to construction time state. Wiring is left untouched.
    fn reset(&mut self) {}

    /// Stateful kinds are memoized per sample index by their `Generator`.
    fn memoized(&self) -> bool {
        false
    }
}

pub trait Builder {
    fn build(&mut self) -> Self
    where
        Self: Sized + Clone,
    {
        self.clone()
    }
}

/// Map `v` in `[0, 1]` onto the range spanned by `a` and `b`. The order of
/// the bounds does not matter. `v` is clamped.
pub fn denormalize(v: Real, a: Real, b: Real) -> Real {
    if a == b {
        return a;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    lo + v.clamp(0.0, 1.0) * (hi - lo)
}

/// Modulo that is never negative for a positive modulus.
pub fn modulo(x: i64, m: i64) -> i64 {
    ((x % m) + m) % m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn denormalize_range() {
        assert_relative_eq!(denormalize(0.5, 0.0, 10.0), 5.0);
        assert_relative_eq!(denormalize(0.5, 10.0, 0.0), 5.0);
        assert_relative_eq!(denormalize(0.25, -20.0, 20.0), -10.0);
        assert_relative_eq!(denormalize(0.9, 3.0, 3.0), 3.0);
        assert_relative_eq!(denormalize(1.5, 0.0, 2.0), 2.0);
    }

    #[test]
    fn modulo_wraps_negative() {
        assert_eq!(modulo(-1, 4), 3);
        assert_eq!(modulo(5, 4), 1);
        assert_eq!(modulo(-8, 4), 0);
    }
}
