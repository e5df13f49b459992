use rand::{rngs::StdRng, Rng};

use crate::{
    generator::Inputs,
    parameter::ParameterName,
    render::RefreshClock,
    signal::{denormalize, Real, SampleIndex, Signal},
};

/// Inclusive integer range. Returns `lo` when the range is empty.
pub fn random_int_range(rng: &mut StdRng, lo: i64, hi: i64) -> i64 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Round `v` down or up, rounding up with probability equal to the
/// fractional part. Saturates at the bounds of `i64`; `NaN` gives zero.
pub fn round_probabilistic(rng: &mut StdRng, v: Real) -> i64 {
    let floor = v.floor();
    let frac = v - floor;
    if frac > 0.0 && rng.gen::<Real>() < frac {
        (floor as i64).saturating_add(1)
    } else {
        floor as i64
    }
}

/// A uniform random value between `minimum` and `maximum`, drawn again each
/// time `refresh` comes due.
#[derive(Clone, Debug)]
pub struct RandomUniform {
    rng: StdRng,
    clock: RefreshClock,
    unit: Real,
}

impl RandomUniform {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            clock: RefreshClock::new(),
            unit: 0.0,
        }
    }
}

impl Signal for RandomUniform {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        let period = inputs.period_samples(ParameterName::Refresh, index);
        if self.clock.tick(index, period) {
            self.unit = self.rng.gen::<Real>();
        }
        denormalize(
            self.unit,
            inputs.scalar(ParameterName::Minimum, index),
            inputs.scalar(ParameterName::Maximum, index),
        )
    }

    fn reset(&mut self) {
        self.clock.reset();
    }

    fn memoized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::Context,
        environment::{Config, Environment},
        generator::{Generator, GeneratorKind},
        signal::Builder,
    };
    use rand::SeedableRng;

    fn seeded() -> std::rc::Rc<Environment> {
        Environment::new(&Config::new().seed(42).build()).unwrap()
    }

    #[test]
    fn int_range_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let v = random_int_range(&mut rng, 1, 3);
            assert!((1..=3).contains(&v));
        }
        assert_eq!(random_int_range(&mut rng, 4, 4), 4);
    }

    #[test]
    fn probabilistic_rounding() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(round_probabilistic(&mut rng, 2.0), 2);
        assert_eq!(round_probabilistic(&mut rng, 1e19), i64::MAX);
        assert_eq!(round_probabilistic(&mut rng, Real::NAN), 0);
        let ups = (0..1000)
            .filter(|_| round_probabilistic(&mut rng, 1.5) == 2)
            .count();
        assert!(ups > 350 && ups < 650);
    }

    #[test]
    fn stays_in_range() {
        let env = seeded();
        let mut r = Generator::new(GeneratorKind::RandomUniform, &env);
        r.set(ParameterName::Minimum, -3.0).unwrap();
        r.set(ParameterName::Maximum, 3.0).unwrap();
        for v in r.render(500) {
            assert!((-3.0..=3.0).contains(&v));
        }
    }

    #[test]
    fn usually_different() {
        let env = seeded();
        let mut r = Generator::new(GeneratorKind::RandomUniform, &env);
        let out = r.render(100);
        let changes = out.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(changes > 90);
    }

    #[test]
    fn same_instant_is_stable() {
        let env = seeded();
        let mut r = Generator::new(GeneratorKind::RandomUniform, &env);
        let a = r.scalar(5);
        assert_eq!(r.scalar(5), a);
    }

    #[test]
    fn holds_between_refreshes() {
        let env = seeded();
        let mut r = Generator::new(GeneratorKind::RandomUniform, &env);
        r.set_parameter(ParameterName::Refresh, 4.0, Context::PeriodSamples)
            .unwrap();
        let out = r.render(8);
        assert!(out[..4].iter().all(|v| *v == out[0]));
        assert!(out[4..].iter().all(|v| *v == out[4]));
        assert_ne!(out[0], out[4]);
    }

    #[test]
    fn trigger_off_holds_forever() {
        let env = seeded();
        let mut r = Generator::new(GeneratorKind::RandomUniform, &env);
        r.set(ParameterName::Refresh, 0.0).unwrap();
        let out = r.render(50);
        assert!(out.iter().all(|v| *v == out[0]));
    }

    #[test]
    fn seeded_graphs_repeat() {
        let a = Generator::new(GeneratorKind::RandomUniform, &seeded()).render(20);
        let b = Generator::new(GeneratorKind::RandomUniform, &seeded()).render(20);
        assert_eq!(a, b);
    }
}
