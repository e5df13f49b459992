//! Oscillators are pure functions of the sample index: the phase is derived
//! from the index and the current period, never accumulated, so asking for
//! an earlier index reproduces the earlier output.

use crate::{
    generator::Inputs,
    parameter::ParameterName,
    signal::{denormalize, Real, SampleIndex, Signal, TAU},
};

/// A sine between `minimum` and `maximum`.
#[derive(Copy, Clone, Debug, Default)]
pub struct WaveSine;

impl Signal for WaveSine {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        let period = inputs.period_samples(ParameterName::Rate, index);
        let v = (index as Real * TAU / period).sin();
        denormalize(
            (1.0 + v) * 0.5,
            inputs.scalar(ParameterName::Minimum, index),
            inputs.scalar(ParameterName::Maximum, index),
        )
    }
}

/// A square wave that sits at `minimum` for the first `dutyCycle` fraction
/// of each period and at `maximum` for the rest.
#[derive(Copy, Clone, Debug, Default)]
pub struct WaveSquare;

impl Signal for WaveSquare {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        let period = inputs.period_samples(ParameterName::Rate, index);
        let duty = inputs.scalar(ParameterName::DutyCycle, index);
        let t = (index as Real) % period;
        let amp = if t < period * duty { 0.0 } else { 1.0 };
        denormalize(
            amp,
            inputs.scalar(ParameterName::Minimum, index),
            inputs.scalar(ParameterName::Maximum, index),
        )
    }
}

/// A single sample impulse of height `amplitude` at the start of each period.
#[derive(Copy, Clone, Debug, Default)]
pub struct Click;

impl Signal for Click {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        let period = inputs.period_samples(ParameterName::Rate, index);
        if (index as Real) % period < 1.0 {
            inputs.scalar(ParameterName::Amplitude, index)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        context::Context,
        environment::{Config, Environment},
        generator::{Generator, GeneratorKind},
        parameter::ParameterName,
        signal::Builder,
    };
    use approx::assert_relative_eq;

    fn env8() -> std::rc::Rc<Environment> {
        Environment::new(&Config::new().frame_size(8).build()).unwrap()
    }

    #[test]
    fn sine_defaults() {
        let env = env8();
        let mut sine = Generator::new(GeneratorKind::WaveSine, &env);
        assert_relative_eq!(sine.scalar(0), 0.5);
        let rate = sine.get_parameter(ParameterName::Rate).unwrap();
        assert_relative_eq!(rate.borrow_mut().scalar(0), 0.2);
        assert_eq!(sine.get_context(ParameterName::Rate).unwrap(), Context::Frequency);
    }

    #[test]
    fn sine_quarter_period() {
        let env = env8();
        let mut sine = Generator::new(GeneratorKind::WaveSine, &env);
        sine.set_parameter(ParameterName::Rate, 4.0, Context::PeriodSamples)
            .unwrap()
            .set(ParameterName::Minimum, -20.0)
            .unwrap()
            .set(ParameterName::Maximum, 20.0)
            .unwrap();
        assert_relative_eq!(sine.scalar(0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(sine.scalar(1), 20.0, epsilon = 1e-9);
        assert_relative_eq!(sine.scalar(3), -20.0, epsilon = 1e-9);
        // earlier indices reproduce
        assert_relative_eq!(sine.scalar(1), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn square_frequency() {
        let env = env8();
        let mut sq = Generator::new(GeneratorKind::WaveSquare, &env);
        sq.set(ParameterName::Minimum, 0.0).unwrap();
        sq.set(ParameterName::Maximum, 1.0).unwrap();
        sq.set_parameter(ParameterName::Rate, 1.0, Context::Frequency).unwrap();
        assert_eq!(sq.value_at_second(0.0), 0.0);
        assert_eq!(sq.value_at_second(0.5), 1.0);
        assert_eq!(sq.value_at_second(0.55), 1.0);

        sq.set_parameter(ParameterName::Rate, 5.0, Context::PeriodSeconds).unwrap();
        assert_eq!(sq.value_at_second(0.55), 0.0);
        assert_eq!(sq.value_at_second(2.5), 1.0);
        assert_eq!(sq.value_at_second(4.99), 1.0);
        assert_eq!(sq.value_at_second(5.0), 0.0);
    }

    #[test]
    fn square_defaults() {
        let env = env8();
        let mut sq = Generator::new(GeneratorKind::WaveSquare, &env);
        assert_eq!(sq.value_at_second(0.0), 0.0);
        assert_eq!(sq.value_at_second(4.0), 1.0);
    }

    #[test]
    fn square_duty_and_range() {
        let env = env8();
        let mut sq = Generator::new(GeneratorKind::WaveSquare, &env);
        sq.set(ParameterName::Minimum, -2.0).unwrap();
        sq.set(ParameterName::Maximum, 8.0).unwrap();
        sq.set(ParameterName::DutyCycle, 0.5).unwrap();
        sq.set_parameter(ParameterName::Rate, 0.25, Context::Frequency).unwrap();
        let seconds = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let expected = [-2.0, -2.0, 8.0, 8.0, -2.0, -2.0];
        for (s, e) in seconds.iter().zip(expected.iter()) {
            assert_eq!(sq.value_at_second(*s), *e);
        }
    }

    #[test]
    fn square_period_samples() {
        let env = env8();
        let mut sq = Generator::new(GeneratorKind::WaveSquare, &env);
        sq.set_parameter(ParameterName::Rate, 4.0, Context::PeriodSamples).unwrap();
        assert_eq!(sq.render(4), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn square_rejects_bad_context() {
        let env = env8();
        let mut sq = Generator::new(GeneratorKind::WaveSquare, &env);
        assert!(sq.set_parameter(ParameterName::Rate, 5.0, Context::None).is_err());
        assert!(sq.set_parameter(ParameterName::Refresh, 0.4, Context::PeriodSamples).is_err());
        assert!(sq.set_parameter(ParameterName::Rate, 5.0, Context::PeriodSeconds).is_ok());
    }

    #[test]
    fn click_period() {
        let env = env8();
        let mut click = Generator::new(GeneratorKind::Click, &env);
        click.set_parameter(ParameterName::Rate, 3.0, Context::PeriodSamples).unwrap();
        click.set(ParameterName::Amplitude, 0.5).unwrap();
        assert_eq!(click.render(7), vec![0.5, 0.0, 0.0, 0.5, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn click_bpm() {
        let env = env8();
        let mut click = Generator::new(GeneratorKind::Click, &env);
        click.set_parameter(ParameterName::Rate, 120.0, Context::BeatsPerMinute).unwrap();
        assert_eq!(click.scalar(0), 1.0);
        assert_eq!(click.scalar(22049), 0.0);
        assert_eq!(click.scalar(22050), 1.0);
    }
}
