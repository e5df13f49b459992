use std::{fmt, str::FromStr};

use crate::{
    error::GenError,
    signal::Real,
    text::scrub_lower,
};

/// How the value in a slot is interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Context {
    #[default]
    None,
    Frequency,
    PeriodSeconds,
    PeriodSamples,
    BeatsPerMinute,
    Pitch,
    Trigger,
}

impl Context {
    /// The name used when serializing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::None => "none",
            Context::Frequency => "frequency",
            Context::PeriodSeconds => "seconds",
            Context::PeriodSamples => "samples",
            Context::BeatsPerMinute => "bpm",
            Context::Pitch => "pitch",
            Context::Trigger => "trigger",
        }
    }

    /// Interpret `v` in this context as a frequency in Hz.
    pub fn to_frequency(&self, v: Real, sampling_rate: Real) -> Real {
        match self {
            Context::PeriodSeconds => 1.0 / v,
            Context::PeriodSamples => sampling_rate / v,
            Context::Pitch => pitch_to_frequency(v),
            Context::BeatsPerMinute => v / 60.0,
            Context::None | Context::Frequency | Context::Trigger => v,
        }
    }

    /// Interpret `v` in this context as a period in samples. A trigger that
    /// is off never elapses and yields infinity.
    pub fn to_period_samples(&self, v: Real, sampling_rate: Real) -> Real {
        match self {
            Context::Frequency => sampling_rate / v,
            Context::PeriodSeconds => v * sampling_rate,
            Context::Trigger => {
                if v != 0.0 {
                    1.0
                } else {
                    Real::INFINITY
                }
            }
            Context::Pitch => sampling_rate / pitch_to_frequency(v),
            Context::BeatsPerMinute => (60.0 / v) * sampling_rate,
            Context::None | Context::PeriodSamples => v,
        }
    }
}

/// MIDI-style pitch number to Hz with A4 (69) at 440.
pub fn pitch_to_frequency(pitch: Real) -> Real {
    440.0 * (2.0 as Real).powf((pitch - 69.0) / 12.0)
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Context {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = scrub_lower(s);
        let context = match key.as_str() {
            "" | "none" => Context::None,
            "frequency" | "fq" | "hertz" | "hz" => Context::Frequency,
            "periodseconds" | "seconds" | "sec" => Context::PeriodSeconds,
            "periodsamples" | "samples" | "samp" => Context::PeriodSamples,
            "beatsperminute" | "bpm" => Context::BeatsPerMinute,
            "pitch" => Context::Pitch,
            "trigger" => Context::Trigger,
            _ => return Err(GenError::UnknownContext(s.to_string())),
        };
        Ok(context)
    }
}
