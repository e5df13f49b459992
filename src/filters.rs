use crate::{
    generator::Inputs,
    parameter::ParameterName,
    signal::{Real, SampleIndex, Signal, TAU},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterMode {
    LowPass,
    HighPass,
}

/// One pole IIR filter from the bilinear transform, see
/// musicdsp.org #117. The cutoff is read from `rate`; coefficients are
/// recomputed only when the cutoff changes.
///
/// The filter keeps a single feedback sample, so it is memoized per sample
/// index: reading the same index twice does not advance the state.
#[derive(Clone, Debug)]
pub struct OnePole {
    mode: FilterMode,
    hz: Real,
    sampling_rate: Real,
    a0: Real,
    a1: Real,
    b1: Real,
    z: Real,
}

impl OnePole {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            hz: Real::NAN,
            sampling_rate: Real::NAN,
            a0: 0.0,
            a1: 0.0,
            b1: 0.0,
            z: 0.0,
        }
    }

    fn update_coefficients(&mut self, hz: Real, sampling_rate: Real) {
        if hz == self.hz && sampling_rate == self.sampling_rate {
            return;
        }
        self.hz = hz;
        self.sampling_rate = sampling_rate;
        let w = 2.0 * sampling_rate;
        let fc = hz * TAU;
        let norm = 1.0 / (fc + w);
        self.b1 = (w - fc) * norm;
        match self.mode {
            FilterMode::LowPass => {
                self.a0 = fc * norm;
                self.a1 = self.a0;
            }
            FilterMode::HighPass => {
                self.a0 = w * norm;
                self.a1 = -self.a0;
            }
        }
    }
}

impl Signal for OnePole {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        let x = inputs.scalar(ParameterName::Operand1, index);
        let hz = inputs.frequency(ParameterName::Rate, index);
        self.update_coefficients(hz, inputs.sampling_rate());
        let y = x * self.a0 + self.z * self.a1 + self.z * self.b1;
        self.z = y;
        y
    }

    fn reset(&mut self) {
        self.z = 0.0;
    }

    fn memoized(&self) -> bool {
        true
    }
}
