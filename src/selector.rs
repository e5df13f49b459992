use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use crate::{
    generator::Inputs,
    parameter::ParameterName,
    random::{random_int_range, round_probabilistic},
    render::RefreshClock,
    signal::{modulo, Real, SampleIndex, Signal},
};

/// How the selector picks the next element of its list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionMethod {
    Forward,
    Reverse,
    Oscillate,
    RandomChoice,
    Permutation,
    RandomWalk,
}

impl SelectionMethod {
    /// Codes 0 to 5 in declaration order. Anything else is `Forward`.
    pub fn from_code(code: Real) -> Self {
        match code.round() as i64 {
            1 => SelectionMethod::Reverse,
            2 => SelectionMethod::Oscillate,
            3 => SelectionMethod::RandomChoice,
            4 => SelectionMethod::Permutation,
            5 => SelectionMethod::RandomWalk,
            _ => SelectionMethod::Forward,
        }
    }
}

/// Steps through `valueList` one element per refresh.
///
/// The magnitude of `stride` sets the step size and is rounded
/// probabilistically on every refresh. Oscillation reflects off both ends of
/// the list; a random walk wraps around.
#[derive(Clone, Debug)]
pub struct Selector {
    rng: StdRng,
    clock: RefreshClock,
    i: i64,
    direction: i64,
    permutation: Vec<usize>,
    permutation_pos: usize,
    size: usize,
    value: Real,
}

impl Selector {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            clock: RefreshClock::new(),
            i: 0,
            direction: 1,
            permutation: Vec::new(),
            permutation_pos: 0,
            size: 0,
            value: 0.0,
        }
    }

    fn resize(&mut self, size: usize) {
        self.size = size;
        self.permutation = (0..size).collect();
        self.permutation_pos = size;
    }

    /// `stride` is non-negative.
    fn select(&mut self, method: SelectionMethod, stride: i64, list: &[Real]) {
        let n = list.len() as i64;
        let step = stride % n;
        match method {
            SelectionMethod::Reverse => self.i = modulo(self.i - step, n),
            SelectionMethod::RandomChoice => self.i = random_int_range(&mut self.rng, 0, n - 1),
            SelectionMethod::Permutation => {
                if self.permutation_pos >= self.permutation.len() {
                    self.permutation.shuffle(&mut self.rng);
                    self.permutation_pos = 0;
                }
                self.i = self.permutation[self.permutation_pos] as i64;
                self.permutation_pos += 1;
            }
            SelectionMethod::RandomWalk => {
                let walk = random_int_range(&mut self.rng, 1, stride.max(1)) % n;
                if self.rng.gen_bool(0.5) {
                    self.i -= walk;
                } else {
                    self.i += walk;
                }
                self.i = modulo(self.i, n);
            }
            SelectionMethod::Forward | SelectionMethod::Oscillate => {}
        }

        self.value = list[modulo(self.i, n) as usize];

        match method {
            SelectionMethod::Forward => self.i = modulo(self.i + step, n),
            SelectionMethod::Oscillate => self.bounce(stride, n),
            _ => {}
        }
    }

    /// Advance along the path `0, 1, .., n - 1, n - 2, .., 1` by `stride`,
    /// reflecting off both ends.
    fn bounce(&mut self, stride: i64, n: i64) {
        let cycle = 2 * (n - 1);
        let i = modulo(self.i, n);
        let pos = if self.direction < 0 { cycle - i } else { i };
        let pos = (pos + stride % cycle) % cycle;
        if pos < n {
            self.i = pos;
            self.direction = 1;
        } else {
            self.i = cycle - pos;
            self.direction = -1;
        }
    }
}

impl Signal for Selector {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        let list = inputs.poly(ParameterName::ValueList, index);
        if list.len() != self.size {
            self.resize(list.len());
        }
        match list.len() {
            0 => return 0.0,
            1 => return list[0],
            _ => {}
        }
        let period = inputs.period_samples(ParameterName::Refresh, index);
        if self.clock.tick(index, period) {
            let method = SelectionMethod::from_code(inputs.scalar(ParameterName::SelectionMethod, index));
            let stride = inputs.scalar(ParameterName::Stride, index).abs();
            let stride = round_probabilistic(&mut self.rng, stride).max(0);
            self.select(method, stride, &list);
        }
        self.value
    }

    fn reset(&mut self) {
        self.clock.reset();
        self.i = 0;
        self.direction = 1;
        self.permutation_pos = self.permutation.len();
        self.value = 0.0;
    }

    fn memoized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_codes() {
        assert_eq!(SelectionMethod::from_code(0.0), SelectionMethod::Forward);
        assert_eq!(SelectionMethod::from_code(2.0), SelectionMethod::Oscillate);
        assert_eq!(SelectionMethod::from_code(4.2), SelectionMethod::Permutation);
        assert_eq!(SelectionMethod::from_code(9.0), SelectionMethod::Forward);
    }
}
