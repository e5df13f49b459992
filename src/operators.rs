use crate::{
    generator::Inputs,
    parameter::ParameterName,
    signal::{Arity, Frame, Real, SampleIndex, Signal},
};

/// Sum of the four operands. Unset operands are zero.
#[derive(Copy, Clone, Debug, Default)]
pub struct Add;

impl Signal for Add {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        ParameterName::OPERANDS
            .iter()
            .fold(0.0, |acc, op| acc + inputs.scalar(*op, index))
    }
}

/// Product of the four operands. Unset operands are one.
#[derive(Copy, Clone, Debug, Default)]
pub struct Multiply;

impl Signal for Multiply {
    fn scalar(&mut self, inputs: &Inputs, index: SampleIndex) -> Real {
        ParameterName::OPERANDS
            .iter()
            .fold(1.0, |acc, op| acc * inputs.scalar(*op, index))
    }
}

/// Element-wise sum of up to four vectors. Shorter operands contribute
/// nothing past their own depth.
#[derive(Copy, Clone, Debug, Default)]
pub struct PolyAdd;

impl Signal for PolyAdd {
    fn arity(&self) -> Arity {
        Arity::Poly
    }

    fn poly(&mut self, inputs: &Inputs, index: SampleIndex, out: &mut Frame) {
        out.clear();
        for op in ParameterName::OPERANDS.iter() {
            let frame = inputs.poly(*op, index);
            for (i, v) in frame.iter().enumerate() {
                match out.get_mut(i) {
                    Some(acc) => *acc += v,
                    None => out.push(*v),
                }
            }
        }
    }

    fn depth(&self, inputs: &Inputs) -> usize {
        ParameterName::OPERANDS
            .iter()
            .map(|op| inputs.depth(*op))
            .max()
            .unwrap_or(1)
    }
}

/// Equal power stereo panner. `panLeftRight` of 0 is hard left, 1 hard
/// right.
#[derive(Copy, Clone, Debug, Default)]
pub struct PanStereo;

impl Signal for PanStereo {
    fn arity(&self) -> Arity {
        Arity::Poly
    }

    fn poly(&mut self, inputs: &Inputs, index: SampleIndex, out: &mut Frame) {
        let x = inputs.scalar(ParameterName::Operand1, index);
        let pan = inputs
            .scalar(ParameterName::PanLeftRight, index)
            .clamp(0.0, 1.0);
        out.clear();
        out.push(x * (1.0 - pan).sqrt());
        out.push(x * pan.sqrt());
    }

    fn depth(&self, _inputs: &Inputs) -> usize {
        2
    }
}
