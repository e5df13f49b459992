use std::{fmt, str::FromStr};

use crate::{context::Context, error::GenError, signal::Arity, text::scrub_lower};

/// Names of every input slot a generator can expose.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterName {
    Minimum,
    Maximum,
    Refresh,
    Rate,
    Value,
    DutyCycle,
    Operand1,
    Operand2,
    Operand3,
    Operand4,
    Amplitude,
    ValueList,
    SelectionMethod,
    PanLeftRight,
    Stride,
    FilePath,
    Channels,
    FrameSize,
}

impl ParameterName {
    pub const OPERANDS: [ParameterName; 4] = [
        ParameterName::Operand1,
        ParameterName::Operand2,
        ParameterName::Operand3,
        ParameterName::Operand4,
    ];

    /// The name used when serializing.
    pub fn as_str(&self) -> &'static str {
        use ParameterName::*;
        match self {
            Minimum => "minimum",
            Maximum => "maximum",
            Refresh => "refresh",
            Rate => "rate",
            Value => "value",
            DutyCycle => "dutyCycle",
            Operand1 => "operand1",
            Operand2 => "operand2",
            Operand3 => "operand3",
            Operand4 => "operand4",
            Amplitude => "amplitude",
            ValueList => "valueList",
            SelectionMethod => "selectionMethod",
            PanLeftRight => "panLeftRight",
            Stride => "stride",
            FilePath => "filePath",
            Channels => "channels",
            FrameSize => "frameSize",
        }
    }

    /// Contexts a slot of this name accepts. Independent of generator kind.
    pub fn is_valid_context(&self, context: Context) -> bool {
        use Context as C;
        match self {
            ParameterName::Refresh => matches!(
                context,
                C::Frequency | C::PeriodSeconds | C::PeriodSamples | C::Trigger | C::BeatsPerMinute
            ),
            ParameterName::Rate => matches!(
                context,
                C::Frequency | C::PeriodSeconds | C::PeriodSamples | C::Pitch | C::BeatsPerMinute
            ),
            _ => context == C::None,
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParameterName {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParameterName::*;
        let name = match scrub_lower(s).as_str() {
            "minimum" | "min" => Minimum,
            "maximum" | "max" => Maximum,
            "refresh" => Refresh,
            "rate" => Rate,
            "value" => Value,
            "dutycycle" => DutyCycle,
            "operand1" | "op1" | "op" => Operand1,
            "operand2" | "op2" => Operand2,
            "operand3" | "op3" => Operand3,
            "operand4" | "op4" => Operand4,
            "amplitude" | "amp" => Amplitude,
            "valuelist" => ValueList,
            "selectionmethod" => SelectionMethod,
            "panleftright" | "pan" => PanLeftRight,
            "stride" => Stride,
            "filepath" => FilePath,
            "channels" | "dimension" => Channels,
            "framesize" => FrameSize,
            _ => return Err(GenError::UnknownParameter(s.to_string())),
        };
        Ok(name)
    }
}

/// What a slot can be wired to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotType {
    /// A generator with scalar output.
    Mono,
    /// A generator with vector output.
    Poly,
    /// Either.
    Any,
    /// A number, list or path stored inside the generator itself.
    Literal,
}

impl SlotType {
    pub fn accepts(&self, arity: Arity) -> bool {
        match self {
            SlotType::Mono => arity == Arity::Mono,
            SlotType::Poly => arity == Arity::Poly,
            SlotType::Any => true,
            SlotType::Literal => false,
        }
    }
}
