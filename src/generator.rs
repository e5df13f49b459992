use indexmap::IndexMap;
use std::{fmt, rc::Rc, str::FromStr};

use crate::{
    buffer::Buffer,
    constants::{Constant, PolyConstant, PolyTableFile},
    context::Context,
    environment::Environment,
    error::{GenError, GenResult},
    filters::{FilterMode, OnePole},
    operators::{Add, Multiply, PanStereo, PolyAdd},
    oscillators::{Click, WaveSine, WaveSquare},
    parameter::{ParameterName, SlotType},
    random::RandomUniform,
    render::Memo,
    selector::Selector,
    signal::{mk_tag, shared, Arity, Frame, Real, SampleIndex, Shared, Signal, Tag},
    text::{format_list, format_number, scrub_lower},
};

/// A generator shared between every parent it feeds.
pub type GenRef = Shared<Generator>;

/// What can be assigned to a slot. Numbers and lists are promoted to
/// `Constant` and `PolyConstant` generators unless the slot stores literals.
#[derive(Clone, Debug)]
pub enum In {
    Fix(Real),
    List(Vec<Real>),
    Path(String),
    Cv(GenRef),
}

impl In {
    pub fn path<S: Into<String>>(path: S) -> Self {
        In::Path(path.into())
    }
}

impl From<Real> for In {
    fn from(x: Real) -> Self {
        In::Fix(x)
    }
}

impl From<Vec<Real>> for In {
    fn from(xs: Vec<Real>) -> Self {
        In::List(xs)
    }
}

impl From<&[Real]> for In {
    fn from(xs: &[Real]) -> Self {
        In::List(xs.to_vec())
    }
}

impl From<GenRef> for In {
    fn from(g: GenRef) -> Self {
        In::Cv(g)
    }
}

impl From<&GenRef> for In {
    fn from(g: &GenRef) -> Self {
        In::Cv(Rc::clone(g))
    }
}

/// Every kind of generator the factory can build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Constant,
    PolyConstant,
    PolyTable,
    PolyTableFile,
    Add,
    Multiply,
    PolyAdd,
    PanStereo,
    WaveSine,
    WaveSquare,
    Click,
    FilterLowPass,
    FilterHighPass,
    RandomUniform,
    Selector,
    Buffer,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SlotDefault {
    Value(Real),
    List(&'static [Real]),
    /// Held by the generator itself.
    Literal,
}

/// Static description of one slot of a generator kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotSpec {
    pub name: ParameterName,
    pub slot_type: SlotType,
    pub default: SlotDefault,
    pub context: Context,
}

impl SlotSpec {
    const fn mono(name: ParameterName, v: Real) -> Self {
        Self::timed(name, v, Context::None)
    }

    const fn timed(name: ParameterName, v: Real, context: Context) -> Self {
        Self {
            name,
            slot_type: SlotType::Mono,
            default: SlotDefault::Value(v),
            context,
        }
    }

    const fn list(name: ParameterName, slot_type: SlotType, v: &'static [Real]) -> Self {
        Self {
            name,
            slot_type,
            default: SlotDefault::List(v),
            context: Context::None,
        }
    }

    const fn literal(name: ParameterName) -> Self {
        Self {
            name,
            slot_type: SlotType::Literal,
            default: SlotDefault::Literal,
            context: Context::None,
        }
    }
}

mod slots {
    use super::SlotSpec;
    use crate::context::Context::*;
    use crate::parameter::{ParameterName::*, SlotType};

    pub const VALUE: &[SlotSpec] = &[SlotSpec::literal(Value)];
    pub const FILE: &[SlotSpec] = &[SlotSpec::literal(FilePath)];
    pub const ADD: &[SlotSpec] = &[
        SlotSpec::mono(Operand1, 0.0),
        SlotSpec::mono(Operand2, 0.0),
        SlotSpec::mono(Operand3, 0.0),
        SlotSpec::mono(Operand4, 0.0),
    ];
    pub const MULTIPLY: &[SlotSpec] = &[
        SlotSpec::mono(Operand1, 1.0),
        SlotSpec::mono(Operand2, 1.0),
        SlotSpec::mono(Operand3, 1.0),
        SlotSpec::mono(Operand4, 1.0),
    ];
    pub const POLY_ADD: &[SlotSpec] = &[
        SlotSpec::list(Operand1, SlotType::Any, &[0.0]),
        SlotSpec::list(Operand2, SlotType::Any, &[0.0]),
        SlotSpec::list(Operand3, SlotType::Any, &[0.0]),
        SlotSpec::list(Operand4, SlotType::Any, &[0.0]),
    ];
    pub const PAN_STEREO: &[SlotSpec] = &[
        SlotSpec::mono(Operand1, 0.0),
        SlotSpec::mono(PanLeftRight, 0.5),
    ];
    pub const WAVE_SINE: &[SlotSpec] = &[
        SlotSpec::timed(Rate, 0.2, Frequency),
        SlotSpec::mono(Minimum, 0.0),
        SlotSpec::mono(Maximum, 1.0),
    ];
    pub const WAVE_SQUARE: &[SlotSpec] = &[
        SlotSpec::timed(Rate, 6.0, PeriodSeconds),
        SlotSpec::mono(DutyCycle, 0.3),
        SlotSpec::mono(Minimum, 0.0),
        SlotSpec::mono(Maximum, 1.0),
    ];
    pub const CLICK: &[SlotSpec] = &[
        SlotSpec::timed(Rate, 1.0, PeriodSeconds),
        SlotSpec::mono(Amplitude, 1.0),
    ];
    pub const FILTER: &[SlotSpec] = &[
        SlotSpec::mono(Operand1, 0.0),
        SlotSpec::timed(Rate, 220.0, Frequency),
    ];
    pub const RANDOM_UNIFORM: &[SlotSpec] = &[
        SlotSpec::timed(Refresh, 1.0, Trigger),
        SlotSpec::mono(Minimum, 0.0),
        SlotSpec::mono(Maximum, 1.0),
    ];
    pub const SELECTOR: &[SlotSpec] = &[
        SlotSpec::list(ValueList, SlotType::Poly, &[0.0]),
        SlotSpec::mono(SelectionMethod, 0.0),
        SlotSpec::timed(Refresh, 1.0, Trigger),
        SlotSpec::mono(Stride, 1.0),
    ];
    pub const BUFFER: &[SlotSpec] = &[
        SlotSpec::list(Operand1, SlotType::Any, &[0.0]),
        SlotSpec::literal(Channels),
        SlotSpec::literal(FrameSize),
    ];
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 16] = [
        GeneratorKind::Constant,
        GeneratorKind::PolyConstant,
        GeneratorKind::PolyTable,
        GeneratorKind::PolyTableFile,
        GeneratorKind::Add,
        GeneratorKind::Multiply,
        GeneratorKind::PolyAdd,
        GeneratorKind::PanStereo,
        GeneratorKind::WaveSine,
        GeneratorKind::WaveSquare,
        GeneratorKind::Click,
        GeneratorKind::FilterLowPass,
        GeneratorKind::FilterHighPass,
        GeneratorKind::RandomUniform,
        GeneratorKind::Selector,
        GeneratorKind::Buffer,
    ];

    pub fn name(&self) -> &'static str {
        use GeneratorKind::*;
        match self {
            Constant => "Constant",
            PolyConstant => "PolyConstant",
            PolyTable => "PolyTable",
            PolyTableFile => "PolyTableFile",
            Add => "Add",
            Multiply => "Multiply",
            PolyAdd => "PolyAdd",
            PanStereo => "PanStereo",
            WaveSine => "WaveSine",
            WaveSquare => "WaveSquare",
            Click => "Click",
            FilterLowPass => "FilterLowPass",
            FilterHighPass => "FilterHighPass",
            RandomUniform => "RandomUniform",
            Selector => "Selector",
            Buffer => "Buffer",
        }
    }

    /// Numeric identifier, the position in `ALL`.
    pub fn id(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    pub fn from_id(id: usize) -> GenResult<Self> {
        Self::ALL
            .get(id)
            .copied()
            .ok_or_else(|| GenError::UnknownGenerator(id.to_string()))
    }

    /// Slots in serialization order.
    pub fn slots(&self) -> &'static [SlotSpec] {
        use GeneratorKind::*;
        match self {
            Constant | PolyConstant | PolyTable => slots::VALUE,
            PolyTableFile => slots::FILE,
            Add => slots::ADD,
            Multiply => slots::MULTIPLY,
            PolyAdd => slots::POLY_ADD,
            PanStereo => slots::PAN_STEREO,
            WaveSine => slots::WAVE_SINE,
            WaveSquare => slots::WAVE_SQUARE,
            Click => slots::CLICK,
            FilterLowPass | FilterHighPass => slots::FILTER,
            RandomUniform => slots::RANDOM_UNIFORM,
            Selector => slots::SELECTOR,
            Buffer => slots::BUFFER,
        }
    }

    pub fn slot(&self, name: ParameterName) -> Option<&'static SlotSpec> {
        self.slots().iter().find(|s| s.name == name)
    }

    pub fn is_valid_parameter(&self, name: ParameterName) -> bool {
        self.slot(name).is_some()
    }

    pub fn is_valid_context(&self, name: ParameterName, context: Context) -> bool {
        self.is_valid_parameter(name) && name.is_valid_context(context)
    }

    pub fn is_valid_child_arity(&self, name: ParameterName, arity: Arity) -> bool {
        self.slot(name).map_or(false, |s| s.slot_type.accepts(arity))
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = scrub_lower(s);
        Self::ALL
            .iter()
            .find(|k| k.name().to_lowercase() == key)
            .copied()
            .ok_or_else(|| GenError::UnknownGenerator(s.to_string()))
    }
}

/// The kind specific state of a generator.
#[derive(Debug)]
pub enum Node {
    Constant(Constant),
    PolyConstant(PolyConstant),
    PolyTable(PolyConstant),
    PolyTableFile(PolyTableFile),
    Add(Add),
    Multiply(Multiply),
    PolyAdd(PolyAdd),
    PanStereo(PanStereo),
    WaveSine(WaveSine),
    WaveSquare(WaveSquare),
    Click(Click),
    FilterLowPass(OnePole),
    FilterHighPass(OnePole),
    RandomUniform(RandomUniform),
    Selector(Selector),
    Buffer(Buffer),
}

impl Node {
    fn new(kind: GeneratorKind, env: &Environment) -> Self {
        use GeneratorKind as K;
        match kind {
            K::Constant => Node::Constant(Constant::new(0.0)),
            K::PolyConstant => Node::PolyConstant(PolyConstant::from_slice(&[0.0])),
            K::PolyTable => Node::PolyTable(PolyConstant::from_slice(&[0.0])),
            K::PolyTableFile => Node::PolyTableFile(PolyTableFile::new()),
            K::Add => Node::Add(Add),
            K::Multiply => Node::Multiply(Multiply),
            K::PolyAdd => Node::PolyAdd(PolyAdd),
            K::PanStereo => Node::PanStereo(PanStereo),
            K::WaveSine => Node::WaveSine(WaveSine),
            K::WaveSquare => Node::WaveSquare(WaveSquare),
            K::Click => Node::Click(Click),
            K::FilterLowPass => Node::FilterLowPass(OnePole::new(FilterMode::LowPass)),
            K::FilterHighPass => Node::FilterHighPass(OnePole::new(FilterMode::HighPass)),
            K::RandomUniform => Node::RandomUniform(RandomUniform::new(env.fork_rng())),
            K::Selector => Node::Selector(Selector::new(env.fork_rng())),
            K::Buffer => Node::Buffer(Buffer::new(1, env.frame_size())),
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        use GeneratorKind as K;
        match self {
            Node::Constant(_) => K::Constant,
            Node::PolyConstant(_) => K::PolyConstant,
            Node::PolyTable(_) => K::PolyTable,
            Node::PolyTableFile(_) => K::PolyTableFile,
            Node::Add(_) => K::Add,
            Node::Multiply(_) => K::Multiply,
            Node::PolyAdd(_) => K::PolyAdd,
            Node::PanStereo(_) => K::PanStereo,
            Node::WaveSine(_) => K::WaveSine,
            Node::WaveSquare(_) => K::WaveSquare,
            Node::Click(_) => K::Click,
            Node::FilterLowPass(_) => K::FilterLowPass,
            Node::FilterHighPass(_) => K::FilterHighPass,
            Node::RandomUniform(_) => K::RandomUniform,
            Node::Selector(_) => K::Selector,
            Node::Buffer(_) => K::Buffer,
        }
    }

    pub fn signal(&self) -> &dyn Signal {
        match self {
            Node::Constant(s) => s,
            Node::PolyConstant(s) | Node::PolyTable(s) => s,
            Node::PolyTableFile(s) => s,
            Node::Add(s) => s,
            Node::Multiply(s) => s,
            Node::PolyAdd(s) => s,
            Node::PanStereo(s) => s,
            Node::WaveSine(s) => s,
            Node::WaveSquare(s) => s,
            Node::Click(s) => s,
            Node::FilterLowPass(s) | Node::FilterHighPass(s) => s,
            Node::RandomUniform(s) => s,
            Node::Selector(s) => s,
            Node::Buffer(s) => s,
        }
    }

    pub fn signal_mut(&mut self) -> &mut dyn Signal {
        match self {
            Node::Constant(s) => s,
            Node::PolyConstant(s) | Node::PolyTable(s) => s,
            Node::PolyTableFile(s) => s,
            Node::Add(s) => s,
            Node::Multiply(s) => s,
            Node::PolyAdd(s) => s,
            Node::PanStereo(s) => s,
            Node::WaveSine(s) => s,
            Node::WaveSquare(s) => s,
            Node::Click(s) => s,
            Node::FilterLowPass(s) | Node::FilterHighPass(s) => s,
            Node::RandomUniform(s) => s,
            Node::Selector(s) => s,
            Node::Buffer(s) => s,
        }
    }

    fn set_literal(&mut self, name: ParameterName, value: In) -> GenResult<()> {
        if let In::Cv(_) = value {
            return Err(GenError::LiteralOnly { parameter: name });
        }
        let not_literal = || GenError::NotLiteral { parameter: name };
        match (self, value) {
            (Node::Constant(c), In::Fix(v)) => c.set(v),
            (Node::Constant(c), In::List(vs)) if vs.len() == 1 => c.set(vs[0]),
            (Node::PolyConstant(p) | Node::PolyTable(p), In::Fix(v)) => p.set(&[v])?,
            (Node::PolyConstant(p) | Node::PolyTable(p), In::List(vs)) => p.set(&vs)?,
            (Node::PolyTableFile(t), In::Path(path)) => t.load(&path)?,
            (Node::Buffer(b), In::Fix(v)) => match name {
                ParameterName::Channels => b.set_channels(to_size(v, "channel count")?)?,
                _ => b.set_frame_size(to_size(v, "frame size")?)?,
            },
            _ => return Err(not_literal()),
        }
        Ok(())
    }

    fn literal_text(&self, name: ParameterName) -> Option<String> {
        match (self, name) {
            (Node::Buffer(b), ParameterName::Channels) => Some(b.channels().to_string()),
            (Node::Buffer(b), ParameterName::FrameSize) => Some(b.frame_size().to_string()),
            _ => None,
        }
    }

    /// Text for generators that are nothing but a literal. Only `Constant`
    /// and `PolyConstant` collapse to a bare value in compact mode.
    fn literal_form(&self, compact: bool) -> Option<String> {
        let (name, body) = match self {
            Node::Constant(c) => ("Constant", format_number(c.value())),
            Node::PolyConstant(p) => ("PolyConstant", format_list(p.values())),
            Node::PolyTable(p) => {
                return Some(format!("PolyTable{{{}}}", format_list(p.values())))
            }
            Node::PolyTableFile(t) => {
                return Some(format!("PolyTableFile{{filePath{{{}}}}}", t.path()))
            }
            _ => return None,
        };
        if compact {
            Some(body)
        } else {
            Some(format!("{}{{{}}}", name, body))
        }
    }
}

/// A whole, non-negative number no larger than `u32::MAX`.
fn to_size(v: Real, what: &'static str) -> GenResult<usize> {
    if !v.is_finite() || v.fract() != 0.0 || v < 0.0 || v > u32::MAX as Real {
        return Err(GenError::InvalidSize {
            what,
            value: v.max(0.0) as usize,
        });
    }
    Ok(v as usize)
}

/// A wired input.
#[derive(Clone, Debug)]
pub struct Slot {
    pub node: GenRef,
    pub context: Context,
}

/// Read only view of a generator's wiring, handed to `Signal` methods.
pub struct Inputs<'a> {
    slots: &'a IndexMap<ParameterName, Slot>,
    env: &'a Environment,
}

impl<'a> Inputs<'a> {
    pub fn env(&self) -> &Environment {
        self.env
    }

    pub fn sampling_rate(&self) -> Real {
        self.env.sampling_rate()
    }

    /// Value of the child in slot `name`. An unwired slot reads as zero.
    pub fn scalar(&self, name: ParameterName, index: SampleIndex) -> Real {
        self.slots
            .get(&name)
            .map_or(0.0, |s| s.node.borrow_mut().scalar(index))
    }

    pub fn poly(&self, name: ParameterName, index: SampleIndex) -> Frame {
        self.slots
            .get(&name)
            .map_or_else(Frame::new, |s| s.node.borrow_mut().poly(index))
    }

    pub fn depth(&self, name: ParameterName) -> usize {
        self.slots
            .get(&name)
            .map_or(0, |s| s.node.borrow().poly_depth())
    }

    pub fn context(&self, name: ParameterName) -> Context {
        self.slots.get(&name).map_or(Context::None, |s| s.context)
    }

    /// Value of slot `name` converted to a period in samples.
    pub fn period_samples(&self, name: ParameterName, index: SampleIndex) -> Real {
        let v = self.scalar(name, index);
        self.context(name).to_period_samples(v, self.sampling_rate())
    }

    /// Value of slot `name` converted to Hz.
    pub fn frequency(&self, name: ParameterName, index: SampleIndex) -> Real {
        let v = self.scalar(name, index);
        self.context(name).to_frequency(v, self.sampling_rate())
    }
}

/// A node of the graph: identity, wiring and kind specific state.
#[derive(Debug)]
pub struct Generator {
    tag: Tag,
    env: Rc<Environment>,
    slots: IndexMap<ParameterName, Slot>,
    node: Node,
    memo: Memo,
}

impl Generator {
    /// A generator of `kind` with every slot at its default.
    pub fn new(kind: GeneratorKind, env: &Rc<Environment>) -> Self {
        let mut slots = IndexMap::new();
        for spec in kind.slots() {
            let child = match spec.default {
                SlotDefault::Value(v) => Generator::constant(env, v),
                SlotDefault::List(vs) => Generator::poly_constant(env, vs),
                SlotDefault::Literal => continue,
            };
            slots.insert(
                spec.name,
                Slot {
                    node: shared(child),
                    context: spec.context,
                },
            );
        }
        Self {
            tag: mk_tag(),
            env: Rc::clone(env),
            slots,
            node: Node::new(kind, env),
            memo: Memo::new(),
        }
    }

    pub fn shared(kind: GeneratorKind, env: &Rc<Environment>) -> GenRef {
        shared(Self::new(kind, env))
    }

    pub fn constant(env: &Rc<Environment>, value: Real) -> Self {
        let mut g = Self::bare(GeneratorKind::Constant, env);
        g.node = Node::Constant(Constant::new(value));
        g
    }

    /// A `PolyConstant` holding `values`, truncated to `MAX_POLY`.
    pub fn poly_constant(env: &Rc<Environment>, values: &[Real]) -> Self {
        let mut g = Self::bare(GeneratorKind::PolyConstant, env);
        g.node = Node::PolyConstant(PolyConstant::from_slice(values));
        g
    }

    fn bare(kind: GeneratorKind, env: &Rc<Environment>) -> Self {
        Self {
            tag: mk_tag(),
            env: Rc::clone(env),
            slots: IndexMap::new(),
            node: Node::new(kind, env),
            memo: Memo::new(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn kind(&self) -> GeneratorKind {
        self.node.kind()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn env(&self) -> &Rc<Environment> {
        &self.env
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Direct access to the kind specific state. Drops the memoized output.
    pub fn node_mut(&mut self) -> &mut Node {
        self.memo.clear();
        &mut self.node
    }

    pub fn arity(&self) -> Arity {
        self.node.signal().arity()
    }

    /// Number of values `poly` produces.
    pub fn poly_depth(&self) -> usize {
        let inputs = Inputs {
            slots: &self.slots,
            env: &self.env,
        };
        self.node.signal().depth(&inputs)
    }

    pub fn is_valid_parameter(&self, name: ParameterName) -> bool {
        self.kind().is_valid_parameter(name)
    }

    pub fn is_valid_context(&self, name: ParameterName, context: Context) -> bool {
        self.kind().is_valid_context(name, context)
    }

    pub fn is_valid_child_arity(&self, name: ParameterName, arity: Arity) -> bool {
        self.kind().is_valid_child_arity(name, arity)
    }

    /// Assign `value` to slot `name` under `context`.
    pub fn set_parameter<T: Into<In>>(
        &mut self,
        name: ParameterName,
        value: T,
        context: Context,
    ) -> GenResult<&mut Self> {
        self.assign(name, value.into(), Some(context))?;
        Ok(self)
    }

    /// Assign `value` to slot `name`, keeping the slot's current context.
    pub fn set<T: Into<In>>(&mut self, name: ParameterName, value: T) -> GenResult<&mut Self> {
        self.assign(name, value.into(), None)?;
        Ok(self)
    }

    /// String keyed `set_parameter`. An empty context keeps the current one.
    pub fn set_named<T: Into<In>>(
        &mut self,
        name: &str,
        value: T,
        context: &str,
    ) -> GenResult<&mut Self> {
        let name = name.parse::<ParameterName>()?;
        let context = if context.trim().is_empty() {
            None
        } else {
            Some(context.parse::<Context>()?)
        };
        self.assign(name, value.into(), context)?;
        Ok(self)
    }

    fn assign(&mut self, name: ParameterName, value: In, context: Option<Context>) -> GenResult<()> {
        let kind = self.kind();
        let spec = kind.slot(name).ok_or(GenError::InvalidParameter {
            kind: kind.name(),
            parameter: name,
        })?;
        let context = context
            .or_else(|| self.slots.get(&name).map(|s| s.context))
            .unwrap_or(spec.context);
        if !name.is_valid_context(context) {
            return Err(GenError::InvalidContext {
                parameter: name,
                context,
            });
        }
        if spec.slot_type == SlotType::Literal {
            self.node.set_literal(name, value)?;
            self.memo.clear();
            return Ok(());
        }
        let child = self.coerce(name, value)?;
        let arity = child.borrow().arity();
        if !spec.slot_type.accepts(arity) {
            let expected = match spec.slot_type {
                SlotType::Poly => Arity::Poly,
                _ => Arity::Mono,
            };
            return Err(GenError::InvalidArity {
                parameter: name,
                expected,
                found: arity,
            });
        }
        tracing::debug!(generator = kind.name(), parameter = %name, %context, "slot wired");
        self.slots.insert(name, Slot { node: child, context });
        self.memo.clear();
        Ok(())
    }

    fn coerce(&self, name: ParameterName, value: In) -> GenResult<GenRef> {
        match value {
            In::Cv(g) => Ok(g),
            In::Fix(v) => Ok(shared(Generator::constant(&self.env, v))),
            In::List(vs) => {
                let mut g = Generator::bare(GeneratorKind::PolyConstant, &self.env);
                g.node.set_literal(ParameterName::Value, In::List(vs))?;
                Ok(shared(g))
            }
            In::Path(_) => Err(GenError::NotLiteral { parameter: name }),
        }
    }

    /// The generator wired to `name`.
    pub fn get_parameter(&self, name: ParameterName) -> GenResult<GenRef> {
        let kind = self.kind();
        match self.slots.get(&name) {
            Some(slot) => Ok(Rc::clone(&slot.node)),
            None if kind.is_valid_parameter(name) => Err(GenError::LiteralOnly { parameter: name }),
            None => Err(GenError::InvalidParameter {
                kind: kind.name(),
                parameter: name,
            }),
        }
    }

    pub fn get_context(&self, name: ParameterName) -> GenResult<Context> {
        let kind = self.kind();
        match self.slots.get(&name) {
            Some(slot) => Ok(slot.context),
            None if kind.is_valid_parameter(name) => Ok(Context::None),
            None => Err(GenError::InvalidParameter {
                kind: kind.name(),
                parameter: name,
            }),
        }
    }

    /// Wired slots in serialization order.
    pub fn slots(&self) -> impl Iterator<Item = (&ParameterName, &Slot)> {
        self.slots.iter()
    }

    /// The value at `index`. Stateful kinds compute once per index.
    pub fn scalar(&mut self, index: SampleIndex) -> Real {
        if let Some(frame) = self.memo.get(index) {
            return frame.first().copied().unwrap_or(0.0);
        }
        let inputs = Inputs {
            slots: &self.slots,
            env: &self.env,
        };
        let signal = self.node.signal_mut();
        if signal.memoized() {
            let mut frame = Frame::new();
            signal.poly(&inputs, index, &mut frame);
            self.memo.store(index, &frame);
            frame.first().copied().unwrap_or(0.0)
        } else {
            signal.scalar(&inputs, index)
        }
    }

    /// The vector at `index`. Scalar kinds give a one element frame.
    pub fn poly(&mut self, index: SampleIndex) -> Frame {
        if let Some(frame) = self.memo.get(index) {
            return frame.clone();
        }
        let inputs = Inputs {
            slots: &self.slots,
            env: &self.env,
        };
        let signal = self.node.signal_mut();
        let mut frame = Frame::new();
        signal.poly(&inputs, index, &mut frame);
        if signal.memoized() {
            self.memo.store(index, &frame);
        }
        frame
    }

    pub fn value_at_second(&mut self, seconds: Real) -> Real {
        let index = self.env.seconds_to_index(seconds);
        self.scalar(index)
    }

    /// Scalar values for indices `0..n`.
    pub fn render(&mut self, n: usize) -> Vec<Real> {
        (0..n as SampleIndex).map(|i| self.scalar(i)).collect()
    }

    /// Vector values for indices `0..n`.
    pub fn render_poly(&mut self, n: usize) -> Vec<Frame> {
        (0..n as SampleIndex).map(|i| self.poly(i)).collect()
    }

    /// Return to construction time state. Wiring is untouched.
    pub fn reset(&mut self) {
        self.node.signal_mut().reset();
        self.memo.clear();
    }

    /// Reset this generator and everything upstream of it.
    pub fn reset_graph(&mut self) {
        self.reset();
        for slot in self.slots.values() {
            slot.node.borrow_mut().reset_graph();
        }
    }

    /// Serialize into the brace grammar. `compact` writes constants as
    /// their bare values.
    pub fn to_text(&self, compact: bool) -> String {
        if let Some(text) = self.node.literal_form(compact) {
            return text;
        }
        let mut text = format!("{}{{", self.name());
        for spec in self.kind().slots() {
            if spec.slot_type == SlotType::Literal {
                if let Some(v) = self.node.literal_text(spec.name) {
                    text.push_str(&format!("{}{{{}}}", spec.name, v));
                }
                continue;
            }
            if let Some(slot) = self.slots.get(&spec.name) {
                let child = slot.node.borrow().to_text(compact);
                text.push_str(&format!("{}{{{}}}", spec.name, child));
                if slot.context != Context::None {
                    text.push_str(&format!("{{{}}}", slot.context));
                }
            }
        }
        text.push('}');
        text
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text(false))
    }
}
