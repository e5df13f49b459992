use std::rc::Rc;

use crate::{
    environment::Environment,
    error::{GenError, GenResult},
    generator::{GenRef, Generator, GeneratorKind, In},
    parameter::{ParameterName, SlotType},
    signal::shared,
    text::{first_trio, is_well_formed, parse_list, parse_number, scrub, trios},
};

/// Builds generators by kind, by name, or from brace grammar text. Every
/// generator it makes shares the factory's environment.
#[derive(Clone, Debug)]
pub struct Factory {
    env: Rc<Environment>,
}

impl Factory {
    pub fn new(env: &Rc<Environment>) -> Self {
        Self {
            env: Rc::clone(env),
        }
    }

    pub fn env(&self) -> &Rc<Environment> {
        &self.env
    }

    pub fn create_kind(&self, kind: GeneratorKind) -> GenRef {
        Generator::shared(kind, &self.env)
    }

    /// Build from a generator name (`"wavesine"`), a number, a comma list,
    /// or a full expression (`"WaveSine{rate{3}{frequency}}"`). Names are
    /// case-insensitive and whitespace is ignored.
    pub fn create(&self, text: &str) -> GenResult<GenRef> {
        let text = scrub(text);
        if text.is_empty() {
            return Err(GenError::parse("empty generator text", &text));
        }
        if !is_well_formed(&text) {
            return Err(GenError::parse("unbalanced braces", &text));
        }
        self.build(&text)
    }

    fn build(&self, text: &str) -> GenResult<GenRef> {
        if let Some(v) = parse_number(text) {
            return Ok(shared(Generator::constant(&self.env, v)));
        }
        if let Some(vs) = parse_list(text) {
            let mut g = Generator::new(GeneratorKind::PolyConstant, &self.env);
            g.set(ParameterName::Value, vs)?;
            return Ok(shared(g));
        }
        let trio = first_trio(text)?;
        if trio.name.is_empty() {
            return Err(GenError::parse("missing generator name", text));
        }
        if !trio.context.is_empty() || !trio.remainder.is_empty() {
            return Err(GenError::parse("trailing text after generator", text));
        }
        let kind = trio.name.parse::<GeneratorKind>()?;
        let mut g = Generator::new(kind, &self.env);
        self.read_arguments(&mut g, trio.arguments)?;
        tracing::debug!(generator = kind.name(), "generator parsed");
        Ok(shared(g))
    }

    fn read_arguments(&self, g: &mut Generator, arguments: &str) -> GenResult<()> {
        if arguments.is_empty() {
            return Ok(());
        }
        match g.kind() {
            GeneratorKind::Constant | GeneratorKind::PolyConstant | GeneratorKind::PolyTable => {
                if let Some(v) = parse_number(arguments) {
                    g.set(ParameterName::Value, v)?;
                    return Ok(());
                }
                if let Some(vs) = parse_list(arguments) {
                    g.set(ParameterName::Value, vs)?;
                    return Ok(());
                }
                if !arguments.contains('{') {
                    return Err(GenError::InvalidNumber(arguments.to_string()));
                }
            }
            GeneratorKind::PolyTableFile if !arguments.contains('{') => {
                g.set(ParameterName::FilePath, In::path(arguments))?;
                return Ok(());
            }
            _ => {}
        }
        for trio in trios(arguments) {
            let trio = trio?;
            if trio.name.is_empty() {
                return Err(GenError::parse("missing parameter name", arguments));
            }
            let name = trio.name.parse::<ParameterName>()?;
            let value = self.argument(g.kind(), name, trio.arguments)?;
            if trio.context.is_empty() {
                g.set(name, value)?;
            } else {
                g.set_parameter(name, value, trio.context.parse()?)?;
            }
        }
        Ok(())
    }

    fn argument(&self, kind: GeneratorKind, name: ParameterName, text: &str) -> GenResult<In> {
        if text.is_empty() {
            return Err(GenError::parse(format!("empty value for {}", name), text));
        }
        if name == ParameterName::FilePath {
            return Ok(In::path(text));
        }
        let slot_type = kind.slot(name).map(|s| s.slot_type);
        if let Some(v) = parse_number(text) {
            return Ok(match slot_type {
                Some(SlotType::Poly) => In::List(vec![v]),
                _ => In::Fix(v),
            });
        }
        if let Some(vs) = parse_list(text) {
            return Ok(In::List(vs));
        }
        if slot_type == Some(SlotType::Literal) {
            return Err(GenError::InvalidNumber(text.to_string()));
        }
        Ok(In::Cv(self.build(text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use approx::assert_relative_eq;

    fn factory() -> Factory {
        Factory::new(&Environment::shared())
    }

    #[test]
    fn bare_names() {
        let f = factory();
        let g = f.create(" pan stereo ").unwrap();
        assert_eq!(g.borrow().kind(), GeneratorKind::PanStereo);
        assert!(matches!(f.create("Saw"), Err(GenError::UnknownGenerator(_))));
    }

    #[test]
    fn literals() {
        let f = factory();
        let c = f.create("constant{.5}").unwrap();
        assert_relative_eq!(c.borrow_mut().scalar(0), 0.5);
        let c = f.create("Constant{value{3}}").unwrap();
        assert_relative_eq!(c.borrow_mut().scalar(0), 3.0);
        let p = f.create("PolyConstant{8,4,2}").unwrap();
        assert_eq!(p.borrow_mut().poly(0).as_slice(), &[8.0, 4.0, 2.0]);
        let p = f.create("8,4,2").unwrap();
        assert_eq!(p.borrow().kind(), GeneratorKind::PolyConstant);
    }

    #[test]
    fn nested() {
        let f = factory();
        let g = f
            .create("Add{operand1{Constant{0.25}}operand2{Multiply{op1{2}op2{3}}}}")
            .unwrap();
        assert_relative_eq!(g.borrow_mut().scalar(0), 6.25);
    }

    #[test]
    fn contexts() {
        let f = factory();
        let g = f.create("WaveSine{min{-10}max{10}rate{30}{samples}}").unwrap();
        assert_eq!(
            g.borrow().get_context(ParameterName::Rate).unwrap(),
            Context::PeriodSamples
        );
        assert_eq!(
            g.borrow().to_text(true),
            "WaveSine{rate{30}{samples}minimum{-10}maximum{10}}"
        );
    }

    #[test]
    fn errors() {
        let f = factory();
        assert!(matches!(f.create("Add{operand1{1}"), Err(GenError::Parse { .. })));
        assert!(matches!(f.create("Add{operand1{1}}}"), Err(GenError::Parse { .. })));
        assert!(matches!(f.create("Add{volume{1}}"), Err(GenError::UnknownParameter(_))));
        assert!(matches!(
            f.create("Add{rate{1}}"),
            Err(GenError::InvalidParameter { .. })
        ));
        assert!(matches!(
            f.create("WaveSine{rate{3}{trigger}}"),
            Err(GenError::InvalidContext { .. })
        ));
        assert!(matches!(
            f.create("Add{operand1{PolyConstant{1,2}}}"),
            Err(GenError::InvalidArity { .. })
        ));
        assert!(matches!(f.create("Add{operand1{}}"), Err(GenError::Parse { .. })));
        assert!(matches!(f.create("Add{}{frequency}"), Err(GenError::Parse { .. })));
        assert!(matches!(f.create(""), Err(GenError::Parse { .. })));
        assert!(matches!(f.create("Constant{abc}"), Err(GenError::InvalidNumber(_))));
        assert!(matches!(
            f.create("Buffer{frameSize{big}}"),
            Err(GenError::InvalidNumber(_))
        ));
    }

    #[test]
    fn single_value_list() {
        let f = factory();
        let g = f.create("Selector{valueList{3}}").unwrap();
        assert_relative_eq!(g.borrow_mut().scalar(0), 3.0);
    }
}
