use std::path::Path;

use crate::{
    error::{GenError, GenResult},
    generator::Inputs,
    signal::{Arity, Frame, Real, SampleIndex, Signal, MAX_POLY},
    wav,
};

/// A single fixed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    value: Real,
}

impl Constant {
    pub fn new(value: Real) -> Self {
        Self { value }
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn set(&mut self, value: Real) {
        self.value = value;
    }
}

impl Signal for Constant {
    fn scalar(&mut self, _inputs: &Inputs, _index: SampleIndex) -> Real {
        self.value
    }
}

/// A fixed list of values, produced as one vector every sample. Also serves
/// as `PolyTable`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyConstant {
    values: Frame,
}

impl PolyConstant {
    /// Values past `MAX_POLY` are dropped.
    pub fn from_slice(values: &[Real]) -> Self {
        Self {
            values: values.iter().copied().take(MAX_POLY).collect(),
        }
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn set(&mut self, values: &[Real]) -> GenResult<()> {
        if values.is_empty() || values.len() > MAX_POLY {
            return Err(GenError::InvalidSize {
                what: "list length",
                value: values.len(),
            });
        }
        self.values = values.iter().copied().collect();
        Ok(())
    }
}

impl Signal for PolyConstant {
    fn arity(&self) -> Arity {
        Arity::Poly
    }

    fn poly(&mut self, _inputs: &Inputs, _index: SampleIndex, out: &mut Frame) {
        out.clone_from(&self.values);
    }

    fn depth(&self, _inputs: &Inputs) -> usize {
        self.values.len()
    }
}

/// A multichannel table read from a WAV file and looped sample by sample.
/// Each frame of the file is one vector; the channel count is the depth.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyTableFile {
    path: String,
    channels: usize,
    table: Vec<Real>,
}

impl PolyTableFile {
    pub fn new() -> Self {
        Self {
            path: "none".to_string(),
            channels: 1,
            table: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.table.len() / self.channels.max(1)
    }

    /// Read a WAV file into the table. The path `none` empties the table.
    pub fn load(&mut self, path: &str) -> GenResult<()> {
        if path == "none" {
            *self = Self::new();
            return Ok(());
        }
        let (channels, table) = wav::read_table(Path::new(path))?;
        self.set_table(channels, table)?;
        self.path = path.to_string();
        Ok(())
    }

    /// Install an interleaved table directly.
    pub fn set_table(&mut self, channels: usize, table: Vec<Real>) -> GenResult<()> {
        if channels == 0 || channels > MAX_POLY {
            return Err(GenError::InvalidSize {
                what: "channel count",
                value: channels,
            });
        }
        if table.is_empty() {
            tracing::warn!(path = %self.path, "table is empty");
        }
        self.channels = channels;
        self.table = table;
        Ok(())
    }
}

impl Default for PolyTableFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Signal for PolyTableFile {
    fn arity(&self) -> Arity {
        Arity::Poly
    }

    fn poly(&mut self, _inputs: &Inputs, index: SampleIndex, out: &mut Frame) {
        out.clear();
        let frames = self.frames();
        if frames == 0 {
            out.extend(std::iter::repeat(0.0).take(self.channels));
            return;
        }
        let start = (index % frames as SampleIndex) as usize * self.channels;
        out.extend(self.table[start..start + self.channels].iter().copied());
    }

    fn depth(&self, _inputs: &Inputs) -> usize {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        environment::Environment,
        generator::{Generator, GeneratorKind, In, Node},
        parameter::ParameterName,
    };

    #[test]
    fn poly_constant_set() {
        let mut p = PolyConstant::from_slice(&[0.0]);
        p.set(&[8.0, 4.0, 2.0]).unwrap();
        assert_eq!(p.values(), &[8.0, 4.0, 2.0]);
        assert!(p.set(&[]).is_err());
        assert!(p.set(&vec![1.0; MAX_POLY + 1]).is_err());
    }

    #[test]
    fn table_loops() {
        let env = Environment::shared();
        let mut g = Generator::new(GeneratorKind::PolyTableFile, &env);
        if let Node::PolyTableFile(t) = g.node_mut() {
            t.set_table(2, vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]).unwrap();
            assert_eq!(t.frames(), 3);
        }
        assert_eq!(g.poly_depth(), 2);
        assert_eq!(g.poly(4).as_slice(), &[2.0, -2.0]);
        assert_eq!(g.poly(0).as_slice(), &[1.0, -1.0]);
        assert_eq!(g.scalar(2), 3.0);
    }

    #[test]
    fn unloaded_table_is_silent() {
        let env = Environment::shared();
        let mut g = Generator::new(GeneratorKind::PolyTableFile, &env);
        assert_eq!(g.poly(10).as_slice(), &[0.0]);
        assert_eq!(g.to_text(false), "PolyTableFile{filePath{none}}");
        assert!(g.set(ParameterName::FilePath, In::path("/no/such/file.wav")).is_err());
    }
}
