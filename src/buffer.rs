use crate::{
    error::{GenError, GenResult},
    generator::Inputs,
    parameter::ParameterName,
    signal::{Arity, Frame, Real, SampleIndex, Signal, MAX_POLY},
};

/// Largest number of frames a buffer block may hold.
pub const MAX_FRAME_SIZE: usize = 1 << 16;

/// Renders its source a block at a time into per channel storage.
///
/// Storage is non-interleaved: channel `d` occupies
/// `d * frame_size .. (d + 1) * frame_size`. Asking for any index outside
/// the current block renders the block that contains it. A mono source is
/// copied to every channel; a source with fewer channels leaves the rest
/// silent.
#[derive(Clone, Debug)]
pub struct Buffer {
    channels: usize,
    frame_size: usize,
    storage: Vec<Real>,
    block_start: Option<SampleIndex>,
    render_count: u64,
}

impl Buffer {
    pub fn new(channels: usize, frame_size: usize) -> Self {
        let channels = channels.clamp(1, MAX_POLY);
        let frame_size = frame_size.clamp(1, MAX_FRAME_SIZE);
        Self {
            channels,
            frame_size,
            storage: vec![0.0; channels * frame_size],
            block_start: None,
            render_count: 0,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Number of blocks rendered since construction or the last reset.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// First sample index of the stored block.
    pub fn block_start(&self) -> Option<SampleIndex> {
        self.block_start
    }

    pub fn set_channels(&mut self, channels: usize) -> GenResult<()> {
        if channels == 0 || channels > MAX_POLY {
            return Err(GenError::InvalidSize {
                what: "channel count",
                value: channels,
            });
        }
        if channels != self.channels {
            self.channels = channels;
            self.reallocate();
        }
        Ok(())
    }

    pub fn set_frame_size(&mut self, frame_size: usize) -> GenResult<()> {
        if frame_size == 0 || frame_size > MAX_FRAME_SIZE {
            return Err(GenError::InvalidSize {
                what: "frame size",
                value: frame_size,
            });
        }
        if frame_size != self.frame_size {
            self.frame_size = frame_size;
            self.reallocate();
        }
        Ok(())
    }

    fn reallocate(&mut self) {
        tracing::debug!(
            channels = self.channels,
            frame_size = self.frame_size,
            "buffer resized"
        );
        self.storage = vec![0.0; self.channels * self.frame_size];
        self.clear();
    }

    fn clear(&mut self) {
        self.storage.iter_mut().for_each(|v| *v = 0.0);
        self.block_start = None;
        self.render_count = 0;
    }

    /// The stored block of channel `d`.
    pub fn channel(&self, d: usize) -> Option<&[Real]> {
        if d >= self.channels {
            return None;
        }
        let start = d * self.frame_size;
        Some(&self.storage[start..start + self.frame_size])
    }

    /// Mean of every stored value.
    pub fn average(&self) -> Real {
        if self.storage.is_empty() {
            return 0.0;
        }
        self.storage.iter().sum::<Real>() / self.storage.len() as Real
    }

    /// The stored block with channels interleaved frame by frame.
    pub fn interleaved(&self) -> Vec<Real> {
        let mut out = Vec::with_capacity(self.storage.len());
        for k in 0..self.frame_size {
            for d in 0..self.channels {
                out.push(self.storage[d * self.frame_size + k]);
            }
        }
        out
    }

    fn render_block(&mut self, inputs: &Inputs, start: SampleIndex) {
        for k in 0..self.frame_size {
            let frame = inputs.poly(ParameterName::Operand1, start + k as SampleIndex);
            let mono = frame.len() == 1;
            for d in 0..self.channels {
                let v = match frame.get(d) {
                    Some(v) => *v,
                    None if mono => frame[0],
                    None => 0.0,
                };
                self.storage[d * self.frame_size + k] = v;
            }
        }
        self.block_start = Some(start);
        self.render_count += 1;
    }
}

impl Signal for Buffer {
    fn arity(&self) -> Arity {
        Arity::Poly
    }

    fn poly(&mut self, inputs: &Inputs, index: SampleIndex, out: &mut Frame) {
        let fs = self.frame_size as SampleIndex;
        let start = index - index % fs;
        if self.block_start != Some(start) {
            self.render_block(inputs, start);
        }
        let k = (index - start) as usize;
        out.clear();
        for d in 0..self.channels {
            out.push(self.storage[d * self.frame_size + k]);
        }
    }

    fn depth(&self, _inputs: &Inputs) -> usize {
        self.channels
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::Context,
        environment::{Config, Environment},
        generator::{Generator, GeneratorKind, Node},
        signal::Builder,
    };

    fn buffer_of(g: &Generator) -> &Buffer {
        match g.node() {
            Node::Buffer(b) => b,
            _ => panic!("not a buffer"),
        }
    }

    #[test]
    fn defaults_follow_environment() {
        let env = Environment::new(&Config::new().frame_size(8).build()).unwrap();
        let g = Generator::new(GeneratorKind::Buffer, &env);
        assert_eq!(buffer_of(&g).frame_size(), 8);
        assert_eq!(buffer_of(&g).channels(), 1);
        assert_eq!(g.to_text(false), "Buffer{operand1{PolyConstant{0}}channels{1}frameSize{8}}");
    }

    #[test]
    fn renders_blocks() {
        let env = Environment::shared();
        let mut g = Generator::new(GeneratorKind::Buffer, &env);
        let mut click = Generator::new(GeneratorKind::Click, &env);
        click
            .set_parameter(ParameterName::Rate, 2.0, Context::PeriodSamples)
            .unwrap();
        g.set(ParameterName::Operand1, crate::signal::shared(click)).unwrap();
        g.set(ParameterName::FrameSize, 4.0).unwrap();
        g.set(ParameterName::Channels, 2.0).unwrap();

        assert_eq!(g.poly(0).as_slice(), &[1.0, 1.0]);
        assert_eq!(g.poly(1).as_slice(), &[0.0, 0.0]);
        assert_eq!(g.poly(3).as_slice(), &[0.0, 0.0]);
        assert_eq!(buffer_of(&g).render_count(), 1);
        assert_eq!(buffer_of(&g).channel(0).unwrap(), &[1.0, 0.0, 1.0, 0.0]);
        assert_eq!(buffer_of(&g).interleaved(), vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(buffer_of(&g).average(), 0.5);
        assert!(buffer_of(&g).channel(2).is_none());

        g.poly(4);
        assert_eq!(buffer_of(&g).render_count(), 2);
        assert_eq!(buffer_of(&g).block_start(), Some(4));
    }

    #[test]
    fn resize_resets() {
        let env = Environment::shared();
        let mut g = Generator::new(GeneratorKind::Buffer, &env);
        g.set(ParameterName::Operand1, 1.0).unwrap();
        g.poly(0);
        assert_eq!(buffer_of(&g).render_count(), 1);
        g.set(ParameterName::Channels, 3.0).unwrap();
        assert_eq!(buffer_of(&g).render_count(), 0);
        assert_eq!(g.poly_depth(), 3);
        assert_eq!(buffer_of(&g).average(), 0.0);
        assert_eq!(g.poly(0).as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_sizes_rejected() {
        let env = Environment::shared();
        let mut g = Generator::new(GeneratorKind::Buffer, &env);
        assert!(g.set(ParameterName::Channels, 0.0).is_err());
        assert!(g.set(ParameterName::FrameSize, 0.0).is_err());
        assert!(g.set(ParameterName::FrameSize, 2.5).is_err());
        assert!(g.set(ParameterName::Channels, (MAX_POLY + 1) as Real).is_err());
        assert!(matches!(
            g.set(ParameterName::FrameSize, 1e19),
            Err(GenError::InvalidSize { .. })
        ));
        assert!(g.set(ParameterName::FrameSize, (MAX_FRAME_SIZE + 1) as Real).is_err());
        assert!(g.set(ParameterName::Channels, Real::INFINITY).is_err());
        assert!(g.set(ParameterName::FrameSize, MAX_FRAME_SIZE as Real).is_ok());
        assert_eq!(buffer_of(&g).frame_size(), MAX_FRAME_SIZE);
        assert_eq!(buffer_of(&g).channels(), 1);
    }

    #[test]
    fn oversized_text_is_an_error() {
        let f = crate::factory::Factory::new(&Environment::shared());
        assert!(matches!(
            f.create("Buffer{frameSize{1e19}}"),
            Err(GenError::InvalidSize { .. })
        ));
        assert!(matches!(
            f.create("Buffer{channels{4294967296}}"),
            Err(GenError::InvalidSize { .. })
        ));
    }
}
