use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{cell::RefCell, rc::Rc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    buffer::MAX_FRAME_SIZE,
    error::{GenError, GenResult},
    signal::{Builder, Real, SampleIndex},
};

pub const DEFAULT_SAMPLING_RATE: u32 = 44100;
pub const DEFAULT_FRAME_SIZE: usize = 64;

/// Settings shared by every generator of a graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub sampling_rate: u32,
    pub frame_size: usize,
    /// Seed for every random source in the graph. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling_rate: DEFAULT_SAMPLING_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sampling_rate(&mut self, arg: u32) -> &mut Self {
        self.sampling_rate = arg;
        self
    }

    pub fn frame_size(&mut self, arg: usize) -> &mut Self {
        self.frame_size = arg;
        self
    }

    pub fn seed(&mut self, arg: u64) -> &mut Self {
        self.seed = Some(arg);
        self
    }
}

impl Builder for Config {}

/// Immutable context handed to every generator constructor. The only
/// interior state is the root RNG that random generators fork from.
#[derive(Debug)]
pub struct Environment {
    sampling_rate: u32,
    frame_size: usize,
    rng: RefCell<StdRng>,
}

impl Environment {
    pub fn new(config: &Config) -> GenResult<Rc<Self>> {
        if config.sampling_rate == 0 {
            return Err(GenError::Config("sampling rate must be positive".into()));
        }
        if config.frame_size == 0 {
            return Err(GenError::Config("frame size must be positive".into()));
        }
        if config.frame_size > MAX_FRAME_SIZE {
            return Err(GenError::Config(format!(
                "frame size must be at most {}",
                MAX_FRAME_SIZE
            )));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::debug!(
            sampling_rate = config.sampling_rate,
            frame_size = config.frame_size,
            seeded = config.seed.is_some(),
            "environment created"
        );
        Ok(Rc::new(Self {
            sampling_rate: config.sampling_rate,
            frame_size: config.frame_size,
            rng: RefCell::new(rng),
        }))
    }

    /// An environment with the default sampling rate and frame size.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self {
            sampling_rate: DEFAULT_SAMPLING_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
            rng: RefCell::new(StdRng::from_entropy()),
        })
    }

    pub fn sampling_rate(&self) -> Real {
        self.sampling_rate as Real
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// A new generator seeded from the environment's RNG, so a seeded
    /// environment yields the same streams in construction order.
    pub fn fork_rng(&self) -> StdRng {
        let seed: u64 = self.rng.borrow_mut().gen();
        StdRng::seed_from_u64(seed)
    }

    /// Sample index nearest to `seconds`.
    pub fn seconds_to_index(&self, seconds: Real) -> SampleIndex {
        (seconds * self.sampling_rate()).round().max(0.0) as SampleIndex
    }
}
