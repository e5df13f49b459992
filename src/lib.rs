pub mod buffer;
pub mod constants;
pub mod context;
pub mod environment;
pub mod error;
pub mod factory;
pub mod filters;
pub mod generator;
pub mod operators;
pub mod oscillators;
pub mod parameter;
pub mod prelude;
pub mod random;
pub mod render;
pub mod selector;
pub mod signal;
pub mod text;
pub mod wav;

pub use context::Context;
pub use environment::{Config, Environment};
pub use error::{GenError, GenResult};
pub use factory::Factory;
pub use generator::{GenRef, Generator, GeneratorKind, In, Node};
pub use parameter::ParameterName;
pub use signal::*;
