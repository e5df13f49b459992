//! Prelude module for arachne - import commonly used items with `use arachne::prelude::*;`

pub use crate::context::Context;
pub use crate::environment::{Config, Environment};
pub use crate::error::{GenError, GenResult};
pub use crate::factory::Factory;
pub use crate::generator::{GenRef, Generator, GeneratorKind, In, Node};
pub use crate::parameter::ParameterName;
pub use crate::signal::{shared, Arity, Builder, Frame, Real, SampleIndex, MAX_POLY};
