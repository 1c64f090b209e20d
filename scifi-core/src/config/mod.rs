//! Configuration type definitions

pub mod timing;

pub use timing::{AnimationTiming, ConfigError};
