//! Hardware abstraction traits
//!
//! These traits define the interface between the panel logic and the
//! hardware-specific implementations.

pub mod panel;
pub mod random;

pub use panel::PanelDriver;
pub use random::{RandomSource, XorShift32};
