//! Board-agnostic core logic for ScifiDisplay panels
//!
//! This crate contains everything that does not depend on the TM1638 bus
//! or the host link:
//!
//! - Driver adapter and random source traits
//! - Animation timing configuration
//! - Per-panel state machine (message flashing, LED animation, button edges)
//! - Panel group with selector resolution, button policy and command dispatch
//!
//! Time is an externally supplied tick counter that may wrap; see [`time`].

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod group;
pub mod panel;
pub mod time;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use group::{ButtonEdges, GroupError, PanelGroup, MAX_PANELS};
pub use panel::{LedsMode, MessagePhase, Panel, DIGIT_COUNT, MESSAGE_SLOTS};
pub use time::Ticks;
pub use traits::{PanelDriver, RandomSource, XorShift32};
