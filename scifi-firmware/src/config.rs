//! Build-time configuration
//!
//! Constants generated by build.rs from panels.toml.

use scifi_core::config::AnimationTiming;

include!(concat!(env!("OUT_DIR"), "/panel_config.rs"));
