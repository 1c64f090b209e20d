//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in scifi-core:
//!
//! - TM1638 panels sharing one data/clock bus, one strobe line each
//! - ASCII to seven-segment font

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod tm1638;

pub use tm1638::{Tm1638, Tm1638Bus};
