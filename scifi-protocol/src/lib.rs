//! ScifiDisplay command protocol
//!
//! This crate defines the line-based text protocol a host uses to drive a
//! chain of up to four TM1638 panels. One command line goes in, one response
//! string comes out.
//!
//! # Protocol Overview
//!
//! Arguments are separated by runs of spaces. Only the first character of a
//! keyword is inspected, so `b`, `brightness` and `banana` are the same verb.
//! ```text
//! ┌──────────────┬───────────┬─────────────────┬────────────────────────┐
//! │ VERB         │ SUB       │ ARGS            │ EFFECT                 │
//! ├──────────────┼───────────┼─────────────────┼────────────────────────┤
//! │ i[nfo]       │           │                 │ version + panel count  │
//! │ b[rightness] │           │ PANEL 0-8       │ set brightness         │
//! │ m[essage]    │ s[et]     │ PANEL SLOT text │ store message text     │
//! │ m[essage]    │ f[lash]   │ PANEL SLOT      │ flash a stored message │
//! │ m[essage]    │ d[isable] │ PANEL           │ stop flashing          │
//! │ l[eds]       │ b[link]   │ PANEL r|g       │ random LED blinking    │
//! │ l[eds]       │ f[lash]   │ PANEL r|g       │ flash all LEDs         │
//! │ l[eds]       │ d[isable] │ PANEL           │ LEDs off               │
//! └──────────────┴───────────┴─────────────────┴────────────────────────┘
//! ```
//!
//! PANEL is `1`-`9` (one-based) or `a[ll]`; SLOT is `1`-`8`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod args;
pub mod command;
pub mod line;
pub mod response;

pub use args::{Args, MAX_ARGS};
pub use command::{Color, Command, CommandError, Selector};
pub use line::{CommandLine, LineError, LineParser};
pub use response::Response;

/// Maximum size of a valid command line
pub const MAX_COMMAND_SIZE: usize = 32;

/// Size of every response string; longer responses are truncated
pub const RESPONSE_SIZE: usize = 64;

/// Version of the command protocol (major in the high byte)
pub const PROTOCOL_VERSION: u16 = 0x0001;

/// Human readable summary of the accepted commands
pub const HELP: &str = "Commands:\n\
i[nfo] - print info\n\
b[rightness] PANEL 0-8 - set brightness (0 = off; 8 = max)\n\
m[essage] s[et] PANEL SLOT text - change message text\n\
m[essage] f[lash] PANEL SLOT - flash message on display\n\
m[essage] d[isable] PANEL - stop flashing message\n\
l[eds] b[link] PANEL r[ed]|g[reen] - randomly blink LEDs\n\
l[eds] f[lash] PANEL r[ed]|g[reen] - flash LEDs\n\
l[eds] d[isable] PANEL - stop blinking/flashing LEDs\n\
PANEL is 1-num connected panels, or a[ll]\n\
SLOT is 1-8 and corresponds to a button\n";
