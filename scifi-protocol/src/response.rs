//! Response strings returned for each command line
//!
//! Every response fits in [`RESPONSE_SIZE`] bytes; longer text is cut off
//! rather than rejected.

use core::fmt::{self, Write};

use heapless::String;

use crate::command::CommandError;
use crate::{PROTOCOL_VERSION, RESPONSE_SIZE};

/// Outcome of one command: success flag plus human readable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    success: bool,
    text: String<RESPONSE_SIZE>,
}

impl Response {
    /// Plain success
    pub fn ok() -> Self {
        Self::format(true, format_args!("ok"))
    }

    /// Protocol version and number of attached panels
    pub fn info(panel_count: usize) -> Self {
        Self::format(
            true,
            format_args!(
                "ScifiDisplay v{}.{}\nnum_panels: {}\n",
                (PROTOCOL_VERSION >> 8) & 0xff,
                PROTOCOL_VERSION & 0xff,
                panel_count
            ),
        )
    }

    /// Failure carrying the error's protocol text
    pub fn error(err: &CommandError) -> Self {
        Self::format(false, format_args!("{}", err))
    }

    /// Build a response from arbitrary formatted text, truncating to fit
    pub fn format(success: bool, args: fmt::Arguments<'_>) -> Self {
        let mut text = String::new();
        // Truncating writer never fails
        let _ = Truncating(&mut text).write_fmt(args);
        Self { success, text }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

impl From<Result<(), CommandError>> for Response {
    fn from(result: Result<(), CommandError>) -> Self {
        match result {
            Ok(()) => Response::ok(),
            Err(err) => Response::error(&err),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Response {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Response[{}: {}]", self.success, self.text.as_str());
    }
}

/// Writer that drops whatever does not fit
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
