//! Line framing for the serial command link
//!
//! Bytes arrive one at a time from the host. A command line ends at `\n` or
//! `\r`; the terminator is not part of the line and empty lines are skipped,
//! so CRLF hosts work unchanged.

use heapless::String;

use crate::MAX_COMMAND_SIZE;

/// One command line, terminator stripped
pub type CommandLine = String<MAX_COMMAND_SIZE>;

/// Errors that can occur while framing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_COMMAND_SIZE`]; it is dropped up to its terminator
    TooLong,
}

/// Accumulates bytes into command lines
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: CommandLine,
    discarding: bool,
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty line,
    /// `Ok(None)` when more bytes are needed, or `Err` the first time a line
    /// overflows.
    pub fn feed(&mut self, byte: u8) -> Result<Option<CommandLine>, LineError> {
        match byte {
            b'\n' | b'\r' => {
                if self.discarding {
                    self.reset();
                    return Ok(None);
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                Ok(Some(core::mem::take(&mut self.buffer)))
            }
            _ if self.discarding => Ok(None),
            _ => {
                // Protocol is ASCII
                let c = if byte.is_ascii() { char::from(byte) } else { '?' };
                if self.buffer.push(c).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    return Err(LineError::TooLong);
                }
                Ok(None)
            }
        }
    }
}
