//! Command parsing and validation
//!
//! Parsing fully validates a line before anything is dispatched, so a
//! rejected command never touches panel state. The one check that needs the
//! panel count (a concrete panel index being attached) happens at resolve
//! time in the core and reports the same [`CommandError::InvalidArgs`].

use core::fmt;

use crate::args::Args;

/// Which panel(s) a command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selector {
    /// A single panel, zero-based
    Index(u8),
    /// Every attached panel
    All,
}

impl Selector {
    /// Parse a selector token: `1`-`9` (one-based) or `a`/`A`
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'a' | b'A' => Some(Selector::All),
            b'1'..=b'9' => Some(Selector::Index(byte - b'1')),
            _ => None,
        }
    }
}

/// LED color on a bicolor panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Red,
    Green,
}

impl Color {
    /// Parse a color token: `r`/`R` or `g`/`G`
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'r' | b'R' => Some(Color::Red),
            b'g' | b'G' => Some(Color::Green),
            _ => None,
        }
    }

    /// Build from the green flag used by the LED operations
    pub fn from_green(green: bool) -> Self {
        if green {
            Color::Green
        } else {
            Color::Red
        }
    }

    pub fn is_green(self) -> bool {
        self == Color::Green
    }
}

/// Why a command line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Leading character does not select a verb
    ///
    /// Holds a space if the character was not printable.
    UnknownCommand(char),
    /// Verb was recognized but its arguments were not
    InvalidArgs(char),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(c) => write!(f, "Unknown command {}", c),
            CommandError::InvalidArgs(c) => write!(f, "Invalid args for command {}", c),
        }
    }
}

/// A parsed command, valid for one parse-dispatch-respond cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Report protocol version and panel count
    Info,
    /// Set brightness, 0 (off) to 8 (max)
    Brightness { target: Selector, level: u8 },
    /// Store message text in a slot (zero-based)
    SetMessage {
        target: Selector,
        slot: u8,
        text: &'a str,
    },
    /// Start flashing the message in a slot (zero-based)
    FlashMessage { target: Selector, slot: u8 },
    /// Stop flashing the message
    DisableMessage { target: Selector },
    /// Randomly blink the LEDs
    BlinkLeds { target: Selector, color: Color },
    /// Flash all LEDs on and off
    FlashLeds { target: Selector, color: Color },
    /// Turn the LEDs off
    DisableLeds { target: Selector },
}

impl<'a> Command<'a> {
    /// Parse and validate one command line
    ///
    /// The line must already be stripped of its terminator.
    pub fn parse(line: &'a str) -> Result<Self, CommandError> {
        let args = Args::split(line);

        let verb = match args.lead(0) {
            Some(byte) => byte,
            None => return Err(CommandError::UnknownCommand(' ')),
        };
        let invalid = CommandError::InvalidArgs(char::from(verb));

        match verb {
            b'i' | b'I' => {
                if args.len() != 1 {
                    return Err(invalid);
                }
                Ok(Command::Info)
            }
            b'b' | b'B' => {
                if args.len() != 3 {
                    return Err(invalid);
                }
                let target = selector_arg(&args, 1).ok_or(invalid)?;
                let level = digit_in(&args, 2, b'0', b'8').ok_or(invalid)?;
                Ok(Command::Brightness { target, level })
            }
            b'm' | b'M' => match args.lead(1) {
                Some(b's' | b'S') => {
                    if args.len() != 5 {
                        return Err(invalid);
                    }
                    let target = selector_arg(&args, 2).ok_or(invalid)?;
                    let slot = digit_in(&args, 3, b'1', b'8').ok_or(invalid)? - 1;
                    Ok(Command::SetMessage {
                        target,
                        slot,
                        text: args.rest(4),
                    })
                }
                Some(b'f' | b'F') => {
                    if args.len() != 4 {
                        return Err(invalid);
                    }
                    let target = selector_arg(&args, 2).ok_or(invalid)?;
                    let slot = digit_in(&args, 3, b'1', b'8').ok_or(invalid)? - 1;
                    Ok(Command::FlashMessage { target, slot })
                }
                Some(b'd' | b'D') => {
                    if args.len() != 3 {
                        return Err(invalid);
                    }
                    let target = selector_arg(&args, 2).ok_or(invalid)?;
                    Ok(Command::DisableMessage { target })
                }
                _ => Err(invalid),
            },
            b'l' | b'L' => match args.lead(1) {
                Some(b'b' | b'B') => {
                    if args.len() != 4 {
                        return Err(invalid);
                    }
                    let target = selector_arg(&args, 2).ok_or(invalid)?;
                    let color = color_arg(&args, 3).ok_or(invalid)?;
                    Ok(Command::BlinkLeds { target, color })
                }
                Some(b'f' | b'F') => {
                    if args.len() != 4 {
                        return Err(invalid);
                    }
                    let target = selector_arg(&args, 2).ok_or(invalid)?;
                    let color = color_arg(&args, 3).ok_or(invalid)?;
                    Ok(Command::FlashLeds { target, color })
                }
                Some(b'd' | b'D') => {
                    if args.len() != 3 {
                        return Err(invalid);
                    }
                    let target = selector_arg(&args, 2).ok_or(invalid)?;
                    Ok(Command::DisableLeds { target })
                }
                _ => Err(invalid),
            },
            other => Err(CommandError::UnknownCommand(printable(other))),
        }
    }

    /// The panel selector this command addresses, if any
    pub fn target(&self) -> Option<Selector> {
        match *self {
            Command::Info => None,
            Command::Brightness { target, .. }
            | Command::SetMessage { target, .. }
            | Command::FlashMessage { target, .. }
            | Command::DisableMessage { target }
            | Command::BlinkLeds { target, .. }
            | Command::FlashLeds { target, .. }
            | Command::DisableLeds { target } => Some(target),
        }
    }
}

fn selector_arg(args: &Args<'_>, index: usize) -> Option<Selector> {
    Selector::from_byte(args.lead(index)?)
}

fn color_arg(args: &Args<'_>, index: usize) -> Option<Color> {
    Color::from_byte(args.lead(index)?)
}

/// Value of a digit argument in `min..=max`
fn digit_in(args: &Args<'_>, index: usize, min: u8, max: u8) -> Option<u8> {
    let byte = args.lead(index)?;
    (min..=max).contains(&byte).then(|| byte - b'0')
}

fn printable(byte: u8) -> char {
    if (0x20..0x7f).contains(&byte) {
        char::from(byte)
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_info() {
        assert_eq!(Command::parse("i"), Ok(Command::Info));
        assert_eq!(Command::parse("INFO"), Ok(Command::Info));
        assert_eq!(
            Command::parse("info now"),
            Err(CommandError::InvalidArgs('i'))
        );
    }

    #[test]
    fn test_brightness() {
        assert_eq!(
            Command::parse("b a 5"),
            Ok(Command::Brightness {
                target: Selector::All,
                level: 5
            })
        );
        assert_eq!(
            Command::parse("Brightness 2 0"),
            Ok(Command::Brightness {
                target: Selector::Index(1),
                level: 0
            })
        );
        assert_eq!(Command::parse("b a 9"), Err(CommandError::InvalidArgs('b')));
        assert_eq!(Command::parse("b 0 5"), Err(CommandError::InvalidArgs('b')));
        assert_eq!(Command::parse("b a"), Err(CommandError::InvalidArgs('b')));
        assert_eq!(
            Command::parse("B a 5 extra"),
            Err(CommandError::InvalidArgs('B'))
        );
    }

    #[test]
    fn test_keyword_first_letter_only() {
        assert_eq!(
            Command::parse("banana all 8"),
            Command::parse("b a 8")
        );
    }

    #[test]
    fn test_message_set() {
        assert_eq!(
            Command::parse("m s 1 3 HELLO"),
            Ok(Command::SetMessage {
                target: Selector::Index(0),
                slot: 2,
                text: "HELLO"
            })
        );
        assert_eq!(
            Command::parse("message set all 8 GO FOR IT"),
            Ok(Command::SetMessage {
                target: Selector::All,
                slot: 7,
                text: "GO FOR IT"
            })
        );
        assert_eq!(
            Command::parse("m s 1 9 HELLO"),
            Err(CommandError::InvalidArgs('m'))
        );
        assert_eq!(
            Command::parse("m s 1 3"),
            Err(CommandError::InvalidArgs('m'))
        );
    }

    #[test]
    fn test_message_flash_and_disable() {
        assert_eq!(
            Command::parse("m f 1 3"),
            Ok(Command::FlashMessage {
                target: Selector::Index(0),
                slot: 2
            })
        );
        assert_eq!(
            Command::parse("M D a"),
            Ok(Command::DisableMessage {
                target: Selector::All
            })
        );
        assert_eq!(
            Command::parse("m f 1 0"),
            Err(CommandError::InvalidArgs('m'))
        );
        assert_eq!(Command::parse("m x 1"), Err(CommandError::InvalidArgs('m')));
        assert_eq!(Command::parse("m"), Err(CommandError::InvalidArgs('m')));
    }

    #[test]
    fn test_leds() {
        assert_eq!(
            Command::parse("l b 2 g"),
            Ok(Command::BlinkLeds {
                target: Selector::Index(1),
                color: Color::Green
            })
        );
        assert_eq!(
            Command::parse("leds flash all red"),
            Ok(Command::FlashLeds {
                target: Selector::All,
                color: Color::Red
            })
        );
        assert_eq!(
            Command::parse("l d 4"),
            Ok(Command::DisableLeds {
                target: Selector::Index(3)
            })
        );
        assert_eq!(Command::parse("l b 1 y"), Err(CommandError::InvalidArgs('l')));
        assert_eq!(Command::parse("l f 1"), Err(CommandError::InvalidArgs('l')));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(Command::parse("x 1"), Err(CommandError::UnknownCommand('x')));
        assert_eq!(Command::parse(" i"), Err(CommandError::UnknownCommand(' ')));
        assert_eq!(Command::parse(""), Err(CommandError::UnknownCommand(' ')));
        assert_eq!(
            Command::parse("\x07beep"),
            Err(CommandError::UnknownCommand(' '))
        );
    }

    #[test]
    fn test_error_display() {
        let mut buf = heapless::String::<32>::new();
        fmt::write(&mut buf, format_args!("{}", CommandError::UnknownCommand('q'))).unwrap();
        assert_eq!(buf.as_str(), "Unknown command q");

        buf.clear();
        fmt::write(&mut buf, format_args!("{}", CommandError::InvalidArgs('L'))).unwrap();
        assert_eq!(buf.as_str(), "Invalid args for command L");
    }

    #[test]
    fn test_target() {
        assert_eq!(Command::Info.target(), None);
        assert_eq!(
            Command::parse("l d 2").unwrap().target(),
            Some(Selector::Index(1))
        );
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(line in "\\PC{0,40}") {
            let _ = Command::parse(&line);
        }

        #[test]
        fn prop_slot_zero_based(slot in 1u8..=8) {
            let mut line = heapless::String::<16>::new();
            fmt::write(&mut line, format_args!("m f a {}", slot)).unwrap();
            prop_assert_eq!(
                Command::parse(&line),
                Ok(Command::FlashMessage { target: Selector::All, slot: slot - 1 })
            );
        }
    }
}
