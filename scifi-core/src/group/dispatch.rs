//! Command dispatch onto a panel group

use scifi_protocol::{Command, CommandError, Response};

use super::{GroupError, PanelGroup};
use crate::time::Ticks;
use crate::traits::{PanelDriver, RandomSource};

impl<D: PanelDriver, R: RandomSource> PanelGroup<D, R> {
    /// Parse, validate and run one command line, returning its response
    ///
    /// `line` must not contain its terminator. Nothing is changed unless
    /// the whole command validates, including the panel selector.
    pub fn process_command(&mut self, line: &str, now: Ticks) -> Response {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("rejected command: {}", err);
                return Response::error(&err);
            }
        };

        if command == Command::Info {
            return Response::info(self.panel_count());
        }

        // Selector out of range reads as bad arguments to the verb
        let verb = line.chars().next().unwrap_or(' ');
        let result = self
            .execute(&command, now)
            .map_err(|_| CommandError::InvalidArgs(verb));

        #[cfg(feature = "defmt")]
        {
            if let Err(err) = &result {
                defmt::debug!("rejected command: {}", err);
            }
        }

        Response::from(result)
    }

    /// Run an already parsed command
    ///
    /// `Info` has no effect on the panels and always succeeds.
    pub fn execute(&mut self, command: &Command<'_>, now: Ticks) -> Result<(), GroupError> {
        match *command {
            Command::Info => Ok(()),
            Command::Brightness { target, level } => {
                self.apply(target, |panel, _| panel.set_brightness(level))
            }
            Command::SetMessage { target, slot, text } => {
                self.apply(target, |panel, _| panel.set_message(slot, text))
            }
            Command::FlashMessage { target, slot } => {
                self.apply(target, |panel, _| panel.flash_message(slot, now))
            }
            Command::DisableMessage { target } => {
                self.apply(target, |panel, _| panel.disable_message())
            }
            Command::BlinkLeds { target, color } => {
                self.apply(target, |panel, rng| panel.blink_leds(color, now, rng))
            }
            Command::FlashLeds { target, color } => {
                self.apply(target, |panel, _| panel.flash_leds(color, now))
            }
            Command::DisableLeds { target } => self.apply(target, |panel, _| panel.disable_leds()),
        }
    }
}
