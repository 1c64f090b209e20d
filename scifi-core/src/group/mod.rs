//! Panel group
//!
//! Up to [`MAX_PANELS`] panels chained on one bus, addressed by a
//! [`Selector`]. The group owns the random source shared by every panel and
//! applies the fixed button policy on each tick.

mod dispatch;

use core::ops::Range;

use heapless::Vec;
use scifi_protocol::Selector;

use crate::config::{AnimationTiming, ConfigError};
use crate::panel::Panel;
use crate::time::Ticks;
use crate::traits::{PanelDriver, RandomSource};

/// Maximum number of chained panels
pub const MAX_PANELS: usize = 4;

/// Per-panel rising-edge masks from one tick, in panel order
pub type ButtonEdges = Vec<u8, MAX_PANELS>;

/// Group construction and addressing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GroupError {
    /// No drivers were supplied
    NoPanels,
    /// More than [`MAX_PANELS`] drivers were supplied
    TooManyPanels,
    /// A concrete selector index past the last attached panel
    InvalidSelector,
    /// Animation timing failed validation
    Config(ConfigError),
}

impl From<ConfigError> for GroupError {
    fn from(err: ConfigError) -> Self {
        GroupError::Config(err)
    }
}

/// Fixed set of panels plus the random source driving LED blinking
pub struct PanelGroup<D, R> {
    panels: Vec<Panel<D>, MAX_PANELS>,
    rng: R,
}

impl<D: PanelDriver, R: RandomSource> PanelGroup<D, R> {
    /// Build a group with default animation timing
    pub fn new<I>(drivers: I, rng: R) -> Result<Self, GroupError>
    where
        I: IntoIterator<Item = D>,
    {
        Self::with_timing(drivers, rng, AnimationTiming::default())
    }

    /// Build a group with custom animation timing
    pub fn with_timing<I>(drivers: I, rng: R, timing: AnimationTiming) -> Result<Self, GroupError>
    where
        I: IntoIterator<Item = D>,
    {
        timing.validate()?;

        let mut panels = Vec::new();
        for driver in drivers {
            panels
                .push(Panel::new(driver, timing))
                .map_err(|_| GroupError::TooManyPanels)?;
        }
        if panels.is_empty() {
            return Err(GroupError::NoPanels);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("panel group with {} panels", panels.len());

        Ok(Self { panels, rng })
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn panel(&self, index: usize) -> Option<&Panel<D>> {
        self.panels.get(index)
    }

    pub fn panel_mut(&mut self, index: usize) -> Option<&mut Panel<D>> {
        self.panels.get_mut(index)
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel<D>> {
        self.panels.iter()
    }

    /// Panel indices a selector addresses
    ///
    /// `All` always resolves, to every attached panel. A concrete index must
    /// name an attached panel.
    pub fn resolve(&self, selector: Selector) -> Result<Range<usize>, GroupError> {
        match selector {
            Selector::All => Ok(0..self.panels.len()),
            Selector::Index(index) => {
                let index = index as usize;
                if index < self.panels.len() {
                    Ok(index..index + 1)
                } else {
                    Err(GroupError::InvalidSelector)
                }
            }
        }
    }

    /// Run `op` on every addressed panel in ascending order
    ///
    /// Nothing runs if the selector does not resolve.
    pub fn apply<F>(&mut self, selector: Selector, mut op: F) -> Result<(), GroupError>
    where
        F: FnMut(&mut Panel<D>, &mut R),
    {
        let range = self.resolve(selector)?;
        for panel in &mut self.panels[range] {
            op(panel, &mut self.rng);
        }
        Ok(())
    }

    /// Tick every panel and apply the button policy
    ///
    /// For each panel with new presses, the lowest pressed button wins: if it
    /// is the slot already flashing, the message is disabled, otherwise that
    /// slot starts flashing. Returns the raw rising-edge mask of each panel.
    pub fn tick_all(&mut self, now: Ticks) -> ButtonEdges {
        let mut edges = ButtonEdges::new();

        for (_index, panel) in self.panels.iter_mut().enumerate() {
            let rising = panel.tick(now, &mut self.rng);

            if rising != 0 {
                let button = rising.trailing_zeros() as u8;
                if panel.message_index() == Some(button) {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("panel {}: button {} disables message", _index, button);
                    panel.disable_message();
                } else {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("panel {}: button {} flashes message", _index, button);
                    panel.flash_message(button, now);
                }
            }

            // At most MAX_PANELS panels exist
            let _ = edges.push(rising);
        }

        edges
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::MessagePhase;
    use crate::testing::{MockDriver, StepRng};

    fn group(count: usize) -> PanelGroup<MockDriver, StepRng> {
        PanelGroup::new((0..count).map(|_| MockDriver::new()), StepRng::new(0, 1)).unwrap()
    }

    #[test]
    fn test_construction_limits() {
        let empty = PanelGroup::new(core::iter::empty::<MockDriver>(), StepRng::new(0, 1));
        assert_eq!(empty.err(), Some(GroupError::NoPanels));

        let five = PanelGroup::new((0..5).map(|_| MockDriver::new()), StepRng::new(0, 1));
        assert_eq!(five.err(), Some(GroupError::TooManyPanels));

        assert_eq!(group(MAX_PANELS).panel_count(), MAX_PANELS);
    }

    #[test]
    fn test_rejects_zero_timing() {
        let timing = AnimationTiming {
            leds_blink: 0,
            ..Default::default()
        };
        let result = PanelGroup::with_timing([MockDriver::new()], StepRng::new(0, 1), timing);
        assert_eq!(
            result.err(),
            Some(GroupError::Config(ConfigError::ZeroDuration))
        );
    }

    #[test]
    fn test_resolve() {
        let group = group(2);
        assert_eq!(group.resolve(Selector::All), Ok(0..2));
        assert_eq!(group.resolve(Selector::Index(0)), Ok(0..1));
        assert_eq!(group.resolve(Selector::Index(1)), Ok(1..2));
        assert_eq!(
            group.resolve(Selector::Index(2)),
            Err(GroupError::InvalidSelector)
        );
        assert_eq!(
            group.resolve(Selector::Index(8)),
            Err(GroupError::InvalidSelector)
        );
    }

    #[test]
    fn test_apply_in_order() {
        let mut group = group(3);
        let mut seen = heapless::Vec::<u8, 4>::new();
        let mut n = 0;
        group
            .apply(Selector::All, |panel, _| {
                panel.set_brightness(n);
                seen.push(n).unwrap();
                n += 1;
            })
            .unwrap();
        assert_eq!(seen.as_slice(), &[0, 1, 2]);
        assert_eq!(group.panel(2).unwrap().driver().brightness(), Some(2));
    }

    #[test]
    fn test_apply_invalid_touches_nothing() {
        let mut group = group(2);
        let mut calls = 0;
        let result = group.apply(Selector::Index(2), |_, _| calls += 1);
        assert_eq!(result, Err(GroupError::InvalidSelector));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_button_flashes_pressed_slot() {
        let mut group = group(2);
        group.panel_mut(1).unwrap().set_message(2, "BTN3");
        group.panel_mut(1).unwrap().driver_mut().set_buttons(0b0000_0100);

        let edges = group.tick_all(1000);
        assert_eq!(edges.as_slice(), &[0, 0b0000_0100]);
        assert_eq!(group.panel(0).unwrap().message_index(), None);
        let panel = group.panel(1).unwrap();
        assert_eq!(panel.message_index(), Some(2));
        assert_eq!(panel.message_phase(), MessagePhase::Blank);

        group.panel_mut(1).unwrap().driver_mut().set_buttons(0);
        group.tick_all(1200);
        assert_eq!(group.panel(1).unwrap().driver().display(), Some("  BTN3  "));
    }

    #[test]
    fn test_button_toggles_active_slot() {
        let mut group = group(1);
        group.panel_mut(0).unwrap().flash_message(5, 0);

        group.panel_mut(0).unwrap().driver_mut().set_buttons(0b0010_0000);
        group.tick_all(10);
        assert_eq!(group.panel(0).unwrap().message_index(), None);
        assert_eq!(group.panel(0).unwrap().driver().display(), None);

        // Still held: no new edge
        group.tick_all(20);
        assert_eq!(group.panel(0).unwrap().message_index(), None);
    }

    #[test]
    fn test_lowest_button_wins() {
        let mut group = group(1);
        group.panel_mut(0).unwrap().driver_mut().set_buttons(0b1001_0010);
        group.tick_all(0);
        assert_eq!(group.panel(0).unwrap().message_index(), Some(1));
    }

    #[test]
    fn test_panels_handled_independently() {
        let mut group = group(2);
        group.panel_mut(0).unwrap().flash_message(0, 0);
        group.panel_mut(0).unwrap().driver_mut().set_buttons(0b0000_0001);
        group.panel_mut(1).unwrap().driver_mut().set_buttons(0b1000_0000);

        group.tick_all(50);
        assert_eq!(group.panel(0).unwrap().message_index(), None);
        assert_eq!(group.panel(1).unwrap().message_index(), Some(7));
    }
}
