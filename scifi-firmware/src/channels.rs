//! Inter-task communication channels
//!
//! Uses embassy-sync primitives for safe async communication between the
//! UART receive task and the control loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use scifi_protocol::CommandLine;

/// Channel capacity for complete command lines
const REQUEST_CHANNEL_SIZE: usize = 4;

/// Something the host sent that needs an answer
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostRequest {
    /// One command line, terminator stripped
    Command(CommandLine),
    /// A line longer than the command buffer was discarded
    Overflow,
}

/// Host requests from the UART, consumed by the control loop
pub static HOST_REQUESTS: Channel<CriticalSectionRawMutex, HostRequest, REQUEST_CHANNEL_SIZE> =
    Channel::new();
