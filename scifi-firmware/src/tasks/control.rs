//! Control loop task
//!
//! Ticks the panel group on a fixed period and answers host commands in
//! between. Everything runs on this one task, so panels never need locking.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Output, OutputOpenDrain};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_io_async::Write;

use scifi_core::{PanelGroup, Ticks, XorShift32};
use scifi_drivers::{Tm1638, Tm1638Bus};
use scifi_protocol::{Response, HELP};

use crate::channels::{HostRequest, HOST_REQUESTS};
use crate::config::TICK_MS;

/// Shared TM1638 data/clock lines
pub type PanelBus = Tm1638Bus<Output<'static>, OutputOpenDrain<'static>, Delay>;

/// One panel on the shared bus
pub type PanelHandle =
    Tm1638<'static, Output<'static>, Output<'static>, OutputOpenDrain<'static>, Delay>;

/// Every attached panel
pub type Panels = PanelGroup<PanelHandle, XorShift32>;

/// Control task - ticks panels and dispatches host commands
#[embassy_executor::task]
pub async fn control_task(mut panels: Panels, mut tx: BufferedUartTx) {
    info!("Control task started, {} panels", panels.panel_count());

    write_text(&mut tx, HELP).await;

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    let start = Instant::now();

    loop {
        let event = select(ticker.next(), HOST_REQUESTS.receive()).await;

        // Milliseconds since boot, wrapping
        let now = start.elapsed().as_millis() as Ticks;

        match event {
            Either::First(()) => {
                let edges = panels.tick_all(now);
                for (index, &pressed) in edges.iter().enumerate() {
                    if pressed != 0 {
                        debug!("Panel {} buttons pressed: {:b}", index, pressed);
                    }
                }
            }
            Either::Second(HostRequest::Command(line)) => {
                let response = panels.process_command(&line, now);
                debug!("{} -> {}", line.as_str(), response);
                send_response(&mut tx, &response).await;
            }
            Either::Second(HostRequest::Overflow) => {
                let response = Response::format(false, format_args!("Command too long"));
                send_response(&mut tx, &response).await;
            }
        }
    }
}

/// Send one response line to the host
async fn send_response(tx: &mut BufferedUartTx, response: &Response) {
    write_text(tx, response.as_str()).await;
    write_text(tx, "\n").await;
}

async fn write_text(tx: &mut BufferedUartTx, text: &str) {
    if let Err(e) = tx.write_all(text.as_bytes()).await {
        warn!("UART write error: {:?}", e);
    }
}
