//! Host UART receive task
//!
//! Frames bytes from the host into command lines and hands them to the
//! control loop.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use scifi_protocol::{LineError, LineParser};

use crate::channels::{HostRequest, HOST_REQUESTS};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Command RX task - receives and frames lines from the host
#[embassy_executor::task]
pub async fn command_rx_task(mut rx: BufferedUartRx) {
    info!("Command RX task started");

    let mut parser = LineParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(line)) => {
                            HOST_REQUESTS.send(HostRequest::Command(line)).await;
                        }
                        Ok(None) => {}
                        Err(LineError::TooLong) => {
                            warn!("Command line too long, discarding");
                            HOST_REQUESTS.send(HostRequest::Overflow).await;
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                parser.reset();
            }
        }
    }
}
