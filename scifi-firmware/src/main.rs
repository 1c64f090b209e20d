//! ScifiDisplay firmware
//!
//! Drives up to four chained TM1638 panels from an RP2040 and takes text
//! commands from a host over UART0.
//!
//! Pins:
//! - UART0: TX=GPIO0, RX=GPIO1
//! - TM1638 DIO=GPIO8 (open drain), CLK=GPIO9
//! - TM1638 STB=GPIO10..GPIO13, one per panel

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, OutputOpenDrain};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use scifi_core::{PanelGroup, XorShift32};
use scifi_drivers::{Tm1638, Tm1638Bus};
use scifi_protocol::Selector;

use crate::tasks::{PanelBus, Panels};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Shared panel bus, borrowed by every panel handle
static PANEL_BUS: StaticCell<RefCell<PanelBus>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ScifiDisplay firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config::BAUD_RATE;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config::BAUD_RATE);

    // Panel chain
    let bus: &'static RefCell<PanelBus> = PANEL_BUS.init(RefCell::new(Tm1638Bus::new(
        Output::new(p.PIN_9, Level::High),
        OutputOpenDrain::new(p.PIN_8, Level::High),
        Delay,
    )));

    let strobes = [
        Output::new(p.PIN_10, Level::High),
        Output::new(p.PIN_11, Level::High),
        Output::new(p.PIN_12, Level::High),
        Output::new(p.PIN_13, Level::High),
    ];
    let drivers = strobes
        .into_iter()
        .take(config::PANEL_COUNT)
        .map(|stb| Tm1638::new(bus, stb));

    let mut panels: Panels = match PanelGroup::with_timing(
        drivers,
        XorShift32::new(config::RNG_SEED),
        config::TIMING,
    ) {
        Ok(panels) => panels,
        // panels.toml is checked by build.rs
        Err(e) => defmt::panic!("Invalid panel configuration: {:?}", e),
    };

    if let Err(e) = panels.apply(Selector::All, |panel, _| {
        panel.set_brightness(config::BRIGHTNESS)
    }) {
        warn!("Failed to set boot brightness: {:?}", e);
    }

    info!(
        "{} panels initialized, brightness {}",
        panels.panel_count(),
        config::BRIGHTNESS
    );

    spawner.spawn(tasks::command_rx_task(rx)).unwrap();
    spawner.spawn(tasks::control_task(panels, tx)).unwrap();

    info!("All tasks spawned, firmware running");
}
