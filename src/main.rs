//! TNC Main Application
//!
//! Entry point for the STM32G474-based packet-radio TNC firmware.
//! Initializes hardware, binds the core to its collaborators and runs the
//! dispatch loop.

#![no_std]
#![no_main]

use defmt::unwrap;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::{bind_interrupts, peripherals};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tnc_firmware::hal::gpio::StatusLed;
use tnc_firmware::hal::modem::{ChannelLink, ModemChannels};
use tnc_firmware::hal::timer::{self, Stopwatch};
use tnc_firmware::hal::uart::SerialHost;
use tnc_firmware::prelude::*;

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<peripherals::USART2>;
});

/// Queues shared with the modem task
static MODEM: ModemChannels = ModemChannels::new();

static HOST_TX_BUF: StaticCell<[u8; HOST_TX_BUFFER_SIZE]> = StaticCell::new();
static HOST_RX_BUF: StaticCell<[u8; HOST_RX_BUFFER_SIZE]> = StaticCell::new();

/// Interval between counter reports in milliseconds
const REPORT_INTERVAL_MS: u32 = 10_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("TNC Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = unwrap!(TncConfig::DEFAULT.validate());
    info!(
        "Protocol {}, {} mode, idle flush after {} ms",
        config.protocol, config.mode, config.tx_maxwait_ms
    );

    // Initialize STM32G474 peripherals with default clock configuration
    let p = embassy_stm32::init(embassy_stm32::Config::default());

    info!("Peripherals initialized");

    let mut led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));

    // USART2 for the host link: PA2 = TX, PA3 = RX
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = HOST_BAUD_RATE;
    let uart = unwrap!(BufferedUart::new(
        p.USART2,
        Irqs,
        p.PA3, // RX
        p.PA2, // TX
        HOST_TX_BUF.init([0; HOST_TX_BUFFER_SIZE]),
        HOST_RX_BUF.init([0; HOST_RX_BUFFER_SIZE]),
        uart_config,
    ));

    info!("Host UART initialized at {} baud", HOST_BAUD_RATE);

    let mut tnc = bring_up(
        &mut &MODEM,
        ChannelLink::new,
        SerialHost::new(uart),
        Protocol::from_config(&config),
    );
    unwrap!(spawner.spawn(unattached_modem_task(&MODEM)));
    led.on();

    info!("Entering dispatch loop");

    let mut report = Stopwatch::start();
    loop {
        let step = tnc.step(timer::now());
        led.activity(step.inbound || step.flushed.is_some());

        if report.elapsed_ms() >= REPORT_INTERVAL_MS {
            report.restart();
            info!("Loop tick: {}", tnc.counters());
        }

        // Let the modem task run between iterations
        yield_now().await;
    }
}

/// Modem side of [`MODEM`] for boards without a radio fitted
///
/// Drains frames queued for transmission so the link queue never backs up.
#[embassy_executor::task]
async fn unattached_modem_task(channels: &'static ModemChannels) {
    let transmit = channels.transmit_receiver();
    loop {
        let frame = transmit.receive().await;
        warn!("modem: no radio fitted, dropped {} byte frame", frame.len());
    }
}
