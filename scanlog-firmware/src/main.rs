#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

extern crate alloc;

use embassy_executor::Spawner;
use embassy_time::Instant;
use esp_backtrace as _;
use esp_hal::{
    gpio::{Input, InputConfig, Pull},
    rmt::Rmt,
    time::Rate,
    timer::timg::TimerGroup,
};
use esp_println as _;
use scanlog_core::{DecodeError, Decoder, PinPair, Scanner};
use scanlog_firmware::{config, emitter::HttpEmitter, indicator::AckLed, net, strings};
use scanlog_led::StatusLed;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let hal_config = esp_hal::Config::default();
    let peripherals = esp_hal::init(hal_config);

    // the radio needs internal RAM, everything else may live in PSRAM
    esp_alloc::heap_allocator!(size: 72 * 1024);
    esp_alloc::psram_allocator!(peripherals.PSRAM, esp_hal::psram);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    strings::log_verinfo();

    let (ps2_clock, ps2_data, led_pin) = scanlog_firmware::board_pins!(peripherals);

    let rmt = defmt::expect!(
        Rmt::new(peripherals.RMT, Rate::from_mhz(80)),
        "Failed to initialize the RMT peripheral"
    )
    .into_async();
    let led = StatusLed::new(rmt.channel0, led_pin);
    let mut indicator = AckLed::new(led, config::ACK_PULSE);

    let clock = Input::new(ps2_clock, InputConfig::default().with_pull(Pull::Up));
    let data = Input::new(ps2_data, InputConfig::default().with_pull(Pull::Up));
    let mut decoder =
        Decoder::new(PinPair::new(clock, data)).with_resync_polls(config::RESYNC_POLLS);

    let stack = net::start(spawner, peripherals.WIFI).await;
    let mut emitter = HttpEmitter::new(
        stack,
        config::COLLECTOR_ADDR,
        config::COLLECTOR_PORT,
        config::COLLECTOR_PATH,
        config::COLLECTOR_TIMEOUT,
    );

    let mut scanner: Scanner = Scanner::new(config::SCANNER);

    defmt::info!("ready!");
    defmt::info!("waiting for incoming data");

    loop {
        match decoder.try_read_symbol(config::POLL_BUDGET) {
            Ok(symbol) => {
                defmt::trace!("Scan code: {=u8:#x}", symbol);
                let now_ms = Instant::now().as_millis();
                if let Some(outcome) = scanner
                    .process(symbol, now_ms, &mut emitter, &mut indicator)
                    .await
                {
                    defmt::debug!("Line done: {}", outcome);
                }
            }
            // quiet bus, let the network run; the decoder resyncs on the next call
            Err(DecodeError::Idle) => embassy_futures::yield_now().await,
            Err(DecodeError::Timeout) => defmt::debug!("PS/2 frame stalled, resyncing"),
        }
    }
}
