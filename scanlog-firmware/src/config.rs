//! Board and network configuration.
//!
//! Wi-Fi credentials are baked in at build time from `SCANLOG_WIFI_SSID` and
//! `SCANLOG_WIFI_PASSWORD`.

use embassy_net::Ipv4Address;
use embassy_time::Duration;
use scanlog_core::{ScannerConfig, config::ACK_PULSE_MS, request::DEFAULT_PATH};

pub const WIFI_SSID: &str = match option_env!("SCANLOG_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "scanlog",
};

pub const WIFI_PASSWORD: &str = match option_env!("SCANLOG_WIFI_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Address of the collector that receives the records.
pub const COLLECTOR_ADDR: Ipv4Address = Ipv4Address::new(192, 168, 1, 10);
pub const COLLECTOR_PORT: u16 = 4321;
pub const COLLECTOR_PATH: &str = DEFAULT_PATH;

/// Upper bound for connecting to and talking with the collector.
pub const COLLECTOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Delay before retrying a failed Wi-Fi association.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Polls per PS/2 clock edge before the decoder gives up, and lets the network tasks run if
/// the bus was quiet.
///
/// A PS/2 clock phase lasts 30-50us, this is several times that at 240MHz.
pub const POLL_BUDGET: u32 = 20_000;

/// High clock polls in a row that mark a gap between two frames, needed to pick up framing
/// again after the network tasks ran. A few times the longest clock-high phase.
pub const RESYNC_POLLS: u32 = 1_000;

/// Board wiring, taken out of the peripherals as `(ps2_clock, ps2_data, status_led)`.
///
/// The scanner drives both PS/2 lines open collector, they need pull-ups.
#[macro_export]
macro_rules! board_pins {
    ($peripherals:ident) => {
        ($peripherals.GPIO4, $peripherals.GPIO5, $peripherals.GPIO38)
    };
}

/// How long the LED is lit after every scanned line.
pub const ACK_PULSE: Duration = Duration::from_millis(ACK_PULSE_MS);

pub const SCANNER: ScannerConfig = ScannerConfig::new();
