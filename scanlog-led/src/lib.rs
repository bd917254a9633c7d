//! A WS2812B status LED that can flash a color for a while.
//!
//! The [`StatusLed`] assumes that the RMT peripheral has been configured to run at 80MHz.
//!
//! # Usage
//!
//! ```ignore
//! use embassy_time::Duration;
//! use esp_hal::{Config, rmt::Rmt, time::Rate};
//! use scanlog_led::{Color, StatusLed};
//!
//! let peripherals = esp_hal::init(Config::default());
//! let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80)).unwrap().into_async();
//!
//! let mut led = StatusLed::new(rmt.channel0, peripherals.GPIO38);
//! led.pulse(Color::GREEN, Duration::from_millis(300)).await;
//! ```

#![no_std]

use embassy_time::{Duration, Timer};
use esp_hal::{
    Async,
    gpio::{Level, interconnect::PeripheralOutput},
    rmt::{Channel, PulseCode, Tx, TxChannelConfig, TxChannelCreator},
};

// bit timings from the WS2812B datasheet, in ns
const T0H: u32 = 350;
const T0L: u32 = 800;

const T1H: u32 = 700;
const T1L: u32 = 600;

/// Pulses per frame: 24 color bits and the end marker.
const FRAME_LEN: usize = 25;

// bit pulse codes calculated for an 80MHz peripheral clock
const PULSE_0: PulseCode = PulseCode::new(
    Level::High,
    ((T0H * 80) / 1000) as u16,
    Level::Low,
    ((T0L * 80) / 1000) as u16,
);

const PULSE_1: PulseCode = PulseCode::new(
    Level::High,
    ((T1H * 80) / 1000) as u16,
    Level::Low,
    ((T1L * 80) / 1000) as u16,
);

/// 8-bit RGB color.
#[derive(defmt::Format, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const OFF: Color = Color::new(0x00, 0x00, 0x00);
    pub const GREEN: Color = Color::new(0x00, 0x40, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Encode the color into `pulses`, most significant bit first, in the GRB order the LED
    /// expects. The last slot is left untouched for the end marker.
    fn to_pulses(self, pulses: &mut [PulseCode; FRAME_LEN]) {
        for (byte_idx, byte) in [self.g, self.r, self.b].into_iter().enumerate() {
            for bit in 0..8 {
                pulses[byte_idx * 8 + bit] = if byte & (0x80 >> bit) != 0 {
                    PULSE_1
                } else {
                    PULSE_0
                };
            }
        }
    }
}

/// A WS2812B RGB LED driven from an async RMT channel.
///
/// The LED is only a status indicator, so transmission errors are logged and otherwise ignored.
pub struct StatusLed<'ch> {
    channel: Channel<'ch, Async, Tx>,
    buffer: [PulseCode; FRAME_LEN],
}

impl<'ch> StatusLed<'ch> {
    /// Returns the transmit channel configuration to be applied for the driver's RMT channel.
    fn channel_config() -> TxChannelConfig {
        TxChannelConfig::default()
            .with_clk_divider(1)
            .with_idle_output(true)
            .with_idle_output_level(Level::Low)
            .with_carrier_modulation(false)
    }

    /// Construct a new [`StatusLed`] from an RMT channel and an output pin.
    ///
    /// # Panics
    ///
    /// This function will panic if it fails to configure the RMT channel.
    pub fn new<C, O>(channel: C, pin: O) -> Self
    where
        C: TxChannelCreator<'ch, Async>,
        O: PeripheralOutput<'ch>,
    {
        let channel = defmt::expect!(
            channel.configure_tx(pin, Self::channel_config()),
            "Failed to configure the RMT channel"
        );

        Self {
            channel,
            buffer: [PulseCode::end_marker(); FRAME_LEN],
        }
    }

    /// Set the color of the LED.
    pub async fn set_color(&mut self, color: Color) {
        color.to_pulses(&mut self.buffer);
        defmt::trace!("Setting LED color to: {:?}", color);

        if let Err(e) = self.channel.transmit(&self.buffer).await {
            defmt::warn!("LED color not set: {}", e);
        }
    }

    /// Light the LED in `color` for `duration`, then switch it off.
    pub async fn pulse(&mut self, color: Color, duration: Duration) {
        self.set_color(color).await;
        Timer::after(duration).await;
        self.set_color(Color::OFF).await;
    }
}
