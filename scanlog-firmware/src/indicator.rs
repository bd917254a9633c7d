use embassy_time::Duration;
use scanlog_core::Indicator;
use scanlog_led::{Color, StatusLed};

/// Blinks the status LED once per scanned line.
pub struct AckLed<'ch> {
    led: StatusLed<'ch>,
    pulse: Duration,
}

impl<'ch> AckLed<'ch> {
    pub fn new(led: StatusLed<'ch>, pulse: Duration) -> Self {
        Self { led, pulse }
    }
}

impl Indicator for AckLed<'_> {
    async fn acknowledge(&mut self) {
        self.led.pulse(Color::GREEN, self.pulse).await;
    }
}
