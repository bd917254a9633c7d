//! Wi-Fi station bring-up and the tasks keeping the link alive.

use embassy_executor::Spawner;
use embassy_net::{Runner, Stack, StackResources};
use embassy_time::Timer;
use esp_hal::{peripherals::WIFI, rng::Rng};
use esp_radio::{
    Controller,
    wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent, WifiStaState},
};
use static_cell::StaticCell;

use crate::config;

static RADIO: StaticCell<Controller<'static>> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

/// Start the Wi-Fi station and the network stack, then wait until an address is assigned.
///
/// # Panics
///
/// This function will panic if the radio cannot be initialized or the tasks cannot be spawned.
pub async fn start(spawner: Spawner, wifi: WIFI<'static>) -> Stack<'static> {
    let radio = RADIO.init(defmt::expect!(
        esp_radio::init(),
        "Failed to initialize the radio"
    ));
    let (controller, interfaces) = defmt::expect!(
        esp_radio::wifi::new(radio, wifi, Default::default()),
        "Failed to initialize Wi-Fi"
    );

    let rng = Rng::new();
    let seed = ((rng.random() as u64) << 32) | rng.random() as u64;

    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    defmt::expect!(spawner.spawn(connection(controller)), "Failed to spawn the Wi-Fi task");
    defmt::expect!(spawner.spawn(net_task(runner)), "Failed to spawn the network task");

    stack.wait_link_up().await;
    defmt::info!("Link up, waiting for an address");
    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        defmt::info!("Got address {}", config.address);
    }

    stack
}

/// Keep the station associated, reconnecting after every drop.
#[embassy_executor::task]
async fn connection(mut controller: WifiController<'static>) {
    loop {
        if matches!(esp_radio::wifi::sta_state(), WifiStaState::Connected) {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            defmt::warn!("Wi-Fi disconnected");
            Timer::after(config::RECONNECT_DELAY).await;
        }

        if !matches!(controller.is_started(), Ok(true)) {
            let client = ClientConfig::default()
                .with_ssid(config::WIFI_SSID.into())
                .with_password(config::WIFI_PASSWORD.into());
            defmt::expect!(
                controller.set_config(&ModeConfig::Client(client)),
                "Invalid Wi-Fi configuration"
            );
            defmt::expect!(controller.start_async().await, "Failed to start Wi-Fi");
            defmt::debug!("Wi-Fi started");
        }

        match controller.connect_async().await {
            Ok(()) => defmt::info!("Wi-Fi connected to {}", config::WIFI_SSID),
            Err(e) => {
                defmt::warn!("Wi-Fi connection failed: {}", e);
                Timer::after(config::RECONNECT_DELAY).await;
            }
        }
    }
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

