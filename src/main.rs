//! radiobridge firmware entry point (ESP32).
//!
//! Brings up the board, hands the drivers to the control loop and runs it
//! forever. Network processing runs in its own task.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_net::{Runner, StackResources};
use embassy_time::{Delay, Timer};
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::dma_buffers;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::i2s::master::{DataFormat, I2s, Standard};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
use esp_wifi::wifi::WifiDevice;
use esp_wifi::EspWifiController;
use static_cell::StaticCell;

use radiobridge::bluetooth::{self, Unavailable};
use radiobridge::config::{
    I2C_FREQUENCY_KHZ, I2S_DMA_BUFFER_SIZE, I2S_SAMPLE_RATE_HZ, TCP_RX_BUFFER_SIZE,
    TCP_TX_BUFFER_SIZE,
};
use radiobridge::radio::i2s::I2sSink;
use radiobridge::radio::net::NetStream;
use radiobridge::ui::buttons::Buttons;
use radiobridge::ui::display::{self, OledPresenter};
use radiobridge::wifi::esp::EspWifi;
use radiobridge::{Board, Controller};

/// Sockets: one TCP stream plus DHCP and DNS.
const STACK_SOCKETS: usize = 3;

static ESP_WIFI: StaticCell<EspWifiController<'static>> = StaticCell::new();
static RESOURCES: StaticCell<StackResources<STACK_SOCKETS>> = StaticCell::new();
static TCP_RX: StaticCell<[u8; TCP_RX_BUFFER_SIZE]> = StaticCell::new();
static TCP_TX: StaticCell<[u8; TCP_TX_BUFFER_SIZE]> = StaticCell::new();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    info!("radiobridge starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    esp_hal_embassy::init(timg1.timer0);

    // ── Display ──────────────────────────────────────────────────────────
    let i2c = match I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ)),
    ) {
        Ok(i2c) => i2c
            .with_sda(peripherals.GPIO15)
            .with_scl(peripherals.GPIO14),
        Err(_) => park("I2C bus configuration rejected").await,
    };
    let presenter = match display::init(i2c) {
        Ok(display) => OledPresenter::new(display),
        Err(_) => park("SSD1306 allocation failed").await,
    };

    // ── Buttons (active high, pulled down) ───────────────────────────────
    let pull_down = InputConfig::default().with_pull(Pull::Down);
    let buttons = Buttons::new(
        Input::new(peripherals.GPIO12, pull_down),
        Input::new(peripherals.GPIO13, pull_down),
        Input::new(peripherals.GPIO2, pull_down),
    );

    // ── WiFi + network stack ─────────────────────────────────────────────
    let mut rng = Rng::new(peripherals.RNG);
    let esp_wifi = match esp_wifi::init(timg0.timer0, rng) {
        Ok(controller) => ESP_WIFI.init(controller),
        Err(_) => park("WiFi driver init failed").await,
    };
    let (controller, interfaces) = match esp_wifi::wifi::new(esp_wifi, peripherals.WIFI) {
        Ok(parts) => parts,
        Err(_) => park("WiFi interface creation failed").await,
    };

    let seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );
    if spawner.spawn(net_task(runner)).is_err() {
        park("Network task could not be spawned").await;
    }

    let stream = NetStream::new(
        stack,
        TCP_RX.init([0; TCP_RX_BUFFER_SIZE]),
        TCP_TX.init([0; TCP_TX_BUFFER_SIZE]),
    );

    // ── I2S audio output (BCLK 26, WS 25, DOUT 22) ───────────────────────
    let (_, _, tx_buffer, tx_descriptors) = dma_buffers!(0, I2S_DMA_BUFFER_SIZE);
    let i2s = I2s::new(
        peripherals.I2S0,
        Standard::Philips,
        DataFormat::Data16Channel16,
        Rate::from_hz(I2S_SAMPLE_RATE_HZ),
        peripherals.DMA_I2S0,
    )
    .into_async();
    let i2s_tx = i2s
        .i2s_tx
        .with_bclk(peripherals.GPIO26)
        .with_ws(peripherals.GPIO25)
        .with_dout(peripherals.GPIO22)
        .build(tx_descriptors);
    let audio = I2sSink::new(i2s_tx, tx_buffer);

    // ── Bluetooth bridge ─────────────────────────────────────────────────
    // esp-wifi carries no A2DP profile; the menu reports the bridge as
    // unavailable.
    let bluetooth_ready = bluetooth::start_bridge(&mut Unavailable);

    let mut controller = Controller::new(Board {
        buttons,
        presenter,
        wifi: EspWifi::new(controller),
        stream,
        audio,
        delay: Delay,
    });
    controller.set_bluetooth_ready(bluetooth_ready);
    controller.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Log a fatal start-up failure and stop here.
async fn park(reason: &str) -> ! {
    error!("Fatal: {}", reason);
    loop {
        Timer::after_secs(1).await;
    }
}
