#![no_std]
#![no_main]

use defmt::{error, info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART1;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{Async, Config as UartConfig, Uart, UartRx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use lds_rp2040::{
    dropped_samples, EmbassyClock, FirmwareEvents, LidarController, PwmMotor, SampleChannel,
    DEFAULT_TARGET_RPM, FRAME_LEN, LDS_BAUDRATE,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
});

/// 125 MHz system clock / 5000 = 25 kHz, above the audible range.
const PWM_TOP: u16 = 4999;

/// Half the regulator sample period.
const CONTROL_PERIOD: Duration = Duration::from_millis(10);

type Lidar = LidarController<EmbassyClock, FirmwareEvents<Pwm<'static>>>;
type SharedLidar = Mutex<CriticalSectionRawMutex, Lidar>;

/// Controller shared by the rx and control tasks.
static LIDAR: StaticCell<SharedLidar> = StaticCell::new();

/// Decoded samples, from the controller to the sample task.
static SAMPLES: StaticCell<SampleChannel> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("LDS controller starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let samples = SAMPLES.init(Channel::new());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = LDS_BAUDRATE;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (_tx, rx) = uart.split();

    // --- Motor Setup ---
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = PWM_TOP;
    pwm_config.compare_a = 0;

    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm_config);
    let motor = unwrap!(PwmMotor::new(pwm));

    // --- Controller Setup ---
    let mut lidar = LidarController::new(EmbassyClock, FirmwareEvents::new(motor, samples));
    lidar.set_target_rpm(DEFAULT_TARGET_RPM);
    lidar.enable_motor(true);
    let lidar: &'static SharedLidar = LIDAR.init(Mutex::new(lidar));

    // On-board LED signals a spin fault
    let led = Output::new(p.PIN_25, Level::Low);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(rx_task(rx, lidar).unwrap());
    spawner.spawn(control_task(lidar, led).unwrap());
    spawner.spawn(sample_task(samples).unwrap());

    info!("LDS controller initialized, spinning up to {} RPM", DEFAULT_TARGET_RPM);
}

/// Rx task - reads from UART and feeds the controller.
#[embassy_executor::task]
async fn rx_task(mut rx: UartRx<'static, Async>, lidar: &'static SharedLidar) {
    // One frame per read keeps the lock short at 450 frames/s.
    let mut buf = [0u8; FRAME_LEN];

    loop {
        match rx.read(&mut buf).await {
            Ok(()) => {
                lidar.lock().await.push_bytes(&buf);
            }
            Err(e) => {
                warn!("UART error: {:?}", e);
                // The partial frame in flight is lost
                lidar.lock().await.reset_input();
            }
        }
    }
}

/// Control task - runs the regulator and the spin watchdog.
#[embassy_executor::task]
async fn control_task(lidar: &'static SharedLidar, mut led: Output<'static>) {
    let mut ticker = Ticker::every(CONTROL_PERIOD);

    loop {
        ticker.next().await;

        let mut lidar = lidar.lock().await;
        if lidar.tick() {
            error!(
                "Spin fault: {} RPM for target {}, stopping motor",
                lidar.rpm(),
                lidar.target_rpm()
            );
            lidar.enable_motor(false);
            led.set_high();
        }
    }
}

/// Sample task - consumes decoded samples.
#[embassy_executor::task]
async fn sample_task(samples: &'static SampleChannel) {
    loop {
        let sample = samples.receive().await;

        // One line per revolution
        if sample.angle == 0 {
            info!(
                "0 deg: {} mm, quality {}, flags {}, {} samples dropped",
                sample.distance_mm,
                sample.quality,
                sample.flags.code(),
                dropped_samples()
            );
        }
    }
}
