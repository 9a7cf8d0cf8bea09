use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_time::Delay;
use pomodoro_core::config::TimerConfig;

use crate::buzzer::QueuedBuzzer;
use crate::events::{BuzzerQueue, EventQueue, RearmSignal};
use crate::lcd::Hd44780;

mod buzzer_task;
mod dispatch_task;
mod ir_task;
mod reset_task;
mod tick_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Static timer configuration. Checked once before any task starts.
const TIMER_CONFIG: TimerConfig = TimerConfig::new();

pub(super) static EVENTS: EventQueue = EventQueue::new();
pub(super) static REARM: RearmSignal = RearmSignal::new();
pub(super) static BUZZER: BuzzerQueue = BuzzerQueue::new();

// Board wiring:
//   PA0  / EXTI0  IR receiver output (idles high)
//   PA8  / EXTI8  reset button to ground
//   PA1           buzzer driver, active high
//   PB8 / PB9     I2C1 SCL / SDA to the LCD backpack
#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    if let Err(error) = TIMER_CONFIG.validate() {
        defmt::error!("invalid timer configuration: {}", defmt::Display2Format(&error));
        panic!("invalid timer configuration");
    }

    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA1,
        PA8,
        PB8,
        PB9,
        I2C1,
        EXTI0,
        EXTI8,
        ..
    } = hal::init(config);

    let ir_input = ExtiInput::new(PA0, EXTI0, Pull::Up);
    let reset_input = ExtiInput::new(PA8, EXTI8, Pull::Up);
    let buzzer_pin = Output::new(PA1, Level::Low, Speed::Low);
    let bus = I2c::new_blocking(I2C1, PB8, PB9, i2c::Config::default());

    let mut lcd = Hd44780::new(bus, Delay);
    if let Err(error) = lcd.init() {
        defmt::warn!("lcd init failed: {}", defmt::Display2Format(&error));
    }

    spawner
        .spawn(buzzer_task::run(BUZZER.receiver(), buzzer_pin))
        .expect("failed to spawn buzzer task");

    spawner
        .spawn(dispatch_task::run(
            TIMER_CONFIG,
            EVENTS.receiver(),
            &REARM,
            lcd,
            QueuedBuzzer::new(BUZZER.sender()),
        ))
        .expect("failed to spawn dispatch task");

    spawner
        .spawn(ir_task::run(
            ir_input,
            TIMER_CONFIG.thresholds,
            EVENTS.sender(),
            &REARM,
        ))
        .expect("failed to spawn IR capture task");

    spawner
        .spawn(tick_task::run(EVENTS.sender()))
        .expect("failed to spawn tick task");

    spawner
        .spawn(reset_task::run(
            reset_input,
            TIMER_CONFIG.reset_settle,
            EVENTS.sender(),
        ))
        .expect("failed to spawn reset task");

    core::future::pending::<()>().await;
}
