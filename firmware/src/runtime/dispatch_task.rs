use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embassy_time::Delay;
use pomodoro_core::app::PomodoroApp;
use pomodoro_core::config::TimerConfig;
use pomodoro_core::phase::Event;

use crate::buzzer::QueuedBuzzer;
use crate::events::{EventReceiver, RearmSignal};
use crate::instant::FirmwareInstant;
use crate::lcd::Hd44780;
use crate::status;
use crate::telemetry::{TelemetryLogger, log_status};

type Lcd = Hd44780<I2c<'static, Blocking>, Delay>;

#[embassy_executor::task]
pub async fn run(
    config: TimerConfig,
    events: EventReceiver<'static>,
    rearm: &'static RearmSignal,
    lcd: Lcd,
    buzzer: QueuedBuzzer<'static>,
) -> ! {
    let mut app: PomodoroApp<Lcd, QueuedBuzzer<'static>, FirmwareInstant> =
        PomodoroApp::new(config, lcd, buzzer);
    let mut logger = TelemetryLogger::new();

    app.start();
    status::record_phase(app.controller().phase().kind());

    loop {
        let event = events.receive().await;
        let summary = app.dispatch(event, FirmwareInstant::now());

        if summary.rearm_decoder {
            rearm.signal(());
        }

        logger.flush(app.telemetry());
        status::record_phase(app.controller().phase().kind());

        if event == Event::ResetConfirmed {
            log_status(&status::snapshot());
        }
    }
}
