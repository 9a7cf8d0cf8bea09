use embassy_stm32::exti::ExtiInput;
use embassy_time::Timer;
use pomodoro_core::phase::Event;
use pomodoro_core::reset::{ResampleOutcome, ResetSupervisor};

use crate::events::{self, EventSender};
use crate::instant::FirmwareInstant;
use crate::status;

#[embassy_executor::task]
pub async fn run(
    mut input: ExtiInput<'static>,
    settle: core::time::Duration,
    events: EventSender<'static>,
) -> ! {
    let mut supervisor = ResetSupervisor::new(settle);

    loop {
        input.wait_for_falling_edge().await;
        let deadline = supervisor.on_edge(FirmwareInstant::now());
        Timer::at(deadline.into_embassy()).await;

        match supervisor.resample(FirmwareInstant::now(), input.is_low()) {
            ResampleOutcome::Confirmed => {
                defmt::info!("reset confirmed");
                events::deliver(&events, Event::ResetConfirmed).await;
                input.wait_for_high().await;
            }
            ResampleOutcome::Rejected => status::record_reset_bounce(),
            ResampleOutcome::Pending | ResampleOutcome::Idle => {}
        }
    }
}
