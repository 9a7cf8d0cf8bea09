use embassy_futures::select::{Either, select};
use embassy_stm32::exti::ExtiInput;
use pomodoro_core::ir::PulseThresholds;
use pomodoro_core::phase::Event;

use crate::capture::EdgeCapture;
use crate::events::{self, EventSender, RearmSignal};
use crate::instant::FirmwareInstant;
use crate::status;

#[embassy_executor::task]
pub async fn run(
    mut input: ExtiInput<'static>,
    thresholds: PulseThresholds,
    events: EventSender<'static>,
    rearm: &'static RearmSignal,
) -> ! {
    let mut capture = EdgeCapture::new(thresholds);

    loop {
        match select(input.wait_for_falling_edge(), rearm.wait()).await {
            Either::First(()) => {
                let Some(frame) = capture.on_edge(FirmwareInstant::now()) else {
                    continue;
                };
                if events::post(&events, Event::FrameReady(frame)) {
                    status::record_frame_posted();
                } else {
                    // Nobody will rearm for a frame that never reached dispatch.
                    capture.rearm();
                }
            }
            Either::Second(()) => capture.rearm(),
        }
    }
}
