use embassy_time::{Duration, Ticker};
use pomodoro_core::phase::Event;

use crate::events::{self, EventSender};

#[embassy_executor::task]
pub async fn run(events: EventSender<'static>) -> ! {
    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        ticker.next().await;
        events::post(&events, Event::TickElapsed);
    }
}
