//! Queues connecting the interrupt-driven tasks to the dispatch loop.
//!
//! Producers never block: a full queue drops the event, bumps the drop
//! counter, and logs. Frames in particular are never queued behind one
//! another because the capture task stays disarmed until the dispatch loop
//! signals [`RearmSignal`].

#[cfg(not(target_os = "none"))]
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
#[cfg(target_os = "none")]
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use embassy_sync::signal::Signal;
use pomodoro_core::phase::{BuzzerCommand, Event};

use crate::status;
use crate::telemetry::{log_event_delayed, log_event_dropped};

/// Depth of the event queue drained by the dispatch loop.
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Depth of the buzzer command queue.
pub const BUZZER_QUEUE_DEPTH: usize = 4;

#[cfg(target_os = "none")]
type EventMutex = ThreadModeRawMutex;
#[cfg(not(target_os = "none"))]
type EventMutex = NoopRawMutex;

/// Queue of controller events posted by the capture, tick, and reset tasks.
pub type EventQueue = Channel<EventMutex, Event, EVENT_QUEUE_DEPTH>;

/// Convenience sender type alias for the event queue.
pub type EventSender<'a> = Sender<'a, EventMutex, Event, EVENT_QUEUE_DEPTH>;

/// Convenience receiver type alias for the event queue.
pub type EventReceiver<'a> = Receiver<'a, EventMutex, Event, EVENT_QUEUE_DEPTH>;

/// Tells the capture task it may collect the next frame.
pub type RearmSignal = Signal<EventMutex, ()>;

/// Buzzer commands handed from the dispatch loop to the buzzer task.
pub type BuzzerQueue = Channel<EventMutex, BuzzerCommand, BUZZER_QUEUE_DEPTH>;

pub type BuzzerSender<'a> = Sender<'a, EventMutex, BuzzerCommand, BUZZER_QUEUE_DEPTH>;

pub type BuzzerReceiver<'a> = Receiver<'a, EventMutex, BuzzerCommand, BUZZER_QUEUE_DEPTH>;

/// Posts an event without waiting. Returns `false` when the queue was full.
pub fn post(sender: &EventSender<'_>, event: Event) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            status::record_event_dropped();
            log_event_dropped(event);
            false
        }
    }
}

/// Posts an event that must reach the dispatch loop, waiting for room when
/// the queue is full.
pub async fn deliver(sender: &EventSender<'_>, event: Event) {
    if let Err(TrySendError::Full(event)) = sender.try_send(event) {
        log_event_delayed(event);
        sender.send(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::pin::pin;
    use embassy_futures::{block_on, poll_once};
    use pomodoro_core::ir::RawFrame;

    #[test]
    fn full_queue_drops_and_counts() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        let before = status::snapshot().events_dropped;

        for _ in 0..EVENT_QUEUE_DEPTH {
            assert!(post(&sender, Event::TickElapsed));
        }
        assert!(!post(&sender, Event::FrameReady(RawFrame::from_bits(0x00FF_38C7))));

        assert!(status::snapshot().events_dropped > before);
        assert_eq!(queue.len(), EVENT_QUEUE_DEPTH);
        assert_eq!(queue.try_receive(), Ok(Event::TickElapsed));
    }

    #[test]
    fn deliver_waits_for_room_instead_of_dropping() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        for _ in 0..EVENT_QUEUE_DEPTH {
            assert!(post(&sender, Event::TickElapsed));
        }

        let mut reset = pin!(deliver(&sender, Event::ResetConfirmed));
        assert!(poll_once(reset.as_mut()).is_pending());

        assert_eq!(queue.try_receive(), Ok(Event::TickElapsed));
        block_on(reset);

        let mut drained = 0;
        while let Ok(event) = queue.try_receive() {
            drained += 1;
            if drained == EVENT_QUEUE_DEPTH {
                assert_eq!(event, Event::ResetConfirmed);
            }
        }
        assert_eq!(drained, EVENT_QUEUE_DEPTH);
    }

    #[test]
    fn deliver_sends_immediately_with_room() {
        let queue = EventQueue::new();
        block_on(deliver(&queue.sender(), Event::ResetConfirmed));
        assert_eq!(queue.try_receive(), Ok(Event::ResetConfirmed));
    }
}
