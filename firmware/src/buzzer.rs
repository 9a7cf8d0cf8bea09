//! Buzzer seam between the dispatch loop and the output pin.
//!
//! The dispatch loop must not sleep while a chime plays, so [`QueuedBuzzer`]
//! only forwards commands; the buzzer task owns the pin and the timing.

use embassy_time::Duration;
use pomodoro_core::display::Buzzer;
use pomodoro_core::phase::BuzzerCommand;

use crate::events::BuzzerSender;
use crate::telemetry::log_buzzer_dropped;

/// How long the pin stays high for a boundary chime.
pub const CHIME_DURATION: Duration = Duration::from_millis(200);

/// Output level the buzzer task drives.
pub trait BuzzerPin {
    fn set_on(&mut self);
    fn set_off(&mut self);
}

pub struct QueuedBuzzer<'a> {
    sender: BuzzerSender<'a>,
}

impl<'a> QueuedBuzzer<'a> {
    pub fn new(sender: BuzzerSender<'a>) -> Self {
        Self { sender }
    }

    fn forward(&mut self, command: BuzzerCommand) {
        if self.sender.try_send(command).is_err() {
            log_buzzer_dropped();
        }
    }
}

impl Buzzer for QueuedBuzzer<'_> {
    fn assert(&mut self) {
        self.forward(BuzzerCommand::Assert);
    }

    fn release(&mut self) {
        self.forward(BuzzerCommand::Release);
    }

    fn chime(&mut self) {
        self.forward(BuzzerCommand::Chime);
    }
}

/// Applies the level change for `command`.
///
/// Returns `true` for [`BuzzerCommand::Chime`], in which case the caller waits
/// [`CHIME_DURATION`] and then calls [`BuzzerPin::set_off`].
pub fn apply<P: BuzzerPin>(pin: &mut P, command: BuzzerCommand) -> bool {
    match command {
        BuzzerCommand::Assert => {
            pin.set_on();
            false
        }
        BuzzerCommand::Release => {
            pin.set_off();
            false
        }
        BuzzerCommand::Chime => {
            pin.set_on();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BUZZER_QUEUE_DEPTH, BuzzerQueue};

    #[derive(Default)]
    struct PinMock {
        on: bool,
        toggles: u32,
    }

    impl BuzzerPin for PinMock {
        fn set_on(&mut self) {
            self.on = true;
            self.toggles += 1;
        }

        fn set_off(&mut self) {
            self.on = false;
            self.toggles += 1;
        }
    }

    #[test]
    fn commands_are_forwarded_in_order() {
        let queue = BuzzerQueue::new();
        let mut buzzer = QueuedBuzzer::new(queue.sender());

        buzzer.release();
        buzzer.chime();
        buzzer.assert();

        assert_eq!(queue.try_receive(), Ok(BuzzerCommand::Release));
        assert_eq!(queue.try_receive(), Ok(BuzzerCommand::Chime));
        assert_eq!(queue.try_receive(), Ok(BuzzerCommand::Assert));
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let queue = BuzzerQueue::new();
        let mut buzzer = QueuedBuzzer::new(queue.sender());
        for _ in 0..=BUZZER_QUEUE_DEPTH {
            buzzer.assert();
        }
        assert_eq!(queue.len(), BUZZER_QUEUE_DEPTH);
    }

    #[test]
    fn chime_asks_caller_to_wait() {
        let mut pin = PinMock::default();
        assert!(!apply(&mut pin, BuzzerCommand::Assert));
        assert!(pin.on);
        assert!(!apply(&mut pin, BuzzerCommand::Release));
        assert!(!pin.on);
        assert!(apply(&mut pin, BuzzerCommand::Chime));
        assert!(pin.on);
        assert_eq!(pin.toggles, 3);
    }
}
