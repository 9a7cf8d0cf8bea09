use embassy_stm32::gpio::Output;
use embassy_time::Timer;

use crate::buzzer::{self, BuzzerPin, CHIME_DURATION};
use crate::events::BuzzerReceiver;

struct OutputPin(Output<'static>);

impl BuzzerPin for OutputPin {
    fn set_on(&mut self) {
        self.0.set_high();
    }

    fn set_off(&mut self) {
        self.0.set_low();
    }
}

#[embassy_executor::task]
pub async fn run(commands: BuzzerReceiver<'static>, output: Output<'static>) -> ! {
    let mut pin = OutputPin(output);
    pin.set_off();

    loop {
        let command = commands.receive().await;
        if buzzer::apply(&mut pin, command) {
            Timer::after(CHIME_DURATION).await;
            pin.set_off();
        }
    }
}
