#![no_std]

pub mod dashboard;
pub mod display;
pub mod gauge;
pub mod indicator;
pub mod mailbox;
pub mod oscillator;
pub mod poll_scheduler;
pub mod timing;

pub use dashboard::{Dashboard, DashboardConfig, DashboardFrame};
pub use display::{TextDisplay, TextSink};
pub use gauge::{CalibrationError, Gauge, GaugeConfig};
pub use indicator::{AckState, Indicator};
pub use mailbox::{Mailbox, MailboxReceiver, MailboxSender, PitMessage};
pub use oscillator::{CapPolicy, CycleBound, LightState, Oscillator, OscillatorConfig, invert};
pub use poll_scheduler::PollScheduler;

pub use embassy_time::{Duration, Instant};

/// Raw analog sensor reader
///
/// Implement this for the ADC channel feeding a gauge. Closures returning
/// an `i32` implement it too.
pub trait SampleSource {
    /// Take one raw reading
    fn read(&mut self) -> i32;
}

impl<F: FnMut() -> i32> SampleSource for F {
    fn read(&mut self) -> i32 {
        self()
    }
}

/// Dashboard output driver trait
///
/// Implement this trait to support different hardware platforms.
/// The poll scheduler is generic over this trait.
pub trait DashboardOutput<const BUTTONS: usize>: TextSink {
    /// Write the lights and gauge value of one poll
    fn write(&mut self, frame: &DashboardFrame<BUTTONS>);
}
