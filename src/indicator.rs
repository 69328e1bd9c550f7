//! Button acknowledgement indicators
//!
//! Each car button has an LED that tells the driver whether the pit has seen
//! the request. The LED is dark while idle, blinks while the request waits
//! for the pit and stays lit once the pit acknowledges it.
//!
//! Reading the button pin is up to the firmware; it calls
//! [`Indicator::press`] once it has decided a press happened.

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::oscillator::{LightState, Oscillator, OscillatorConfig};

/// Acknowledgement progress of a car button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckState {
    /// Nothing requested
    #[default]
    Idle,
    /// Driver pressed, waiting for the pit
    Requested,
    /// Pit confirmed the request
    Acknowledged,
}

/// Car button LED driven by the acknowledgement state
#[derive(Debug, Clone)]
pub struct Indicator {
    ack: AckState,
    /// Last state reported by the pit, mirrored verbatim
    pit_state: u8,
    blink: Oscillator,
}

impl Indicator {
    pub const fn new(blink: &OscillatorConfig, now: Instant) -> Self {
        Self {
            ack: AckState::Idle,
            pit_state: 0,
            blink: Oscillator::new(blink, now),
        }
    }

    /// Register a driver press at `now`
    ///
    /// Starts a new request unless one is already waiting.
    pub fn press(&mut self, now: Instant) {
        if self.ack == AckState::Requested {
            return;
        }
        self.ack = AckState::Requested;
        self.blink.rearm(now);
    }

    /// Apply the button state reported by the pit
    ///
    /// The pit reports every button on each update, so a zero while a
    /// request is waiting only means the pit has not seen it yet. A non-zero
    /// state acknowledges a waiting request; zero releases an acknowledged one.
    pub fn apply_pit_state(&mut self, state: u8) {
        self.pit_state = state;
        self.ack = match (self.ack, state) {
            (AckState::Requested, 0) => AckState::Requested,
            (AckState::Requested, _) => AckState::Acknowledged,
            (AckState::Acknowledged, 0) => AckState::Idle,
            (ack, _) => ack,
        };

        #[cfg(feature = "esp32-log")]
        println!("[Indicator.apply_pit_state] pit {} -> {:?}", state, self.ack);
    }

    /// Advance the LED to `now` and return its state
    pub fn advance(&mut self, now: Instant) -> LightState {
        match self.ack {
            AckState::Idle => LightState::Off,
            AckState::Requested => self.blink.advance(now),
            AckState::Acknowledged => LightState::On,
        }
    }

    pub const fn ack(&self) -> AckState {
        self.ack
    }

    pub const fn pit_state(&self) -> u8 {
        self.pit_state
    }
}
