//! Time-driven blink state machine
//!
//! An [`Oscillator`] alternates between [`LightState::On`] and
//! [`LightState::Off`] based on how much time has passed since the last
//! phase change, not on how often it is polled. It can run forever or stop
//! after a number of completed cycles and rest on an end state.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::timing::elapsed_since;

/// Logical output of an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightState {
    On,
    #[default]
    Off,
}

impl LightState {
    /// Logical opposite of this state
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    /// Check if the light is on
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for LightState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<LightState> for bool {
    fn from(state: LightState) -> Self {
        state.is_on()
    }
}

/// Returns the logical opposite of `state`
///
/// Lets a caller drive a complementary indicator without a second oscillator.
pub const fn invert(state: LightState) -> LightState {
    state.inverted()
}

/// What happens to the cycle counter once the cap is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapPolicy {
    /// Force the end state and clear the counter.
    ///
    /// The cleared counter passes the bound test again, so the very next
    /// `advance` resumes blinking from the end state. Callers that want the
    /// light to stay put must stop advancing or switch to [`CapPolicy::Latch`].
    #[default]
    Rearm,
    /// Force the end state and hold it until [`Oscillator::rearm`] is called.
    Latch,
}

/// How the cycle counter is compared against the cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleBound {
    /// Keep blinking while `cycle <= max_cycles`.
    ///
    /// The pattern completes `max_cycles + 1` cycles before resting.
    #[default]
    Inclusive,
    /// Keep blinking while `cycle < max_cycles`.
    ///
    /// The pattern completes exactly `max_cycles` cycles before resting.
    Exclusive,
}

impl CycleBound {
    /// Check whether `cycle` completed cycles still allow blinking
    pub const fn allows(self, cycle: u32, max_cycles: u32) -> bool {
        match self {
            Self::Inclusive => cycle <= max_cycles,
            Self::Exclusive => cycle < max_cycles,
        }
    }

    /// Smallest counter value that stops the pattern
    const fn limit(self, max_cycles: u32) -> u32 {
        match self {
            Self::Inclusive => max_cycles.saturating_add(1),
            Self::Exclusive => max_cycles,
        }
    }
}

/// Configuration of a blink pattern
#[derive(Debug, Clone, Copy)]
pub struct OscillatorConfig {
    /// How long the light stays on
    pub on_duration: Duration,
    /// How long the light stays off
    pub off_duration: Duration,
    /// Completed on/off cycles before resting on `end_state` (0 = unbounded)
    pub max_cycles: u32,
    /// State forced once `max_cycles` is reached
    pub end_state: LightState,
    /// State the pattern starts from
    pub initial_state: LightState,
    /// Counter handling once the cap is reached
    pub cap_policy: CapPolicy,
    /// Comparison between the counter and `max_cycles`
    pub cycle_bound: CycleBound,
}

impl OscillatorConfig {
    /// Unbounded pattern starting `On`
    pub const fn blink(on_duration: Duration, off_duration: Duration) -> Self {
        Self {
            on_duration,
            off_duration,
            max_cycles: 0,
            end_state: LightState::Off,
            initial_state: LightState::On,
            cap_policy: CapPolicy::Rearm,
            cycle_bound: CycleBound::Inclusive,
        }
    }

    /// Bounded pattern starting `On` that rests on `end_state`
    pub const fn bounded(
        on_duration: Duration,
        off_duration: Duration,
        max_cycles: u32,
        end_state: LightState,
    ) -> Self {
        Self {
            on_duration,
            off_duration,
            max_cycles,
            end_state,
            initial_state: LightState::On,
            cap_policy: CapPolicy::Rearm,
            cycle_bound: CycleBound::Inclusive,
        }
    }

    /// Same pattern with a different cap policy
    #[must_use]
    pub const fn with_cap_policy(mut self, cap_policy: CapPolicy) -> Self {
        self.cap_policy = cap_policy;
        self
    }

    /// Same pattern with a different cycle bound
    #[must_use]
    pub const fn with_cycle_bound(mut self, cycle_bound: CycleBound) -> Self {
        self.cycle_bound = cycle_bound;
        self
    }
}

/// Two-phase blink state machine
#[derive(Debug, Clone)]
pub struct Oscillator {
    on_duration: Duration,
    off_duration: Duration,
    max_cycles: u32,
    end_state: LightState,
    initial_state: LightState,
    cap_policy: CapPolicy,
    cycle_bound: CycleBound,

    last_phase_start: Instant,
    current_cycle: u32,
    current_state: LightState,
}

impl Oscillator {
    /// Create an oscillator whose first phase starts at `now`
    pub const fn new(config: &OscillatorConfig, now: Instant) -> Self {
        Self {
            on_duration: config.on_duration,
            off_duration: config.off_duration,
            max_cycles: config.max_cycles,
            end_state: config.end_state,
            initial_state: config.initial_state,
            cap_policy: config.cap_policy,
            cycle_bound: config.cycle_bound,
            last_phase_start: now,
            current_cycle: 0,
            current_state: config.initial_state,
        }
    }

    /// Create a bounded oscillator already resting on its end state
    ///
    /// Stays there until [`Oscillator::rearm`] when the cap policy is
    /// [`CapPolicy::Latch`]. An unbounded config starts blinking as usual.
    pub const fn resting(config: &OscillatorConfig, now: Instant) -> Self {
        let mut oscillator = Self::new(config, now);
        if config.max_cycles != 0 {
            oscillator.current_state = config.end_state;
            oscillator.current_cycle = config.cycle_bound.limit(config.max_cycles);
        }
        oscillator
    }

    /// Advance the pattern to `now` and return the current state
    ///
    /// Call this once per poll. Repeated calls with the same `now` never
    /// change the state; a `now` earlier than the last phase start counts as
    /// zero elapsed time.
    pub fn advance(&mut self, now: Instant) -> LightState {
        if self.max_cycles == 0 || self.cycle_bound.allows(self.current_cycle, self.max_cycles) {
            let elapsed = elapsed_since(now, self.last_phase_start);
            match self.current_state {
                LightState::On if elapsed >= self.on_duration => {
                    self.current_state = LightState::Off;
                    self.last_phase_start = now;
                }
                LightState::Off if elapsed >= self.off_duration => {
                    self.current_state = LightState::On;
                    self.current_cycle = self.current_cycle.saturating_add(1);
                    self.last_phase_start = now;
                }
                _ => {}
            }
        } else {
            #[cfg(feature = "esp32-log")]
            if self.current_state != self.end_state {
                println!(
                    "[Oscillator.advance] cap of {} cycles reached, resting {:?}",
                    self.max_cycles, self.end_state
                );
            }
            self.current_state = self.end_state;
            if self.cap_policy == CapPolicy::Rearm {
                self.current_cycle = 0;
            }
        }

        self.current_state
    }

    /// Restart the pattern from its initial state at `now`
    pub fn rearm(&mut self, now: Instant) {
        self.current_state = self.initial_state;
        self.current_cycle = 0;
        self.last_phase_start = now;
    }

    /// Current logical state, without advancing
    pub const fn state(&self) -> LightState {
        self.current_state
    }

    /// Completed cycles since the last reset
    pub const fn cycle(&self) -> u32 {
        self.current_cycle
    }

    /// Cycle cap (0 = unbounded)
    pub const fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    /// Check if a bounded pattern has used up its cycles
    pub const fn is_finished(&self) -> bool {
        self.max_cycles != 0 && !self.cycle_bound.allows(self.current_cycle, self.max_cycles)
    }
}
