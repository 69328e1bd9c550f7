//! Dashboard composition
//!
//! Ties the pit mailbox, display text, backlight, button indicators and the
//! gauge together into one step that the control loop calls once per poll.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::SampleSource;
use crate::display::TextDisplay;
use crate::gauge::{CalibrationError, Gauge, GaugeConfig};
use crate::indicator::Indicator;
use crate::mailbox::{MailboxReceiver, PitMessage};
use crate::oscillator::{CapPolicy, CycleBound, LightState, Oscillator, OscillatorConfig};

/// Backlight pattern announcing a new pit message: five slow blinks, then lit
pub const DEFAULT_BACKLIGHT_BLINK: OscillatorConfig = OscillatorConfig::bounded(
    Duration::from_millis(500),
    Duration::from_millis(500),
    5,
    LightState::On,
)
.with_cap_policy(CapPolicy::Latch)
.with_cycle_bound(CycleBound::Exclusive);

/// Button LED pattern while waiting for the pit
pub const DEFAULT_INDICATOR_BLINK: OscillatorConfig =
    OscillatorConfig::blink(Duration::from_millis(250), Duration::from_millis(250));

/// Configuration for the dashboard
#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    pub backlight: OscillatorConfig,
    pub indicator: OscillatorConfig,
    pub gauge: GaugeConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backlight: DEFAULT_BACKLIGHT_BLINK,
            indicator: DEFAULT_INDICATOR_BLINK,
            gauge: GaugeConfig::default(),
        }
    }
}

/// Logical outputs of one dashboard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardFrame<const BUTTONS: usize> {
    pub backlight: LightState,
    pub indicators: [LightState; BUTTONS],
    pub gauge: u16,
}

/// Dashboard state advanced once per poll
pub struct Dashboard<'a, const BUTTONS: usize, const QUEUE: usize> {
    // External dependencies
    pit: MailboxReceiver<'a, QUEUE>,

    // Internal state
    display: TextDisplay,
    backlight: Oscillator,
    indicators: [Indicator; BUTTONS],
    gauge: Gauge,
}

impl<'a, const BUTTONS: usize, const QUEUE: usize> Dashboard<'a, BUTTONS, QUEUE> {
    /// Create a dashboard reading pit messages from `pit`
    ///
    /// Fails only when the gauge calibration is invalid.
    pub fn new(
        pit: MailboxReceiver<'a, QUEUE>,
        config: &DashboardConfig,
        now: Instant,
    ) -> Result<Self, CalibrationError> {
        Ok(Self {
            pit,
            display: TextDisplay::new(),
            backlight: Oscillator::resting(&config.backlight, now),
            indicators: core::array::from_fn(|_| Indicator::new(&config.indicator, now)),
            gauge: Gauge::starting_at(config.gauge, now)?,
        })
    }

    /// Process one poll
    ///
    /// Drains pending pit messages, then advances every oscillator and the
    /// gauge exactly once.
    pub fn tick<S: SampleSource + ?Sized>(
        &mut self,
        now: Instant,
        source: &mut S,
    ) -> DashboardFrame<BUTTONS> {
        self.process_messages(now);

        let backlight = self.backlight.advance(now);
        let mut indicators = [LightState::Off; BUTTONS];
        for (output, indicator) in indicators.iter_mut().zip(self.indicators.iter_mut()) {
            *output = indicator.advance(now);
        }
        let gauge = self.gauge.advance(now, source);

        DashboardFrame {
            backlight,
            indicators,
            gauge,
        }
    }

    /// Register a driver press of button `index`
    ///
    /// A press also answers the message on the display. Returns false for an
    /// unknown button.
    pub fn press(&mut self, index: usize, now: Instant) -> bool {
        let Some(indicator) = self.indicators.get_mut(index) else {
            return false;
        };
        indicator.press(now);
        self.display.mark_responded();
        true
    }

    /// Apply all queued pit messages (non-blocking)
    fn process_messages(&mut self, now: Instant) {
        while let Some(message) = self.pit.try_receive() {
            self.apply_message(message, now);
        }
    }

    fn apply_message(&mut self, message: PitMessage, now: Instant) {
        match message {
            PitMessage::Text(text) => {
                self.display.set_message(text.as_str());
                self.backlight.rearm(now);
            }
            PitMessage::Button { index, state } => match self.indicators.get_mut(index) {
                Some(indicator) => indicator.apply_pit_state(state),
                None => {
                    #[cfg(feature = "esp32-log")]
                    println!(
                        "[Dashboard.apply_message] ignoring state {} for unknown button {}",
                        state, index
                    );
                }
            },
        }
    }

    pub const fn display(&self) -> &TextDisplay {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut TextDisplay {
        &mut self.display
    }

    pub const fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    pub const fn backlight(&self) -> &Oscillator {
        &self.backlight
    }

    pub fn indicator(&self, index: usize) -> Option<&Indicator> {
        self.indicators.get(index)
    }
}
