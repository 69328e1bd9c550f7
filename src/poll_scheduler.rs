//! Poll scheduling and pacing.
//!
//! Provides portable loop pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between polls.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::dashboard::Dashboard;
use crate::{DashboardOutput, SampleSource};

/// Default poll period, matching the 50 ms loop delay of the car unit.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(50);

/// Result of a poll tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next poll.
    pub next_deadline: Instant,
    /// How long to wait until the next poll (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Portable poll scheduler that drives a [`Dashboard`].
///
/// This scheduler:
/// - Tracks poll timing with drift correction
/// - Runs one dashboard step and writes its outputs
/// - Returns timing info so the caller can sleep appropriately
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = PollScheduler::new(dashboard, adc, outputs);
///
/// loop {
///     let now = Instant::from_millis(get_current_time_ms());
///     let result = scheduler.tick(now);
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct PollScheduler<'a, S, O, const BUTTONS: usize, const QUEUE: usize>
where
    S: SampleSource,
    O: DashboardOutput<BUTTONS>,
{
    dashboard: Dashboard<'a, BUTTONS, QUEUE>,
    source: S,
    output: O,
    next_poll: Instant,
    period: Duration,
}

impl<'a, S, O, const BUTTONS: usize, const QUEUE: usize> PollScheduler<'a, S, O, BUTTONS, QUEUE>
where
    S: SampleSource,
    O: DashboardOutput<BUTTONS>,
{
    /// Create a new poll scheduler.
    ///
    /// Uses `DEFAULT_POLL_PERIOD` (50 ms) for pacing.
    pub fn new(dashboard: Dashboard<'a, BUTTONS, QUEUE>, source: S, output: O) -> Self {
        Self::with_period(dashboard, source, output, DEFAULT_POLL_PERIOD)
    }

    /// Create a new poll scheduler with a custom period.
    pub fn with_period(
        dashboard: Dashboard<'a, BUTTONS, QUEUE>,
        source: S,
        output: O,
        period: Duration,
    ) -> Self {
        Self {
            dashboard,
            source,
            output,
            next_poll: Instant::from_millis(0),
            period,
        }
    }

    /// Run one poll and return timing information.
    ///
    /// This method:
    /// 1. Skips the backlog if we've fallen more than two periods behind
    /// 2. Advances the dashboard
    /// 3. Sends text and lights to the output
    /// 4. Returns the deadline for the next poll
    pub fn tick(&mut self, now: Instant) -> TickResult {
        let max_drift = self.period + self.period;
        let behind = self
            .next_poll
            .checked_add(max_drift)
            .is_some_and(|limit| now > limit);
        if behind {
            #[cfg(feature = "esp32-log")]
            println!(
                "[PollScheduler.tick] {} ms behind, skipping backlog",
                now.saturating_duration_since(self.next_poll).as_millis()
            );
            self.next_poll = now;
        }

        let frame = self.dashboard.tick(now, &mut self.source);
        self.dashboard.display_mut().show(&mut self.output);
        self.output.write(&frame);

        self.next_poll += self.period;

        TickResult {
            next_deadline: self.next_poll,
            sleep_duration: self.next_poll.saturating_duration_since(now),
        }
    }

    pub fn dashboard(&self) -> &Dashboard<'a, BUTTONS, QUEUE> {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard<'a, BUTTONS, QUEUE> {
        &mut self.dashboard
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
