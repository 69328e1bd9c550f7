mod tests {
    use embassy_time::{Duration, Instant};
    use pit_dash_core::oscillator::{
        CapPolicy, CycleBound, LightState, Oscillator, OscillatorConfig, invert,
    };

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_phase_boundaries() {
        let config = OscillatorConfig::blink(Duration::from_millis(100), Duration::from_millis(50));
        let mut oscillator = Oscillator::new(&config, at(0));

        assert_eq!(oscillator.advance(at(99)), LightState::On);
        assert_eq!(oscillator.advance(at(100)), LightState::Off);
        assert_eq!(oscillator.advance(at(149)), LightState::Off);
        assert_eq!(oscillator.cycle(), 0);
        assert_eq!(oscillator.advance(at(150)), LightState::On);
        assert_eq!(oscillator.cycle(), 1);
    }

    #[test]
    fn test_unbounded_never_stops() {
        let config = OscillatorConfig::blink(Duration::from_millis(30), Duration::from_millis(20));
        let mut oscillator = Oscillator::new(&config, at(0));

        let mut transitions = 0;
        let mut previous = oscillator.state();
        for ms in 0..=5_000 {
            let state = oscillator.advance(at(ms));
            if state != previous {
                transitions += 1;
                previous = state;
            }
        }
        // 5000 ms of a 50 ms period: two transitions per period
        assert_eq!(transitions, 200);
        assert_eq!(oscillator.cycle(), 100);
        assert!(!oscillator.is_finished());
    }

    #[test]
    fn test_same_time_is_idempotent() {
        let config = OscillatorConfig::blink(Duration::from_millis(100), Duration::from_millis(50));
        let mut oscillator = Oscillator::new(&config, at(0));

        assert_eq!(oscillator.advance(at(100)), LightState::Off);
        for _ in 0..10 {
            assert_eq!(oscillator.advance(at(100)), LightState::Off);
        }
        assert_eq!(oscillator.cycle(), 0);
    }

    #[test]
    fn test_time_going_backwards_does_not_transition() {
        let config = OscillatorConfig::blink(Duration::from_millis(100), Duration::from_millis(50));
        let mut oscillator = Oscillator::new(&config, at(500));

        assert_eq!(oscillator.advance(at(10)), LightState::On);
        assert_eq!(oscillator.advance(at(599)), LightState::On);
        assert_eq!(oscillator.advance(at(600)), LightState::Off);
    }

    #[test]
    fn test_zero_on_duration_flips_every_tick() {
        let config = OscillatorConfig::blink(Duration::from_millis(0), Duration::from_millis(0));
        let mut oscillator = Oscillator::new(&config, at(0));

        assert_eq!(oscillator.advance(at(1)), LightState::Off);
        assert_eq!(oscillator.advance(at(2)), LightState::On);
        assert_eq!(oscillator.advance(at(3)), LightState::Off);
    }

    #[test]
    fn test_inclusive_bound_runs_one_extra_cycle() {
        let config = OscillatorConfig::bounded(
            Duration::from_millis(10),
            Duration::from_millis(10),
            2,
            LightState::Off,
        );
        assert_eq!(config.cycle_bound, CycleBound::Inclusive);
        let mut oscillator = Oscillator::new(&config, at(0));

        for ms in 1..=60 {
            oscillator.advance(at(ms));
        }
        assert_eq!(oscillator.cycle(), 3);
        assert_eq!(oscillator.state(), LightState::On);
        assert!(oscillator.is_finished());

        assert_eq!(oscillator.advance(at(61)), LightState::Off);
        assert_eq!(oscillator.cycle(), 0);
    }

    #[test]
    fn test_cap_forces_end_state_and_rearms() {
        let config = OscillatorConfig::bounded(
            Duration::from_millis(10),
            Duration::from_millis(10),
            2,
            LightState::Off,
        )
        .with_cycle_bound(CycleBound::Exclusive);
        let mut oscillator = Oscillator::new(&config, at(0));

        assert_eq!(oscillator.advance(at(10)), LightState::Off);
        assert_eq!(oscillator.advance(at(20)), LightState::On);
        assert_eq!(oscillator.advance(at(30)), LightState::Off);
        assert_eq!(oscillator.advance(at(40)), LightState::On);
        assert_eq!(oscillator.cycle(), 2);
        assert!(oscillator.is_finished());

        assert_eq!(oscillator.advance(at(41)), LightState::Off);
        assert_eq!(oscillator.cycle(), 0);

        // The cleared counter lets blinking resume from the end state
        assert_eq!(oscillator.advance(at(45)), LightState::Off);
        assert_eq!(oscillator.advance(at(50)), LightState::On);
        assert_eq!(oscillator.cycle(), 1);
    }

    #[test]
    fn test_latch_holds_end_state_until_rearm() {
        let config = OscillatorConfig::bounded(
            Duration::from_millis(10),
            Duration::from_millis(10),
            1,
            LightState::On,
        )
        .with_cap_policy(CapPolicy::Latch)
        .with_cycle_bound(CycleBound::Exclusive);
        let mut oscillator = Oscillator::new(&config, at(0));

        assert_eq!(oscillator.advance(at(10)), LightState::Off);
        assert_eq!(oscillator.advance(at(20)), LightState::On);
        assert_eq!(oscillator.advance(at(21)), LightState::On);
        assert_eq!(oscillator.advance(at(1_000)), LightState::On);
        assert_eq!(oscillator.advance(at(2_000)), LightState::On);
        assert_eq!(oscillator.cycle(), 1);

        oscillator.rearm(at(2_000));
        assert_eq!(oscillator.cycle(), 0);
        assert_eq!(oscillator.advance(at(2_010)), LightState::Off);
    }

    #[test]
    fn test_resting_holds_for_either_bound() {
        for bound in [CycleBound::Inclusive, CycleBound::Exclusive] {
            let config = OscillatorConfig::bounded(
                Duration::from_millis(10),
                Duration::from_millis(10),
                2,
                LightState::Off,
            )
            .with_cap_policy(CapPolicy::Latch)
            .with_cycle_bound(bound);
            let mut oscillator = Oscillator::resting(&config, at(0));

            assert_eq!(oscillator.advance(at(500)), LightState::Off);
            assert!(oscillator.is_finished());
        }
    }

    #[test]
    fn test_resting_starts_on_end_state() {
        let config = OscillatorConfig::bounded(
            Duration::from_millis(10),
            Duration::from_millis(10),
            3,
            LightState::On,
        )
        .with_cap_policy(CapPolicy::Latch);
        let mut oscillator = Oscillator::resting(&config, at(0));

        assert!(oscillator.is_finished());
        assert_eq!(oscillator.advance(at(100)), LightState::On);
    }

    #[test]
    fn test_invert() {
        assert_eq!(invert(LightState::On), LightState::Off);
        assert_eq!(invert(LightState::Off), LightState::On);
        assert_eq!(LightState::from(true), LightState::On);
        assert!(!bool::from(LightState::Off));
    }
}
