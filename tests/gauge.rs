mod tests {
    use embassy_time::{Duration, Instant};
    use pit_dash_core::gauge::{CalibrationError, Gauge, GaugeConfig};

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn config(filter_coefficient: f32, inverted: bool) -> GaugeConfig {
        GaugeConfig {
            sampling_period: Duration::from_millis(10),
            filter_coefficient,
            output_max: 100,
            input_min: 0,
            input_max: 100,
            inverted,
            initial_value: 0,
        }
    }

    #[test]
    fn test_unfiltered_sample_maps_directly() {
        let mut gauge = Gauge::new(config(1.0, false)).unwrap();
        assert_eq!(gauge.advance(at(11), &mut || 50), 50);
        assert_eq!(gauge.last_sample(), at(11));
    }

    #[test]
    fn test_inverted_mapping() {
        let mut gauge = Gauge::new(config(1.0, true)).unwrap();
        assert_eq!(gauge.advance(at(11), &mut || 50), 50);
        assert_eq!(gauge.advance(at(22), &mut || 100), 0);
        assert_eq!(gauge.advance(at(33), &mut || 0), 100);
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let mut gauge = Gauge::new(config(1.0, false)).unwrap();
        assert_eq!(gauge.advance(at(11), &mut || 5_000), 100);
        assert_eq!(gauge.advance(at(22), &mut || -5_000), 0);
        assert_eq!(gauge.advance(at(33), &mut || i32::MAX), 100);
        assert_eq!(gauge.advance(at(44), &mut || i32::MIN), 0);
    }

    #[test]
    fn test_value_stays_in_range_for_any_sequence() {
        let mut gauge = Gauge::new(config(0.7, false)).unwrap();
        let samples = [-300, 40, 9_999, 12, -1, 100, 101, 55, i32::MIN, i32::MAX];
        let mut ms = 0;
        for sample in samples {
            ms += 11;
            gauge.advance(at(ms), &mut || sample);
            let value = gauge.raw_value();
            assert!((0.0..=100.0).contains(&value), "value {value} out of range");
        }
    }

    #[test]
    fn test_gate_skips_reads_before_period() {
        let mut gauge = Gauge::new(config(1.0, false)).unwrap();
        gauge.advance(at(11), &mut || 40);

        let mut reads = 0;
        let mut source = || {
            reads += 1;
            90
        };
        assert_eq!(gauge.advance(at(15), &mut source), 40);
        // Exactly one period later is still not due
        assert_eq!(gauge.advance(at(21), &mut source), 40);
        assert_eq!(gauge.raw_value(), 40.0);
        assert_eq!(gauge.last_sample(), at(11));

        assert_eq!(gauge.advance(at(22), &mut source), 90);
        assert_eq!(reads, 1);
    }

    #[test]
    fn test_exponential_smoothing_rounds() {
        let mut gauge = Gauge::new(config(0.25, false)).unwrap();
        assert_eq!(gauge.advance(at(11), &mut || 100), 25);
        // 25 - 0.25 * (25 - 100) = 43.75
        assert_eq!(gauge.advance(at(22), &mut || 100), 44);
        assert_eq!(gauge.raw_value(), 43.75);
    }

    #[test]
    fn test_zero_coefficient_freezes_value() {
        let mut gauge = Gauge::new(GaugeConfig {
            initial_value: 30,
            ..config(0.0, false)
        })
        .unwrap();
        assert_eq!(gauge.advance(at(11), &mut || 100), 30);
        assert_eq!(gauge.advance(at(22), &mut || 0), 30);
    }

    #[test]
    fn test_mapping_scales_by_span_without_offset() {
        let mut gauge = Gauge::new(GaugeConfig {
            input_min: 100,
            input_max: 300,
            ..config(1.0, false)
        })
        .unwrap();
        // 100 * (150 / 200), input_min is not subtracted
        assert_eq!(gauge.advance(at(11), &mut || 150), 75);
    }

    #[test]
    fn test_rejects_empty_input_span() {
        let result = Gauge::new(GaugeConfig {
            input_min: 100,
            input_max: 100,
            ..config(1.0, false)
        });
        assert_eq!(
            result.err(),
            Some(CalibrationError::EmptyInputSpan {
                input_min: 100,
                input_max: 100
            })
        );
    }

    #[test]
    fn test_rejects_bad_coefficient() {
        assert!(matches!(
            Gauge::new(config(1.5, false)),
            Err(CalibrationError::FilterCoefficientOutOfRange(_))
        ));
        assert!(matches!(
            Gauge::new(config(f32::NAN, false)),
            Err(CalibrationError::FilterCoefficientOutOfRange(_))
        ));
        assert!(matches!(
            Gauge::new(config(-0.1, false)),
            Err(CalibrationError::FilterCoefficientOutOfRange(_))
        ));
    }
}
