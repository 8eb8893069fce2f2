use super::*;

fn triangle() -> Series {
    Series::from_pairs(&[(0.0, 10.0), (1.0, 20.0), (2.0, 10.0)]).unwrap()
}

#[test]
fn test_trapezoid_without_baseline() {
    let window = Window::from_seconds(0.0, 2.0).unwrap();
    let result = integrate(&triangle(), &window, BaselinePolicy::Fixed(0.0)).unwrap();

    assert_eq!(result.area, 30.0);
    assert_eq!(result.samples, 3);
    assert_eq!(result.baseline, Baseline::ZERO);
}

#[test]
fn test_fixed_baseline_subtracted() {
    let window = Window::from_seconds(0.0, 2.0).unwrap();
    let result = integrate(&triangle(), &window, BaselinePolicy::Fixed(10.0)).unwrap();

    assert_eq!(result.area, 10.0);
    assert_eq!(result.baseline, Baseline::Constant { level: 10.0 });
}

#[test]
fn test_zero_baseline_matches_uncorrected() {
    let window = Window::from_seconds(0.0, 2.0).unwrap();
    let none = integrate(&triangle(), &window, BaselinePolicy::None).unwrap();
    let zero = integrate(&triangle(), &window, BaselinePolicy::Fixed(0.0)).unwrap();

    assert_eq!(none.area, zero.area);
}

#[test]
fn test_window_outside_data_is_range_error() {
    let window = Window::from_seconds(3.0, 5.0).unwrap();
    let err = integrate(&triangle(), &window, BaselinePolicy::None).unwrap_err();

    assert!(matches!(err, IntegrationError::Range { min_s, max_s, .. } if min_s == 0.0 && max_s == 2.0));
}

#[test]
fn test_window_partially_outside_is_range_error() {
    let window = Window::from_seconds(1.0, 2.5).unwrap();
    let err = integrate(&triangle(), &window, BaselinePolicy::None).unwrap_err();

    assert!(matches!(err, IntegrationError::Range { .. }));
}

#[test]
fn test_single_sample_in_window_is_empty_series() {
    let series = Series::from_pairs(&[(0.0, 1.0), (10.0, 2.0), (20.0, 3.0)]).unwrap();
    let window = Window::from_seconds(5.0, 15.0).unwrap();
    let err = integrate(&series, &window, BaselinePolicy::None).unwrap_err();

    assert_eq!(
        err,
        IntegrationError::EmptySeries {
            samples: 1,
            start_s: 5.0,
            end_s: 15.0
        }
    );
}

#[test]
fn test_inverted_window_rejected() {
    assert!(matches!(
        Window::from_seconds(2.0, 1.0),
        Err(IntegrationError::InvalidWindow { .. })
    ));
    assert!(Window::from_seconds(1.0, 1.0).is_err());
    assert!(Window::from_minutes(f64::NAN, 1.0).is_err());
}

#[test]
fn test_minutes_converted_to_seconds() {
    let window = Window::from_minutes(1.5, 3.0).unwrap();
    assert_eq!(window.start_s(), 90.0);
    assert_eq!(window.end_s(), 180.0);
    assert_eq!(window.start_min(), 1.5);
    assert_eq!(window.duration_s(), 90.0);
    assert!(window.contains(120.0));
    assert!(!window.contains(200.0));
}

#[test]
fn test_linear_baseline_removes_sloped_background() {
    // Background rises 1 unit per second with a 10-unit bump at t = 2.
    let pairs: Vec<(f64, f64)> = (0..=4)
        .map(|i| {
            let t = i as f64;
            let bump = if i == 2 { 10.0 } else { 0.0 };
            (t, t + bump)
        })
        .collect();
    let series = Series::from_pairs(&pairs).unwrap();
    let window = Window::from_seconds(0.0, 4.0).unwrap();

    let result = integrate(&series, &window, BaselinePolicy::Linear).unwrap();

    assert!((result.area - 10.0).abs() < 1e-12);
    match result.baseline {
        Baseline::Linear { slope, intercept } => {
            assert!((slope - 1.0).abs() < 1e-12);
            assert!(intercept.abs() < 1e-12);
        }
        other => panic!("expected linear baseline, got {:?}", other),
    }
    assert!((result.baseline.mean_level(&window) - 2.0).abs() < 1e-12);
}

#[test]
fn test_linear_baseline_on_flat_endpoints() {
    let window = Window::from_seconds(0.0, 2.0).unwrap();
    let result = integrate(&triangle(), &window, BaselinePolicy::Linear).unwrap();

    assert_eq!(result.area, 10.0);
}

#[test]
fn test_pre_window_mean_baseline() {
    let series =
        Series::from_pairs(&[(0.0, 2.0), (1.0, 4.0), (2.0, 10.0), (3.0, 20.0), (4.0, 10.0)])
            .unwrap();
    let window = Window::from_seconds(2.0, 4.0).unwrap();

    let result = integrate(&series, &window, BaselinePolicy::PreWindowMean(2.0)).unwrap();

    assert_eq!(result.baseline, Baseline::Constant { level: 3.0 });
    // Corrected values 7, 17, 7 -> 12 + 12
    assert_eq!(result.area, 24.0);
}

#[test]
fn test_pre_window_mean_without_samples() {
    let window = Window::from_seconds(0.0, 2.0).unwrap();
    let err = integrate(&triangle(), &window, BaselinePolicy::PreWindowMean(5.0)).unwrap_err();

    assert!(matches!(err, IntegrationError::BaselineUnavailable { .. }));
}

#[test]
fn test_series_drops_duplicates_and_non_finite() {
    let series = Series::new(
        vec![0.0, 1.0, 1.0, 2.0, f64::NAN, 3.0],
        vec![1.0, 2.0, 99.0, f64::INFINITY, 5.0, 6.0],
    )
    .unwrap();

    assert_eq!(series.time(), &[0.0, 1.0, 3.0]);
    assert_eq!(series.values(), &[1.0, 2.0, 6.0]);
    assert_eq!(series.time_range(), (0.0, 3.0));
}

#[test]
fn test_series_rejects_decreasing_time() {
    let err = Series::new(vec![0.0, 2.0, 1.0], vec![1.0, 1.0, 1.0]).unwrap_err();
    assert_eq!(
        err,
        SeriesError::NonMonotonic {
            index: 2,
            previous: 2.0,
            current: 1.0
        }
    );
}

#[test]
fn test_series_rejects_empty_and_mismatched() {
    assert_eq!(Series::new(vec![], vec![]).unwrap_err(), SeriesError::Empty);
    assert_eq!(
        Series::new(vec![f64::NAN], vec![1.0]).unwrap_err(),
        SeriesError::Empty
    );
    assert!(matches!(
        Series::new(vec![0.0, 1.0], vec![1.0]),
        Err(SeriesError::LengthMismatch {
            time_len: 2,
            value_len: 1
        })
    ));
}

#[test]
fn test_map_values_keeps_time() {
    let scaled = triangle().map_values(|v| v * 2.0);
    assert_eq!(scaled.values(), &[20.0, 40.0, 20.0]);
    assert_eq!(scaled.time(), triangle().time());
}

#[test]
fn test_window_indices_are_inclusive() {
    let series = Series::from_pairs(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]).unwrap();
    let window = Window::from_seconds(1.0, 2.0).unwrap();
    assert_eq!(series.window_indices(&window), 1..3);
}

#[test]
fn test_trapezoid_degenerate_inputs() {
    assert_eq!(trapezoid(&[], &[]), 0.0);
    assert_eq!(trapezoid(&[1.0], &[5.0]), 0.0);
    assert_eq!(trapezoid(&[0.0, 2.0], &[1.0, 1.0]), 2.0);
}

#[test]
fn test_baseline_policy_toml_forms() {
    #[derive(serde::Deserialize)]
    struct Holder {
        baseline: BaselinePolicy,
    }

    let parse = |s: &str| toml::from_str::<Holder>(s).unwrap().baseline;
    assert_eq!(parse(r#"baseline = "linear""#), BaselinePolicy::Linear);
    assert_eq!(parse(r#"baseline = "none""#), BaselinePolicy::None);
    assert_eq!(parse("baseline = { fixed = 1.5 }"), BaselinePolicy::Fixed(1.5));
    assert_eq!(
        parse("baseline = { pre_window_mean = 30.0 }"),
        BaselinePolicy::PreWindowMean(30.0)
    );
}
