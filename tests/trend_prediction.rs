use leptosim::{predict, HistoryRecord, LeptoError, ModelSource};

fn record(year: i32, population: u32, composite_risk: f64, cases: u32) -> HistoryRecord {
    HistoryRecord {
        year,
        population,
        composite_risk,
        cases,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn single_record_is_insufficient_history() {
    let history = [record(2020, 1000, 1.0, 10)];
    assert!(matches!(
        predict(&history, 1000, 1.0),
        Err(LeptoError::InsufficientHistory { got: 1, min: 2 })
    ));
}

#[test]
fn constant_risk_history_uses_the_proportional_fallback() {
    let history = [
        record(2020, 10_000, 5.0, 20),
        record(2021, 10_000, 5.0, 25),
    ];
    let result = predict(&history, 10_000, 5.0).expect("prediction failed");

    // rates 200 and 250 per 100k; avg 225; slope 225/5; intercept 22.5;
    // rate at risk 5 = 247.5; cases = 247.5 / 100k * 10_000.
    assert_eq!(result.model.source, ModelSource::FallbackProportional);
    assert!(close(result.model.slope, 45.0));
    assert!(close(result.model.intercept, 22.5));
    assert!(close(result.predicted_rate, 247.5));
    assert!(close(result.predicted_cases, 24.75));
}

#[test]
fn no_recorded_risk_uses_the_baseline_fallback() {
    let history = [
        record(2020, 50_000, 0.0, 5),
        record(2021, 50_000, 0.0, 8),
    ];
    let result = predict(&history, 50_000, 3.0).expect("prediction failed");

    // rates 10 and 16; baseline = max(1, min_rate * 0.5) = 5; slope fixed 2.
    assert_eq!(result.model.source, ModelSource::FallbackBaseline);
    assert!(close(result.model.slope, 2.0));
    assert!(close(result.model.intercept, 5.0));
    assert!(close(result.predicted_rate, 11.0));
    assert!(close(result.predicted_cases, 5.5));
}

#[test]
fn linear_history_is_regressed() {
    let history = [
        record(2020, 100_000, 1.0, 10),
        record(2021, 100_000, 2.0, 20),
        record(2022, 100_000, 3.0, 30),
    ];
    let result = predict(&history, 100_000, 4.0).expect("prediction failed");

    assert_eq!(result.model.source, ModelSource::Regressed);
    assert!(close(result.model.slope, 10.0));
    assert!(close(result.model.intercept, 0.0));
    assert!(close(result.predicted_cases, 40.0));
}

#[test]
fn negative_correlation_triggers_the_slope_override() {
    // Risk falling while cases rise: the regression slope is negative, so
    // the proportional heuristic with divisor max(avg_risk, 1) takes over.
    let history = [
        record(2020, 100_000, 8.0, 10),
        record(2021, 100_000, 5.0, 20),
        record(2022, 100_000, 2.0, 30),
    ];
    let result = predict(&history, 100_000, 5.0).expect("prediction failed");

    assert_eq!(result.model.source, ModelSource::FallbackProportional);
    assert!(close(result.model.slope, 4.0));
    assert!(close(result.model.intercept, 2.0));
    assert!(close(result.predicted_cases, 22.0));
}

#[test]
fn zero_risk_override_wins_over_the_regression_branch() {
    let history = [
        record(2020, 100_000, 1.0, 10),
        record(2021, 100_000, 2.0, 20),
        record(2022, 100_000, 3.0, 30),
    ];
    let result = predict(&history, 100_000, 0.0).expect("prediction failed");

    // avg rate 20, so the floor is 20 * 0.1 = 2.0 per 100k.
    assert_eq!(result.model.source, ModelSource::Regressed);
    assert!(close(result.predicted_rate, 2.0));
    assert!(close(result.predicted_cases, 2.0));
}

#[test]
fn zero_risk_override_wins_over_the_fallback_branch() {
    let history = [
        record(2020, 10_000, 5.0, 20),
        record(2021, 10_000, 5.0, 25),
    ];
    let result = predict(&history, 10_000, 0.0).expect("prediction failed");

    assert_eq!(result.model.source, ModelSource::FallbackProportional);
    assert!(close(result.predicted_rate, 22.5));
    assert!(close(result.predicted_cases, 2.25));
}

#[test]
fn zero_risk_override_floors_sparse_histories() {
    // avg rate 1.5 per 100k makes avg_rate * 0.1 = 0.15, below the floor.
    let history = [
        record(2020, 100_000, 1.0, 1),
        record(2021, 100_000, 3.0, 2),
    ];
    let result = predict(&history, 100_000, 0.0).expect("prediction failed");
    assert!(close(result.predicted_rate, 0.5));
    assert!(close(result.predicted_cases, 0.5));
}

#[test]
fn negative_extrapolations_clamp_to_zero_cases() {
    // Fitted intercept is -10, so a low-risk scenario extrapolates below
    // zero and must clamp.
    let history = [
        record(2020, 100_000, 1.0, 0),
        record(2021, 100_000, 2.0, 10),
        record(2022, 100_000, 3.0, 20),
    ];
    let result = predict(&history, 100_000, 0.5).expect("prediction failed");
    assert_eq!(result.model.source, ModelSource::Regressed);
    assert!(result.predicted_rate < 0.0);
    assert_eq!(result.predicted_cases, 0.0);
}

#[test]
fn prediction_is_deterministic() {
    let history = [
        record(2020, 24_000, 2.5, 9),
        record(2021, 24_400, 5.0, 16),
        record(2022, 24_800, 10.0, 31),
    ];
    let a = predict(&history, 25_000, 7.5).expect("prediction failed");
    let b = predict(&history, 25_000, 7.5).expect("prediction failed");
    assert_eq!(a, b);
}

#[test]
fn scenario_parameters_are_validated() {
    let history = [
        record(2020, 10_000, 5.0, 20),
        record(2021, 10_000, 6.0, 25),
    ];
    assert!(matches!(
        predict(&history, 0, 5.0),
        Err(LeptoError::ParameterRange { name: "future_population", .. })
    ));
    assert!(matches!(
        predict(&history, 10_000, -1.0),
        Err(LeptoError::ParameterRange { name: "future_composite_risk", .. })
    ));

    let bad_history = [
        record(2020, 10_000, 5.0, 20),
        record(2021, 0, 6.0, 25),
    ];
    assert!(matches!(
        predict(&bad_history, 10_000, 5.0),
        Err(LeptoError::ParameterRange { name: "history.population", .. })
    ));
}
