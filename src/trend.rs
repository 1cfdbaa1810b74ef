use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{LeptoError, LeptoResult};
use crate::math::stats;

/// Minimum history length for any trend fit.
pub const MIN_HISTORY: usize = 2;

/// Below this population variance the historical risk column is treated as
/// constant and a regression slope as statistically meaningless.
pub const RISK_VARIANCE_EPS: f64 = 0.01;

/// Fraction of the observed mean incidence attributed to baseline endemic
/// transmission rather than measured risk.
pub const BASELINE_FRACTION: f64 = 0.1;

/// Minimum incidence rate (per 100k) under a zero-risk scenario; the
/// disease is assumed never fully eradicated.
pub const ENDEMIC_FLOOR_RATE: f64 = 0.5;

/// Assumed sensitivity (cases per 100k per risk unit) when the history has
/// no recorded risk at all.
pub const ZERO_HISTORY_SLOPE: f64 = 2.0;

const PER_100K: f64 = 100_000.0;

/// One year of surveillance data for an area, ordered ascending by year.
/// Duplicate years are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub year: i32,
    pub population: u32,
    pub composite_risk: f64,
    pub cases: u32,
}

impl HistoryRecord {
    /// Cases per 100,000 population.
    pub fn incidence_rate(&self) -> f64 {
        f64::from(self.cases) / f64::from(self.population) * PER_100K
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelSource {
    /// Ordinary least squares on (composite risk, incidence rate).
    Regressed,
    /// Ratio of mean rate to mean risk; used when the risk column is
    /// near-constant or the regression slope came out negative.
    FallbackProportional,
    /// Fixed assumed sensitivity; used when no risk was ever recorded.
    FallbackBaseline,
}

/// Fitted sensitivity of incidence to composite risk. An immutable value
/// returned with every prediction, never a shared object mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionModel {
    /// Cases per 100k per unit of composite risk.
    pub slope: f64,
    /// Baseline incidence per 100k at zero risk.
    pub intercept: f64,
    pub source: ModelSource,
}

impl PredictionModel {
    pub fn rate_at(&self, composite_risk: f64) -> f64 {
        self.intercept + self.slope * composite_risk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Absolute case count for the scenario, clamped to be non-negative.
    pub predicted_cases: f64,
    /// Incidence rate (per 100k) behind `predicted_cases`.
    pub predicted_rate: f64,
    pub model: PredictionModel,
}

struct HistorySummary {
    risks: Vec<f64>,
    rates: Vec<f64>,
    avg_risk: f64,
    avg_rate: f64,
    risk_variance: f64,
}

fn summarize(history: &[HistoryRecord]) -> HistorySummary {
    let risks: Vec<f64> = history.iter().map(|r| r.composite_risk).collect();
    let rates: Vec<f64> = history.iter().map(HistoryRecord::incidence_rate).collect();
    HistorySummary {
        avg_risk: stats::mean(&risks),
        avg_rate: stats::mean(&rates),
        risk_variance: stats::population_variance(&risks),
        risks,
        rates,
    }
}

fn proportional_model(avg_rate: f64, risk_divisor: f64) -> PredictionModel {
    PredictionModel {
        slope: avg_rate / risk_divisor,
        intercept: avg_rate * BASELINE_FRACTION,
        source: ModelSource::FallbackProportional,
    }
}

/// Ordered fit rules: variance gate, then regression, then the
/// negative-slope override. The zero-risk override is applied by `predict`
/// after this and always wins.
fn fit_model(summary: &HistorySummary) -> PredictionModel {
    if summary.risk_variance < RISK_VARIANCE_EPS || summary.avg_risk == 0.0 {
        if summary.avg_risk > 0.0 {
            debug!(
                "risk variance {:.4} below threshold, proportional fallback",
                summary.risk_variance
            );
            return proportional_model(summary.avg_rate, summary.avg_risk);
        }
        debug!("no risk recorded in history, baseline fallback");
        let min_rate = summary.rates.iter().copied().fold(f64::INFINITY, f64::min);
        return PredictionModel {
            slope: ZERO_HISTORY_SLOPE,
            intercept: (min_rate * 0.5).max(1.0),
            source: ModelSource::FallbackBaseline,
        };
    }

    match stats::least_squares(&summary.risks, &summary.rates) {
        Some(fit) if fit.slope >= 0.0 => PredictionModel {
            slope: fit.slope,
            intercept: fit.intercept,
            source: ModelSource::Regressed,
        },
        // A negative slope would mean risk suppresses incidence; treated as
        // implausible and replaced by the proportional heuristic.
        _ => {
            debug!("regression slope negative or undefined, proportional fallback");
            proportional_model(summary.avg_rate, summary.avg_risk.max(1.0))
        }
    }
}

/// Predict next-year case counts for a (population, composite risk)
/// scenario from per-year history. Pure and deterministic; identical
/// inputs always yield identical results.
pub fn predict(
    history: &[HistoryRecord],
    future_population: u32,
    future_composite_risk: f64,
) -> LeptoResult<PredictionResult> {
    if history.len() < MIN_HISTORY {
        return Err(LeptoError::InsufficientHistory {
            got: history.len(),
            min: MIN_HISTORY,
        });
    }
    if future_population == 0 {
        return Err(LeptoError::parameter(
            "future_population",
            0.0,
            "must be at least 1",
        ));
    }
    if !future_composite_risk.is_finite() || future_composite_risk < 0.0 {
        return Err(LeptoError::parameter(
            "future_composite_risk",
            future_composite_risk,
            "must be non-negative and finite",
        ));
    }
    for record in history {
        if record.population == 0 {
            return Err(LeptoError::parameter(
                "history.population",
                0.0,
                "must be at least 1",
            ));
        }
        if !record.composite_risk.is_finite() || record.composite_risk < 0.0 {
            return Err(LeptoError::parameter(
                "history.composite_risk",
                record.composite_risk,
                "must be non-negative and finite",
            ));
        }
    }

    let summary = summarize(history);
    let model = fit_model(&summary);

    let mut predicted_rate = model.rate_at(future_composite_risk);
    if future_composite_risk == 0.0 {
        // Endemic floor: transmission persists at a minimal rate even under
        // a perfect-mitigation scenario. Applied last, over either branch.
        predicted_rate = (summary.avg_rate * BASELINE_FRACTION).max(ENDEMIC_FLOOR_RATE);
    }

    let predicted_cases = (predicted_rate / PER_100K * f64::from(future_population)).max(0.0);
    Ok(PredictionResult {
        predicted_cases,
        predicted_rate,
        model,
    })
}
