use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{LeptoError, LeptoResult};
use crate::math::ode::Dopri5;

/// Hard cap on simulation length (ten years of daily samples).
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Floor applied to the initial cumulative-risk compartment so a zero-case
/// start still seeds the infection terms.
pub const INITIAL_CASES_FLOOR: f64 = 0.1;

// Assumed annual population growth feeding the susceptible pool.
const ANNUAL_GROWTH_FRACTION: f64 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeiwrConfig {
    pub population: f64,
    pub initial_cases: f64,
    /// Starting level of the water-contamination compartment, typically the
    /// flood severity recorded for the simulated year.
    pub initial_risk_level: f64,

    // Rates (per day)
    pub infection_coefficient: f64, // direct transmission from accumulated risk
    pub sigma: f64,                 // incubation: exposure converting to risk
    pub xi: f64,                    // shedding into the water reservoir
    pub delta: f64,                 // contamination decay

    pub horizon_days: u32,
}

impl SeiwrConfig {
    /// Validate before any integration starts. Zero rates are accepted as
    /// meaningful degenerate dynamics; negative or non-finite values are not.
    pub fn check(&self) -> LeptoResult<()> {
        if !self.population.is_finite() || self.population <= 0.0 {
            return Err(LeptoError::parameter(
                "population",
                self.population,
                "must be positive and finite",
            ));
        }
        if !(self.initial_cases >= 0.0) {
            return Err(LeptoError::parameter(
                "initial_cases",
                self.initial_cases,
                "must be non-negative",
            ));
        }
        if !(self.initial_risk_level >= 0.0) {
            return Err(LeptoError::parameter(
                "initial_risk_level",
                self.initial_risk_level,
                "must be non-negative",
            ));
        }
        let rates = [
            ("infection_coefficient", self.infection_coefficient),
            ("sigma", self.sigma),
            ("xi", self.xi),
            ("delta", self.delta),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(LeptoError::parameter(
                    name,
                    value,
                    "rate must be non-negative and finite",
                ));
            }
        }
        if self.horizon_days == 0 || self.horizon_days > MAX_HORIZON_DAYS {
            return Err(LeptoError::parameter(
                "horizon_days",
                f64::from(self.horizon_days),
                "must be within 1..=3650",
            ));
        }
        Ok(())
    }

    /// Constant recruitment of new susceptibles per day, from an assumed 1%
    /// annual growth. Held fixed for the whole run regardless of depletion.
    pub fn recruitment_rate(&self) -> f64 {
        self.population * ANNUAL_GROWTH_FRACTION / 365.0
    }

    pub fn initial_state(&self) -> CompartmentState {
        CompartmentState {
            s: self.population,
            e: 0.0,
            i: self.initial_cases.max(INITIAL_CASES_FLOOR),
            w: self.initial_risk_level,
        }
    }
}

/// One sampled point of the S/E/I/W system.
///
/// `i` accumulates converted exposures and never decreases; it is a
/// cumulative risk index, not a classic infectious compartment. `s` and `w`
/// may go negative in extreme regimes and are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompartmentState {
    pub s: f64,
    pub e: f64,
    pub i: f64,
    pub w: f64,
}

impl CompartmentState {
    fn from_slice(y: &[f64]) -> Self {
        Self {
            s: y[0],
            e: y[1],
            i: y[2],
            w: y[3],
        }
    }
}

/// Daily samples of one simulation run: one state per day over
/// `[0, horizon_days)`. Produced once per call and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub states: Vec<CompartmentState>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &CompartmentState)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }
}

pub struct SeiwrModel {
    pub cfg: SeiwrConfig,
}

impl SeiwrModel {
    pub fn new(cfg: SeiwrConfig) -> LeptoResult<Self> {
        cfg.check()?;
        Ok(Self { cfg })
    }

    pub fn deriv(&self, _t: f64, y: &[f64], dy: &mut [f64]) {
        let cfg = &self.cfg;
        let (s, e, i, w) = (y[0], y[1], y[2], y[3]);

        let contact = cfg.infection_coefficient * s * i;
        let waterborne = w * s;

        dy[0] = cfg.recruitment_rate() - contact - waterborne;
        dy[1] = contact + waterborne - cfg.sigma * e;
        dy[2] = cfg.sigma * e;
        dy[3] = cfg.xi * i - cfg.delta * w;
    }

    pub fn simulate(&self) -> LeptoResult<Trajectory> {
        debug!(
            "integrating seiwr over {} days (pop={}, w0={})",
            self.cfg.horizon_days, self.cfg.population, self.cfg.initial_risk_level
        );
        let times: Vec<f64> = (0..self.cfg.horizon_days).map(f64::from).collect();
        let init = self.cfg.initial_state();
        let y0 = [init.s, init.e, init.i, init.w];

        let solver = Dopri5::default();
        let rows = solver
            .integrate_at(|t, y, dy| self.deriv(t, y, dy), 0.0, &y0, &times)
            .map_err(|source| LeptoError::Simulation {
                source,
                config: Box::new(self.cfg.clone()),
            })?;

        let states = rows.iter().map(|y| CompartmentState::from_slice(y)).collect();
        Ok(Trajectory { times, states })
    }
}

/// Run one simulation with fresh solver state. Safe to call concurrently;
/// nothing is shared across calls.
pub fn simulate(cfg: &SeiwrConfig) -> LeptoResult<Trajectory> {
    SeiwrModel::new(cfg.clone())?.simulate()
}
