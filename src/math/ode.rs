use thiserror::Error;

/// Failure modes of the adaptive integrator. Each carries the time the
/// integration had reached when it gave up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OdeError {
    #[error("non-finite state at t={t}")]
    NonFinite { t: f64 },
    #[error("step size underflow at t={t} (h={h:e})")]
    StepSizeUnderflow { t: f64, h: f64 },
    #[error("step budget of {max_steps} exhausted at t={t}")]
    StepLimitExceeded { t: f64, max_steps: usize },
}

const STAGES: usize = 7;

// Dormand-Prince 5(4) tableau. The 7th stage is evaluated at the 5th-order
// solution (FSAL), so its derivative doubles as k1 of the next step.
#[rustfmt::skip]
const A: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0],
];

const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

#[rustfmt::skip]
const B5: [f64; STAGES] = [
    35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0,
    -2187.0 / 6784.0, 11.0 / 84.0, 0.0,
];

#[rustfmt::skip]
const B4: [f64; STAGES] = [
    5179.0 / 57600.0, 0.0, 7571.0 / 16695.0, 393.0 / 640.0,
    -92097.0 / 339200.0, 187.0 / 2100.0, 1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 5.0;
const INITIAL_STEP: f64 = 1e-2;
const MIN_STEP: f64 = 1e-12;
const TIME_TOL: f64 = 1e-9;

/// Adaptive Dormand-Prince 5(4) integrator for non-stiff systems.
///
/// Steps are clamped so the integrator lands exactly on every requested
/// sample time; the caller sees solver-accurate states at the samples
/// rather than interpolated ones. The step budget bounds runaway cost on
/// stiff parameter combinations.
#[derive(Debug, Clone)]
pub struct Dopri5 {
    pub rtol: f64,
    pub atol: f64,
    pub max_steps: usize,
}

impl Default for Dopri5 {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
            // Realistic parameter sets put the water compartment's decay
            // rate in the thousands per day, which stability-limits an
            // explicit method to millisecond-scale steps; the budget must
            // accommodate those runs while still cutting off runaway ones.
            max_steps: 5_000_000,
        }
    }
}

impl Dopri5 {
    /// Integrate `dy = f(t, y)` from `t0`, returning the state at each time
    /// in `sample_times` (ascending, first >= t0).
    pub fn integrate_at<F>(
        &self,
        mut f: F,
        t0: f64,
        y0: &[f64],
        sample_times: &[f64],
    ) -> Result<Vec<Vec<f64>>, OdeError>
    where
        F: FnMut(f64, &[f64], &mut [f64]),
    {
        let n = y0.len();
        let mut y = y0.to_vec();
        let mut t = t0;
        let mut out = Vec::with_capacity(sample_times.len());

        let mut k: Vec<Vec<f64>> = (0..STAGES).map(|_| vec![0.0; n]).collect();
        let mut ytmp = vec![0.0; n];
        let mut y_next = vec![0.0; n];

        if !y.iter().all(|v| v.is_finite()) {
            return Err(OdeError::NonFinite { t });
        }
        f(t, &y, &mut k[0]);
        if !k[0].iter().all(|v| v.is_finite()) {
            return Err(OdeError::NonFinite { t });
        }

        let mut h = INITIAL_STEP;
        let mut steps = 0usize;

        for &target in sample_times {
            while target - t > TIME_TOL {
                if steps >= self.max_steps {
                    return Err(OdeError::StepLimitExceeded {
                        t,
                        max_steps: self.max_steps,
                    });
                }
                steps += 1;

                if h < MIN_STEP {
                    return Err(OdeError::StepSizeUnderflow { t, h });
                }
                let h_step = h.min(target - t);

                // Stages 2..=6.
                for s in 1..STAGES - 1 {
                    for j in 0..n {
                        let mut acc = 0.0;
                        for (l, kl) in k.iter().enumerate().take(s) {
                            acc += A[s][l] * kl[j];
                        }
                        ytmp[j] = y[j] + h_step * acc;
                    }
                    f(t + C[s] * h_step, &ytmp, &mut k[s]);
                }

                // 5th-order solution, then the FSAL stage at (t + h, y_next).
                for j in 0..n {
                    let mut acc = 0.0;
                    for (i, ki) in k.iter().enumerate().take(STAGES - 1) {
                        acc += B5[i] * ki[j];
                    }
                    y_next[j] = y[j] + h_step * acc;
                }
                f(t + h_step, &y_next, &mut k[STAGES - 1]);

                // Embedded 4th-order error estimate, scaled RMS norm.
                let mut err_sq = 0.0;
                for j in 0..n {
                    let mut diff = 0.0;
                    for (i, ki) in k.iter().enumerate() {
                        diff += (B5[i] - B4[i]) * ki[j];
                    }
                    let scale = self.atol + self.rtol * y[j].abs().max(y_next[j].abs());
                    let ratio = h_step * diff / scale;
                    err_sq += ratio * ratio;
                }
                let err = (err_sq / n as f64).sqrt();

                if err.is_finite() && err <= 1.0 {
                    t += h_step;
                    y.copy_from_slice(&y_next);
                    k.swap(0, STAGES - 1);
                    if !y.iter().all(|v| v.is_finite()) {
                        return Err(OdeError::NonFinite { t });
                    }
                    let factor = if err == 0.0 {
                        FAC_MAX
                    } else {
                        (SAFETY * err.powf(-0.2)).clamp(FAC_MIN, FAC_MAX)
                    };
                    h = h_step * factor;
                } else {
                    let factor = if err.is_finite() {
                        (SAFETY * err.powf(-0.2)).clamp(FAC_MIN, 1.0)
                    } else {
                        FAC_MIN
                    };
                    h = h_step * factor;
                }
            }
            out.push(y.clone());
        }

        Ok(out)
    }
}
