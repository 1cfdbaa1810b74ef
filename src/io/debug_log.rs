use anyhow::Context;

use crate::model::seiwr::{SeiwrConfig, Trajectory};

/// Write a plain-text debug log for one simulation run: a key=value header
/// followed by one CSV row per sampled day.
pub fn write_seiwr_debug_log(
    out_dir: impl AsRef<std::path::Path>,
    run_id: &str,
    area: &str,
    year: i32,
    cfg: &SeiwrConfig,
    traj: &Trajectory,
) -> anyhow::Result<std::path::PathBuf> {
    use std::io::Write;

    anyhow::ensure!(
        traj.times.len() == traj.states.len(),
        "trajectory times/states length mismatch"
    );

    std::fs::create_dir_all(out_dir.as_ref()).context("create logs dir failed")?;
    let path = out_dir.as_ref().join(format!("seiwr_{}.txt", run_id));
    let mut f = std::fs::File::create(&path)
        .with_context(|| format!("create debug log file failed (path={:?})", path))?;

    writeln!(f, "run_id={}", run_id)?;
    writeln!(f, "area={}", area)?;
    writeln!(f, "year={}", year)?;
    writeln!(f, "population={:.2}", cfg.population)?;
    writeln!(f, "initial_cases={:.2}", cfg.initial_cases)?;
    writeln!(f, "initial_risk_level={:.4}", cfg.initial_risk_level)?;
    writeln!(f, "infection_coefficient={:.8}", cfg.infection_coefficient)?;
    writeln!(f, "sigma={:.6}", cfg.sigma)?;
    writeln!(f, "xi={:.6}", cfg.xi)?;
    writeln!(f, "delta={:.6}", cfg.delta)?;
    writeln!(f, "horizon_days={}", cfg.horizon_days)?;
    writeln!(f)?;
    writeln!(f, "t,susceptible,exposed,cumulative_risk,water")?;

    for (t, state) in traj.iter() {
        writeln!(
            f,
            "{:.1},{:.6},{:.6},{:.6},{:.6}",
            t, state.s, state.e, state.i, state.w
        )?;
    }

    Ok(path)
}
