use leptosim::risk::{composite_risk, RiskFactors};
use leptosim::{predict, simulate, HistoryRecord, SeiwrConfig};

fn main() -> anyhow::Result<()> {
    // Toy single-area walkthrough; replace with real surveillance data.
    let cfg = SeiwrConfig {
        population: 25_000.0,
        initial_cases: 12.0,
        initial_risk_level: 7.5,
        infection_coefficient: 0.00005,
        sigma: 0.1,
        xi: 0.01,
        delta: 0.1,
        horizon_days: 365,
    };

    let traj = simulate(&cfg)?;

    println!("day,susceptible,exposed,cumulative_risk,water");
    for (idx, (t, state)) in traj.iter().enumerate() {
        if idx % 30 != 0 {
            continue;
        }
        println!(
            "{:.0},{:.1},{:.2},{:.2},{:.3}",
            t, state.s, state.e, state.i, state.w
        );
    }

    let history = vec![
        HistoryRecord { year: 2021, population: 24_000, composite_risk: 2.5, cases: 9 },
        HistoryRecord { year: 2022, population: 24_400, composite_risk: 5.0, cases: 16 },
        HistoryRecord { year: 2023, population: 24_800, composite_risk: 10.0, cases: 31 },
        HistoryRecord { year: 2024, population: 25_000, composite_risk: 7.5, cases: 22 },
    ];

    let scenario = composite_risk(&RiskFactors {
        flooded: true,
        evacuation: true,
        irregular_garbage: true,
        high_rodents: true,
        ..RiskFactors::default()
    });

    let forecast = predict(&history, 25_300, scenario.composite)?;
    println!();
    println!(
        "next-year forecast: {:.1} cases at risk index {:.1} ({:?}, slope {:.2}, intercept {:.2})",
        forecast.predicted_cases,
        scenario.composite,
        forecast.model.source,
        forecast.model.slope,
        forecast.model.intercept,
    );

    let best_case = predict(&history, 25_300, 0.0)?;
    println!("best case (zero risk): {:.1} cases", best_case.predicted_cases);

    Ok(())
}
