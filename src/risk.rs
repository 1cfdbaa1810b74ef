use serde::{Deserialize, Serialize};

/// Categorical risk factors recorded for an area-year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub flooded: bool,
    pub evacuation: bool,
    pub infrastructure_damage: bool,
    pub irregular_garbage: bool,
    pub high_rodents: bool,
    pub clogged_drainage: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub composite: f64,
    pub flood: f64,
    pub sanitation: f64,
}

/// Composite risk index from categorical factors. Sanitation factors only
/// amplify an existing flood component; without flooding the composite is
/// zero.
pub fn composite_risk(factors: &RiskFactors) -> RiskScore {
    let mut flood = 0.0;
    if factors.flooded {
        flood = 2.0;
        if factors.evacuation {
            flood += 3.0;
        }
        if factors.infrastructure_damage {
            flood += 5.0;
        }
    }
    let sanitation = sanitation_score(factors);
    RiskScore {
        composite: flood * sanitation,
        flood,
        sanitation,
    }
}

/// Composite index from a caller-chosen flood severity score combined with
/// the sanitation component of `factors`. Used for what-if scenarios where
/// flood severity is picked on a scale rather than observed.
pub fn composite_from_flood_score(flood_score: f64, factors: &RiskFactors) -> f64 {
    flood_score * sanitation_score(factors)
}

fn sanitation_score(factors: &RiskFactors) -> f64 {
    let mut v = 1.0;
    if factors.irregular_garbage {
        v += 0.5;
    }
    if factors.high_rodents {
        v += 0.5;
    }
    if factors.clogged_drainage {
        v += 0.5;
    }
    v
}
