use crate::error::BoosterError;

/// How the summed tree margin becomes the reported score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    /// `binary:logistic`, `reg:logistic`: sigmoid of the margin.
    Logistic,
    /// `binary:logitraw`: raw margin, base score given as a probability.
    LogitRaw,
    /// Squared, absolute and pseudo-Huber regression: identity.
    Regression,
}

impl Objective {
    pub fn from_name(name: &str) -> Result<Self, BoosterError> {
        match name {
            "binary:logistic" | "reg:logistic" => Ok(Objective::Logistic),
            "binary:logitraw" => Ok(Objective::LogitRaw),
            "reg:squarederror" | "reg:linear" | "reg:pseudohubererror" | "reg:absoluteerror" => {
                Ok(Objective::Regression)
            }
            other => Err(BoosterError::UnsupportedObjective(other.to_string())),
        }
    }

    /// Converts the stored `base_score` into margin space.
    pub fn base_margin(self, base_score: f32) -> Result<f32, BoosterError> {
        match self {
            Objective::Logistic | Objective::LogitRaw => {
                if !(base_score > 0.0 && base_score < 1.0) {
                    return Err(BoosterError::InvalidParam {
                        name: "base_score",
                        value: base_score.to_string(),
                    });
                }
                Ok(-(1.0 / base_score - 1.0).ln())
            }
            Objective::Regression => Ok(base_score),
        }
    }

    pub fn transform(self, margin: f32) -> f32 {
        match self {
            Objective::Logistic => 1.0 / (1.0 + (-margin).exp()),
            Objective::LogitRaw | Objective::Regression => margin,
        }
    }
}
