use serde::{Deserialize, Serialize};

pub mod config;

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub xgb_prediction: f64,
}

impl PredictResponse {
    pub fn new(score: f32) -> Self {
        Self {
            xgb_prediction: f64::from(score),
        }
    }
}

/// Body of every rejected request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn hello() -> Self {
        Self {
            message: "Hello World".to_string(),
        }
    }
}
