use booster::Booster;
use features::FeatureEncoder;
use std::sync::Arc;

/// Read-only handles shared by every request for the life of the process.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) booster: Arc<Booster>,
    pub(crate) encoder: Arc<FeatureEncoder>,
}

impl AppState {
    pub(crate) fn new(booster: Booster, encoder: FeatureEncoder) -> Self {
        Self {
            booster: Arc::new(booster),
            encoder: Arc::new(encoder),
        }
    }
}
