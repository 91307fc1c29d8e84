//! Serde mirror of the parts of XGBoost's JSON model that scoring needs.
//! Everything else in the document is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ModelDocument {
    pub(crate) learner: Learner,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Learner {
    #[serde(default)]
    pub(crate) feature_names: Vec<String>,
    pub(crate) gradient_booster: GradientBooster,
    pub(crate) learner_model_param: LearnerModelParam,
    pub(crate) objective: ObjectiveSection,
}

/// `gbtree` carries `model` directly; `dart` wraps a `gbtree` and adds
/// per-tree weights.
#[derive(Debug, Deserialize)]
pub(crate) struct GradientBooster {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) model: Option<GbTreeModel>,
    #[serde(default)]
    pub(crate) gbtree: Option<Box<GradientBooster>>,
    #[serde(default)]
    pub(crate) weight_drop: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GbTreeModel {
    pub(crate) trees: Vec<RawTree>,
    #[serde(default)]
    pub(crate) tree_info: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTree {
    pub(crate) left_children: Vec<i32>,
    pub(crate) right_children: Vec<i32>,
    pub(crate) split_indices: Vec<i64>,
    pub(crate) split_conditions: Vec<f32>,
    pub(crate) default_left: Vec<Flag>,
    #[serde(default)]
    pub(crate) split_type: Vec<i64>,
}

/// Older writers store `default_left` as 0/1, newer ones as booleans.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub(crate) enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    pub(crate) fn is_set(self) -> bool {
        match self {
            Flag::Bool(value) => value,
            Flag::Int(value) => value != 0,
        }
    }
}

/// XGBoost writes these numbers as strings.
#[derive(Debug, Deserialize)]
pub(crate) struct LearnerModelParam {
    pub(crate) base_score: String,
    #[serde(default)]
    pub(crate) num_class: Option<String>,
    #[serde(default)]
    pub(crate) num_feature: Option<String>,
    #[serde(default)]
    pub(crate) num_target: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectiveSection {
    pub(crate) name: String,
}

/// Parses `base_score`, which is `"5E-1"` in 1.x/2.x and `"[5E-1]"` in 3.x.
pub(crate) fn parse_base_score(raw: &str) -> Option<f32> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let mut values = trimmed.split(',').map(str::trim);
    let first = values.next()?.parse::<f32>().ok()?;
    if values.next().is_some() {
        return None;
    }
    Some(first)
}

pub(crate) fn parse_count(raw: Option<&str>) -> Option<usize> {
    match raw {
        None => Some(0),
        Some(text) => text.trim().parse::<usize>().ok(),
    }
}
