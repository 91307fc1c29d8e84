use std::path::Path;

use crate::error::BoosterError;
use crate::model::{self, GradientBooster, ModelDocument};
use crate::objective::Objective;
use crate::tree::Tree;

/// A loaded tree ensemble. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Booster {
    trees: Vec<Tree>,
    tree_weights: Option<Vec<f32>>,
    objective: Objective,
    base_margin: f32,
    num_feature: usize,
    feature_names: Vec<String>,
}

impl Booster {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BoosterError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| BoosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, BoosterError> {
        let document: ModelDocument = serde_json::from_str(raw)?;
        let learner = document.learner;
        let params = learner.learner_model_param;

        let num_class = model::parse_count(params.num_class.as_deref()).ok_or_else(|| {
            BoosterError::InvalidParam {
                name: "num_class",
                value: params.num_class.clone().unwrap_or_default(),
            }
        })?;
        if num_class > 1 {
            return Err(BoosterError::UnsupportedObjective(format!(
                "{} with {num_class} classes",
                learner.objective.name
            )));
        }
        let num_target = model::parse_count(params.num_target.as_deref()).unwrap_or(1);
        if num_target > 1 {
            return Err(BoosterError::UnsupportedObjective(format!(
                "{} with {num_target} targets",
                learner.objective.name
            )));
        }
        let num_feature = model::parse_count(params.num_feature.as_deref()).ok_or_else(|| {
            BoosterError::InvalidParam {
                name: "num_feature",
                value: params.num_feature.clone().unwrap_or_default(),
            }
        })?;

        let objective = Objective::from_name(&learner.objective.name)?;
        let base_score =
            model::parse_base_score(&params.base_score).ok_or_else(|| BoosterError::InvalidParam {
                name: "base_score",
                value: params.base_score.clone(),
            })?;
        let base_margin = objective.base_margin(base_score)?;

        let (raw_model, tree_weights) = unpack_booster(learner.gradient_booster)?;
        if raw_model.tree_info.iter().any(|group| *group != 0) {
            return Err(BoosterError::UnsupportedObjective(
                "trees assigned to more than one output group".to_string(),
            ));
        }
        let trees = raw_model
            .trees
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Tree::from_raw(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(weights) = tree_weights.as_ref() {
            if weights.len() != trees.len() {
                return Err(BoosterError::InvalidParam {
                    name: "weight_drop",
                    value: format!("{} weights for {} trees", weights.len(), trees.len()),
                });
            }
        }

        let required = trees
            .iter()
            .filter_map(Tree::max_feature)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0);
        let num_feature = num_feature
            .max(learner.feature_names.len())
            .max(required);
        tracing::debug!(
            trees = trees.len(),
            nodes = trees.iter().map(Tree::num_nodes).sum::<usize>(),
            num_feature,
            objective = ?objective,
            "booster loaded"
        );

        Ok(Self {
            trees,
            tree_weights,
            objective,
            base_margin,
            num_feature,
            feature_names: learner.feature_names,
        })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_features(&self) -> usize {
        self.num_feature
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Fails unless the model was trained on exactly `columns`, in order.
    /// Models saved without feature names are checked by width only.
    pub fn check_schema(&self, columns: &[&str]) -> Result<(), BoosterError> {
        if self.num_feature != columns.len() {
            return Err(BoosterError::SchemaMismatch(format!(
                "model expects {} features, schema has {}",
                self.num_feature,
                columns.len()
            )));
        }
        if self.feature_names.is_empty() {
            return Ok(());
        }
        for (index, (model_name, column)) in self.feature_names.iter().zip(columns).enumerate() {
            if model_name != column {
                return Err(BoosterError::SchemaMismatch(format!(
                    "column {index} is {model_name:?} in the model but {column:?} in the schema"
                )));
            }
        }
        Ok(())
    }

    /// Scores one dense row. The result is the transformed prediction, the
    /// same value `Booster.predict` returns in XGBoost.
    pub fn predict(&self, row: &[f32]) -> Result<f32, BoosterError> {
        if row.len() != self.num_feature {
            return Err(BoosterError::ShapeMismatch {
                expected: self.num_feature,
                got: row.len(),
            });
        }
        Ok(self.objective.transform(self.margin(row)))
    }

    fn margin(&self, row: &[f32]) -> f32 {
        let sum: f32 = match self.tree_weights.as_ref() {
            Some(weights) => self
                .trees
                .iter()
                .zip(weights)
                .map(|(tree, weight)| tree.leaf_value(row) * weight)
                .sum(),
            None => self.trees.iter().map(|tree| tree.leaf_value(row)).sum(),
        };
        sum + self.base_margin
    }
}

fn unpack_booster(
    booster: GradientBooster,
) -> Result<(model::GbTreeModel, Option<Vec<f32>>), BoosterError> {
    match booster.name.as_str() {
        "gbtree" => {
            let model = booster.model.ok_or_else(|| {
                BoosterError::UnsupportedBooster("gbtree without a model section".to_string())
            })?;
            Ok((model, None))
        }
        "dart" => {
            let inner = booster.gbtree.ok_or_else(|| {
                BoosterError::UnsupportedBooster("dart without a gbtree section".to_string())
            })?;
            let (model, _) = unpack_booster(*inner)?;
            Ok((model, booster.weight_drop))
        }
        other => Err(BoosterError::UnsupportedBooster(other.to_string())),
    }
}
