//! Native scorer for gradient-boosted tree models saved in XGBoost's JSON
//! format.
//!
//! Only single-output tree boosters are supported. The loaded [`Booster`]
//! is immutable and can be shared across threads behind an `Arc`.

mod booster;
mod error;
mod model;
mod objective;
mod tree;

pub use booster::Booster;
pub use error::BoosterError;
pub use objective::Objective;
pub use tree::Tree;
