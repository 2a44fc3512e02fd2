/// Relevance Scoring Module
///
/// Wraps the pre-trained two-tower relevance model behind a single batch
/// scoring capability so the pipeline never depends on a concrete model.
///
/// # Implementations
/// - **OnnxRelevanceModel**: ONNX export of the trained model, run with tract-onnx
/// - **HeuristicRelevanceModel**: deterministic fallback for development and tests
///
/// # Contract
/// One call per request, covering the whole catalog. Returns exactly one score
/// per product, in input order. Scores are only compared with each other, so
/// no range is assumed.
mod features;
mod heuristic;
mod model;

pub use features::ModelInputs;
pub use heuristic::HeuristicRelevanceModel;
pub use model::OnnxRelevanceModel;

use crate::error::Result;
use crate::models::{ProductRecord, RetailerProfile};
use async_trait::async_trait;

#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    async fn score(
        &self,
        retailer: &RetailerProfile,
        products: &[ProductRecord],
    ) -> Result<Vec<f32>>;

    fn name(&self) -> &'static str;
}
