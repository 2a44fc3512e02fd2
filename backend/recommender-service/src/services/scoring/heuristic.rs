use super::{ModelInputs, RelevanceScorer};
use crate::error::Result;
use crate::models::{ProductRecord, RetailerProfile};
use crate::utils::sigmoid;
use async_trait::async_trait;
use ndarray::Axis;
use tracing::debug;

/// Store type × category affinity, indexed by model codes.
/// Rows: Convenience, Kiosk, Supermarket. Columns: Beverages, Cleaning, Dairy, Snacks.
const STORE_CATEGORY_AFFINITY: [[f32; 4]; 3] = [
    [0.3, -0.1, 0.2, 0.3],
    [0.3, -0.2, -0.1, 0.4],
    [0.1, 0.2, 0.2, 0.1],
];

/// Location tier offset, indexed by model code (A, B, C)
const TIER_OFFSET: [f32; 3] = [0.1, 0.0, -0.1];

/// Stock level at which the availability signal saturates
const STOCK_SATURATION: f32 = 500.0;

/// Heuristic relevance model (fallback when no ONNX model is deployed)
///
/// Formula: `sigmoid(2 * (mean(content) - 0.5) + affinity[store][category] + tier + 0.2 * availability)`
/// where `availability = ln(1 + stock) / ln(1 + 500)`, capped at 1.
#[derive(Debug, Default, Clone)]
pub struct HeuristicRelevanceModel;

impl HeuristicRelevanceModel {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, inputs: &ModelInputs) -> Vec<f32> {
        let batch_size = inputs.batch_size();
        let content_means = if inputs.vector_dim() == 0 {
            None
        } else {
            inputs.content.mean_axis(Axis(1))
        };

        (0..batch_size)
            .map(|i| {
                let content = content_means.as_ref().map(|m| m[i] - 0.5).unwrap_or(0.0);

                let store = inputs.store_type[[i, 0]].clamp(0, 2) as usize;
                let category = inputs.category[[i, 0]].clamp(0, 3) as usize;
                let tier = inputs.location_tier[[i, 0]].clamp(0, 2) as usize;

                let stock = inputs.current_stock[[i, 0]].max(0.0);
                let availability = ((1.0 + stock).ln() / (1.0 + STOCK_SATURATION).ln()).min(1.0);

                sigmoid(
                    2.0 * content
                        + STORE_CATEGORY_AFFINITY[store][category]
                        + TIER_OFFSET[tier]
                        + 0.2 * availability,
                )
            })
            .collect()
    }
}

#[async_trait]
impl RelevanceScorer for HeuristicRelevanceModel {
    async fn score(
        &self,
        retailer: &RetailerProfile,
        products: &[ProductRecord],
    ) -> Result<Vec<f32>> {
        if products.is_empty() {
            return Ok(vec![]);
        }

        let inputs = ModelInputs::from_batch(retailer, products)?;
        let scores = self.predict(&inputs);

        debug!(
            retailer_id = %retailer.retailer_id,
            batch_size = scores.len(),
            "Heuristic scoring complete"
        );

        Ok(scores)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
