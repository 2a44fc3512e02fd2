use crate::catalog::CatalogStore;
use crate::error::{AppError, Result};
use crate::models::{Candidate, ProductRecord, ScoreComponents, ScoredCandidate};
use crate::utils::{normalize_score, normalize_unclamped};
use std::cmp::Ordering;

/// Design domain of profit margins used for normalization
pub const MARGIN_MIN: f32 = 0.1;
pub const MARGIN_MAX: f32 = 0.4;

/// Stock level treated as fully available
pub const STOCK_CAP: f32 = 500.0;

/// Products strictly below this stock level take the stock penalty
pub const LOW_STOCK_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusinessWeights {
    pub model: f32,
    pub profit: f32,
    pub stock: f32,
}

impl Default for BusinessWeights {
    fn default() -> Self {
        Self {
            model: 0.5,
            profit: 0.3,
            stock: 0.2,
        }
    }
}

/// Business Reranker - blends relevance with profitability and stock risk
///
/// `business_score = w_model * model_score + w_profit * normalized_margin - w_stock * stock_penalty`
///
/// Margins are normalized against [0.1, 0.4] without clamping. Near-stockout
/// products are penalized, not removed.
#[derive(Debug, Clone, Default)]
pub struct BusinessReranker {
    weights: BusinessWeights,
}

impl BusinessReranker {
    pub fn new(weights: BusinessWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> BusinessWeights {
        self.weights
    }

    /// Rescore the shortlist and sort it by business score, descending.
    ///
    /// The sort is stable: equal business scores keep shortlist order.
    /// Fails with `DataIntegrity` if a candidate is missing from the catalog.
    pub fn rerank(
        &self,
        candidates: Vec<Candidate>,
        catalog: &CatalogStore,
    ) -> Result<Vec<ScoredCandidate>> {
        let mut scored = candidates
            .into_iter()
            .map(|candidate| {
                let product = catalog.product(&candidate.product_id).ok_or_else(|| {
                    AppError::DataIntegrity(format!(
                        "Shortlisted product not in catalog: {}",
                        candidate.product_id
                    ))
                })?;
                Ok(self.score_candidate(candidate, product))
            })
            .collect::<Result<Vec<_>>>()?;

        // Note: NaN scores are treated as less than any valid score
        scored.sort_by(|a, b| match (a.business_score.is_nan(), b.business_score.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b
                .business_score
                .partial_cmp(&a.business_score)
                .unwrap_or(Ordering::Equal),
        });

        Ok(scored)
    }

    fn score_candidate(&self, candidate: Candidate, product: &ProductRecord) -> ScoredCandidate {
        let components = score_components(product);
        let business_score = self.weights.model * candidate.model_score
            + self.weights.profit * components.normalized_margin
            - self.weights.stock * components.stock_penalty;

        ScoredCandidate {
            product_id: candidate.product_id,
            model_score: candidate.model_score,
            business_score,
            components,
        }
    }
}

/// Per-product business terms. `normalized_stock` is reported but never weighted.
pub fn score_components(product: &ProductRecord) -> ScoreComponents {
    ScoreComponents {
        normalized_margin: normalize_unclamped(product.profit_margin, MARGIN_MIN, MARGIN_MAX),
        normalized_stock: normalize_score(product.current_stock as f32, 0.0, STOCK_CAP),
        stock_penalty: stock_penalty(product.current_stock),
    }
}

pub fn stock_penalty(current_stock: u32) -> f32 {
    if current_stock < LOW_STOCK_THRESHOLD {
        1.0
    } else {
        0.0
    }
}
