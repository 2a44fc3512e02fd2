use crate::catalog::CatalogStore;
use crate::error::{AppError, Result};
use crate::models::{PipelineStats, RankedResult};
use crate::services::{BusinessReranker, CandidateSelector, RelevanceScorer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Recommendation Pipeline
///
/// retailer → profile → full-catalog relevance scoring (one batch) →
/// top-K shortlist → business rerank → top-N with dense ranks.
///
/// Holds only read-only state, so one instance is shared by every request.
pub struct RecommendationPipeline {
    catalog: Arc<CatalogStore>,
    scorer: Arc<dyn RelevanceScorer>,
    selector: CandidateSelector,
    reranker: BusinessReranker,
    final_list_size: usize,
    scoring_timeout: Duration,
}

impl RecommendationPipeline {
    pub fn new(
        catalog: Arc<CatalogStore>,
        scorer: Arc<dyn RelevanceScorer>,
        selector: CandidateSelector,
        reranker: BusinessReranker,
        final_list_size: usize,
        scoring_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            scorer,
            selector,
            reranker,
            final_list_size,
            scoring_timeout,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    pub async fn recommend(&self, retailer_id: &str) -> Result<Vec<RankedResult>> {
        self.recommend_with_stats(retailer_id)
            .await
            .map(|(results, _)| results)
    }

    pub async fn recommend_with_stats(
        &self,
        retailer_id: &str,
    ) -> Result<(Vec<RankedResult>, PipelineStats)> {
        let profile = self
            .catalog
            .retailer(retailer_id)
            .ok_or_else(|| AppError::NotFound(format!("retailer {}", retailer_id)))?;

        let products = self.catalog.products();
        let mut stats = PipelineStats {
            catalog_size: products.len(),
            ..Default::default()
        };

        // 1. Candidate generation over the full catalog
        let started = Instant::now();
        let scores = tokio::time::timeout(self.scoring_timeout, self.scorer.score(profile, products))
            .await
            .map_err(|_| {
                error!(
                    retailer_id,
                    timeout_ms = self.scoring_timeout.as_millis() as u64,
                    "Relevance scoring timed out"
                );
                AppError::Scoring(format!(
                    "Relevance scoring timed out after {}ms",
                    self.scoring_timeout.as_millis()
                ))
            })?
            .map_err(|e| {
                error!(retailer_id, error = %e, "Relevance scoring failed");
                match e {
                    AppError::Scoring(_) => e,
                    other => AppError::Scoring(other.to_string()),
                }
            })?;
        stats.scoring_ms = started.elapsed().as_millis();

        if scores.len() != products.len() {
            return Err(AppError::Scoring(format!(
                "Scorer returned {} scores for {} products",
                scores.len(),
                products.len()
            )));
        }

        let scored_products: Vec<(&str, f32)> = products
            .iter()
            .zip(scores.iter())
            .map(|(product, &score)| (product.product_id.as_str(), score))
            .collect();

        let candidates = self.selector.shortlist(&scored_products);
        stats.candidate_count = candidates.len();

        info!(
            retailer_id,
            scorer = self.scorer.name(),
            candidates = stats.candidate_count,
            scoring_ms = stats.scoring_ms as u64,
            "Candidate generation complete"
        );

        // 2. Business re-ranking
        let reranked = self.reranker.rerank(candidates, &self.catalog)?;

        // 3. Final top-N
        let results: Vec<RankedResult> = reranked
            .into_iter()
            .take(self.final_list_size)
            .enumerate()
            .map(|(i, candidate)| RankedResult {
                product_id: candidate.product_id,
                predicted_score: candidate.model_score,
                final_rank: (i + 1) as u32,
            })
            .collect();
        stats.final_count = results.len();

        debug!(
            retailer_id,
            top_product = results.first().map(|r| r.product_id.as_str()),
            top_score = results.first().map(|r| r.predicted_score),
            "Top recommendation"
        );

        info!(
            retailer_id,
            final_count = stats.final_count,
            "Re-ranking complete"
        );

        Ok((results, stats))
    }
}
