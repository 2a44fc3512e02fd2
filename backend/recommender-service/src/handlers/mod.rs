/// Recommendation handlers - HTTP endpoints for the ranking pipeline
use actix_web::{get, post, web, HttpResponse};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::RecommendationRequest;
use crate::services::RecommendationPipeline;

pub struct RecommendationHandlerState {
    pub pipeline: Arc<RecommendationPipeline>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub scorer: &'static str,
    pub products: usize,
    pub retailers: usize,
}

/// Generate and re-rank recommendations for one retailer
#[post("/recommend/full")]
pub async fn recommend_full(
    state: web::Data<RecommendationHandlerState>,
    payload: web::Json<RecommendationRequest>,
) -> Result<HttpResponse> {
    // Ids are matched exactly; unknown or blank ids fall through to NotFound
    let retailer_id = payload.into_inner().retailer_id;

    info!(retailer_id = %retailer_id, "Recommendation request");

    let results = state.pipeline.recommend(&retailer_id).await?;

    Ok(HttpResponse::Ok().json(results))
}

#[get("/health")]
pub async fn health(state: web::Data<RecommendationHandlerState>) -> HttpResponse {
    let catalog = state.pipeline.catalog();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        scorer: state.pipeline.scorer_name(),
        products: catalog.len(),
        retailers: catalog.retailer_count(),
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(recommend_full).service(health);
}
