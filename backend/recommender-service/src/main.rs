use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recommender_service::handlers::{self, RecommendationHandlerState};
use recommender_service::{
    BusinessReranker, CandidateSelector, CatalogStore, Config, HeuristicRelevanceModel,
    OnnxRelevanceModel, RecommendationPipeline, RelevanceScorer,
};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},actix_web=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        "Starting recommender-service v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.http_host,
        config.http_port
    );

    // Catalog must be fully loaded before any request is served
    let catalog = CatalogStore::load(&config.artifacts_dir, config.vector_dim)
        .context("Failed to load catalog artifacts")?;
    let catalog = Arc::new(catalog);

    let scorer = load_scorer(&config)?;

    let pipeline = RecommendationPipeline::new(
        catalog,
        scorer,
        CandidateSelector::new(config.top_k_candidates),
        BusinessReranker::new(config.business_weights()),
        config.final_list_size,
        config.scoring_timeout(),
    );

    info!(
        top_k = config.top_k_candidates,
        final_list_size = config.final_list_size,
        w_model = config.w_model,
        w_profit = config.w_profit,
        w_stock = config.w_stock,
        scorer = pipeline.scorer_name(),
        "Recommendation pipeline ready"
    );

    let state = web::Data::new(RecommendationHandlerState {
        pipeline: Arc::new(pipeline),
    });

    HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind((config.http_host.as_str(), config.http_port))
    .with_context(|| format!("Failed to bind {}:{}", config.http_host, config.http_port))?
    .run()
    .await
    .map_err(|e| {
        error!("HTTP server error: {}", e);
        e
    })?;

    Ok(())
}

fn load_scorer(config: &Config) -> Result<Arc<dyn RelevanceScorer>> {
    match OnnxRelevanceModel::load(&config.model_path) {
        Ok(model) => Ok(Arc::new(model)),
        Err(e) if config.allow_heuristic_fallback => {
            warn!(
                error = %e,
                "Failed to load ONNX model, falling back to heuristic scoring"
            );
            Ok(Arc::new(HeuristicRelevanceModel::new()))
        }
        Err(e) => Err(e).context("Failed to load relevance model"),
    }
}
