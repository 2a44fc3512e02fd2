pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use catalog::CatalogStore;
pub use config::Config;
pub use error::{AppError, Result};
pub use services::{
    BusinessReranker, BusinessWeights, CandidateSelector, HeuristicRelevanceModel,
    OnnxRelevanceModel, RecommendationPipeline, RelevanceScorer,
};
