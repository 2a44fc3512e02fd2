pub mod candidates;
pub mod pipeline;
pub mod rerank;
pub mod scoring;

pub use candidates::CandidateSelector;
pub use pipeline::RecommendationPipeline;
pub use rerank::{BusinessReranker, BusinessWeights};
pub use scoring::{HeuristicRelevanceModel, OnnxRelevanceModel, RelevanceScorer};
