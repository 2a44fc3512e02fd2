use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StoreType {
    Supermarket,
    Convenience,
    Kiosk,
}

impl StoreType {
    /// Integer code the relevance model was trained with (labels in lexical order).
    pub fn code(&self) -> i32 {
        match self {
            StoreType::Convenience => 0,
            StoreType::Kiosk => 1,
            StoreType::Supermarket => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LocationTier {
    A,
    B,
    C,
}

impl LocationTier {
    pub fn code(&self) -> i32 {
        match self {
            LocationTier::A => 0,
            LocationTier::B => 1,
            LocationTier::C => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Dairy,
    Snacks,
    Beverages,
    Cleaning,
}

impl Category {
    pub fn code(&self) -> i32 {
        match self {
            Category::Beverages => 0,
            Category::Cleaning => 1,
            Category::Dairy => 2,
            Category::Snacks => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetailerProfile {
    pub retailer_id: String,
    pub store_type: StoreType,
    pub location_tier: LocationTier,
    /// Embedding row of this retailer (position in the loaded profile table)
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub product_id: String,
    pub category: Category,
    /// Expected within [0.1, 0.4], not enforced
    pub profit_margin: f32,
    pub current_stock: u32,
    pub content_vector: Vec<f32>,
    /// Embedding row of this product (position in the loaded catalog)
    pub index: u32,
}

/// Shortlisted product with its raw relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub product_id: String,
    pub model_score: f32,
}

/// Intermediate terms of the business score, kept for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreComponents {
    pub normalized_margin: f32,
    /// Not part of the blended score
    pub normalized_stock: f32,
    pub stock_penalty: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub product_id: String,
    pub model_score: f32,
    pub business_score: f32,
    pub components: ScoreComponents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub product_id: String,
    pub predicted_score: f32,
    pub final_rank: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub retailer_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub catalog_size: usize,
    pub candidate_count: usize,
    pub final_count: usize,
    pub scoring_ms: u128,
}
