use crate::models::Candidate;
use std::cmp::Ordering;

/// Candidate Selector - relevance shortlist
///
/// Keeps the `k` highest relevance scores out of the full catalog.
/// Equal scores are ordered by ascending product id, and NaN scores sort
/// after every real score, so the shortlist is reproducible.
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    top_k: usize,
}

impl CandidateSelector {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Shortlist using the configured `top_k`
    pub fn shortlist(&self, scores: &[(&str, f32)]) -> Vec<Candidate> {
        Self::select(scores, self.top_k)
    }

    /// Sort all scores descending and keep the first `k`
    pub fn select(scores: &[(&str, f32)], k: usize) -> Vec<Candidate> {
        let mut ranked: Vec<&(&str, f32)> = scores.iter().collect();
        ranked.sort_by(|a, b| compare_desc(a.1, b.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .take(k)
            .map(|(product_id, score)| Candidate {
                product_id: (*product_id).to_string(),
                model_score: *score,
            })
            .collect()
    }
}

/// Descending order on scores with NaN treated as less than any valid score
fn compare_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
