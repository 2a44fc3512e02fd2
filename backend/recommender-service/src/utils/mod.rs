// Utility functions for recommender-service

/// Min-max normalize a score into the `[min, max]` domain, without clamping.
///
/// Values outside the domain map outside `[0, 1]`.
pub fn normalize_unclamped(value: f32, min: f32, max: f32) -> f32 {
    if max - min < f32::EPSILON {
        0.5
    } else {
        (value - min) / (max - min)
    }
}

/// Normalize a score to [0, 1] range
pub fn normalize_score(score: f32, min: f32, max: f32) -> f32 {
    normalize_unclamped(score, min, max).clamp(0.0, 1.0)
}

/// Logistic squashing into (0, 1)
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_score() {
        assert!((normalize_score(5.0, 0.0, 10.0) - 0.5).abs() < 0.001);
        assert!((normalize_score(10.0, 0.0, 10.0) - 1.0).abs() < 0.001);
        assert!((normalize_score(0.0, 0.0, 10.0) - 0.0).abs() < 0.001);
        assert!((normalize_score(20.0, 0.0, 10.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_unclamped_out_of_domain() {
        assert!((normalize_unclamped(0.5, 0.1, 0.4) - 4.0 / 3.0).abs() < 1e-5);
        assert!(normalize_unclamped(0.0, 0.1, 0.4) < 0.0);
    }

    #[test]
    fn test_degenerate_domain() {
        assert_eq!(normalize_unclamped(3.0, 1.0, 1.0), 0.5);
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }
}
