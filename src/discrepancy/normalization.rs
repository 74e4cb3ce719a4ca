const RATING_MIN: f64 = 1.0;
const RATING_MAX: f64 = 5.0;
const CRITIC_MIN: f64 = 0.0;
const CRITIC_MAX: f64 = 100.0;

/// Linear rescale of a 1-5 user rating onto the 0-100 critic scale
pub fn normalize_rating(rating: f64) -> f64 {
    (rating - RATING_MIN) / (RATING_MAX - RATING_MIN) * CRITIC_MAX
}

pub fn discrepancy(normalized_rating: f64, metacritic: f64) -> f64 {
    normalized_rating - metacritic
}

pub fn is_valid_rating(rating: f64) -> bool {
    rating.is_finite() && (RATING_MIN..=RATING_MAX).contains(&rating)
}

pub fn is_valid_metacritic(metacritic: f64) -> bool {
    metacritic.is_finite() && (CRITIC_MIN..=CRITIC_MAX).contains(&metacritic)
}
