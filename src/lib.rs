//! Content-based recommendation engine for media catalogs.
//!
//! Turns a content catalog (movies, shows, music) into a dense feature
//! matrix (TF-IDF over text, multi-hot genres/tags, z-scored numeric
//! columns) and serves item-to-item similarity, user-profile
//! recommendations, and recommendation explanations over it.
//!
//! Everything is in-memory and synchronous; fitting recomputes the feature
//! and similarity matrices from scratch.
//!
//! ```
//! use media_recommender::{ContentBasedRecommender, ContentItem, UserProfile};
//!
//! let catalog = vec![
//!     ContentItem::new(1)
//!         .with_title("The Matrix")
//!         .with_genres(["Sci-Fi", "Action"])
//!         .with_numeric("year", 1999.0),
//!     ContentItem::new(2)
//!         .with_title("Inception")
//!         .with_genres(["Sci-Fi", "Thriller"])
//!         .with_numeric("year", 2010.0),
//!     ContentItem::new(3)
//!         .with_title("Pulp Fiction")
//!         .with_genres(["Crime", "Drama"])
//!         .with_numeric("year", 1994.0),
//! ];
//!
//! let mut recommender = ContentBasedRecommender::with_default_config();
//! recommender.prepare_content_data(&catalog).unwrap();
//! recommender.compute_similarity().unwrap();
//!
//! let similar = recommender.get_similar_content(&1.into(), 2);
//! assert_eq!(similar.len(), 2);
//!
//! let profile = UserProfile::new(vec![1.into()]);
//! let recommendations = recommender.recommend_content(&profile, 2);
//! assert!(!recommendations.is_empty());
//! ```

pub mod error;
pub mod features;
pub mod index;
pub mod labels;
pub mod recommender;
pub mod similarity;
pub mod tfidf;
pub mod types;

pub use error::{RecommenderError, Result};
pub use features::{FeatureBuilder, FittedFeatures};
pub use index::ContentIndex;
pub use labels::MultiHotEncoder;
pub use recommender::ContentBasedRecommender;
pub use tfidf::TfidfVectorizer;
pub use types::{ContentId, ContentItem, ContentType, Explanation, UserProfile};

use serde::{Deserialize, Serialize};

/// Z-score normalization strategy for the numeric feature block.
///
/// `Pooled` computes one mean/std over the entire numeric sub-matrix,
/// reproducing the original behavior exactly; `PerColumn` normalizes each
/// column on its own statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    Pooled,
    PerColumn,
}

/// Recommender configuration.
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// Content type fixing the relevant numeric columns (default: movies)
    pub content_type: ContentType,
    /// TF-IDF vocabulary cap (default: 5000)
    pub max_text_features: usize,
    /// N-gram range for text features (default: unigrams and bigrams)
    pub ngram_range: (usize, usize),
    /// Minimum document count for a term to be retained (default: 2)
    pub min_df: usize,
    /// Maximum document fraction for a term to be retained (default: 0.8)
    pub max_df: f32,
    /// Weight of disliked items in the preference vector (default: 0.5)
    pub dislike_weight: f32,
    /// Numeric block normalization strategy (default: pooled)
    pub normalization: Normalization,
    /// Added to the standard deviation to avoid division by zero
    pub epsilon: f32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            content_type: ContentType::Movies,
            max_text_features: 5000,
            ngram_range: (1, 2),
            min_df: 2,
            max_df: 0.8,
            dislike_weight: 0.5,
            normalization: Normalization::Pooled,
            epsilon: 1e-8,
        }
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RecommenderConfig::default();
        assert_eq!(config.content_type, ContentType::Movies);
        assert_eq!(config.max_text_features, 5000);
        assert_eq!(config.ngram_range, (1, 2));
        assert_eq!(config.min_df, 2);
        assert_eq!(config.normalization, Normalization::Pooled);
    }
}
