//! Content-based recommendation engine.
//!
//! Owns the fitted state (content index, feature matrix, similarity matrix,
//! fitted transformers) and exposes the query surface: item-to-item
//! similarity, user-profile recommendation, and recommendation attribution.
//!
//! Refitting via [`prepare_content_data`] rebuilds everything from scratch
//! and swaps the fitted bundle in atomically; a fit that fails leaves the
//! previous state untouched.
//!
//! [`prepare_content_data`]: ContentBasedRecommender::prepare_content_data

use crate::error::{RecommenderError, Result};
use crate::features::{FeatureBuilder, FittedFeatures};
use crate::index::ContentIndex;
use crate::similarity::{cosine, scores_against_rows, similarity_matrix};
use crate::types::{ContentId, ContentItem, Explanation, UserProfile};
use crate::RecommenderConfig;
use ndarray::{Array1, Array2, ArrayView1};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

/// Fitted state bundle, replaced wholesale on refit.
#[derive(Debug, Clone)]
struct FittedState {
    index: ContentIndex,
    features: FittedFeatures,
    similarity: Option<Array2<f32>>,
}

/// Content-based recommender over an in-memory catalog.
///
/// The full feature matrix and the full pairwise similarity matrix are
/// recomputed on every [`prepare_content_data`] / [`compute_similarity`]
/// call; there is no incremental re-indexing.
///
/// [`prepare_content_data`]: ContentBasedRecommender::prepare_content_data
/// [`compute_similarity`]: ContentBasedRecommender::compute_similarity
pub struct ContentBasedRecommender {
    config: RecommenderConfig,
    fitted: Option<FittedState>,
}

impl ContentBasedRecommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(RecommenderConfig::default())
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Fit the recommender on a content catalog.
    ///
    /// De-duplicates the catalog into a first-seen-order index, builds the
    /// combined feature matrix, and replaces any previously fitted state.
    /// A previously computed similarity matrix is invalidated.
    pub fn prepare_content_data(&mut self, catalog: &[ContentItem]) -> Result<()> {
        let index = ContentIndex::from_ids(catalog.iter().map(|item| &item.content_id));

        // First record per unique id, aligned to the index rows.
        let mut seen: HashSet<&ContentId> = HashSet::new();
        let rows: Vec<&ContentItem> = catalog
            .iter()
            .filter(|item| seen.insert(&item.content_id))
            .collect();

        let features = FeatureBuilder::new(&self.config).build(&rows)?;

        info!(
            items = index.len(),
            feature_dim = features.feature_dim(),
            "content catalog fitted"
        );

        self.fitted = Some(FittedState {
            index,
            features,
            similarity: None,
        });

        Ok(())
    }

    /// Compute the all-pairs cosine similarity matrix over the fitted
    /// features. O(N^2 * D); runs to completion.
    pub fn compute_similarity(&mut self) -> Result<&Array2<f32>> {
        let fitted = self.fitted.as_mut().ok_or(RecommenderError::NotFitted)?;

        let similarity = similarity_matrix(fitted.features.matrix.view());
        debug!(items = similarity.nrows(), "similarity matrix computed");

        Ok(fitted.similarity.insert(similarity))
    }

    /// Items most similar to `content_id`, best first.
    ///
    /// Returns an empty list for an unknown id or when the similarity
    /// matrix has not been computed. The item itself is never included.
    /// Ties keep catalog (row) order.
    pub fn get_similar_content(
        &self,
        content_id: &ContentId,
        n_similar: usize,
    ) -> Vec<(ContentId, f32)> {
        let Some(fitted) = self.fitted.as_ref() else {
            return Vec::new();
        };
        let Some(similarity) = fitted.similarity.as_ref() else {
            return Vec::new();
        };
        let Some(row) = fitted.index.row(content_id) else {
            return Vec::new();
        };

        let scores = similarity.row(row);
        let mut candidates: Vec<(usize, f32)> = (0..scores.len())
            .filter(|&idx| idx != row)
            .map(|idx| (idx, scores[idx]))
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        candidates.truncate(n_similar);

        self.resolve_rows(&fitted.index, candidates)
    }

    /// Recommend catalog items against a user profile, best first.
    ///
    /// Returns an empty list when the profile has no liked items, when none
    /// of them resolve against the fitted index, or before fitting. Items
    /// the user has already liked or disliked are never recommended, and
    /// non-positive scores are dropped even if that yields fewer than
    /// `n_recommendations` results.
    pub fn recommend_content(
        &self,
        profile: &UserProfile,
        n_recommendations: usize,
    ) -> Vec<(ContentId, f32)> {
        let Some(fitted) = self.fitted.as_ref() else {
            return Vec::new();
        };
        let Some(user_vector) = Self::user_vector(fitted, profile, self.config.dislike_weight)
        else {
            return Vec::new();
        };

        let mut scores = scores_against_rows(user_vector.view(), fitted.features.matrix.view());

        // Anything already in the profile gets a sentinel score so it can
        // never surface again.
        for id in profile.liked_content.iter().chain(&profile.disliked_content) {
            if let Some(row) = fitted.index.row(id) {
                scores[row] = -1.0;
            }
        }

        let mut candidates: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        candidates.truncate(n_recommendations);
        candidates.retain(|&(_, score)| score > 0.0);

        self.resolve_rows(&fitted.index, candidates)
    }

    /// Attribute a recommendation to the liked item it most resembles.
    ///
    /// Returns `None` for an unknown id or when no liked item resolves
    /// against the fitted index. Ties keep the first occurrence in the
    /// profile's liked list.
    pub fn explain_recommendation(
        &self,
        content_id: &ContentId,
        profile: &UserProfile,
    ) -> Option<Explanation> {
        let fitted = self.fitted.as_ref()?;
        let target_row = fitted.index.row(content_id)?;
        let target = fitted.features.matrix.row(target_row);

        let mut best: Option<(&ContentId, f32)> = None;
        for liked_id in &profile.liked_content {
            let Some(row) = fitted.index.row(liked_id) else {
                continue;
            };
            let score = cosine(target, fitted.features.matrix.row(row));
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((liked_id, score));
            }
        }

        best.map(|(liked_id, similarity_score)| Explanation {
            most_similar_liked: liked_id.clone(),
            similarity_score,
            explanation: format!("Recommended because you liked {}", liked_id),
        })
    }

    /// Aggregate preference vector: mean of liked rows minus
    /// `dislike_weight` times the mean of disliked rows. `None` when no
    /// liked id resolves. Duplicate profile entries have no extra effect.
    fn user_vector(
        fitted: &FittedState,
        profile: &UserProfile,
        dislike_weight: f32,
    ) -> Option<Array1<f32>> {
        let liked_rows = Self::resolve_unique_rows(&fitted.index, &profile.liked_content);
        if liked_rows.is_empty() {
            return None;
        }

        let features = &fitted.features.matrix;
        let mut vector = Self::mean_of_rows(features, &liked_rows);

        let disliked_rows = Self::resolve_unique_rows(&fitted.index, &profile.disliked_content);
        if !disliked_rows.is_empty() {
            let disliked_mean = Self::mean_of_rows(features, &disliked_rows);
            vector = vector - disliked_mean * dislike_weight;
        }

        Some(vector)
    }

    fn resolve_unique_rows(index: &ContentIndex, ids: &[ContentId]) -> Vec<usize> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter_map(|id| index.row(id))
            .filter(|row| seen.insert(*row))
            .collect()
    }

    fn mean_of_rows(features: &Array2<f32>, rows: &[usize]) -> Array1<f32> {
        let mut sum = Array1::<f32>::zeros(features.ncols());
        for &row in rows {
            sum += &features.row(row);
        }
        sum / rows.len() as f32
    }

    fn resolve_rows(
        &self,
        index: &ContentIndex,
        candidates: Vec<(usize, f32)>,
    ) -> Vec<(ContentId, f32)> {
        candidates
            .into_iter()
            .filter_map(|(row, score)| index.id(row).map(|id| (id.clone(), score)))
            .collect()
    }

    /// Feature row for a content id, for callers that want a hard error
    /// on unknown ids instead of the soft-empty query surface.
    pub fn feature_vector(&self, content_id: &ContentId) -> Result<ArrayView1<'_, f32>> {
        let fitted = self.fitted.as_ref().ok_or(RecommenderError::NotFitted)?;
        let row = fitted
            .index
            .row(content_id)
            .ok_or_else(|| RecommenderError::UnknownContentId(content_id.to_string()))?;
        Ok(fitted.features.matrix.row(row))
    }

    /// Fitted feature matrix, if prepared.
    pub fn feature_matrix(&self) -> Option<&Array2<f32>> {
        self.fitted.as_ref().map(|f| &f.features.matrix)
    }

    /// Computed similarity matrix, if any.
    pub fn similarity_matrix(&self) -> Option<&Array2<f32>> {
        self.fitted.as_ref().and_then(|f| f.similarity.as_ref())
    }

    /// Content ids in fitted row order.
    pub fn content_ids(&self) -> Option<&[ContentId]> {
        self.fitted.as_ref().map(|f| f.index.ids())
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentType;

    fn catalog() -> Vec<ContentItem> {
        vec![
            ContentItem::new(1)
                .with_genres(["Sci-Fi", "Action"])
                .with_numeric("year", 1999.0),
            ContentItem::new(2)
                .with_genres(["Sci-Fi", "Thriller"])
                .with_numeric("year", 2010.0),
            ContentItem::new(3)
                .with_genres(["Crime", "Drama"])
                .with_numeric("year", 1994.0),
        ]
    }

    fn fitted_recommender() -> ContentBasedRecommender {
        let mut recommender = ContentBasedRecommender::new(RecommenderConfig {
            content_type: ContentType::Movies,
            ..RecommenderConfig::default()
        });
        recommender.prepare_content_data(&catalog()).unwrap();
        recommender.compute_similarity().unwrap();
        recommender
    }

    #[test]
    fn test_compute_similarity_requires_fit() {
        let mut recommender = ContentBasedRecommender::with_default_config();
        assert!(matches!(
            recommender.compute_similarity(),
            Err(RecommenderError::NotFitted)
        ));
    }

    #[test]
    fn test_prepare_invalidates_similarity() {
        let mut recommender = fitted_recommender();
        assert!(recommender.similarity_matrix().is_some());

        recommender.prepare_content_data(&catalog()).unwrap();
        assert!(recommender.similarity_matrix().is_none());
    }

    #[test]
    fn test_failed_refit_keeps_previous_state() {
        let mut recommender = fitted_recommender();
        let empty_features = vec![ContentItem::new(9)];

        assert!(recommender.prepare_content_data(&empty_features).is_err());
        assert!(recommender.is_fitted());
        assert!(recommender.content_ids().unwrap().contains(&1.into()));
    }

    #[test]
    fn test_get_similar_content_unknown_id_is_empty() {
        let recommender = fitted_recommender();
        assert!(recommender.get_similar_content(&99.into(), 3).is_empty());
    }

    #[test]
    fn test_get_similar_content_excludes_self() {
        let recommender = fitted_recommender();
        let similar = recommender.get_similar_content(&1.into(), 10);

        assert_eq!(similar.len(), 2);
        assert!(similar.iter().all(|(id, _)| *id != ContentId::Int(1)));
        assert!(similar[0].1 >= similar[1].1);
    }

    #[test]
    fn test_recommend_empty_profile_is_empty() {
        let recommender = fitted_recommender();
        let profile = UserProfile::default();
        assert!(recommender.recommend_content(&profile, 5).is_empty());
    }

    #[test]
    fn test_recommend_unresolvable_likes_is_empty() {
        let recommender = fitted_recommender();
        let profile = UserProfile::new(vec![77.into(), 88.into()]);
        assert!(recommender.recommend_content(&profile, 5).is_empty());
    }

    #[test]
    fn test_recommend_excludes_seen() {
        let recommender = fitted_recommender();
        let profile = UserProfile::new(vec![1.into()]).with_disliked(vec![3.into()]);
        let recs = recommender.recommend_content(&profile, 5);

        assert!(!recs.is_empty());
        for (id, _) in &recs {
            assert_ne!(*id, ContentId::Int(1));
            assert_ne!(*id, ContentId::Int(3));
        }
    }

    #[test]
    fn test_duplicate_likes_have_no_extra_effect() {
        let recommender = fitted_recommender();
        let once = recommender.recommend_content(&UserProfile::new(vec![1.into()]), 5);
        let twice =
            recommender.recommend_content(&UserProfile::new(vec![1.into(), 1.into()]), 5);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_explain_names_liked_item() {
        let recommender = fitted_recommender();
        let profile = UserProfile::new(vec![1.into(), 3.into()]);

        let explanation = recommender.explain_recommendation(&2.into(), &profile).unwrap();
        assert!(profile.liked_content.contains(&explanation.most_similar_liked));
        // Item 2 shares Sci-Fi with item 1, nothing with item 3.
        assert_eq!(explanation.most_similar_liked, ContentId::Int(1));
        assert!(explanation.explanation.contains("because you liked 1"));
    }

    #[test]
    fn test_feature_vector_strict_errors() {
        let recommender = fitted_recommender();
        assert!(recommender.feature_vector(&1.into()).is_ok());
        assert!(matches!(
            recommender.feature_vector(&99.into()),
            Err(RecommenderError::UnknownContentId(_))
        ));

        let unfitted = ContentBasedRecommender::with_default_config();
        assert!(matches!(
            unfitted.feature_vector(&1.into()),
            Err(RecommenderError::NotFitted)
        ));
    }

    #[test]
    fn test_explain_unknown_or_unresolvable_is_none() {
        let recommender = fitted_recommender();
        let profile = UserProfile::new(vec![1.into()]);

        assert!(recommender.explain_recommendation(&99.into(), &profile).is_none());

        let unresolvable = UserProfile::new(vec![77.into()]);
        assert!(recommender
            .explain_recommendation(&2.into(), &unresolvable)
            .is_none());
    }
}
