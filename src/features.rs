//! Feature engineering: text, categorical, and numerical blocks.
//!
//! Each block is independently optional; a catalog without text simply has
//! no text columns rather than a zero-filled block. Blocks are concatenated
//! in {text, categorical, numerical} order into one dense matrix, one row
//! per unique content item.

use crate::error::{RecommenderError, Result};
use crate::labels::{parse_label_set, MultiHotEncoder};
use crate::tfidf::TfidfVectorizer;
use crate::types::ContentItem;
use crate::{Normalization, RecommenderConfig};
use ndarray::{s, Array2, Axis};
use std::collections::BTreeSet;
use tracing::debug;

/// Fitted feature state: the combined matrix plus the fitted transformers
/// that produced it. Replaced wholesale on every refit.
#[derive(Debug, Clone)]
pub struct FittedFeatures {
    pub matrix: Array2<f32>,
    pub vectorizer: Option<TfidfVectorizer>,
    pub labels: Option<MultiHotEncoder>,
    pub numeric_columns: Vec<String>,
}

impl FittedFeatures {
    pub fn feature_dim(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Builds the combined feature matrix for a de-duplicated, index-aligned
/// catalog slice.
pub struct FeatureBuilder<'a> {
    config: &'a RecommenderConfig,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(config: &'a RecommenderConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, items: &[&ContentItem]) -> Result<FittedFeatures> {
        let (text_block, vectorizer) = self.text_block(items);
        let (categorical_block, labels) = self.categorical_block(items);
        let (numerical_block, numeric_columns) = self.numerical_block(items);

        debug!(
            text_cols = text_block.as_ref().map_or(0, |b| b.ncols()),
            categorical_cols = categorical_block.as_ref().map_or(0, |b| b.ncols()),
            numerical_cols = numerical_block.as_ref().map_or(0, |b| b.ncols()),
            "feature blocks built"
        );

        let blocks: Vec<Array2<f32>> = [text_block, categorical_block, numerical_block]
            .into_iter()
            .flatten()
            .collect();

        if blocks.is_empty() {
            return Err(RecommenderError::NoFeaturesAvailable);
        }

        let n_rows = items.len();
        let total_cols: usize = blocks.iter().map(|b| b.ncols()).sum();
        let mut matrix = Array2::<f32>::zeros((n_rows, total_cols));

        let mut offset = 0;
        for block in &blocks {
            let width = block.ncols();
            matrix
                .slice_mut(s![.., offset..offset + width])
                .assign(block);
            offset += width;
        }

        Ok(FittedFeatures {
            matrix,
            vectorizer,
            labels,
            numeric_columns,
        })
    }

    /// TF-IDF over title + description, joined by a single space.
    ///
    /// Absent when the catalog has no text fields, or when document-frequency
    /// pruning leaves an empty vocabulary (common for tiny catalogs where no
    /// term clears min_df).
    fn text_block(&self, items: &[&ContentItem]) -> (Option<Array2<f32>>, Option<TfidfVectorizer>) {
        let has_title = items.iter().any(|item| item.title.is_some());
        let has_description = items.iter().any(|item| item.description.is_some());

        if !has_title && !has_description {
            return (None, None);
        }

        let documents: Vec<String> = items
            .iter()
            .map(|item| {
                let mut parts = Vec::new();
                if has_title {
                    parts.push(item.title.as_deref().unwrap_or(""));
                }
                if has_description {
                    parts.push(item.description.as_deref().unwrap_or(""));
                }
                parts.join(" ")
            })
            .collect();

        let mut vectorizer = TfidfVectorizer::new()
            .with_max_features(self.config.max_text_features)
            .with_ngram_range(self.config.ngram_range.0, self.config.ngram_range.1)
            .with_min_df(self.config.min_df)
            .with_max_df(self.config.max_df);

        if vectorizer.fit(&documents) == 0 {
            debug!("text vocabulary empty after pruning, omitting text block");
            return (None, None);
        }

        let block = vectorizer.transform(&documents);
        (Some(block), Some(vectorizer))
    }

    /// Multi-hot over the first present label field of {genres, tags}.
    /// Only one field is used even when both exist.
    fn categorical_block(
        &self,
        items: &[&ContentItem],
    ) -> (Option<Array2<f32>>, Option<MultiHotEncoder>) {
        let use_genres = items.iter().any(|item| item.genres.is_some());
        let use_tags = !use_genres && items.iter().any(|item| item.tags.is_some());

        if !use_genres && !use_tags {
            return (None, None);
        }

        let label_sets: Vec<BTreeSet<String>> = items
            .iter()
            .map(|item| {
                let value = if use_genres {
                    item.genres.as_ref()
                } else {
                    item.tags.as_ref()
                };
                parse_label_set(value)
            })
            .collect();

        let encoder = MultiHotEncoder::fit(&label_sets);
        if encoder.is_empty() {
            return (None, None);
        }

        let block = encoder.transform(&label_sets);
        (Some(block), Some(encoder))
    }

    /// Z-score-normalized numeric columns configured for the content type.
    /// Missing cells default to zero before normalization.
    fn numerical_block(&self, items: &[&ContentItem]) -> (Option<Array2<f32>>, Vec<String>) {
        let columns: Vec<String> = self
            .config
            .content_type
            .numeric_columns()
            .iter()
            .filter(|col| items.iter().any(|item| item.numeric.contains_key(**col)))
            .map(|col| col.to_string())
            .collect();

        if columns.is_empty() {
            return (None, Vec::new());
        }

        let mut block = Array2::<f32>::zeros((items.len(), columns.len()));
        for (row, item) in items.iter().enumerate() {
            for (col, name) in columns.iter().enumerate() {
                block[[row, col]] = item.numeric.get(name).copied().unwrap_or(0.0) as f32;
            }
        }

        match self.config.normalization {
            Normalization::Pooled => self.normalize_pooled(&mut block),
            Normalization::PerColumn => self.normalize_per_column(&mut block),
        }

        (Some(block), columns)
    }

    /// One mean/std over the whole block, matching the reference behavior.
    fn normalize_pooled(&self, block: &mut Array2<f32>) {
        let n = block.len() as f32;
        if n == 0.0 {
            return;
        }
        let mean = block.sum() / n;
        let variance = block.mapv(|v| (v - mean).powi(2)).sum() / n;
        let std = variance.sqrt() + self.config.epsilon;
        block.mapv_inplace(|v| (v - mean) / std);
    }

    /// Independent mean/std per column.
    fn normalize_per_column(&self, block: &mut Array2<f32>) {
        let n_rows = block.nrows() as f32;
        if n_rows == 0.0 {
            return;
        }
        for mut column in block.axis_iter_mut(Axis(1)) {
            let mean = column.sum() / n_rows;
            let variance = column.mapv(|v| (v - mean).powi(2)).sum() / n_rows;
            let std = variance.sqrt() + self.config.epsilon;
            column.mapv_inplace(|v| (v - mean) / std);
        }
    }
}
