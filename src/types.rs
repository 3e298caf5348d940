//! Core data types for the content-based recommender.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Opaque content identifier. Catalogs in the wild key items by either
/// numeric or string ids, so both are accepted and compared as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentId::Int(id) => write!(f, "{}", id),
            ContentId::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ContentId {
    fn from(id: i64) -> Self {
        ContentId::Int(id)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        ContentId::Str(id.to_string())
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        ContentId::Str(id)
    }
}

/// Content type, fixing which numeric catalog columns are relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movies,
    Music,
    Shows,
    General,
}

impl ContentType {
    /// Numeric column names considered for this content type.
    pub fn numeric_columns(&self) -> &'static [&'static str] {
        match self {
            ContentType::Movies => &["year", "duration", "rating", "vote_count"],
            ContentType::Music => &["year", "duration", "tempo", "energy", "danceability"],
            ContentType::Shows => &["year", "seasons", "episodes", "rating"],
            ContentType::General => &["year", "rating", "popularity"],
        }
    }
}

/// A single catalog record.
///
/// Only `content_id` is required. Text fields feed the TF-IDF block,
/// `genres`/`tags` feed the categorical block (raw JSON values so that
/// list, scalar, and string-encoded-list inputs are all accepted), and
/// `numeric` holds whichever numeric columns the catalog carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub content_id: ContentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub numeric: HashMap<String, f64>,
}

impl ContentItem {
    pub fn new(content_id: impl Into<ContentId>) -> Self {
        Self {
            content_id: content_id.into(),
            title: None,
            description: None,
            genres: None,
            tags: None,
            numeric: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<Value> = genres
            .into_iter()
            .map(|g| Value::String(g.into()))
            .collect();
        self.genres = Some(Value::Array(labels));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.tags = Some(Value::Array(labels));
        self
    }

    /// Set a raw genres value, e.g. a string-encoded list from a CSV export.
    pub fn with_raw_genres(mut self, genres: Value) -> Self {
        self.genres = Some(genres);
        self
    }

    pub fn with_numeric(mut self, column: impl Into<String>, value: f64) -> Self {
        self.numeric.insert(column.into(), value);
        self
    }
}

/// User taste profile consumed by [`recommend_content`].
///
/// `preferred_genres` is accepted for forward compatibility but does not
/// currently participate in scoring.
///
/// [`recommend_content`]: crate::ContentBasedRecommender::recommend_content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub liked_content: Vec<ContentId>,
    #[serde(default)]
    pub disliked_content: Vec<ContentId>,
    #[serde(default)]
    pub preferred_genres: Vec<String>,
}

impl UserProfile {
    pub fn new(liked_content: Vec<ContentId>) -> Self {
        Self {
            liked_content,
            disliked_content: Vec::new(),
            preferred_genres: Vec::new(),
        }
    }

    pub fn with_disliked(mut self, disliked_content: Vec<ContentId>) -> Self {
        self.disliked_content = disliked_content;
        self
    }

    pub fn with_preferred_genres(mut self, preferred_genres: Vec<String>) -> Self {
        self.preferred_genres = preferred_genres;
        self
    }
}

/// Attribution for a recommendation: the liked item it most resembles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub most_similar_liked: ContentId,
    pub similarity_score: f32,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_display() {
        assert_eq!(ContentId::from(42).to_string(), "42");
        assert_eq!(ContentId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_content_id_equality() {
        assert_eq!(ContentId::from(1), ContentId::Int(1));
        assert_ne!(ContentId::from(1), ContentId::from("1"));
    }

    #[test]
    fn test_content_item_builder() {
        let item = ContentItem::new(7)
            .with_title("The Matrix")
            .with_genres(["Sci-Fi", "Action"])
            .with_numeric("year", 1999.0);

        assert_eq!(item.content_id, ContentId::Int(7));
        assert_eq!(item.title.as_deref(), Some("The Matrix"));
        assert!(item.genres.is_some());
        assert_eq!(item.numeric["year"], 1999.0);
        assert!(item.description.is_none());
    }

    #[test]
    fn test_numeric_columns_per_content_type() {
        assert!(ContentType::Movies.numeric_columns().contains(&"vote_count"));
        assert!(ContentType::Music.numeric_columns().contains(&"tempo"));
        assert!(ContentType::Shows.numeric_columns().contains(&"seasons"));
        assert_eq!(ContentType::General.numeric_columns().len(), 3);
    }
}
