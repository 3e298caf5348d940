pub type Result<T> = std::result::Result<T, RecommenderError>;

#[derive(Debug, thiserror::Error)]
pub enum RecommenderError {
    #[error("No features available for content-based filtering")]
    NoFeaturesAvailable,

    #[error("Recommender not fitted: call prepare_content_data first")]
    NotFitted,

    #[error("Unknown content id: {0}")]
    UnknownContentId(String),
}
