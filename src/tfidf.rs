//! TF-IDF text vectorization.
//!
//! Turns a corpus of short text documents (title + description) into a dense
//! row-per-document matrix. Terms are lowercased word tokens of at least two
//! alphanumeric characters, English stop words are removed before n-gram
//! formation, and the vocabulary is pruned by document frequency and capped
//! by corpus frequency. Rows are L2-normalized TF-IDF weights.

use ndarray::Array2;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// English stop words removed before n-gram formation.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "again", "against", "all", "almost", "alone",
    "along", "already", "also", "although", "always", "am", "among", "an", "and", "another",
    "any", "anyone", "anything", "anywhere", "are", "around", "as", "at", "back", "be",
    "became", "because", "become", "becomes", "been", "before", "behind", "being", "below",
    "between", "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does",
    "doing", "down", "during", "each", "either", "else", "enough", "even", "ever", "every",
    "everyone", "everything", "everywhere", "few", "for", "from", "further", "had", "has",
    "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "however", "i", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last",
    "least", "less", "like", "many", "may", "me", "might", "mine", "more", "moreover", "most",
    "mostly", "much", "must", "my", "myself", "neither", "never", "nevertheless", "next", "no",
    "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often",
    "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "part", "per", "perhaps", "rather", "same", "several",
    "she", "should", "since", "so", "some", "somehow", "someone", "something", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "therefore", "these", "they", "this", "those", "though",
    "through", "throughout", "thus", "to", "together", "too", "toward", "towards", "under",
    "until", "up", "upon", "us", "very", "was", "we", "well", "were", "what", "whatever",
    "when", "whenever", "where", "whereas", "wherever", "whether", "which", "while", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Lowercase word tokens of at least two alphanumeric characters.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_string())
        .collect()
}

/// TF-IDF vectorizer with document-frequency pruning.
///
/// Follows the familiar fit/transform contract: `fit` learns the vocabulary
/// and IDF weights from a corpus, `transform` maps documents into that fixed
/// feature space. Column order is alphabetical over the retained terms so
/// that repeated fits on the same corpus are deterministic.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
    min_df: usize,
    max_df: f32,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 1),
            min_df: 1,
            max_df: 1.0,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Cap the vocabulary at the `max_features` most frequent terms.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Extract n-grams for every n in `min_n..=max_n`.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n.max(1), max_n.max(1));
        self
    }

    /// Drop terms appearing in fewer than `min_df` documents.
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Drop terms appearing in more than `max_df` fraction of documents.
    pub fn with_max_df(mut self, max_df: f32) -> Self {
        self.max_df = max_df.clamp(0.0, 1.0);
        self
    }

    /// Stop-word-filtered n-gram terms for one document.
    fn terms(&self, text: &str) -> Vec<String> {
        static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
        let stop_words =
            STOP_WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect());
        let tokens: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|t| !stop_words.contains(t.as_str()))
            .collect();

        let mut terms = Vec::new();
        for n in self.ngram_range.0..=self.ngram_range.1 {
            for ngram in tokens.windows(n) {
                terms.push(ngram.join(" "));
            }
        }
        terms
    }

    /// Learn the vocabulary and IDF weights from a corpus.
    ///
    /// Returns the resulting vocabulary size. Zero means every candidate
    /// term was pruned; callers should treat the text block as absent in
    /// that case rather than fail.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> usize {
        let n_docs = documents.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.terms(doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        let max_df_count = self.max_df * n_docs as f32;
        let mut retained: Vec<(String, usize)> = term_freq
            .into_iter()
            .filter(|(term, _)| {
                let df = doc_freq.get(term).copied().unwrap_or(0);
                df >= self.min_df && df as f32 <= max_df_count
            })
            .collect();

        // Most frequent first, alphabetical tiebreak, then cap.
        retained.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        retained.truncate(self.max_features);

        let mut terms: Vec<String> = retained.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        self.vocabulary = terms
            .iter()
            .cloned()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        // Smoothed IDF: ln((1 + N) / (1 + df)) + 1
        self.idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0);
                ((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0
            })
            .collect();

        self.vocabulary.len()
    }

    /// Map documents into the fitted feature space, L2-normalizing each row.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f32> {
        let vocab_size = self.vocabulary.len();
        let mut matrix = Array2::<f32>::zeros((documents.len(), vocab_size));

        for (doc_idx, doc) in documents.iter().enumerate() {
            for term in self.terms(doc.as_ref()) {
                if let Some(&col) = self.vocabulary.get(&term) {
                    matrix[[doc_idx, col]] += 1.0;
                }
            }

            let mut row = matrix.row_mut(doc_idx);
            for (col, value) in row.iter_mut().enumerate() {
                *value *= self.idf[col];
            }

            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }

        matrix
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Array2<f32> {
        self.fit(documents);
        self.transform(documents)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
