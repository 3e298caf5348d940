//! Categorical label handling: parsing and multi-hot encoding.
//!
//! Catalog exports carry genre/tag fields in several shapes: JSON arrays,
//! string-encoded arrays (a CSV cell holding `["Sci-Fi", "Action"]`), bare
//! scalars, or nothing at all. Parsing is strict-JSON-first with a plain
//! string fallback so malformed encodings degrade to a singleton label
//! instead of failing the whole catalog.

use ndarray::Array2;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Normalize a raw field value into a set of string labels.
///
/// - JSON array: each element becomes a label (strings as-is, other
///   scalars via their display form).
/// - String: parsed as a strict JSON array of strings if possible,
///   otherwise the raw string is a singleton label; the empty string is
///   the empty set.
/// - Other scalars: singleton of the display form.
/// - Missing or null: empty set.
pub fn parse_label_set(value: Option<&Value>) -> BTreeSet<String> {
    match value {
        None | Some(Value::Null) => BTreeSet::new(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_label).collect(),
        Some(Value::String(s)) => {
            if let Ok(labels) = serde_json::from_str::<Vec<String>>(s) {
                labels.into_iter().collect()
            } else if s.is_empty() {
                BTreeSet::new()
            } else {
                BTreeSet::from([s.clone()])
            }
        }
        Some(other) => scalar_label(other).into_iter().collect(),
    }
}

fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Multi-hot encoder over a fixed label vocabulary.
///
/// Classes are sorted so that column order is stable across refits on the
/// same catalog.
#[derive(Debug, Clone, Default)]
pub struct MultiHotEncoder {
    classes: Vec<String>,
    class_index: HashMap<String, usize>,
}

impl MultiHotEncoder {
    /// Learn the label vocabulary from a collection of label sets.
    pub fn fit(label_sets: &[BTreeSet<String>]) -> Self {
        let mut vocabulary: BTreeSet<String> = BTreeSet::new();
        for labels in label_sets {
            vocabulary.extend(labels.iter().cloned());
        }

        let classes: Vec<String> = vocabulary.into_iter().collect();
        let class_index = classes
            .iter()
            .cloned()
            .enumerate()
            .map(|(idx, label)| (label, idx))
            .collect();

        Self {
            classes,
            class_index,
        }
    }

    /// Encode label sets as a binary matrix, one row per set.
    /// Labels outside the fitted vocabulary are ignored.
    pub fn transform(&self, label_sets: &[BTreeSet<String>]) -> Array2<f32> {
        let mut matrix = Array2::<f32>::zeros((label_sets.len(), self.classes.len()));
        for (row, labels) in label_sets.iter().enumerate() {
            for label in labels {
                if let Some(&col) = self.class_index.get(label) {
                    matrix[[row, col]] = 1.0;
                }
            }
        }
        matrix
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
