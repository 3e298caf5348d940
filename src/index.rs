//! Bidirectional mapping between content ids and dense matrix rows.

use crate::types::ContentId;
use std::collections::HashMap;

/// Maps each unique content id to a row index `0..N-1` and back.
///
/// Row assignment follows first-seen order in the input catalog; every
/// matrix derived from a fitted catalog is row-aligned to this index.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    id_to_row: HashMap<ContentId, usize>,
    row_to_id: Vec<ContentId>,
}

impl ContentIndex {
    /// Build an index from an ordered sequence of content ids,
    /// de-duplicating on first occurrence.
    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a ContentId>,
    {
        let mut index = Self::default();
        for id in ids {
            if !index.id_to_row.contains_key(id) {
                index.id_to_row.insert(id.clone(), index.row_to_id.len());
                index.row_to_id.push(id.clone());
            }
        }
        index
    }

    pub fn row(&self, id: &ContentId) -> Option<usize> {
        self.id_to_row.get(id).copied()
    }

    pub fn id(&self, row: usize) -> Option<&ContentId> {
        self.row_to_id.get(row)
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.id_to_row.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.row_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_to_id.is_empty()
    }

    /// Ids in row order.
    pub fn ids(&self) -> &[ContentId] {
        &self.row_to_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let ids: Vec<ContentId> = vec![3.into(), 1.into(), 2.into()];
        let index = ContentIndex::from_ids(&ids);

        assert_eq!(index.len(), 3);
        assert_eq!(index.row(&3.into()), Some(0));
        assert_eq!(index.row(&1.into()), Some(1));
        assert_eq!(index.row(&2.into()), Some(2));
        assert_eq!(index.id(0), Some(&ContentId::Int(3)));
    }

    #[test]
    fn test_deduplication_keeps_first() {
        let ids: Vec<ContentId> = vec![1.into(), 2.into(), 1.into(), 3.into(), 2.into()];
        let index = ContentIndex::from_ids(&ids);

        assert_eq!(index.len(), 3);
        assert_eq!(index.row(&1.into()), Some(0));
        assert_eq!(index.row(&2.into()), Some(1));
        assert_eq!(index.row(&3.into()), Some(2));
    }

    #[test]
    fn test_unknown_id() {
        let ids: Vec<ContentId> = vec![1.into()];
        let index = ContentIndex::from_ids(&ids);

        assert_eq!(index.row(&99.into()), None);
        assert!(!index.contains(&99.into()));
        assert_eq!(index.id(5), None);
    }

    #[test]
    fn test_empty_index() {
        let index = ContentIndex::from_ids(std::iter::empty());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
