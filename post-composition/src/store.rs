use crate::error::{CompositionError, CompositionResult};
use crate::models::{Attachment, AttachmentId};

/// Ordered collection of attachments, bounded by a capacity
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    items: Vec<Attachment>,
    capacity: usize,
}

impl AttachmentStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// Appends at the end, returning the new index
    pub fn append(&mut self, attachment: Attachment) -> CompositionResult<usize> {
        if self.items.len() >= self.capacity {
            return Err(CompositionError::CapacityExceeded {
                limit: self.capacity,
            });
        }
        self.items.push(attachment);
        Ok(self.items.len() - 1)
    }

    /// Removes the element at `index`; later elements shift left by one
    pub fn remove_at(&mut self, index: usize) -> CompositionResult<Attachment> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Moves the element at `from` to `to`; intervening elements shift by one
    pub fn move_to(&mut self, from: usize, to: usize) -> CompositionResult<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }

        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Attachment> {
        self.items.get(index)
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Attachment] {
        &self.items
    }

    /// Looks up by stable id; indices may have moved since the caller saw them
    pub fn find_mut(&mut self, id: AttachmentId) -> Option<&mut Attachment> {
        self.items.iter_mut().find(|a| a.id == id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn check_index(&self, index: usize) -> CompositionResult<()> {
        if index >= self.items.len() {
            return Err(CompositionError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocalImage;

    fn store_with(n: usize) -> (AttachmentStore, Vec<AttachmentId>) {
        let mut store = AttachmentStore::new(10);
        let mut ids = Vec::new();
        for i in 0..n {
            let attachment = Attachment::pending(LocalImage::new(format!("img{}.jpg", i)));
            ids.push(attachment.id);
            store.append(attachment).unwrap();
        }
        (store, ids)
    }

    fn order(store: &AttachmentStore) -> Vec<AttachmentId> {
        store.as_slice().iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_append_rejects_eleventh_image() {
        let (mut store, _) = store_with(10);
        let result = store.append(Attachment::pending(LocalImage::new("extra.jpg")));
        assert_eq!(result, Err(CompositionError::CapacityExceeded { limit: 10 }));
        assert_eq!(store.size(), 10);
    }

    #[test]
    fn test_remove_shifts_left() {
        let (mut store, ids) = store_with(4);
        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.id, ids[1]);
        assert_eq!(order(&store), vec![ids[0], ids[2], ids[3]]);

        assert_eq!(
            store.remove_at(3).unwrap_err(),
            CompositionError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn test_move_forward_and_backward() {
        let (mut store, ids) = store_with(5);

        store.move_to(0, 3).unwrap();
        assert_eq!(order(&store), vec![ids[1], ids[2], ids[3], ids[0], ids[4]]);

        store.move_to(4, 1).unwrap();
        assert_eq!(order(&store), vec![ids[1], ids[4], ids[2], ids[3], ids[0]]);
    }

    #[test]
    fn test_move_to_last_position() {
        let (mut store, ids) = store_with(3);
        store.move_to(0, 2).unwrap();
        assert_eq!(order(&store), vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_move_preserves_membership() {
        let (mut store, ids) = store_with(6);
        for (from, to) in [(0, 5), (5, 0), (2, 3), (4, 1), (3, 3)] {
            store.move_to(from, to).unwrap();
            let mut current = order(&store);
            let mut expected = ids.clone();
            current.sort_by_key(|id| id.to_string());
            expected.sort_by_key(|id| id.to_string());
            assert_eq!(current, expected);
        }
    }

    #[test]
    fn test_move_rejects_invalid_indices() {
        let (mut store, ids) = store_with(3);
        assert!(store.move_to(3, 0).is_err());
        assert!(store.move_to(0, 3).is_err());
        assert_eq!(order(&store), ids);
    }
}
