//! Scratch buffer for the pins of the attachment being edited.
//!
//! Pins are moved out of their attachment on checkout and moved back on
//! reconciliation, so a pin lives in exactly one place at a time.

use crate::error::{CompositionError, CompositionResult};
use crate::models::{AttachmentId, Pin, PinPosition, Product};
use crate::store::AttachmentStore;

#[derive(Debug, Clone)]
struct Scratch {
    owner: AttachmentId,
    pins: Vec<Pin>,
}

#[derive(Debug, Clone)]
pub struct PinEditor {
    max_pins: usize,
    scratch: Option<Scratch>,
}

impl PinEditor {
    pub fn new(max_pins: usize) -> Self {
        Self {
            max_pins,
            scratch: None,
        }
    }

    /// Attachment whose pins are currently checked out
    pub fn owner(&self) -> Option<AttachmentId> {
        self.scratch.as_ref().map(|s| s.owner)
    }

    /// Pins in the scratch buffer (empty when nothing is checked out)
    pub fn pins(&self) -> &[Pin] {
        self.scratch.as_ref().map(|s| s.pins.as_slice()).unwrap_or(&[])
    }

    /// Moves the pins of `id` into the scratch buffer.
    ///
    /// Any other checked-out list is reconciled first. No-op when `id` is
    /// already the owner.
    pub fn checkout(&mut self, store: &mut AttachmentStore, id: AttachmentId) {
        if self.owner() == Some(id) {
            return;
        }
        self.reconcile(store);

        let pins = store
            .find_mut(id)
            .map(|a| std::mem::take(&mut a.pins))
            .unwrap_or_default();
        log::debug!("Checked out {} pin(s) of attachment {}", pins.len(), id);
        self.scratch = Some(Scratch { owner: id, pins });
    }

    /// Writes the scratch buffer back into its owner and clears it.
    ///
    /// If the owner no longer exists its pins are dropped with it.
    pub fn reconcile(&mut self, store: &mut AttachmentStore) -> Option<AttachmentId> {
        let scratch = self.scratch.take()?;
        match store.find_mut(scratch.owner) {
            Some(attachment) => {
                attachment.pins = scratch.pins;
                Some(scratch.owner)
            }
            None => {
                log::debug!(
                    "Dropping {} pin(s) of removed attachment {}",
                    scratch.pins.len(),
                    scratch.owner
                );
                None
            }
        }
    }

    /// Drops the scratch buffer without writing it back
    pub fn discard(&mut self) {
        self.scratch = None;
    }

    pub fn add_pin(&mut self, product: Product) -> CompositionResult<usize> {
        let max_pins = self.max_pins;
        let pins = self.scratch_pins()?;
        if pins.len() >= max_pins {
            return Err(CompositionError::CapacityExceeded { limit: max_pins });
        }
        pins.push(Pin::new(product));
        Ok(pins.len() - 1)
    }

    pub fn update_pin(&mut self, index: usize, product: Product) -> CompositionResult<()> {
        self.pin_mut(index)?.product = product;
        Ok(())
    }

    pub fn move_pin(&mut self, index: usize, position: PinPosition) -> CompositionResult<()> {
        self.pin_mut(index)?.position = position;
        Ok(())
    }

    pub fn remove_pin(&mut self, index: usize) -> CompositionResult<Pin> {
        let pins = self.scratch_pins()?;
        if index >= pins.len() {
            return Err(CompositionError::IndexOutOfRange {
                index,
                len: pins.len(),
            });
        }
        Ok(pins.remove(index))
    }

    fn scratch_pins(&mut self) -> CompositionResult<&mut Vec<Pin>> {
        self.scratch
            .as_mut()
            .map(|s| &mut s.pins)
            .ok_or(CompositionError::NoActiveAttachment)
    }

    fn pin_mut(&mut self, index: usize) -> CompositionResult<&mut Pin> {
        let pins = self.scratch_pins()?;
        let len = pins.len();
        pins.get_mut(index)
            .ok_or(CompositionError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, LocalImage};

    fn product(name: &str) -> Product {
        Product::new(name, None).unwrap()
    }

    fn setup() -> (AttachmentStore, AttachmentId, AttachmentId) {
        let mut store = AttachmentStore::new(10);
        let a = Attachment::pending(LocalImage::new("a.jpg"));
        let b = Attachment::pending(LocalImage::new("b.jpg"));
        let (id_a, id_b) = (a.id, b.id);
        store.append(a).unwrap();
        store.append(b).unwrap();
        (store, id_a, id_b)
    }

    #[test]
    fn test_edits_require_checkout() {
        let mut editor = PinEditor::new(10);
        assert_eq!(
            editor.add_pin(product("Chair")),
            Err(CompositionError::NoActiveAttachment)
        );
    }

    #[test]
    fn test_pins_do_not_leak_between_attachments() {
        let (mut store, id_a, id_b) = setup();
        let mut editor = PinEditor::new(10);

        editor.checkout(&mut store, id_a);
        editor.add_pin(product("Chair")).unwrap();
        editor.add_pin(product("Desk")).unwrap();

        editor.checkout(&mut store, id_b);
        assert!(editor.pins().is_empty());
        assert_eq!(store.get(0).unwrap().pins.len(), 2);
        assert!(store.get(1).unwrap().pins.is_empty());

        editor.reconcile(&mut store);
        assert!(store.get(1).unwrap().pins.is_empty());
        assert_eq!(editor.owner(), None);
    }

    #[test]
    fn test_checkout_moves_pins_instead_of_copying() {
        let (mut store, id_a, _) = setup();
        let mut editor = PinEditor::new(10);

        editor.checkout(&mut store, id_a);
        editor.add_pin(product("Lamp")).unwrap();
        editor.reconcile(&mut store);

        editor.checkout(&mut store, id_a);
        assert_eq!(editor.pins().len(), 1);
        assert!(store.get(0).unwrap().pins.is_empty());
    }

    #[test]
    fn test_pin_capacity() {
        let (mut store, id_a, _) = setup();
        let mut editor = PinEditor::new(10);
        editor.checkout(&mut store, id_a);

        for i in 0..10 {
            editor.add_pin(product(&format!("Item {}", i))).unwrap();
        }
        assert_eq!(
            editor.add_pin(product("One too many")),
            Err(CompositionError::CapacityExceeded { limit: 10 })
        );
        assert_eq!(editor.pins().len(), 10);
    }

    #[test]
    fn test_update_move_remove() {
        let (mut store, id_a, _) = setup();
        let mut editor = PinEditor::new(10);
        editor.checkout(&mut store, id_a);
        editor.add_pin(product("Chair")).unwrap();
        editor.add_pin(product("Desk")).unwrap();

        editor
            .update_pin(1, Product::new("Standing desk", Some("https://shop.example/desk")).unwrap())
            .unwrap();
        editor.move_pin(0, PinPosition::new(0.2, 0.8)).unwrap();
        assert_eq!(editor.pins()[1].product.name, "Standing desk");
        assert_eq!(editor.pins()[0].position, PinPosition { x: 0.2, y: 0.8 });

        let removed = editor.remove_pin(0).unwrap();
        assert_eq!(removed.product.name, "Chair");
        assert_eq!(editor.pins()[0].product.name, "Standing desk");

        assert_eq!(
            editor.remove_pin(1),
            Err(CompositionError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_reconcile_into_removed_owner_drops_pins() {
        let (mut store, id_a, _) = setup();
        let mut editor = PinEditor::new(10);
        editor.checkout(&mut store, id_a);
        editor.add_pin(product("Chair")).unwrap();

        store.remove_at(0).unwrap();
        assert_eq!(editor.reconcile(&mut store), None);
        assert!(store.as_slice().iter().all(|a| a.pins.is_empty()));
    }
}
