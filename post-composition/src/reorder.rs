use crate::error::CompositionResult;
use crate::selection::SelectionController;
use crate::store::AttachmentStore;

/// Drag-and-drop reordering of attachments.
///
/// Both indices are validated before anything is touched, so the store and
/// the selection either change together or not at all.
pub struct ReorderEngine;

impl ReorderEngine {
    pub fn drag(
        store: &mut AttachmentStore,
        selection: &mut SelectionController,
        from: usize,
        to: usize,
    ) -> CompositionResult<()> {
        store.check_index(from)?;
        store.check_index(to)?;

        store.move_to(from, to)?;
        selection.on_move(from, to);
        Ok(())
    }
}
