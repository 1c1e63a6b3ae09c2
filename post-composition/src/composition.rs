use crate::error::{CompositionError, CompositionResult};
use crate::events::CompositionEvent;
use crate::models::{
    Attachment, AttachmentId, CategoryId, CompositionConfig, LocalImage, Pin, PinPosition,
    Product, UploadState,
};
use crate::pins::PinEditor;
use crate::reorder::ReorderEngine;
use crate::selection::SelectionController;
use crate::store::AttachmentStore;
use crate::upload::UploadOutcome;
use crate::validator::{self, Submission};

/// The post being composed.
///
/// Owns every attachment and pin of the session. All mutations go through
/// `&mut self`, so user gestures and upload outcomes are applied one after
/// another by whoever owns the state.
#[derive(Debug)]
pub struct CompositionState {
    config: CompositionConfig,
    store: AttachmentStore,
    selection: SelectionController,
    pins: PinEditor,
    category: Option<CategoryId>,
    content: String,
    events: Vec<CompositionEvent>,
}

impl CompositionState {
    pub fn new(config: CompositionConfig) -> Self {
        Self {
            store: AttachmentStore::new(config.max_image_count),
            selection: SelectionController::new(),
            pins: PinEditor::new(config.max_pin_count),
            category: None,
            content: String::new(),
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Attachments in on-screen order.
    ///
    /// The active attachment's pins may be checked out; use [`Self::pins_of`]
    /// or [`Self::current_pins`] to read pins.
    pub fn attachments(&self) -> &[Attachment] {
        self.store.as_slice()
    }

    pub fn len(&self) -> usize {
        self.store.size()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.store.remaining()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.selection.active()
    }

    pub fn active_attachment(&self) -> Option<&Attachment> {
        self.selection.active().and_then(|i| self.store.get(i))
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.category
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    // ---- attachments ----

    /// Appends a placeholder for one picked image
    pub fn add_image(&mut self, image: LocalImage) -> CompositionResult<AttachmentId> {
        let previous_len = self.store.size();
        let attachment = Attachment::pending(image);
        let id = attachment.id;
        let index = self.store.append(attachment)?;

        self.events
            .push(CompositionEvent::AttachmentAdded { id, index });
        let before = self.selection.active();
        self.selection.on_append(previous_len);
        self.note_selection(before);
        Ok(id)
    }

    /// Appends placeholders for a whole batch, or nothing if it does not fit
    pub fn reserve_batch(&mut self, images: &[LocalImage]) -> CompositionResult<Vec<AttachmentId>> {
        if images.len() > self.store.remaining() {
            return Err(CompositionError::CapacityExceeded {
                limit: self.store.capacity(),
            });
        }
        images
            .iter()
            .cloned()
            .map(|image| self.add_image(image))
            .collect()
    }

    pub fn remove_attachment(&mut self, index: usize) -> CompositionResult<Attachment> {
        self.store.check_index(index)?;
        let id = self.store.as_slice()[index].id;
        if self.pins.owner() == Some(id) {
            self.pins.discard();
        }

        let removed = self.store.remove_at(index)?;
        let before = self.selection.active();
        self.selection.on_remove(index, self.store.size());

        log::debug!("Removed attachment {} at index {}", id, index);
        self.events
            .push(CompositionEvent::AttachmentRemoved { id, index });
        // The element under the pointer changed even if the index did not.
        if before == Some(index) {
            self.events.push(CompositionEvent::SelectionChanged {
                active: self.selection.active(),
            });
        } else {
            self.note_selection(before);
        }
        Ok(removed)
    }

    /// Makes `index` the active attachment, reconciling the previous one's pins first
    pub fn select(&mut self, index: usize) -> CompositionResult<()> {
        self.store.check_index(index)?;
        self.pins.reconcile(&mut self.store);

        let before = self.selection.active();
        self.selection.select(index, self.store.size())?;
        let id = self.store.as_slice()[index].id;
        self.pins.checkout(&mut self.store, id);
        self.note_selection(before);
        Ok(())
    }

    /// Moves an attachment by drag and drop
    pub fn drag(&mut self, from: usize, to: usize) -> CompositionResult<()> {
        let before = self.selection.active();
        ReorderEngine::drag(&mut self.store, &mut self.selection, from, to)?;
        if from != to {
            self.note_selection(before);
            self.events.push(CompositionEvent::SortChanged { from, to });
        }
        Ok(())
    }

    // ---- pins ----

    /// Pins of the active attachment, including unreconciled edits
    pub fn current_pins(&self) -> &[Pin] {
        match self.active_attachment() {
            Some(active) if self.pins.owner() == Some(active.id) => self.pins.pins(),
            Some(active) => &active.pins,
            None => &[],
        }
    }

    /// Pins of the attachment at `index`, reading through the scratch buffer
    pub fn pins_of(&self, index: usize) -> CompositionResult<&[Pin]> {
        self.store.check_index(index)?;
        let attachment = &self.store.as_slice()[index];
        if self.pins.owner() == Some(attachment.id) {
            Ok(self.pins.pins())
        } else {
            Ok(&attachment.pins)
        }
    }

    pub fn add_pin(&mut self, name: &str, url: Option<&str>) -> CompositionResult<usize> {
        let product = Product::new(name, url)?;
        let id = self.checkout_active()?;
        let index = self.pins.add_pin(product)?;
        self.events.push(CompositionEvent::PinsChanged { id });
        Ok(index)
    }

    pub fn update_pin(
        &mut self,
        index: usize,
        name: &str,
        url: Option<&str>,
    ) -> CompositionResult<()> {
        let product = Product::new(name, url)?;
        let id = self.checkout_active()?;
        self.pins.update_pin(index, product)?;
        self.events.push(CompositionEvent::PinsChanged { id });
        Ok(())
    }

    /// Places a pin; coordinates are clamped into the image bounds
    pub fn move_pin(&mut self, index: usize, x: f32, y: f32) -> CompositionResult<()> {
        let id = self.checkout_active()?;
        self.pins.move_pin(index, PinPosition::new(x, y))?;
        self.events.push(CompositionEvent::PinsChanged { id });
        Ok(())
    }

    pub fn remove_pin(&mut self, index: usize) -> CompositionResult<Pin> {
        let id = self.checkout_active()?;
        let pin = self.pins.remove_pin(index)?;
        self.events.push(CompositionEvent::PinsChanged { id });
        Ok(pin)
    }

    /// Commits the scratch buffer into its attachment
    pub fn reconcile(&mut self) {
        self.pins.reconcile(&mut self.store);
    }

    fn checkout_active(&mut self) -> CompositionResult<AttachmentId> {
        let id = self
            .active_attachment()
            .map(|a| a.id)
            .ok_or(CompositionError::NoActiveAttachment)?;
        self.pins.checkout(&mut self.store, id);
        Ok(id)
    }

    // ---- category / content ----

    pub fn set_category(&mut self, category: Option<CategoryId>) {
        if self.category != category {
            self.category = category;
            self.events
                .push(CompositionEvent::CategoryChanged { category });
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        if self.content != content {
            self.content = content;
            self.events.push(CompositionEvent::ContentChanged);
        }
    }

    // ---- uploads ----

    /// Applies a finished resolution to the attachment it belongs to.
    ///
    /// Returns `false` when that attachment has been removed in the meantime
    /// or was not waiting for an upload.
    pub fn apply_upload(&mut self, outcome: UploadOutcome) -> bool {
        let Some(attachment) = self.store.find_mut(outcome.id) else {
            log::debug!("Ignoring upload result for removed attachment {}", outcome.id);
            return false;
        };
        if attachment.upload_state != UploadState::Pending {
            log::warn!(
                "Attachment {} already {:?}, ignoring upload result",
                outcome.id,
                attachment.upload_state
            );
            return false;
        }

        let elapsed = chrono::Utc::now() - attachment.picked_at;
        match outcome.result {
            Ok(url) => {
                log::info!(
                    "Attachment {} resolved after {} ms: {}",
                    outcome.id,
                    elapsed.num_milliseconds(),
                    url
                );
                attachment.remote_url = Some(url);
                attachment.upload_state = UploadState::Resolved;
                attachment.upload_error = None;
                self.events
                    .push(CompositionEvent::UploadResolved { id: outcome.id });
            }
            Err(e) => {
                log::warn!("Upload of attachment {} failed: {}", outcome.id, e);
                let reason = e.to_string();
                attachment.upload_state = UploadState::Failed;
                attachment.upload_error = Some(reason.clone());
                self.events.push(CompositionEvent::UploadFailed {
                    id: outcome.id,
                    reason,
                });
            }
        }
        true
    }

    // ---- submission ----

    pub fn can_submit(&self) -> bool {
        validator::can_submit(self)
    }

    /// Reconciles pending pin edits, then builds the submission
    pub fn build_submission(&mut self) -> CompositionResult<Submission> {
        self.reconcile();
        validator::build_submission(self)
    }

    /// Throws the whole composition away
    pub fn discard(&mut self) {
        self.pins.discard();
        self.store.clear();
        self.selection.clear();
        self.category = None;
        self.content.clear();
        self.events.push(CompositionEvent::Discarded);
    }

    /// Takes the change notifications queued since the last call.
    ///
    /// Notifications accumulate until drained, so the owner drains after
    /// every gesture or upload outcome it applies.
    pub fn drain_events(&mut self) -> Vec<CompositionEvent> {
        std::mem::take(&mut self.events)
    }

    fn note_selection(&mut self, before: Option<usize>) {
        let active = self.selection.active();
        if active != before {
            self.events.push(CompositionEvent::SelectionChanged { active });
        }
    }
}
