use post_composition::{
    AttachmentId, Category, CategoryId, CategorySource, CompositionConfig, CompositionError,
    CompositionState, ImagePicker, PickerRequest, PostSubmitter, UploadCoordinator,
    UploadResolver, UploadState,
};

use crate::error::AppError;

/// One post-editing session: composition state, its uploads and the backend
pub struct PostEditService<A> {
    api: A,
    state: CompositionState,
    uploads: UploadCoordinator<A>,
    categories: Vec<Category>,
}

impl<A> PostEditService<A>
where
    A: UploadResolver + CategorySource + PostSubmitter + Clone + 'static,
    AppError: From<<A as PostSubmitter>::Error>,
{
    pub fn new(api: A, config: CompositionConfig) -> Self {
        let uploads = UploadCoordinator::new(api.clone(), &config);
        Self {
            api,
            state: CompositionState::new(config),
            uploads,
            categories: Vec::new(),
        }
    }

    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    /// Direct access for pin edits, selection and reordering.
    ///
    /// Call [`Self::flush_events`] once the edit is done.
    pub fn state_mut(&mut self) -> &mut CompositionState {
        &mut self.state
    }

    /// Loads the selectable categories; on failure the list stays empty
    pub async fn load_categories(&mut self) -> &[Category] {
        match self.api.list_categories().await {
            Ok(categories) => {
                log::info!("Loaded {} categories", categories.len());
                self.categories = categories;
            }
            Err(e) => {
                log::warn!("Loading categories failed: {}", e);
                self.categories.clear();
            }
        }
        &self.categories
    }

    pub fn choose_category(&mut self, id: CategoryId) -> Result<(), AppError> {
        if !self.categories.iter().any(|c| c.id == id) {
            return Err(AppError::Validation(format!("Unknown category: {}", id)));
        }
        self.state.set_category(Some(id));
        self.flush_events();
        Ok(())
    }

    /// Asks the picker for as many images as still fit and starts uploading them
    pub fn pick_images(
        &mut self,
        picker: &impl ImagePicker,
    ) -> Result<Vec<AttachmentId>, AppError> {
        let request = PickerRequest::for_state(&self.state).ok_or(
            CompositionError::CapacityExceeded {
                limit: self.state.config().max_image_count,
            },
        )?;
        let images = picker.pick_images(&request)?;
        let ids = self.uploads.accept_batch(&mut self.state, images)?;
        self.flush_events();
        Ok(ids)
    }

    /// Removes an image and cancels its upload if still running
    pub fn remove_image(&mut self, index: usize) -> Result<(), AppError> {
        let removed = self.state.remove_attachment(index)?;
        self.uploads.cancel(removed.id);
        self.flush_events();
        Ok(())
    }

    /// Removes every attachment whose upload failed, returning how many
    pub fn remove_failed(&mut self) -> Result<usize, AppError> {
        let failed: Vec<usize> = self
            .state
            .attachments()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.upload_state == UploadState::Failed)
            .map(|(index, _)| index)
            .collect();

        for index in failed.iter().rev() {
            self.remove_image(*index)?;
        }
        Ok(failed.len())
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.uploads.in_flight()
    }

    /// Waits until every started upload has resolved or failed
    pub async fn wait_for_uploads(&mut self) -> usize {
        let applied = self.uploads.drain(&mut self.state).await;
        self.flush_events();
        applied
    }

    /// Creates the post and resets the session
    pub async fn submit(&mut self) -> Result<i64, AppError> {
        let submission = self.state.build_submission()?;
        let post_id = self.api.submit(&submission).await?;

        self.state.discard();
        self.flush_events();
        Ok(post_id)
    }

    /// Drains the change notifications queued by the state, logging each
    pub fn flush_events(&mut self) -> usize {
        let events = self.state.drain_events();
        for event in &events {
            log::debug!("Composition event: {:?}", event);
        }
        events.len()
    }
}
