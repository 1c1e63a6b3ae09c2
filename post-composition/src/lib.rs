//! # Post Composition
//!
//! In-memory engine behind the "create post" screen.
//!
//! This crate provides:
//! - An ordered, bounded list of image attachments
//! - Active-selection tracking that survives insert, delete and reorder
//! - Product pins edited through a scratch buffer and reconciled per image
//! - Concurrent upload resolution that keeps pick order
//! - Submission readiness checks and the ordered submission payload
//!
//! ## Separation of Concerns
//!
//! This crate does **not** render anything, talk HTTP, or persist drafts.
//! Uploading, category listing and post creation are collaborators behind
//! the traits in [`upload`], [`collaborators`] and [`picker`].
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use post_composition::{CompositionConfig, CompositionState, UploadCoordinator};
//!
//! let config = CompositionConfig::default();
//! let mut state = CompositionState::new(config.clone());
//! let mut uploads = UploadCoordinator::new(resolver, &config);
//!
//! uploads.accept_batch(&mut state, picked_images)?;
//! state.add_pin("Desk lamp", Some("https://shop.example/lamp"))?;
//! state.set_category(Some(3));
//!
//! uploads.drain(&mut state).await;
//! let submission = state.build_submission()?;
//! ```

pub mod collaborators;
pub mod composition;
pub mod error;
pub mod events;
pub mod models;
pub mod picker;
pub mod pins;
pub mod reorder;
pub mod selection;
pub mod store;
pub mod upload;
pub mod validator;

pub use collaborators::{CategorySource, PostSubmitter};
pub use composition::CompositionState;
pub use error::{CompositionError, CompositionResult, NotReadyReason, UploadError};
pub use events::CompositionEvent;
pub use models::{
    Attachment, AttachmentId, Category, CategoryId, CompositionConfig, LocalImage, Pin,
    PinPosition, Product, UploadState, MAX_IMAGE_COUNT, MAX_PIN_COUNT,
};
pub use picker::{ImagePicker, PickerError, PickerRequest};
pub use upload::{UploadCoordinator, UploadOutcome, UploadResolver};
pub use validator::{Submission, SubmissionImage};
