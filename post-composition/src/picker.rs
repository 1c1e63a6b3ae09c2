// Image picker contract
//
// Picking itself is platform UI; this module only describes how many images
// may be requested and trims whatever comes back to that limit.

use crate::composition::CompositionState;
use crate::models::LocalImage;

#[derive(Debug, Clone)]
pub enum PickerError {
    PermissionDenied(String),
    Cancelled(String),
    NotFound(String),
    Other(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            PickerError::Cancelled(msg) => write!(f, "Cancelled: {}", msg),
            PickerError::NotFound(msg) => write!(f, "Image not found: {}", msg),
            PickerError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {}

/// How many images the picker may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerRequest {
    pub max_image_count: usize,
}

impl PickerRequest {
    /// `None` when the composition is already full
    pub fn for_state(state: &CompositionState) -> Option<Self> {
        match state.remaining_capacity() {
            0 => None,
            max_image_count => Some(Self { max_image_count }),
        }
    }

    /// Drops images beyond the requested count, keeping pick order
    pub fn limit(&self, mut images: Vec<LocalImage>) -> Vec<LocalImage> {
        if images.len() > self.max_image_count {
            log::warn!(
                "Picker returned {} images, keeping the first {}",
                images.len(),
                self.max_image_count
            );
            images.truncate(self.max_image_count);
        }
        images
    }
}

/// Image-picker collaborator
pub trait ImagePicker {
    fn pick_images(&self, request: &PickerRequest) -> Result<Vec<LocalImage>, PickerError>;
}
