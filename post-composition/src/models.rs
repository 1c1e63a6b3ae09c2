use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CompositionError, CompositionResult};

/// Default upper bound for images in one post
pub const MAX_IMAGE_COUNT: usize = 10;

/// Default upper bound for pins on one image
pub const MAX_PIN_COUNT: usize = 10;

/// Stable identifier of an attachment, assigned at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentId(Uuid);

impl AttachmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttachmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a selectable (sub-)category
pub type CategoryId = i64;

/// A selectable category as delivered by the category collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Handle to an image picked on the device (content URI or file path)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LocalImage {
    pub uri: String,
}

impl LocalImage {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Upload progress of a single attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadState {
    Pending,
    Resolved,
    Failed,
}

/// One image in the post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub id: AttachmentId,
    pub local: LocalImage,
    pub remote_url: Option<String>,
    /// Empty while checked out for editing; read through `CompositionState::pins_of`
    pub(crate) pins: Vec<Pin>,
    pub upload_state: UploadState,
    pub upload_error: Option<String>,
    pub picked_at: DateTime<Utc>,
}

impl Attachment {
    /// Placeholder for a freshly picked image, waiting for its upload
    pub fn pending(local: LocalImage) -> Self {
        Self {
            id: AttachmentId::new(),
            local,
            remote_url: None,
            pins: Vec::new(),
            upload_state: UploadState::Pending,
            upload_error: None,
            picked_at: Utc::now(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.upload_state == UploadState::Resolved && self.remote_url.is_some()
    }
}

/// Normalized position of a pin relative to the image bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinPosition {
    pub x: f32,
    pub y: f32,
}

impl PinPosition {
    /// Builds a position, clamping both components into [0, 1].
    /// Non-finite components fall back to the centre.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn center() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl Default for PinPosition {
    fn default() -> Self {
        Self::center()
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Product referenced by a pin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub url: Option<String>,
}

impl Product {
    /// Validates and normalizes product input.
    ///
    /// The name is trimmed and must not be empty; a blank URL is stored as `None`.
    pub fn new(name: &str, url: Option<&str>) -> CompositionResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CompositionError::InvalidProduct(
                "product name must not be empty".to_string(),
            ));
        }

        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            url,
        })
    }
}

/// A positioned product annotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pin {
    pub position: PinPosition,
    pub product: Product,
}

impl Pin {
    /// New pin awaiting placement, centred on the image
    pub fn new(product: Product) -> Self {
        Self {
            position: PinPosition::center(),
            product,
        }
    }
}

/// Limits applied to one composition session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompositionConfig {
    pub max_image_count: usize,
    pub max_pin_count: usize,
    /// Upper bound on transfers running at the same time
    pub max_concurrent_uploads: usize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            max_image_count: MAX_IMAGE_COUNT,
            max_pin_count: MAX_PIN_COUNT,
            max_concurrent_uploads: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_clamped() {
        let pos = PinPosition::new(-0.3, 1.7);
        assert_eq!(pos, PinPosition { x: 0.0, y: 1.0 });

        let pos = PinPosition::new(f32::NAN, 0.25);
        assert_eq!(pos, PinPosition { x: 0.5, y: 0.25 });
    }

    #[test]
    fn test_product_normalization() {
        let product = Product::new("  Lamp ", Some("   ")).unwrap();
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.url, None);

        assert!(matches!(
            Product::new("   ", None),
            Err(CompositionError::InvalidProduct(_))
        ));
    }

    #[test]
    fn test_attachment_ids_are_unique() {
        let a = Attachment::pending(LocalImage::new("a.jpg"));
        let b = Attachment::pending(LocalImage::new("a.jpg"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.upload_state, UploadState::Pending);
        assert!(a.pins.is_empty());
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: CompositionConfig = serde_json::from_str(r#"{"max_pin_count": 4}"#).unwrap();
        assert_eq!(config.max_pin_count, 4);
        assert_eq!(config.max_image_count, MAX_IMAGE_COUNT);
    }
}
