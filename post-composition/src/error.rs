/// Result type for composition operations
pub type CompositionResult<T> = Result<T, CompositionError>;

/// Why a composition cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotReadyReason {
    NoImages,
    UnresolvedUploads { pending: usize, failed: usize },
    NoCategory,
}

impl std::fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotReadyReason::NoImages => write!(f, "no images attached"),
            NotReadyReason::UnresolvedUploads { pending, failed } => write!(
                f,
                "{} upload(s) pending, {} upload(s) failed",
                pending, failed
            ),
            NotReadyReason::NoCategory => write!(f, "no category selected"),
        }
    }
}

/// Errors produced by the composition engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// Image or pin count is at its limit; the operation was a no-op
    CapacityExceeded { limit: usize },
    /// Stale or invalid index passed by the caller
    IndexOutOfRange { index: usize, len: usize },
    /// Empty product name on pin creation/update
    InvalidProduct(String),
    /// Pin operation while no attachment is selected
    NoActiveAttachment,
    /// Submission attempted before the composition is complete
    NotReady(NotReadyReason),
}

impl std::fmt::Display for CompositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositionError::CapacityExceeded { limit } => {
                write!(f, "Capacity exceeded: limit is {}", limit)
            }
            CompositionError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for length {}", index, len)
            }
            CompositionError::InvalidProduct(msg) => write!(f, "Invalid product: {}", msg),
            CompositionError::NoActiveAttachment => write!(f, "No attachment selected"),
            CompositionError::NotReady(reason) => write!(f, "Not ready to submit: {}", reason),
        }
    }
}

impl std::error::Error for CompositionError {}

/// Notice texts for the UI layer
impl CompositionError {
    pub fn user_message(&self) -> String {
        match self {
            CompositionError::CapacityExceeded { limit } => {
                format!("You can add at most {} items here.", limit)
            }
            CompositionError::IndexOutOfRange { .. } => {
                "That item is no longer available. Please try again.".to_string()
            }
            CompositionError::InvalidProduct(_) => "Please enter a product name.".to_string(),
            CompositionError::NoActiveAttachment => "Select an image first.".to_string(),
            CompositionError::NotReady(NotReadyReason::NoImages) => {
                "Add at least one image.".to_string()
            }
            CompositionError::NotReady(NotReadyReason::UnresolvedUploads { failed, .. })
                if *failed > 0 =>
            {
                "Some images failed to upload. Remove them and pick them again.".to_string()
            }
            CompositionError::NotReady(NotReadyReason::UnresolvedUploads { .. }) => {
                "Images are still uploading.".to_string()
            }
            CompositionError::NotReady(NotReadyReason::NoCategory) => {
                "Choose a category.".to_string()
            }
        }
    }
}

/// Failure of the object-storage collaborator for one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The local image could not be read
    CorruptImage(String),
    /// Transfer to remote storage failed
    Transfer(String),
    Other(String),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::CorruptImage(msg) => write!(f, "Corrupt image: {}", msg),
            UploadError::Transfer(msg) => write!(f, "Upload failed: {}", msg),
            UploadError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for UploadError {}
