use crate::models::{AttachmentId, CategoryId};

/// Change notification queued after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionEvent {
    AttachmentAdded { id: AttachmentId, index: usize },
    AttachmentRemoved { id: AttachmentId, index: usize },
    /// Emitted once a drag has been applied to both store and selection
    SortChanged { from: usize, to: usize },
    SelectionChanged { active: Option<usize> },
    PinsChanged { id: AttachmentId },
    UploadResolved { id: AttachmentId },
    UploadFailed { id: AttachmentId, reason: String },
    CategoryChanged { category: Option<CategoryId> },
    ContentChanged,
    Discarded,
}
