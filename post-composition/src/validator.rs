use serde::{Deserialize, Serialize};

use crate::composition::CompositionState;
use crate::error::{CompositionError, CompositionResult, NotReadyReason};
use crate::models::{CategoryId, Pin, UploadState};

/// One image of a post ready to be created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionImage {
    pub url: String,
    pub pins: Vec<Pin>,
}

/// Arguments for the post-creation collaborator, in on-screen order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub category_id: CategoryId,
    pub content: String,
    pub images: Vec<SubmissionImage>,
}

/// Checks the three submission requirements in the order they are shown to the user
pub fn readiness(state: &CompositionState) -> Result<CategoryId, NotReadyReason> {
    if state.is_empty() {
        return Err(NotReadyReason::NoImages);
    }

    let (pending, failed) = state
        .attachments()
        .iter()
        .fold((0, 0), |(pending, failed), a| match a.upload_state {
            UploadState::Failed => (pending, failed + 1),
            _ if !a.is_resolved() => (pending + 1, failed),
            _ => (pending, failed),
        });
    if pending > 0 || failed > 0 {
        return Err(NotReadyReason::UnresolvedUploads { pending, failed });
    }

    state.category().ok_or(NotReadyReason::NoCategory)
}

pub fn can_submit(state: &CompositionState) -> bool {
    readiness(state).is_ok()
}

/// Builds the submission from attachment order and each attachment's pins.
///
/// Pins still sitting in the scratch buffer are read through, so the result
/// is the same whether or not the caller reconciled first.
pub fn build_submission(state: &CompositionState) -> CompositionResult<Submission> {
    let category_id = readiness(state).map_err(CompositionError::NotReady)?;

    let images = state
        .attachments()
        .iter()
        .enumerate()
        .filter_map(|(index, attachment)| {
            let url = attachment.remote_url.clone()?;
            let pins = state.pins_of(index).ok()?.to_vec();
            Some(SubmissionImage { url, pins })
        })
        .collect();

    Ok(Submission {
        category_id,
        content: state.content().to_string(),
        images,
    })
}
