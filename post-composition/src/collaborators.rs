//! Contracts of the services the composition depends on.
//!
//! The upload contract lives next to its coordinator in [`crate::upload`];
//! the picker contract in [`crate::picker`].

use std::future::Future;

use crate::models::Category;
use crate::validator::Submission;

/// Source of selectable categories, consumed once per session
pub trait CategorySource {
    type Error: std::error::Error;

    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, Self::Error>>;
}

/// Post-creation collaborator; returns the id of the created post
pub trait PostSubmitter {
    type Error: std::error::Error;

    fn submit(&self, submission: &Submission) -> impl Future<Output = Result<i64, Self::Error>>;
}
