//! # Post API
//!
//! HTTP client for the post backend.
//!
//! This crate provides:
//! - Pre-signed object-storage upload of picked images
//! - The selectable category list (sub-categories, flattened)
//! - Post creation from a finished composition
//!
//! [`PostApiService`] implements the collaborator traits of
//! `post-composition`, so it plugs straight into an `UploadCoordinator`.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use post_api::{ApiConfig, PostApiService};
//!
//! let service = PostApiService::new(ApiConfig {
//!     base_url: "https://api.example.com".to_string(),
//!     ..ApiConfig::default()
//! })?;
//! let categories = service.fetch_categories().await?;
//! ```

pub mod models;
pub mod service;

pub use models::{ApiConfig, ApiResponse, CategoryList, CreatePostRequest};
pub use service::{ApiError, PostApiService};
