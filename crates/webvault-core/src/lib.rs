//! # webvault-core
//!
//! Core types, traits, and validation schemas for WebVault.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the database and API crates depend on.

pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use uuid_utils::new_v7;
pub use validation::{
    normalize_opt, validate_domain, BulkReview, BulkReviewInput, CreateTagInput,
    CreateWebsiteInput, NewTag, NewWebsite, Patch, ReviewSubmissionInput, SubmissionReview,
    TagPatch, UpdateTagInput, ValidationErrors,
};
