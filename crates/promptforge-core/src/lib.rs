//! Promptforge Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! input validation shared across all Promptforge components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, GatewaySettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Constraints, Deliverables, FinalizedRefinement, InputType, ProductOverview, RefinedPrompt,
    RefinedPromptMetadata, Requirements, StoredFile, Submission, SubmissionListQuery,
    SubmissionStats, SubmissionStatus, ValidationFlags,
};
