//! Promptforge Gateway Library
//!
//! Client for the external completion gateway: an OpenAI-style chat
//! completions endpoint that turns the refinement instructions plus the
//! normalized content parts into a free-form text completion. The gateway is
//! a black box to the rest of the system; everything above this crate only
//! sees the `CompletionClient` trait and the `GatewayError` taxonomy.
//!
//! One request per submission, no retries. Credentials are injected at
//! construction (`GatewaySettings`), never read from the environment here.

pub mod client;
pub mod error;
pub mod prompt;
pub mod request;

pub use client::{CompletionClient, HttpCompletionClient};
pub use error::GatewayError;
pub use prompt::SYSTEM_PROMPT;
pub use request::ContentPart;
