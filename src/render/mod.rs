pub mod client;
pub mod types;

pub use client::{RenderError, RenderServiceClient};
pub use types::{JobStatus, RenderSubmission};
