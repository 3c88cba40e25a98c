pub mod client;
pub mod types;

pub use client::{ClientError, GatewayClient};
pub use types::{ErrorBody, GenerateRequest, GenerateResponse, HealthResponse, MAX_DESCRIPTION_CHARS};
