use std::sync::Arc;

use async_trait::async_trait;

use super::RequestError;

pub type SubmitterArc = Arc<dyn Submitter + Send + Sync>;

/// Turns a finished transcript into a transaction on the server.
#[async_trait]
pub trait Submitter {
    async fn submit(&self, transcript: &str) -> Result<(), RequestError>;
}
