#[cfg(test)]
#[path = "submissions_test.rs"]
mod tests;

use std::sync::Arc;

use async_trait::async_trait;

use super::QueryCache;
use crate::domain::models::CacheKey;
use crate::domain::models::RequestError;
use crate::domain::models::Submitter;
use crate::infrastructure::api::SaviApi;

/// Views that change once a transaction is created.
pub const AFFECTED_BY_SUBMISSION: [CacheKey; 3] =
    [CacheKey::Wallet, CacheKey::Me, CacheKey::TransactionsToday];

/// Sends a transcript to the server, which parses it into a transaction.
pub struct Submissions {
    api: Arc<SaviApi>,
    cache: Arc<QueryCache>,
}

impl Submissions {
    pub fn new(api: Arc<SaviApi>, cache: Arc<QueryCache>) -> Submissions {
        return Submissions { api, cache };
    }
}

#[async_trait]
impl Submitter for Submissions {
    #[allow(clippy::implicit_return)]
    async fn submit(&self, transcript: &str) -> Result<(), RequestError> {
        let created = self.api.create_transaction_from_speech(transcript).await?;
        tracing::debug!(created = ?created, "Transaction created from transcript");

        for key in AFFECTED_BY_SUBMISSION.iter() {
            self.cache.invalidate(key);
        }

        return Ok(());
    }
}
