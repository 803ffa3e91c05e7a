#[cfg(test)]
#[path = "endpoints_test.rs"]
mod tests;

use std::sync::Arc;

use serde_json::json;
use serde_json::Value;

use super::ApiClient;
use crate::domain::models::AccessToken;
use crate::domain::models::ApiRequest;
use crate::domain::models::Profile;
use crate::domain::models::RequestError;
use crate::domain::models::Transaction;
use crate::domain::models::TransactionList;
use crate::domain::models::TransactionQuery;
use crate::domain::models::Wallet;
use crate::domain::services::SessionStore;

/// Typed calls against the Savi REST API. Everything goes through the
/// shared request pipeline.
pub struct SaviApi {
    client: ApiClient,
}

impl SaviApi {
    pub fn new(client: ApiClient) -> SaviApi {
        return SaviApi { client };
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        return self.client.session();
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, RequestError> {
        let body = json!({ "email": email, "password": password });
        return self.client.send(ApiRequest::post("/auth/login", body)).await;
    }

    pub async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), RequestError> {
        let body = json!({ "fullName": full_name, "email": email, "password": password });
        self.client
            .send::<Value>(ApiRequest::post("/user/create", body))
            .await?;

        return Ok(());
    }

    pub async fn verify(&self, code: &str) -> Result<AccessToken, RequestError> {
        let body = json!({ "codeId": code });
        let res = self
            .client
            .send::<Value>(ApiRequest::post("/user/verify", body))
            .await?;

        // Some deployments answer the verification with no token at all.
        let token = res
            .get("access_token")
            .and_then(|e| return e.as_str())
            .map(|e| return e.to_string());

        return Ok(AccessToken {
            access_token: token,
        });
    }

    pub async fn profile(&self) -> Result<Profile, RequestError> {
        return self.client.send(ApiRequest::get("/auth/profile")).await;
    }

    pub async fn wallet(&self) -> Result<Wallet, RequestError> {
        return self.client.send(ApiRequest::get("/wallet")).await;
    }

    pub async fn create_transaction_from_speech(
        &self,
        transcript: &str,
    ) -> Result<Value, RequestError> {
        let body = json!({ "transcript": transcript });
        return self
            .client
            .send(ApiRequest::post("/transaction/ai-create", body))
            .await;
    }

    pub async fn transactions(
        &self,
        user_id: &str,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, RequestError> {
        let request = ApiRequest::get(&format!("/transaction/{user_id}/transactions"))
            .with_query("type", query.filter.as_query())
            .with_query("createdAtStart", query.created_at_start.as_deref())
            .with_query("startDate", query.start_date.as_deref())
            .with_query("endDate", query.end_date.as_deref());

        let res = self.client.send::<TransactionList>(request).await?;
        return Ok(res.into_vec());
    }
}
