//! Stateless HTTP request builder and response parser for AWS Accounts.
//!
//! # Design
//! `AwsAccountClient` holds only the base URL and API key. Each CRUD
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. Every `parse_*`
//! method is a closed `match` over the statuses that operation accepts;
//! anything else becomes `ApiError::UnexpectedStatus`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AwsAccount, AwsAccountsPage};

const COLLECTION: &str = "aws_accounts";

/// Synchronous, stateless request builder for the AWS Account endpoints.
#[derive(Clone)]
pub struct AwsAccountClient {
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for AwsAccountClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsAccountClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AwsAccountClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request one page of accounts. CloudHealth counts pages from 1.
    pub fn build_list_aws_accounts(&self, page: u32, per_page: u32) -> Result<HttpRequest, ApiError> {
        let params = [("page", page.to_string()), ("per_page", per_page.to_string())];
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.url(COLLECTION, &params)?,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_get_aws_account(&self, id: i64) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.url(&format!("{COLLECTION}/{id}"), &[])?,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_create_aws_account(&self, account: &AwsAccount) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(COLLECTION, &[])?,
            headers: json_headers(),
            body: Some(encode(account)?),
        })
    }

    /// `account.id` selects the remote resource.
    pub fn build_update_aws_account(&self, account: &AwsAccount) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.url(&format!("{COLLECTION}/{}", account.id), &[])?,
            headers: json_headers(),
            body: Some(encode(account)?),
        })
    }

    pub fn build_delete_aws_account(&self, id: i64) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: self.url(&format!("{COLLECTION}/{id}"), &[])?,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn parse_list_aws_accounts(&self, response: HttpResponse) -> Result<Vec<AwsAccount>, ApiError> {
        match response.status {
            200 => decode::<AwsAccountsPage>(&response.body).map(|page| page.accounts),
            401 => Err(ApiError::Authentication),
            404 => Err(ApiError::NotFound),
            other => Err(ApiError::UnexpectedStatus(other)),
        }
    }

    pub fn parse_get_aws_account(&self, response: HttpResponse) -> Result<AwsAccount, ApiError> {
        match response.status {
            200 => decode(&response.body),
            401 => Err(ApiError::Authentication),
            404 => Err(ApiError::NotFound),
            other => Err(ApiError::UnexpectedStatus(other)),
        }
    }

    /// `attempted` is the account that was sent; its name goes into the
    /// conflict error.
    pub fn parse_create_aws_account(
        &self,
        response: HttpResponse,
        attempted: &AwsAccount,
    ) -> Result<AwsAccount, ApiError> {
        match response.status {
            201 => decode(&response.body),
            401 => Err(ApiError::Authentication),
            422 => Err(conflict(attempted)),
            other => Err(ApiError::UnexpectedStatus(other)),
        }
    }

    pub fn parse_update_aws_account(
        &self,
        response: HttpResponse,
        attempted: &AwsAccount,
    ) -> Result<AwsAccount, ApiError> {
        match response.status {
            200 => decode(&response.body),
            401 => Err(ApiError::Authentication),
            422 => Err(conflict(attempted)),
            other => Err(ApiError::UnexpectedStatus(other)),
        }
    }

    pub fn parse_delete_aws_account(&self, response: HttpResponse) -> Result<(), ApiError> {
        match response.status {
            200 | 204 => Ok(()),
            401 => Err(ApiError::Authentication),
            404 => Err(ApiError::NotFound),
            other => Err(ApiError::UnexpectedStatus(other)),
        }
    }

    /// Absolute URL for `path` with `api_key` first, then `params`.
    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<String, ApiError> {
        let mut query: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        query.extend(params.iter().map(|(key, value)| (*key, value.as_str())));
        let query =
            serde_urlencoded::to_string(&query).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(format!("{}/{path}?{query}", self.base_url))
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn encode(account: &AwsAccount) -> Result<String, ApiError> {
    serde_json::to_string(account).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn conflict(attempted: &AwsAccount) -> ApiError {
    ApiError::Conflict {
        name: attempted.name.clone(),
    }
}
