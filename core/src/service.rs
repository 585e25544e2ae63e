//! Blocking CloudHealth client that executes the AWS Account operations.
//!
//! # Design
//! `CloudHealthClient` pairs the sans-IO `AwsAccountClient` with a
//! `Transport`. It keeps no state between calls beyond its configuration,
//! so a shared reference can be used from several threads at once.

use tracing::{debug, instrument, warn};

use crate::client::AwsAccountClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::AwsAccount;

/// Client for the CloudHealth AWS Account endpoints.
#[derive(Debug, Clone)]
pub struct CloudHealthClient<T = UreqTransport> {
    config: ClientConfig,
    accounts: AwsAccountClient,
    transport: T,
}

impl CloudHealthClient<UreqTransport> {
    /// Client that talks to `config.endpoint` over HTTP with `config.timeout`
    /// applied to every request.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

impl<T: Transport> CloudHealthClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let accounts = AwsAccountClient::new(&config.endpoint, &config.api_key);
        Self {
            config,
            accounts,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch every AWS account, `per_page` at a time.
    ///
    /// Pages are requested in order from page 1 until one comes back with
    /// fewer than `per_page` entries. A page larger than `per_page`, or a
    /// `per_page` of zero, ends the walk after that page. Any failed page
    /// fails the whole call.
    #[instrument(level = "debug", skip(self))]
    pub fn get_all_aws_accounts(&self, per_page: u32) -> Result<Vec<AwsAccount>> {
        let mut accounts = Vec::new();
        let mut page = 1;
        loop {
            let request = self.accounts.build_list_aws_accounts(page, per_page)?;
            let batch = self
                .send(request)
                .and_then(|response| self.accounts.parse_list_aws_accounts(response))
                .inspect_err(|err| warn!(%err, page, "failed to list AWS accounts"))?;

            let fetched = batch.len();
            debug!(page, fetched, "fetched AWS account page");
            accounts.extend(batch);

            if per_page == 0 || fetched != per_page as usize {
                break;
            }
            page += 1;
        }
        Ok(accounts)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_aws_account(&self, id: i64) -> Result<AwsAccount> {
        let request = self.accounts.build_get_aws_account(id)?;
        self.send(request)
            .and_then(|response| self.accounts.parse_get_aws_account(response))
            .inspect_err(|err| warn!(%err, "failed to get AWS account"))
    }

    /// Enable a new AWS account. The returned value carries the assigned id.
    #[instrument(level = "debug", skip_all, fields(name = %account.name))]
    pub fn create_aws_account(&self, account: &AwsAccount) -> Result<AwsAccount> {
        let request = self.accounts.build_create_aws_account(account)?;
        self.send(request)
            .and_then(|response| self.accounts.parse_create_aws_account(response, account))
            .inspect_err(|err| warn!(%err, "failed to create AWS account"))
    }

    #[instrument(level = "debug", skip_all, fields(id = account.id, name = %account.name))]
    pub fn update_aws_account(&self, account: &AwsAccount) -> Result<AwsAccount> {
        let request = self.accounts.build_update_aws_account(account)?;
        self.send(request)
            .and_then(|response| self.accounts.parse_update_aws_account(response, account))
            .inspect_err(|err| warn!(%err, "failed to update AWS account"))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_aws_account(&self, id: i64) -> Result<()> {
        let request = self.accounts.build_delete_aws_account(id)?;
        self.send(request)
            .and_then(|response| self.accounts.parse_delete_aws_account(response))
            .inspect_err(|err| warn!(%err, "failed to delete AWS account"))
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(
            method = request.method.as_str(),
            url = request.redacted_url(),
            "sending CloudHealth request"
        );
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received CloudHealth response");
        Ok(response)
    }
}
