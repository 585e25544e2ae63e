//! Blocking client for the CloudHealth AWS Account API.
//!
//! # Overview
//! `AwsAccountClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `CloudHealthClient` drives it over a `Transport`, by default a
//! `ureq` agent with a per-request timeout, and adds the paginated
//! "list all" walk.
//!
//! # Design
//! - Both clients are stateless apart from their configuration.
//! - Each CRUD operation is split into `build_*` and `parse_*`, so status
//!   handling is testable without a server.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use cloudhealth_core::{AwsAccount, AwsAccountAuthentication, CloudHealthClient, ClientConfig};
//!
//! # fn main() -> cloudhealth_core::Result<()> {
//! let client = CloudHealthClient::new(ClientConfig::new("my-api-key"));
//! let created = client.create_aws_account(&AwsAccount::new(
//!     "payer",
//!     AwsAccountAuthentication::assume_role("arn:aws:iam::123456789012:role/cloudhealth", "ext-id"),
//! ))?;
//! let all = client.get_all_aws_accounts(100)?;
//! assert!(all.iter().any(|a| a.id == created.id));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use client::AwsAccountClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::CloudHealthClient;
pub use transport::{Transport, UreqTransport};
pub use types::{AwsAccount, AwsAccountAuthentication, AwsAccountsPage};
