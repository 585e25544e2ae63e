//! Domain DTOs for the CloudHealth AWS Account API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Optional credential
//! fields are left out of the JSON when `None` or empty, so a descriptor for
//! one protocol never sends the other protocol's fields.
//!
//! Decoding is lenient: a missing or `null` field reads as its zero value,
//! so a sparse account in a list page does not fail the whole page.

use serde::{Deserialize, Deserializer, Serialize};

/// Protocol value for static access-key credentials.
pub const PROTOCOL_ACCESS_KEY: &str = "access_key";
/// Protocol value for cross-account role assumption.
pub const PROTOCOL_ASSUME_ROLE: &str = "assume_role";

/// An AWS account enabled in CloudHealth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccount {
    /// Server-assigned identifier. Ignored by the server on create.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authentication: AwsAccountAuthentication,
}

impl AwsAccount {
    /// An account ready to be created; the server assigns `id`.
    pub fn new(name: impl Into<String>, authentication: AwsAccountAuthentication) -> Self {
        Self {
            id: 0,
            name: name.into(),
            authentication,
        }
    }
}

/// Credentials CloudHealth uses to reach the AWS account.
///
/// Which fields are required depends on `protocol`. The client sends what it
/// is given and lets the server validate the combination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccountAuthentication {
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub assume_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub assume_role_external_id: Option<String>,
}

impl AwsAccountAuthentication {
    pub fn access_key(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            protocol: PROTOCOL_ACCESS_KEY.to_string(),
            access_key: Some(access_key.into()),
            secret_key: Some(secret_key.into()),
            ..Self::default()
        }
    }

    pub fn assume_role(arn: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            protocol: PROTOCOL_ASSUME_ROLE.to_string(),
            assume_role_arn: Some(arn.into()),
            assume_role_external_id: Some(external_id.into()),
            ..Self::default()
        }
    }
}

/// One page of `GET /aws_accounts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccountsPage {
    #[serde(rename = "aws_accounts", default, deserialize_with = "null_as_default")]
    pub accounts: Vec<AwsAccount>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assume_role_omits_access_key_fields() {
        let account = AwsAccount::new(
            "audit",
            AwsAccountAuthentication::assume_role("arn:aws:iam::123456789012:role/ch", "ext-1"),
        );
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["id"], 0);
        assert_eq!(json["name"], "audit");
        let auth = json["authentication"].as_object().unwrap();
        assert_eq!(auth["protocol"], "assume_role");
        assert_eq!(auth["assume_role_arn"], "arn:aws:iam::123456789012:role/ch");
        assert_eq!(auth["assume_role_external_id"], "ext-1");
        assert!(!auth.contains_key("access_key"));
        assert!(!auth.contains_key("secret_key"));
    }

    #[test]
    fn empty_strings_are_omitted() {
        let auth = AwsAccountAuthentication {
            protocol: "access_key".to_string(),
            access_key: Some("AKIA".to_string()),
            secret_key: Some(String::new()),
            ..AwsAccountAuthentication::default()
        };
        let json = serde_json::to_value(&auth).unwrap();
        assert_eq!(json, serde_json::json!({"protocol": "access_key", "access_key": "AKIA"}));
    }

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let account: AwsAccount = serde_json::from_str(
            r#"{"id":42,"name":"dev","authentication":{"protocol":"assume_role"}}"#,
        )
        .unwrap();
        assert_eq!(account.id, 42);
        assert!(account.authentication.assume_role_arn.is_none());
        assert!(account.authentication.access_key.is_none());
    }

    #[test]
    fn sparse_account_reads_zero_values() {
        let account: AwsAccount = serde_json::from_str(r#"{"id":2,"name":"linked"}"#).unwrap();
        assert_eq!(account.id, 2);
        assert_eq!(account.name, "linked");
        assert_eq!(account.authentication, AwsAccountAuthentication::default());

        let account: AwsAccount =
            serde_json::from_str(r#"{"authentication":{"access_key":"AKIA"}}"#).unwrap();
        assert_eq!(account.id, 0);
        assert!(account.name.is_empty());
        assert!(account.authentication.protocol.is_empty());
        assert_eq!(account.authentication.access_key.as_deref(), Some("AKIA"));
    }

    #[test]
    fn null_fields_read_as_zero_values() {
        let account: AwsAccount = serde_json::from_str(
            r#"{"id":null,"name":null,"authentication":{"protocol":null,"secret_key":null}}"#,
        )
        .unwrap();
        assert_eq!(account.id, 0);
        assert!(account.name.is_empty());
        assert!(account.authentication.protocol.is_empty());
        assert!(account.authentication.secret_key.is_none());

        let account: AwsAccount =
            serde_json::from_str(r#"{"id":5,"name":"x","authentication":null}"#).unwrap();
        assert_eq!(account.authentication, AwsAccountAuthentication::default());
    }

    #[test]
    fn wrong_types_still_fail() {
        let result: Result<AwsAccount, _> = serde_json::from_str(r#"{"id":"seven","name":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn page_reads_aws_accounts_key() {
        let page: AwsAccountsPage = serde_json::from_str(
            r#"{"aws_accounts":[{"id":1,"name":"a","authentication":{"protocol":"access_key"}}]}"#,
        )
        .unwrap();
        assert_eq!(page.accounts.len(), 1);
        assert_eq!(page.accounts[0].name, "a");
    }
}
