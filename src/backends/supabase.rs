/// Supabase (PostgREST) directory and profile stores
///
/// Reads two tables:
/// - `businesses`: `ens_domain` → `smart_contract_address`
/// - `user_profiles`: `wallet_address` → profile columns
use super::{DirectoryStore, ProfileRecord, ProfileStore};
use crate::{
    encoding,
    error::{GatewayError, GatewayResult},
};
use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

const PROFILE_COLUMNS: &str =
    "username,display_name,bio,profile_picture_url,location,website,social_links";

/// Thin PostgREST client authenticated with the project's anon key
#[derive(Clone)]
pub struct SupabaseClient {
    http_client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(http_client: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `GET /rest/v1/{table}?{query}`
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> GatewayResult<Vec<T>> {
        let response = self
            .http_client
            .get(self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::Backend(format!("Supabase request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GatewayError::Backend(format!(
                "Supabase returned {} for table {}",
                response.status(),
                table
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Backend(format!("Invalid Supabase response: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct BusinessRow {
    smart_contract_address: Option<String>,
}

fn directory_query(root: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", "smart_contract_address".to_string()),
        ("ens_domain", format!("eq.{}", root)),
        ("smart_contract_address", "not.is.null".to_string()),
        ("limit", "1".to_string()),
    ]
}

fn contract_from_rows(rows: Vec<BusinessRow>) -> GatewayResult<Option<Address>> {
    let Some(raw) = rows.into_iter().find_map(|row| row.smart_contract_address) else {
        return Ok(None);
    };

    encoding::parse_address(&raw)
        .map(Some)
        .map_err(|e| GatewayError::Backend(format!("Stored contract address '{}': {}", raw, e)))
}

fn profile_query(wallet: Address) -> Vec<(&'static str, String)> {
    vec![
        ("select", PROFILE_COLUMNS.to_string()),
        ("wallet_address", format!("eq.{}", wallet.to_checksum(None))),
        ("limit", "1".to_string()),
    ]
}

/// Directory backed by the `businesses` table
#[derive(Clone)]
pub struct SupabaseDirectory {
    client: SupabaseClient,
}

impl SupabaseDirectory {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectoryStore for SupabaseDirectory {
    async fn contract_for(&self, root: &str) -> GatewayResult<Option<Address>> {
        let rows: Vec<BusinessRow> = self
            .client
            .select("businesses", &directory_query(root))
            .await?;

        let contract = contract_from_rows(rows)?;
        debug!(root = %root, found = contract.is_some(), "directory_lookup");
        Ok(contract)
    }
}

/// Profiles backed by the `user_profiles` table
#[derive(Clone)]
pub struct SupabaseProfiles {
    client: SupabaseClient,
}

impl SupabaseProfiles {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileStore for SupabaseProfiles {
    async fn profile_for(&self, wallet: Address) -> GatewayResult<Option<ProfileRecord>> {
        let rows: Vec<ProfileRecord> = self
            .client
            .select("user_profiles", &profile_query(wallet))
            .await?;

        debug!(wallet = %wallet, found = !rows.is_empty(), "profile_lookup");
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let client = SupabaseClient::new(reqwest::Client::new(), "https://abc.supabase.co/", "key");
        assert_eq!(
            client.table_url("businesses"),
            "https://abc.supabase.co/rest/v1/businesses"
        );
    }

    #[test]
    fn test_directory_query() {
        let query = directory_query("joescoffee.eth");
        assert!(query.contains(&("ens_domain", "eq.joescoffee.eth".to_string())));
        assert!(query.contains(&("smart_contract_address", "not.is.null".to_string())));
    }

    #[test]
    fn test_profile_query_uses_checksum_address() {
        let query = profile_query(address!("70997970c51812dc3a010c7d01b50e0d17dc79c8"));
        assert!(query.contains(&(
            "wallet_address",
            "eq.0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string()
        )));
    }

    #[test]
    fn test_contract_from_rows() {
        assert_eq!(contract_from_rows(vec![]).unwrap(), None);

        let rows = vec![BusinessRow {
            smart_contract_address: Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".into()),
        }];
        assert_eq!(
            contract_from_rows(rows).unwrap(),
            Some(address!("5FbDB2315678afecb367f032d93F642f64180aa3"))
        );

        let rows = vec![BusinessRow {
            smart_contract_address: Some("not-an-address".into()),
        }];
        assert!(contract_from_rows(rows).is_err());
    }
}
