/// In-memory directory and profile stores
///
/// Loaded once from JSON files for local runs without Supabase:
///
/// ```json
/// { "joescoffee.eth": "0x5FbDB2315678afecb367f032d93F642f64180aa3" }
/// ```
///
/// ```json
/// { "0x70997970C51812dc3A010C7d01b50e0d17dc79C8": { "bio": "Coffee lover" } }
/// ```
use super::{DirectoryStore, ProfileRecord, ProfileStore};
use crate::{
    encoding,
    error::{GatewayError, GatewayResult},
};
use alloy_primitives::Address;
use async_trait::async_trait;
use std::{collections::HashMap, path::Path};

async fn read_json_file(path: &Path) -> GatewayResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        GatewayError::Config(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Fixed root → contract map
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, Address>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, root: impl Into<String>, contract: Address) -> Self {
        self.entries.insert(root.into(), contract);
        self
    }

    /// Parse `{ "<root>": "<0x contract>" }`
    pub fn from_json(json: &str) -> GatewayResult<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| GatewayError::Config(format!("Invalid directory file: {}", e)))?;

        let entries = raw
            .into_iter()
            .map(|(root, contract)| {
                encoding::parse_address(&contract)
                    .map(|address| (root.clone(), address))
                    .map_err(|e| {
                        GatewayError::Config(format!("Directory entry '{}': {}", root, e))
                    })
            })
            .collect::<GatewayResult<HashMap<_, _>>>()?;

        Ok(Self { entries })
    }

    pub async fn load(path: &Path) -> GatewayResult<Self> {
        Self::from_json(&read_json_file(path).await?)
    }

    /// Number of roots with a member contract
    pub fn root_count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl DirectoryStore for StaticDirectory {
    async fn contract_for(&self, root: &str) -> GatewayResult<Option<Address>> {
        Ok(self.entries.get(root).copied())
    }
}

/// Fixed wallet → profile map
#[derive(Debug, Clone, Default)]
pub struct StaticProfiles {
    profiles: HashMap<Address, ProfileRecord>,
}

impl StaticProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, wallet: Address, profile: ProfileRecord) -> Self {
        self.profiles.insert(wallet, profile);
        self
    }

    /// Parse `{ "<0x wallet>": { ...profile columns... } }`
    pub fn from_json(json: &str) -> GatewayResult<Self> {
        let raw: HashMap<String, ProfileRecord> = serde_json::from_str(json)
            .map_err(|e| GatewayError::Config(format!("Invalid profiles file: {}", e)))?;

        let mut profiles = HashMap::with_capacity(raw.len());
        for (wallet, profile) in raw {
            let address = encoding::parse_address(&wallet)
                .map_err(|e| GatewayError::Config(format!("Profile key '{}': {}", wallet, e)))?;
            profiles.insert(address, profile);
        }

        Ok(Self { profiles })
    }

    pub async fn load(path: &Path) -> GatewayResult<Self> {
        Self::from_json(&read_json_file(path).await?)
    }

    pub fn wallet_count(&self) -> usize {
        self.profiles.len()
    }
}

#[async_trait]
impl ProfileStore for StaticProfiles {
    async fn profile_for(&self, wallet: Address) -> GatewayResult<Option<ProfileRecord>> {
        Ok(self.profiles.get(&wallet).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::io::Write;

    #[tokio::test]
    async fn test_directory_from_json() {
        let directory = StaticDirectory::from_json(
            r#"{ "joescoffee.eth": "0x5FbDB2315678afecb367f032d93F642f64180aa3" }"#,
        )
        .unwrap();

        assert_eq!(directory.root_count(), 1);
        assert_eq!(
            directory.contract_for("joescoffee.eth").await.unwrap(),
            Some(address!("5FbDB2315678afecb367f032d93F642f64180aa3"))
        );
        assert_eq!(directory.contract_for("teashop.eth").await.unwrap(), None);
    }

    #[test]
    fn test_directory_rejects_bad_address() {
        assert!(StaticDirectory::from_json(r#"{ "joescoffee.eth": "0x1234" }"#).is_err());
        assert!(StaticDirectory::from_json("[]").is_err());
    }

    #[tokio::test]
    async fn test_profiles_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "0x70997970c51812dc3a010c7d01b50e0d17dc79c8": {{ "bio": "Coffee lover" }} }}"#
        )
        .unwrap();

        let profiles = StaticProfiles::load(file.path()).await.unwrap();
        let profile = profiles
            .profile_for(address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.bio.as_deref(), Some("Coffee lover"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = StaticDirectory::load(Path::new("/nonexistent/directory.json")).await;
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
