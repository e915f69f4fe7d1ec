// user_store.rs
use crate::campaign::UserData;
use crate::error::TukiError;

use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const USER_DATA_KEY: &str = "tukiUserData";

/// Key-value store holding the last completed onboarding as one JSON blob.
#[derive(Debug, Clone)]
pub struct UserDataStore {
    storage_dir: PathBuf,
}

impl UserDataStore {
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        UserDataStore {
            storage_dir: storage_dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self) -> PathBuf {
        self.storage_dir.join(format!("{}.json", USER_DATA_KEY))
    }

    /// Overwrites the stored blob.
    pub async fn save(&self, user_data: &UserData) -> Result<(), TukiError> {
        fs::create_dir_all(&self.storage_dir).await?;
        let json = serde_json::to_string_pretty(user_data)?;
        let mut file = fs::File::create(self.path()).await?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;
        info!("Stored user data under {}", USER_DATA_KEY);
        Ok(())
    }

    pub async fn load(&self) -> Result<Option<UserData>, TukiError> {
        let path = self.path();
        if !fs::try_exists(&path).await? {
            debug!("No stored user data at {}", path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::OBJECTIVE_VISIBILITY;

    fn sample(product: &str) -> UserData {
        UserData {
            product_service: product.to_string(),
            ideal_customer: "vecinos del barrio".to_string(),
            marketing_objective: OBJECTIVE_VISIBILITY.to_string(),
            social_networks: vec!["Instagram".to_string(), "Facebook".to_string()],
        }
    }

    #[tokio::test]
    async fn load_before_save_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserDataStore::new(dir.path().join("nested"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_overwrites_previous_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserDataStore::new(dir.path());
        store.save(&sample("vendo pan")).await.unwrap();
        store.save(&sample("tengo una peluquería")).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, sample("tengo una peluquería"));

        let raw = std::fs::read_to_string(dir.path().join("tukiUserData.json")).unwrap();
        assert!(raw.contains("\"productoServicio\""));
    }
}
