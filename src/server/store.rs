use super::error::{AppError, AppResult};
use crate::report::{BaseConfig, SharedSettings, TypeDetail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

/// The single stored configuration record. Every part is `None` until set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub base_config: Option<BaseConfig>,
    pub management_configs: Option<HashMap<String, TypeDetail>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: u64,
}

impl ConfigSnapshot {
    pub fn settings(&self) -> SharedSettings {
        SharedSettings {
            base_config: self.base_config.clone(),
            management_configs: self.management_configs.clone(),
        }
    }
}

/// Partial update. Absent parts are kept; `expectedVersion`, when given,
/// must match the stored version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default)]
    pub base_config: Option<BaseConfig>,
    #[serde(default)]
    pub management_configs: Option<HashMap<String, TypeDetail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl From<SharedSettings> for ConfigPatch {
    fn from(settings: SharedSettings) -> Self {
        Self {
            base_config: settings.base_config,
            management_configs: settings.management_configs,
            expected_version: None,
        }
    }
}

/// In-memory config record guarded by a lock. Lives as long as the server.
#[derive(Debug, Default)]
pub struct ConfigStore {
    inner: RwLock<ConfigSnapshot>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated from a settings file. Counts as the first write.
    pub fn seeded(settings: SharedSettings) -> Self {
        let snapshot = ConfigSnapshot {
            base_config: settings.base_config,
            management_configs: settings.management_configs,
            updated_at: Some(Utc::now()),
            version: 1,
        };
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    pub async fn get(&self) -> ConfigSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn update(&self, patch: ConfigPatch) -> AppResult<ConfigSnapshot> {
        if let Some(configs) = &patch.management_configs {
            if let Some((key, detail)) = configs.iter().find(|(k, d)| **k != d.type_name) {
                return Err(AppError::Validation(format!(
                    "Entry '{}' describes type '{}'",
                    key, detail.type_name
                )));
            }
        }

        let mut guard = self.inner.write().await;

        if let Some(expected) = patch.expected_version {
            if expected != guard.version {
                return Err(AppError::Conflict {
                    expected,
                    current: guard.version,
                });
            }
        }

        if let Some(base) = patch.base_config {
            guard.base_config = Some(base);
        }
        if let Some(configs) = patch.management_configs {
            guard.management_configs = Some(configs);
        }
        guard.version += 1;
        guard.updated_at = Some(Utc::now());

        info!("Config updated to version {}", guard.version);
        Ok(guard.clone())
    }
}
