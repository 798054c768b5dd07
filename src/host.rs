// MIT License - Copyright (c) 2026 Peter Wright
// Local accessory host with JSON persistence

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::hap::{AccessoryHandle, HostPlatform, PlatformAccessory};
use crate::identity::AccessoryIdentity;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    accessories: Vec<PlatformAccessory>,
}

/// Accessory host that keeps registered accessories in memory and, when given
/// a cache path, persists them as JSON so they survive restarts.
///
/// Handlers are runtime-only and are not part of the cache.
pub struct LocalHost {
    cache_path: Option<PathBuf>,
    accessories: RwLock<BTreeMap<AccessoryIdentity, AccessoryHandle>>,
}

impl LocalHost {
    /// A host that forgets everything on exit.
    pub fn in_memory() -> Self {
        Self {
            cache_path: None,
            accessories: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_cache_file(path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: Some(path.into()),
            accessories: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Load cached accessories and return them, in order to hand them to the
    /// platform's restore hook. A missing cache file yields no accessories.
    pub async fn restore_cached(&self) -> Result<Vec<AccessoryHandle>> {
        let Some(path) = &self.cache_path else {
            return Ok(Vec::new());
        };

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No accessory cache at {}, starting empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let cache: CacheFile = serde_json::from_slice(&data)?;

        let mut accessories = self.accessories.write().await;
        let mut restored = Vec::with_capacity(cache.accessories.len());
        for accessory in cache.accessories {
            let identity = accessory.identity();
            if accessories.contains_key(&identity) {
                warn!("Duplicate cached accessory {}, keeping the first", identity);
                continue;
            }
            let handle = AccessoryHandle::new(accessory);
            accessories.insert(identity, handle.clone());
            restored.push(handle);
        }
        info!("Loaded {} cached accessories from {}", restored.len(), path.display());
        Ok(restored)
    }

    /// Write every registered accessory to the cache file.
    pub async fn persist(&self) -> Result<()> {
        let Some(path) = &self.cache_path else {
            return Ok(());
        };

        let handles: Vec<AccessoryHandle> = self.accessories.read().await.values().cloned().collect();
        let mut cache = CacheFile::default();
        for handle in handles {
            cache.accessories.push(handle.snapshot().await);
        }
        let data = serde_json::to_vec_pretty(&cache)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!("Persisted {} accessories to {}", cache.accessories.len(), path.display());
        Ok(())
    }

    /// All registered accessories, ordered by identity.
    pub async fn accessories(&self) -> Vec<AccessoryHandle> {
        self.accessories.read().await.values().cloned().collect()
    }

    pub async fn contains(&self, identity: &AccessoryIdentity) -> bool {
        self.accessories.read().await.contains_key(identity)
    }

    pub async fn len(&self) -> usize {
        self.accessories.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accessories.read().await.is_empty()
    }
}

#[async_trait]
impl HostPlatform for LocalHost {
    async fn register_platform_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[AccessoryHandle],
    ) -> Result<()> {
        {
            let mut registered = self.accessories.write().await;
            for handle in accessories {
                registered.insert(handle.identity(), handle.clone());
            }
        }
        debug!("{}/{} registered {} accessories", plugin, platform, accessories.len());
        self.persist().await
    }

    async fn update_platform_accessories(&self, accessories: &[AccessoryHandle]) -> Result<()> {
        debug!("Updating {} accessories", accessories.len());
        self.persist().await
    }

    async fn unregister_platform_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[AccessoryHandle],
    ) -> Result<()> {
        {
            let mut registered = self.accessories.write().await;
            for handle in accessories {
                registered.remove(&handle.identity());
            }
        }
        debug!("{}/{} unregistered {} accessories", plugin, platform, accessories.len());
        self.persist().await
    }
}
