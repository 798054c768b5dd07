// MIT License - Copyright (c) 2026 Peter Wright
// Host platform collaborator

use async_trait::async_trait;

use crate::error::Result;
use crate::hap::accessory::AccessoryHandle;
use crate::identity::{AccessoryIdentity, derive_identity};

/// What the bridge needs from the host accessory platform.
///
/// The host owns accessory persistence. The bridge asks it to register new
/// accessories, persist context updates and forget accessories that are gone.
#[async_trait]
pub trait HostPlatform: Send + Sync {
    /// Derive the identity token for an accessory seed.
    fn generate_identity(&self, seed: &str) -> AccessoryIdentity {
        derive_identity(seed)
    }

    /// Link newly created accessories to the platform.
    async fn register_platform_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[AccessoryHandle],
    ) -> Result<()>;

    /// Persist changes made to already registered accessories.
    async fn update_platform_accessories(&self, accessories: &[AccessoryHandle]) -> Result<()>;

    /// Remove accessories from the host.
    async fn unregister_platform_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[AccessoryHandle],
    ) -> Result<()>;
}
