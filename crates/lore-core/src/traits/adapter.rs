// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all service adapters implement.

use async_trait::async_trait;

use crate::error::LoreError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for Lore service adapters.
///
/// Provides identity and health check capabilities so configuration
/// problems can be surfaced loudly at startup instead of per request.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the type of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, LoreError>;
}
