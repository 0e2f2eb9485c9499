//! Process-wide chat client handle
//!
//! Lifecycle:
//! - [`init`] builds the client eagerly from an explicit [`ProviderConfig`].
//! - [`install`] puts any [`ChatClient`] in place (tests use a scripted fake).
//! - [`client`] returns the installed client, building one from the
//!   environment on first use when nothing was installed.
//! - [`shutdown`] drops the client; the next [`client`] call starts over.
//!
//! Components never reach for this handle themselves: binaries fetch the
//! client here once and inject it.

use anyhow::Result;
use std::sync::{Arc, RwLock};

use crate::config::{ClientFactory, ProviderConfig};
use crate::traits::ChatClient;

static PROVIDER: RwLock<Option<Arc<dyn ChatClient>>> = RwLock::new(None);

/// Build a client from `config` and make it the process-wide one
pub fn init(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
    let client = ClientFactory::create_chat_client(config)?;
    install(Arc::clone(&client));
    Ok(client)
}

/// Replace the process-wide client
pub fn install(client: Arc<dyn ChatClient>) {
    let mut slot = PROVIDER.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(client);
}

/// The process-wide client, lazily built from the environment
pub fn client() -> Result<Arc<dyn ChatClient>> {
    if let Some(client) = current() {
        return Ok(client);
    }

    let mut slot = PROVIDER.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    // Another caller may have won the race while we waited for the write lock
    if let Some(client) = slot.as_ref() {
        return Ok(Arc::clone(client));
    }

    let config = ProviderConfig::from_env()?;
    let client = ClientFactory::create_chat_client(&config)?;
    tracing::info!(base_url = %config.base_url, "Initialized provider client from environment");
    *slot = Some(Arc::clone(&client));
    Ok(client)
}

/// The installed client, without building one
pub fn current() -> Option<Arc<dyn ChatClient>> {
    PROVIDER
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Drop the process-wide client
pub fn shutdown() {
    let mut slot = PROVIDER.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    if slot.take().is_some() {
        tracing::debug!("Provider client released");
    }
}
