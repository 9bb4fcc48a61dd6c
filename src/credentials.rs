//! Per-user API credential storage

use crate::constants::{API_KEY_NAME, API_SECRET_NAME};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Persistent key-value store scoped to the invoking user
pub trait PropertyStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
}

/// In-memory property store
#[derive(Debug, Clone, Default)]
pub struct MemoryPropertyStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), value.to_string());
    }
}

/// Which credential a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    ApiKey,
    ApiSecret,
}

impl Credential {
    /// Property name the credential is stored under
    pub fn property_name(&self) -> &'static str {
        match self {
            Credential::ApiKey => API_KEY_NAME,
            Credential::ApiSecret => API_SECRET_NAME,
        }
    }

    /// Human label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Credential::ApiKey => "API Key",
            Credential::ApiSecret => "API Secret Key",
        }
    }
}

/// API key and secret on top of a [`PropertyStore`]
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn PropertyStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self { store }
    }

    /// Returns a stored, non-empty credential
    pub fn get(&self, credential: Credential) -> Option<String> {
        self.store
            .get(credential.property_name())
            .filter(|value| !value.is_empty())
    }

    pub fn api_key(&self) -> Option<String> {
        self.get(Credential::ApiKey)
    }

    pub fn api_secret(&self) -> Option<String> {
        self.get(Credential::ApiSecret)
    }

    pub fn is_set(&self, credential: Credential) -> bool {
        self.get(credential).is_some()
    }

    /// True when both key and secret are stored
    pub fn is_configured(&self) -> bool {
        self.is_set(Credential::ApiKey) && self.is_set(Credential::ApiSecret)
    }

    /// Stores user input with all whitespace removed
    ///
    /// Returns false, leaving the current value untouched, when nothing is left
    /// after stripping.
    pub fn set(&self, credential: Credential, input: &str) -> bool {
        let value = strip_whitespace(input);
        if value.is_empty() {
            return false;
        }
        self.store.set(credential.property_name(), &value);
        tracing::info!(credential = credential.label(), "Stored credential");
        true
    }
}

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}
