//! Interactive API credential setup
//!
//! Walks the user through entering the API key and secret with blocking
//! OK/Cancel prompts supplied by the host UI.

use crate::credentials::{Credential, CredentialStore};

/// Button pressed to close a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Ok,
    Cancel,
}

/// What the user did with a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    pub button: Button,
    pub text: String,
}

/// Host-provided modal dialogs
pub trait Prompt {
    /// Shows an OK/Cancel text prompt and blocks until it is closed
    fn prompt(&self, title: &str, message: &str) -> PromptResponse;

    /// Shows a message with an OK button
    fn alert(&self, title: &str, message: &str);
}

/// Result of a setup session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupOutcome {
    /// Credentials stored during this session
    pub saved: Vec<Credential>,
    /// Credentials still unset afterwards
    pub missing: Vec<Credential>,
}

impl SetupOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Prompts for the API key and secret, storing what the user confirms
pub fn configure_api_keys(ui: &dyn Prompt, credentials: &CredentialStore) -> SetupOutcome {
    let mut outcome = SetupOutcome::default();

    for credential in [Credential::ApiKey, Credential::ApiSecret] {
        if ask_for(ui, credentials, credential) {
            outcome.saved.push(credential);
        }
    }

    for credential in [Credential::ApiKey, Credential::ApiSecret] {
        if !credentials.is_set(credential) {
            ui.alert(
                &format!("{} not set!", credential.label()),
                &format!("You must set an {} to use this script!", credential.label()),
            );
            outcome.missing.push(credential);
        }
    }

    outcome
}

fn ask_for(ui: &dyn Prompt, credentials: &CredentialStore, credential: Credential) -> bool {
    let label = credential.label();
    let message = if credentials.is_set(credential) {
        format!(
            "✅ Your {} is already set!\n\nYou can still re-enter it below to override its current value:",
            label
        )
    } else {
        format!("Please enter your {} below:", label)
    };

    let response = ui.prompt(&format!("Set {}", label), &message);
    if response.button != Button::Ok || !credentials.set(credential, &response.text) {
        return false;
    }

    ui.alert(
        &format!("{} saved", label),
        &format!("Your {} was successfully saved!", label),
    );
    true
}
