use std::collections::BTreeMap;
use std::path::Path;

use feed_core::Credential;
use feed_engine::StateFile;
use feed_logging::{feed_error, feed_info, feed_warn};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".feed_state.ron";
const CREDENTIAL_KEY: &str = "reddit_access_token";

/// Small local key-value store persisted as RON.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    entries: BTreeMap<String, String>,
}

fn load_state(data_dir: &Path) -> PersistedState {
    let file = StateFile::new(data_dir, STATE_FILENAME);
    let content = match file.read() {
        Ok(Some(text)) => text,
        Ok(None) => return PersistedState::default(),
        Err(err) => {
            feed_warn!("Failed to read persisted state: {}", err);
            return PersistedState::default();
        }
    };

    match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            feed_warn!("Failed to parse persisted state from {:?}: {}", file.path(), err);
            PersistedState::default()
        }
    }
}

fn save_state(data_dir: &Path, state: &PersistedState) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(state, pretty) {
        Ok(text) => text,
        Err(err) => {
            feed_error!("Failed to serialize persisted state: {}", err);
            return;
        }
    };

    if let Err(err) = StateFile::new(data_dir, STATE_FILENAME).write(&content) {
        feed_error!("Failed to write persisted state: {}", err);
    }
}

pub(crate) fn load_credential(data_dir: &Path) -> Option<Credential> {
    let token = load_state(data_dir).entries.remove(CREDENTIAL_KEY)?;
    if token.is_empty() {
        return None;
    }
    feed_info!("Restored stored credential from {:?}", data_dir);
    Some(Credential::new(token))
}

/// Stores the credential, or removes it for `None`. Other keys are kept.
pub(crate) fn save_credential(data_dir: &Path, credential: Option<&Credential>) {
    let mut state = load_state(data_dir);
    match credential {
        Some(credential) => {
            state
                .entries
                .insert(CREDENTIAL_KEY.to_string(), credential.expose().to_string());
        }
        None => {
            state.entries.remove(CREDENTIAL_KEY);
        }
    }
    save_state(data_dir, &state);
}
