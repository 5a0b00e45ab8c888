// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port the viewer loads and saves its preferences through.

use crate::config::{ConfigError, ConfigService, ConfigStore};
use crate::prefs::{ClientPrefs, PREFS_KEY};

/// Preference persistence as seen by the viewer.
pub trait ConfigPort {
    /// Load preferences; `Ok(None)` when nothing was saved yet.
    fn load_prefs(&self) -> Result<Option<ClientPrefs>, ConfigError>;
    /// Persist preferences.
    fn save_prefs(&self, prefs: &ClientPrefs) -> Result<(), ConfigError>;
}

impl<S: ConfigStore> ConfigPort for ConfigService<S> {
    fn load_prefs(&self) -> Result<Option<ClientPrefs>, ConfigError> {
        self.load(PREFS_KEY)
    }

    fn save_prefs(&self, prefs: &ClientPrefs) -> Result<(), ConfigError> {
        self.save(PREFS_KEY, prefs)
    }
}
