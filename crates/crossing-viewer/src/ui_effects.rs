// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Side-effect runner for control-surface effects (intents, prefs, quit).

use crossing_app_core::{config_port::ConfigPort, prefs::ClientPrefs};
use crossing_session_client::tool::SessionPort;
use tracing::{debug, warn};

use crate::ui_state::{UiEffect, UiEvent};

pub trait UiEffectsRunner {
    fn run(
        &mut self,
        effects: Vec<UiEffect>,
        session: &mut dyn SessionPort,
        config: Option<&dyn ConfigPort>,
        prefs: &ClientPrefs,
    ) -> Vec<UiEvent>;
}

/// Production runner.
pub struct RealEffectsRunner;

impl UiEffectsRunner for RealEffectsRunner {
    fn run(
        &mut self,
        effects: Vec<UiEffect>,
        session: &mut dyn SessionPort,
        config: Option<&dyn ConfigPort>,
        prefs: &ClientPrefs,
    ) -> Vec<UiEvent> {
        let mut followups = Vec::new();
        for eff in effects {
            match eff {
                UiEffect::Send(intent) => {
                    debug!(?intent, "intent");
                    session.send_intent(intent);
                }
                UiEffect::SavePrefs => {
                    let Some(cfg) = config else {
                        followups.push(UiEvent::Notice {
                            title: "Preferences not saved".into(),
                            body: Some("config store unavailable".into()),
                        });
                        continue;
                    };
                    if let Err(err) = cfg.save_prefs(prefs) {
                        warn!(error = %err, "saving prefs failed");
                        followups.push(UiEvent::Notice {
                            title: "Preferences not saved".into(),
                            body: Some(err.to_string()),
                        });
                    }
                }
                UiEffect::QuitApp => followups.push(UiEvent::ShutdownRequested),
            }
        }
        followups
    }
}

/// Test fake: records effects without touching the session or disk.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeEffectsRunner {
    pub calls: Vec<UiEffect>,
}

impl UiEffectsRunner for FakeEffectsRunner {
    fn run(
        &mut self,
        effects: Vec<UiEffect>,
        _session: &mut dyn SessionPort,
        _config: Option<&dyn ConfigPort>,
        _prefs: &ClientPrefs,
    ) -> Vec<UiEvent> {
        let mut followups = Vec::new();
        for eff in effects {
            if eff == UiEffect::QuitApp {
                followups.push(UiEvent::ShutdownRequested);
            }
            self.calls.push(eff);
        }
        followups
    }
}
