//! Scripted replay
//!
//! A replay script is a TOML list of `[[step]]` tables, each naming an
//! `action`. Steps drive a quest manager the way gameplay producers would,
//! which makes content easy to exercise without a game client.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::pets::PetRoster;
use crate::quest::{ObjectiveKind, QuestEvent, QuestManager};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse script {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ScriptStep {
    Start {
        quest: String,
    },
    Event {
        kind: ObjectiveKind,
        target: String,
        #[serde(default = "default_amount")]
        amount: u32,
    },
    Choice {
        quest: String,
        choice: String,
    },
    Complete {
        quest: String,
    },
    Day {
        day: u32,
    },
}

fn default_amount() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReplayScript {
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// What a replay did, step by step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub started: Vec<String>,
    /// Steps the engine refused, with the reason
    pub rejected: Vec<String>,
    pub advances: usize,
    pub completed: Vec<String>,
    pub choices: Vec<(String, String)>,
}

pub struct ReplayRunner<'a> {
    manager: &'a mut QuestManager,
    pets: Option<Rc<RefCell<PetRoster>>>,
}

impl<'a> ReplayRunner<'a> {
    pub fn new(manager: &'a mut QuestManager) -> Self {
        Self {
            manager,
            pets: None,
        }
    }

    /// Keep the pet roster's calendar in step with `day` actions
    pub fn with_pets(mut self, pets: Rc<RefCell<PetRoster>>) -> Self {
        self.pets = Some(pets);
        self
    }

    pub fn run(&mut self, script: &ReplayScript) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for step in &script.steps {
            summary.steps += 1;
            self.apply(step, &mut summary);
        }
        info!(
            "Replay finished: {} steps, {} started, {} completed, {} rejected",
            summary.steps,
            summary.started.len(),
            summary.completed.len(),
            summary.rejected.len()
        );
        summary
    }

    fn apply(&mut self, step: &ScriptStep, summary: &mut ReplaySummary) {
        debug!("Replay step: {:?}", step);
        match step {
            ScriptStep::Start { quest } => match self.manager.start_quest(quest) {
                Ok(()) => summary.started.push(quest.clone()),
                Err(e) => self.reject(summary, e.to_string()),
            },
            ScriptStep::Event {
                kind,
                target,
                amount,
            } => {
                let report = self
                    .manager
                    .submit_event(QuestEvent::new(*kind, target.as_str()).with_amount(*amount));
                if report.is_empty() {
                    debug!("Event {} '{}' matched nothing", kind, target);
                }
                summary.advances += report.advances.len();
                summary.completed.extend(report.completed);
            }
            ScriptStep::Choice { quest, choice } => {
                match self.manager.handle_choice(quest, choice) {
                    Ok(_) => summary.choices.push((quest.clone(), choice.clone())),
                    Err(e) => self.reject(summary, e.to_string()),
                }
            }
            ScriptStep::Complete { quest } => {
                if self.manager.complete_quest(quest) {
                    summary.completed.push(quest.clone());
                } else {
                    self.reject(summary, format!("quest '{}' is not active", quest));
                }
            }
            ScriptStep::Day { day } => {
                self.manager.set_day(*day);
                if let Some(pets) = &self.pets {
                    pets.borrow_mut().set_day(*day);
                }
            }
        }
    }

    fn reject(&self, summary: &mut ReplaySummary, reason: String) {
        warn!("Replay step rejected: {}", reason);
        summary.rejected.push(reason);
    }
}
