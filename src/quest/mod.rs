//! Quest System Module
//!
//! Static quest content loaded from TOML, runtime instances advanced by
//! gameplay events, and reward dispatch into injected collaborators.

pub mod catalog;
pub mod definition;
pub mod error;
pub mod events;
pub mod log;
pub mod manager;
pub mod matcher;
pub mod rewards;
pub mod save;
pub mod sinks;
pub mod state;
pub mod unlocks;

pub use catalog::QuestCatalog;
pub use definition::{
    LocalizedText, ObjectiveKind, ObjectiveTarget, ObjectiveTemplate, QuestChoice, QuestDefinition,
    QuestType, RewardBundle, TimeCondition,
};
pub use error::{CatalogError, ChoiceError, StartError};
pub use events::{EventReport, ObjectiveAdvance, QuestEvent};
pub use log::{LogEntry, LogEvent, QuestLog};
pub use manager::{ActiveQuest, QuestManager};
pub use rewards::RewardReceipt;
pub use save::{PartialSave, QuestSaveData};
pub use sinks::{
    InventorySink, NotificationSink, PetSink, PlayerSink, RewardSinks, Severity, SocialSink,
};
pub use state::{ObjectiveState, QuestInstance, QuestProgress, QuestState};
pub use unlocks::UnlockLedger;
