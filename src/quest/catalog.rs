//! Quest Catalog
//!
//! Loads quest definitions from TOML tables once at startup. The catalog is
//! read-only afterwards; the manager shares it behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::definition::{QuestDefinition, RawQuest};
use super::error::CatalogError;

/// Registry of all quest definitions
#[derive(Debug, Clone, Default)]
pub struct QuestCatalog {
    quests: BTreeMap<String, QuestDefinition>,
}

impl QuestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.toml` under `<data_dir>/quests`, recursively.
    ///
    /// Files that fail to parse and quests that fail to resolve are skipped
    /// with a warning so one bad entry does not take the rest down.
    pub fn load_from_directory(data_dir: &Path) -> Result<Self, CatalogError> {
        let quests_dir = data_dir.join("quests");
        let mut catalog = Self::new();

        info!("Loading quests from {:?}", quests_dir);

        if !quests_dir.exists() {
            warn!("Quest directory does not exist: {:?}", quests_dir);
            return Ok(catalog);
        }

        let mut paths = Vec::new();
        collect_toml_files(&quests_dir, &mut paths)?;
        // Later files win on duplicate IDs, so make "later" deterministic
        paths.sort();

        for path in paths {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read {:?}: {}", path, e);
                    continue;
                }
            };

            let table: HashMap<String, RawQuest> = match toml::from_str(&content) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    continue;
                }
            };

            catalog.insert_raw_table(table, &path);
        }

        info!("Loaded {} quest definitions", catalog.len());
        catalog.validate_links();

        Ok(catalog)
    }

    /// Build a catalog from a single TOML document of quest tables
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let table: HashMap<String, RawQuest> =
            toml::from_str(content).map_err(|source| CatalogError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;

        let mut catalog = Self::new();
        for (id, raw) in table {
            let quest = QuestDefinition::from_raw(&id, &raw)?;
            catalog.quests.insert(id, quest);
        }
        catalog.validate_links();

        Ok(catalog)
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = QuestDefinition>) -> Self {
        let quests = definitions
            .into_iter()
            .map(|quest| (quest.id.clone(), quest))
            .collect();
        let catalog = Self { quests };
        catalog.validate_links();
        catalog
    }

    fn insert_raw_table(&mut self, table: HashMap<String, RawQuest>, path: &Path) {
        for (id, raw) in table {
            match QuestDefinition::from_raw(&id, &raw) {
                Ok(quest) => {
                    if self.quests.contains_key(&id) {
                        warn!("Duplicate quest ID '{}' in {:?}, overwriting", id, path);
                    }
                    info!("Loaded quest: {} ({})", quest.title.get("en"), id);
                    self.quests.insert(id, quest);
                }
                Err(e) => warn!("Skipping quest '{}' in {:?}: {}", id, path, e),
            }
        }
    }

    /// Warn about prerequisites and unlocks that point nowhere
    fn validate_links(&self) {
        for quest in self.quests.values() {
            for prereq in &quest.prerequisites {
                if !self.quests.contains_key(prereq) {
                    warn!(
                        "Quest '{}' references non-existent prerequisite '{}'",
                        quest.id, prereq
                    );
                }
            }
            for unlock in &quest.unlocks {
                if !self.quests.contains_key(unlock) {
                    warn!(
                        "Quest '{}' unlocks non-existent quest '{}'",
                        quest.id, unlock
                    );
                }
            }
        }
    }

    pub fn get(&self, quest_id: &str) -> Option<&QuestDefinition> {
        self.quests.get(quest_id)
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.quests.contains_key(quest_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.quests.keys()
    }

    pub fn all(&self) -> impl Iterator<Item = &QuestDefinition> {
        self.quests.values()
    }

    /// Quests handed out by a specific NPC
    pub fn quests_for_giver(&self, npc_id: &str) -> Vec<&QuestDefinition> {
        self.quests
            .values()
            .filter(|q| q.giver.as_deref() == Some(npc_id))
            .collect()
    }

    /// Quests with no prerequisites
    pub fn starting_quests(&self) -> Vec<&QuestDefinition> {
        self.quests
            .values()
            .filter(|q| q.prerequisites.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

fn collect_toml_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_toml_files(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}
