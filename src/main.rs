use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use village_quests::config::{ConfigError, EngineConfig};
use village_quests::inventory::Inventory;
use village_quests::notify::TracingNotifier;
use village_quests::pets::{PetRoster, default_species};
use village_quests::player::PlayerProgress;
use village_quests::quest::{CatalogError, QuestCatalog, QuestManager, RewardSinks};
use village_quests::replay::{ReplayError, ReplayRunner, ReplayScript};
use village_quests::social::RelationshipLedger;

const DEFAULT_LOG_FILTER: &str = "village_quests=info";

#[derive(Parser)]
#[command(name = "village-quests")]
#[command(about = "Replay quest scripts against the village quest engine")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Replay script to run
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Quest save to resume from instead of starting a new game
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Where to write the quest save afterwards
    #[arg(long)]
    save: Option<PathBuf>,

    /// In-game day to start on
    #[arg(short, long)]
    day: Option<u32>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("failed to access save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode save: {0}")]
    Encode(#[from] serde_json::Error),
}

fn init_tracing(default_filter: &str) {
    let mut filter = EnvFilter::from_default_env();
    match default_filter.parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log filter '{}': {}", default_filter, e),
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = EngineConfig::load(&cli.config);
    init_tracing(
        config
            .as_ref()
            .map(|c| c.log_filter.as_str())
            .unwrap_or(DEFAULT_LOG_FILTER),
    );

    let result = config
        .map_err(AppError::from)
        .and_then(|config| run(&cli, &config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &EngineConfig) -> Result<(), AppError> {
    let catalog = Arc::new(QuestCatalog::load_from_directory(&config.data_dir)?);

    let inventory = Rc::new(RefCell::new(Inventory::new(config.inventory_slots)));
    let player = Rc::new(RefCell::new(PlayerProgress::new()));
    let social = Rc::new(RefCell::new(RelationshipLedger::new()));
    let pets = Rc::new(RefCell::new(PetRoster::new(default_species())));

    let sinks = RewardSinks::new()
        .with_inventory(Rc::clone(&inventory))
        .with_player(Rc::clone(&player))
        .with_social(Rc::clone(&social))
        .with_pets(Rc::clone(&pets))
        .with_notifications(TracingNotifier);

    let mut manager = QuestManager::new(Arc::clone(&catalog), sinks)
        .with_log_retention(config.log_retention)
        .with_completion_events(config.completion_events);

    if let Some(day) = cli.day {
        manager.set_day(day);
        pets.borrow_mut().set_day(day);
    }

    match &cli.load {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| AppError::Save {
                path: path.clone(),
                source,
            })?;
            manager.load_json(&json);
            info!("Resumed from {}", path.display());
        }
        None => {
            let started = manager.start_initial_quests(&config.starting_quests);
            info!("New game, started {} quest(s)", started.len());
        }
    }

    if let Some(path) = &cli.script {
        let script = ReplayScript::load(path)?;
        ReplayRunner::new(&mut manager)
            .with_pets(Rc::clone(&pets))
            .run(&script);
    }

    for active in manager.active_quests() {
        let progress = active.instance.progress();
        info!(
            "Active: {} [{}] {}/{} objectives ({:.0}%)",
            active.definition.title.get(&config.language),
            active.definition.quest_type.as_str(),
            progress.completed,
            progress.total,
            progress.percentage
        );
    }
    info!(
        "Completed quests: {}, available: {}",
        manager.completed_quests().len(),
        manager.available_quests().len()
    );
    {
        let player = player.borrow();
        let inventory = inventory.borrow();
        info!(
            "Player level {} ({} xp), {} coins, {} item kinds, {} pet(s)",
            player.level,
            player.xp,
            inventory.coins,
            inventory.items.len(),
            pets.borrow().owned().len()
        );
    }
    for (npc_id, relationship) in social.borrow().iter() {
        info!("{}: {} ({} xp)", npc_id, relationship.status, relationship.xp);
    }

    if let Some(path) = &cli.save {
        let json = manager.serialize().to_json()?;
        fs::write(path, json).map_err(|source| AppError::Save {
            path: path.clone(),
            source,
        })?;
        info!("Saved quest state to {}", path.display());
    }

    Ok(())
}
