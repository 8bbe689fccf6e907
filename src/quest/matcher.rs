//! Objective matching
//!
//! An event advances at most one objective per active instance: the first
//! objective, in template order, whose kind matches and whose target is the
//! event target or a wildcard. A match on an objective that is already full
//! is clamped away; the event does not spill into later objectives.

use tracing::debug;

use super::events::{ObjectiveAdvance, QuestEvent};
use super::state::QuestInstance;

/// Advance the first matching objective of one instance
pub fn advance_instance(instance: &mut QuestInstance, event: &QuestEvent) -> Option<ObjectiveAdvance> {
    if event.amount == 0 {
        return None;
    }

    let objective = instance
        .objectives
        .iter_mut()
        .find(|o| o.accepts(event.kind, &event.target))?;

    let objective_completed = objective.add_progress(event.amount);

    debug!(
        "Quest {} objective {} progress {}/{} ({} {})",
        instance.id,
        objective.id,
        objective.current,
        objective.count,
        event.event_type(),
        event.target
    );

    Some(ObjectiveAdvance {
        quest_id: instance.id.clone(),
        objective_id: objective.id.clone(),
        current: objective.current,
        count: objective.count,
        objective_completed,
    })
}

/// Fan an event out over every instance, in insertion order
pub fn match_event(instances: &mut [QuestInstance], event: &QuestEvent) -> Vec<ObjectiveAdvance> {
    instances
        .iter_mut()
        .filter_map(|instance| advance_instance(instance, event))
        .collect()
}
