use bevy::prelude::*;
use std::collections::VecDeque;

use crate::constants::history::MAX_HISTORY;

/// Transforms of the entities touched by one gesture, before and after
#[derive(Debug, Clone, PartialEq)]
pub struct GestureRecord {
    pub description: String,
    pub before: Vec<(Entity, Transform)>,
    pub after: Vec<(Entity, Transform)>,
}

impl GestureRecord {
    /// Entities whose transform differs between the two snapshots
    pub fn changed_entities(&self) -> Vec<Entity> {
        self.after
            .iter()
            .filter(|(entity, after)| {
                self.before
                    .iter()
                    .find(|(e, _)| e == entity)
                    .is_none_or(|(_, before)| before != after)
            })
            .map(|(entity, _)| *entity)
            .collect()
    }
}

/// Bounded log of completed gestures. An undo system can consume it; nothing here replays them.
#[derive(Resource)]
pub struct CommandHistory {
    records: VecDeque<GestureRecord>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self {
            records: VecDeque::with_capacity(MAX_HISTORY),
        }
    }
}

impl CommandHistory {
    pub fn push(&mut self, record: GestureRecord) {
        if self.records.len() >= MAX_HISTORY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&GestureRecord> {
        self.records.back()
    }

    pub fn last_description(&self) -> Option<&str> {
        self.records.back().map(|r| r.description.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureRecord> {
        self.records.iter()
    }
}
