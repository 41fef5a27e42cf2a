use bevy::prelude::*;

use super::history::{CommandHistory, GestureRecord};

/// Sent when a gesture transaction opens
#[derive(Message, Debug, Clone)]
pub struct TransactionBegun {
    pub description: String,
}

/// Sent when a gesture transaction closes and its record is in [`CommandHistory`]
#[derive(Message, Debug, Clone)]
pub struct TransactionEnded {
    pub description: String,
    pub changed: usize,
}

/// Brackets one press-to-release gesture so its per-frame edits form a single history entry
#[derive(Resource, Default, Debug)]
pub struct DragTransaction {
    open: Option<(String, Vec<(Entity, Transform)>)>,
}

impl DragTransaction {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn description(&self) -> Option<&str> {
        self.open.as_ref().map(|(d, _)| d.as_str())
    }

    /// Entities captured when the transaction opened
    pub fn entities(&self) -> Vec<Entity> {
        self.open
            .as_ref()
            .map(|(_, before)| before.iter().map(|(e, _)| *e).collect())
            .unwrap_or_default()
    }

    /// Open a transaction. Returns `false` if one is already open.
    pub fn begin(&mut self, description: impl Into<String>, before: Vec<(Entity, Transform)>) -> bool {
        if let Some((current, _)) = &self.open {
            warn!("Transaction '{}' already open, ignoring nested begin", current);
            return false;
        }
        let description = description.into();
        info!("Begin transaction: {} ({} entities)", description, before.len());
        self.open = Some((description, before));
        true
    }

    /// Close the open transaction and log it. `None` if nothing was open.
    pub fn end(&mut self, after: Vec<(Entity, Transform)>, history: &mut CommandHistory) -> Option<TransactionEnded> {
        let (description, before) = self.open.take()?;
        let record = GestureRecord {
            description: description.clone(),
            before,
            after,
        };
        let changed = record.changed_entities().len();
        info!("End transaction: {} ({} changed)", description, changed);
        history.push(record);
        Some(TransactionEnded { description, changed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_end_records_one_gesture() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut history = CommandHistory::default();
        let mut tx = DragTransaction::default();

        assert!(tx.begin("Mesh drag transaction", vec![(e, Transform::IDENTITY)]));
        assert!(tx.is_open());
        assert_eq!(tx.entities(), vec![e]);

        let ended = tx.end(vec![(e, Transform::from_xyz(1.0, 0.0, 0.0))], &mut history).unwrap();
        assert_eq!(ended.changed, 1);
        assert!(!tx.is_open());
        assert_eq!(history.len(), 1);
        assert_eq!(history.last_description(), Some("Mesh drag transaction"));
    }

    #[test]
    fn nested_begin_and_stray_end_are_ignored() {
        let mut history = CommandHistory::default();
        let mut tx = DragTransaction::default();

        assert!(tx.end(Vec::new(), &mut history).is_none());
        assert!(tx.begin("first", Vec::new()));
        assert!(!tx.begin("second", Vec::new()));
        assert_eq!(tx.description(), Some("first"));
        assert!(history.is_empty());
    }
}
