mod history;
mod transaction;

pub use history::*;
pub use transaction::*;

use bevy::prelude::*;

pub struct CommandsPlugin;

impl Plugin for CommandsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandHistory>()
            .init_resource::<DragTransaction>()
            .add_message::<TransactionBegun>()
            .add_message::<TransactionEnded>();
    }
}
