mod selection;

pub use selection::*;

use bevy::prelude::*;

/// Click selection of scene entities; the scale gizmo targets whatever is selected
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(SelectionSystemPlugin);
    }
}
