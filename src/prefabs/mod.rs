mod attach;
mod prefab;

pub use attach::*;
pub use prefab::*;

use bevy::prelude::*;

pub struct PrefabsPlugin;

impl Plugin for PrefabsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PrefabRoot>()
            .register_type::<AttachCandidate>()
            .add_plugins(PrefabAttachPlugin);
    }
}
