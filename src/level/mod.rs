pub mod components;
pub mod def;
pub mod events;
pub mod systems;

use crate::core::states::AppState;
use crate::dialogue::DialogueDrive;
use crate::interaction::ProximitySet;
use bevy::prelude::*;
pub use events::{LevelLoaded, LoadLevel};
use systems::*;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LoadLevel>()
            .add_event::<LevelLoaded>()
            .init_resource::<ClearColor>()
            .add_systems(OnEnter(AppState::InGame), load_start_level)
            .add_systems(
                Update,
                ((use_exits, open_storage).after(ProximitySet).before(DialogueDrive), load_level)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
