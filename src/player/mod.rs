pub mod components;
pub mod systems;

use crate::core::states::AppState;
use crate::dialogue::DialogueDrive;
use bevy::prelude::*;
use systems::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_player)
            .add_systems(
                Update,
                (
                    (read_move_input, toolbar_hotkeys).after(DialogueDrive),
                    place_player,
                    camera_follow,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(
                FixedUpdate,
                move_player.run_if(in_state(AppState::InGame)),
            );
    }
}
