pub mod components;
pub mod conditions;
pub mod systems;

use crate::core::states::AppState;
use crate::dialogue::DialogueDrive;
use crate::interaction::ProximitySet;
use bevy::prelude::*;
use systems::*;

pub struct TriggerPlugin;

impl Plugin for TriggerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                start_triggers_on_spawn,
                fire_dialogue_triggers,
                check_conditionals_on_spawn,
                tick_conditionals,
            )
                .after(ProximitySet)
                .before(DialogueDrive)
                .run_if(in_state(AppState::InGame)),
        )
        .add_systems(
            Update,
            rearm_dialogue_triggers
                .after(DialogueDrive)
                .run_if(in_state(AppState::InGame)),
        );
    }
}
