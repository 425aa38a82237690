pub mod components;
pub mod events;
pub mod runner;
pub mod systems;

use crate::core::states::AppState;
use crate::dialogue::DialogueDrive;
use crate::interaction::ProximitySet;
use bevy::prelude::*;
use events::*;
use systems::*;

pub struct SequencePlugin;

impl Plugin for SequencePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TriggerSequence>()
            .add_event::<ResetSequence>()
            .add_event::<ExecuteAction>()
            .add_event::<SequenceStarted>()
            .add_event::<SequenceCompleted>()
            .add_systems(
                Update,
                (
                    reset_sequences,
                    setup_sequences,
                    fire_sequences,
                    run_sequences,
                    execute_single_action,
                )
                    .chain()
                    .after(ProximitySet)
                    .before(DialogueDrive)
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(
                Update,
                rearm_after_dialogue
                    .after(DialogueDrive)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
