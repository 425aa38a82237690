pub mod components;
pub mod systems;

use crate::core::states::AppState;
use crate::dialogue::DialogueDrive;
use crate::interaction::ProximitySet;
use bevy::prelude::*;
use systems::*;

pub struct CollectablePlugin;

impl Plugin for CollectablePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (settle_collectables, collect_items, drop_items)
                .chain()
                .after(ProximitySet)
                .before(DialogueDrive)
                .run_if(in_state(AppState::InGame)),
        );
    }
}
