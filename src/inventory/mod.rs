pub mod components;
pub mod events;
pub mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AddItem>()
            .add_event::<RemoveItem>()
            .add_event::<SelectSlot>()
            .add_event::<TransferItem>()
            .add_event::<SplitStack>()
            .add_event::<DropItem>()
            .add_event::<InventoryChanged>()
            .add_event::<HeldItemChanged>()
            .add_event::<ListInventoryEvent>()
            .add_systems(OnEnter(AppState::InGame), spawn_toolbar)
            .add_systems(
                Update,
                (
                    (give_item, remove_item, transfer_item, split_stack, select_slot),
                    sync_held_item,
                    (show_held_item, refresh_toolbar, print_inventory),
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
