pub mod collectable;
pub mod core;
pub mod data;
pub mod dialogue;
pub mod interaction;
pub mod interface;
pub mod inventory;
pub mod level;
pub mod player;
pub mod sequence;
pub mod triggers;

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// 全部玩法插件（不含 DefaultPlugins）
pub struct LucidBreakPlugins;

impl PluginGroup for LucidBreakPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(core::CorePlugin)
            .add(data::DataPlugin)
            .add(inventory::InventoryPlugin)
            .add(interaction::InteractionPlugin)
            .add(collectable::CollectablePlugin)
            .add(dialogue::DialoguePlugin)
            .add(sequence::SequencePlugin)
            .add(triggers::TriggerPlugin)
            .add(player::PlayerPlugin)
            .add(level::LevelPlugin)
            .add(interface::debug_cli::DebugCliPlugin)
    }
}
