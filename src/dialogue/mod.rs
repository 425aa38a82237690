pub mod data;
pub mod events;
pub mod manager;
pub mod runner;
pub mod systems;
pub mod ui;

use bevy::prelude::*;

use crate::core::states::AppState;
use events::*;
use manager::DialogueManager;
use systems::*;
use ui::*;

/// 系统集合，其他插件据此排在对话推进之前/之后
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DialogueDrive;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueManager>()
            .init_resource::<DialogueFonts>()
            .add_event::<StartDialogue>()
            .add_event::<ContinueDialogue>()
            .add_event::<SkipDialogue>()
            .add_event::<DialogueStarted>()
            .add_event::<DialogueEnded>()
            .add_event::<DialogueRejected>()
            .add_event::<LineCompleted>()
            .add_systems(Startup, (load_fonts, spawn_dialogue_panel))
            .add_systems(
                Update,
                (dialogue_input, end_orphaned_dialogue, drive_dialogue)
                    .chain()
                    .in_set(DialogueDrive)
                    .run_if(in_state(AppState::InGame)),
            )
            .add_systems(
                Update,
                (start_panel_fade, animate_panel_fade, render_dialogue)
                    .chain()
                    .after(DialogueDrive)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
