#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use lucid_break::core::{config::GameConfig, events::LogEvent, session::Session, states::AppState};
use lucid_break::data::{catalog::ItemCatalog, schema::ItemEntry};
use lucid_break::dialogue::data::DialogueLibrary;
use lucid_break::dialogue::events::*;
use lucid_break::dialogue::manager::DialogueManager;
use lucid_break::dialogue::systems::{dialogue_input, drive_dialogue, end_orphaned_dialogue};
use lucid_break::dialogue::DialogueDrive;

pub const FRAME: Duration = Duration::from_millis(50);

pub fn item(name: &str, usable: bool) -> ItemEntry {
    ItemEntry {
        name: name.into(),
        usable,
        color: [1.0, 1.0, 1.0, 1.0],
        ..Default::default()
    }
}

pub fn catalog() -> ItemCatalog {
    ItemCatalog::from_entries([
        item("Key", true),
        item("Flashlight", true),
        item("Seed", false),
        item("Music Box", false),
    ])
}

/// 无窗口的游戏 App：状态直接是 InGame，每帧固定 50ms
pub fn base_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_state(AppState::InGame)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .add_event::<LogEvent>()
        .init_resource::<GameConfig>()
        .init_resource::<Session>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<DialogueManager>()
        .init_resource::<DialogueLibrary>()
        .insert_resource(catalog());
    app
}

/// 只注册对话的推进部分（面板需要 AssetServer）
pub fn add_dialogue_driver(app: &mut App) {
    app.add_event::<StartDialogue>()
        .add_event::<ContinueDialogue>()
        .add_event::<SkipDialogue>()
        .add_event::<DialogueStarted>()
        .add_event::<DialogueEnded>()
        .add_event::<DialogueRejected>()
        .add_event::<LineCompleted>()
        .add_systems(
            Update,
            (dialogue_input, end_orphaned_dialogue, drive_dialogue)
                .chain()
                .in_set(DialogueDrive),
        );
}

/// 按下一帧再松开
pub fn tap(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

pub fn run_frames(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// 取走到目前为止的全部事件
pub fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}
