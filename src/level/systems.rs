use bevy::prelude::*;

use super::components::*;
use super::def::{vec2, LevelDef, LevelLibrary};
use super::events::*;
use crate::collectable::{components::Collectable, systems::spawn_collectable};
use crate::core::{config::GameConfig, events::LogEvent, session::{Session, SpawnPoint}};
use crate::data::{catalog::ItemCatalog, schema::rgba};
use crate::dialogue::manager::DialogueManager;
use crate::interaction::{interact_pressed, prompt_bundle, Interactable};
use crate::inventory::components::{Inventory, DEFAULT_MAX_STACK};
use crate::sequence::components::SequentialTrigger;
use crate::triggers::components::{DialogueTrigger, TriggerMode};
use crate::triggers::conditions::ConditionalDialogue;

const MARKER_SIZE: Vec2 = Vec2::new(14.0, 14.0);
const TRIGGER_COLOR: Color = Color::srgba(0.9, 0.8, 0.3, 0.6);
const EXIT_COLOR: Color = Color::srgba(0.3, 0.9, 0.5, 0.6);
const STORAGE_COLOR: Color = Color::srgb(0.55, 0.35, 0.2);

pub fn load_start_level(config: Res<GameConfig>, mut ev_load: EventWriter<LoadLevel>) {
    ev_load.write(LoadLevel {
        index: config.start_level,
    });
}

/// 销毁旧关卡，生成新关卡。同一帧多次请求只处理最后一个
#[allow(clippy::too_many_arguments)]
pub fn load_level(
    mut commands: Commands,
    mut ev_load: EventReader<LoadLevel>,
    library: Res<LevelLibrary>,
    catalog: Res<ItemCatalog>,
    config: Res<GameConfig>,
    mut session: ResMut<Session>,
    mut clear: ResMut<ClearColor>,
    old: Query<Entity, With<LevelEntity>>,
    mut ev_loaded: EventWriter<LevelLoaded>,
    mut log: EventWriter<LogEvent>,
) {
    let Some(req) = ev_load.read().last().copied() else {
        return;
    };
    let Some(level) = library.get(req.index) else {
        warn!("level {} does not exist ({} levels loaded)", req.index, library.len());
        log.write(LogEvent(format!("No level {}", req.index)));
        return;
    };

    for entity in &old {
        commands.entity(entity).despawn();
    }
    clear.0 = rgba(level.background);
    spawn_level(&mut commands, level, &catalog, config.interaction_range);
    session.level = req.index;

    info!("level {} '{}' loaded", req.index, level.name);
    ev_loaded.write(LevelLoaded {
        index: req.index,
        player_start: vec2(level.player_start),
    });
}

pub fn spawn_level(commands: &mut Commands, level: &LevelDef, catalog: &ItemCatalog, range: f32) {
    for prop in &level.props {
        commands.spawn((
            Prop {
                name: prop.name.clone(),
            },
            LevelEntity,
            Name::new(prop.name.clone()),
            Sprite::from_color(rgba(prop.color), vec2(prop.size)),
            Transform::from_translation(vec2(prop.position).extend(1.0)),
            Visibility::Inherited,
        ));
    }

    for def in &level.collectables {
        match catalog.get(&def.item) {
            Some(item) => {
                spawn_collectable(
                    commands,
                    item,
                    vec2(def.position),
                    Collectable::new(def.item.clone()),
                    range,
                );
            }
            None => warn!("level '{}': unknown collectable '{}'", level.name, def.item),
        }
    }

    for def in &level.storage {
        let mut inventory = Inventory::new(def.slots, 0, DEFAULT_MAX_STACK);
        for name in &def.items {
            let Some(item) = catalog.get(name) else {
                warn!("storage '{}': unknown item '{name}'", def.name);
                continue;
            };
            if let Err(e) = inventory.add(item) {
                warn!("storage '{}': {e}", def.name);
            }
        }
        commands
            .spawn((
                StorageContainer {
                    name: def.name.clone(),
                },
                inventory,
                LevelEntity,
                Name::new(def.name.clone()),
                Interactable::new(range),
                Sprite::from_color(STORAGE_COLOR, Vec2::new(20.0, 14.0)),
                Transform::from_translation(vec2(def.position).extend(2.0)),
                Visibility::Inherited,
            ))
            .with_children(|c| {
                c.spawn(prompt_bundle("E: open"));
            });
    }

    for def in &level.dialogue_triggers {
        let interactable = Interactable::new(def.range.unwrap_or(range));
        let interactable = if def.mode == TriggerMode::OnInteract {
            interactable
        } else {
            interactable.without_prompt()
        };
        commands
            .spawn((
                DialogueTrigger::new(def.dialogue.clone(), def.mode),
                interactable,
                LevelEntity,
                Sprite::from_color(TRIGGER_COLOR, MARKER_SIZE),
                Transform::from_translation(vec2(def.position).extend(2.0)),
                Visibility::Inherited,
            ))
            .with_children(|c| {
                c.spawn(prompt_bundle("E: talk"));
            });
    }

    for def in &level.sequences {
        let mut trigger = SequentialTrigger::new(def.actions.clone(), def.mode);
        trigger.dialogue = def.dialogue.clone();
        trigger.complete_flag = def.complete_flag.clone();
        let interactable = Interactable::new(def.range.unwrap_or(range));
        let interactable = if def.mode == TriggerMode::OnInteract {
            interactable
        } else {
            interactable.without_prompt()
        };
        commands
            .spawn((
                trigger,
                interactable,
                LevelEntity,
                Transform::from_translation(vec2(def.position).extend(2.0)),
                Visibility::Inherited,
            ))
            .with_children(|c| {
                c.spawn(prompt_bundle("E: interact"));
            });
    }

    for def in &level.conditionals {
        commands.spawn((
            ConditionalDialogue::new(def.entries.clone(), def.check_interval),
            LevelEntity,
        ));
    }

    for def in &level.exits {
        commands
            .spawn((
                Exit {
                    target: def.target,
                    spawn: SpawnPoint {
                        position: vec2(def.spawn),
                        facing_left: def.facing_left,
                    },
                },
                LevelEntity,
                Interactable::new(def.range.unwrap_or(range)),
                Sprite::from_color(EXIT_COLOR, MARKER_SIZE),
                Transform::from_translation(vec2(def.position).extend(2.0)),
                Visibility::Inherited,
            ))
            .with_children(|c| {
                c.spawn(prompt_bundle("E: go"));
            });
    }
}

/// 出口：先写好出生点，再请求切关
pub fn use_exits(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    mut session: ResMut<Session>,
    exits: Query<(&Exit, &Interactable)>,
    mut ev_load: EventWriter<LoadLevel>,
) {
    if !interact_pressed(&keys) || manager.is_active() {
        return;
    }
    if let Some((exit, _)) = exits.iter().find(|(_, i)| i.in_range()) {
        debug!("exit to level {} at {:?}", exit.target, exit.spawn.position);
        session.spawn_point = Some(exit.spawn);
        ev_load.write(LoadLevel { index: exit.target });
    }
}

/// 打开箱子：把内容打印出来，存取用控制台的 take / put
pub fn open_storage(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    storage: Query<(Entity, &StorageContainer, &Inventory, &Interactable)>,
    mut log: EventWriter<LogEvent>,
) {
    if !interact_pressed(&keys) || manager.is_active() {
        return;
    }
    for (entity, container, inventory, interactable) in &storage {
        if !interactable.in_range() {
            continue;
        }
        let contents: Vec<String> = inventory
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, s)| format!("[{i}] {} x{}", s.item_name(), s.count()))
            .collect();
        let body = if contents.is_empty() {
            "(empty)".to_string()
        } else {
            contents.join(", ")
        };
        log.write(LogEvent(format!(
            "{} ({entity}): {body}. Use `take <slot> [to]` / `put <slot> [to]`",
            container.name
        )));
    }
}
