use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::components::Collectable;
use crate::core::{config::GameConfig, events::LogEvent, session::Session};
use crate::data::{catalog::ItemCatalog, schema::{rgba, ItemEntry}};
use crate::dialogue::manager::DialogueManager;
use crate::interaction::{interact_pressed, prompt_bundle, Interactable};
use crate::inventory::components::{Inventory, InventoryError};
use crate::inventory::events::{DropItem, InventoryChanged};
use crate::level::components::LevelEntity;
use crate::player::components::Player;

const ITEM_SIZE: Vec2 = Vec2::new(10.0, 10.0);
/// 丢弃距离的单位长度（像素）
pub const DROP_UNIT: f32 = 32.0;
pub const DROP_MIN: f32 = 0.7;
pub const DROP_MAX: f32 = 1.25;

pub fn spawn_collectable(
    commands: &mut Commands,
    item: &ItemEntry,
    position: Vec2,
    collectable: Collectable,
    range: f32,
) -> Entity {
    commands
        .spawn((
            collectable,
            LevelEntity,
            Name::new(format!("Collectable {}", item.name)),
            Interactable::new(range),
            Sprite::from_color(rgba(item.color), ITEM_SIZE),
            Transform::from_translation(position.extend(5.0)),
            Visibility::Inherited,
        ))
        .with_children(|c| {
            c.spawn(prompt_bundle(&format!("E: pick up {}", item.name)));
        })
        .id()
}

/// 随机方向，距离 0.7..1.25 个单位
pub fn drop_offset(rng: &mut impl Rng) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    let dist = rng.random_range(DROP_MIN..DROP_MAX);
    Vec2::from_angle(angle) * dist * DROP_UNIT
}

/// 新生成的可拾取物和会话对账
pub fn settle_collectables(
    session: Res<Session>,
    player: Query<&Inventory, With<Player>>,
    mut items: Query<(&mut Collectable, &mut Visibility), Added<Collectable>>,
) {
    let inventory = player.single().ok();
    for (mut collectable, mut visibility) in &mut items {
        if collectable.settle(&session.collected, inventory) {
            debug!("'{}' already collected, hiding it", collectable.item);
            *visibility = Visibility::Hidden;
        }
    }
}

/// 在范围内按 E 捡起；背包满了就留在原地。关卡里的物品已在背包里时不重复加，丢出来的总是加回去
#[allow(clippy::too_many_arguments)]
pub fn collect_items(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    catalog: Res<ItemCatalog>,
    mut session: ResMut<Session>,
    mut player: Query<(Entity, &mut Inventory), With<Player>>,
    mut items: Query<(&mut Collectable, &Interactable, &mut Visibility)>,
    mut changed: EventWriter<InventoryChanged>,
    mut log: EventWriter<LogEvent>,
) {
    if !interact_pressed(&keys) || manager.is_active() {
        return;
    }
    let Ok((owner, mut inventory)) = player.single_mut() else {
        return;
    };
    for (mut collectable, interactable, mut visibility) in &mut items {
        if collectable.is_collected() || !interactable.in_range() {
            continue;
        }
        if collectable.is_dropped() || !inventory.contains(&collectable.item) {
            let Some(def) = catalog.get(&collectable.item) else {
                warn!("collectable '{}' is not in the item catalog", collectable.item);
                continue;
            };
            match inventory.add(def) {
                Ok(_) => {
                    changed.write(InventoryChanged { owner });
                }
                Err(e @ InventoryError::Full(_)) => {
                    warn!("{e}");
                    log.write(LogEvent::new("Inventory is full"));
                    continue;
                }
                Err(e) => {
                    warn!("pickup failed: {e}");
                    continue;
                }
            }
        }
        session.collected.insert(&collectable.item);
        collectable.set_collected(true);
        *visibility = Visibility::Hidden;
        info!("collected '{}'", collectable.item);
        log.write(LogEvent(format!("Picked up {}", collectable.item)));
    }
}

/// 把背包里的物品丢回场景，落在玩家附近
#[allow(clippy::too_many_arguments)]
pub fn drop_items(
    mut commands: Commands,
    mut ev_drop: EventReader<DropItem>,
    config: Res<GameConfig>,
    catalog: Res<ItemCatalog>,
    mut session: ResMut<Session>,
    mut player: Query<(Entity, &mut Inventory, &Transform), With<Player>>,
    mut changed: EventWriter<InventoryChanged>,
    mut log: EventWriter<LogEvent>,
) {
    let Ok((owner, mut inventory, transform)) = player.single_mut() else {
        ev_drop.clear();
        return;
    };
    for ev in ev_drop.read() {
        let Some(index) = ev.index.or(inventory.selected()) else {
            log.write(LogEvent::new("Nothing selected to drop"));
            continue;
        };
        let name = match inventory.remove_at(index) {
            Ok(name) => name,
            Err(e) => {
                warn!("drop skipped: {e}");
                continue;
            }
        };
        changed.write(InventoryChanged { owner });
        session.collected.remove(&name);

        let Some(def) = catalog.get(&name) else {
            warn!("dropped '{name}' has no definition, it is gone");
            continue;
        };
        let position = transform.translation.truncate() + drop_offset(&mut rand::rng());
        spawn_collectable(
            &mut commands,
            def,
            position,
            Collectable::dropped(name.clone()),
            config.interaction_range,
        );
        log.write(LogEvent(format!("Dropped {name}")));
    }
}
