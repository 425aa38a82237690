use super::{components::*, events::*};
use crate::core::{config::GameConfig, events::LogEvent};
use crate::data::{catalog::ItemCatalog, schema::rgba};
use crate::player::components::{HeldItemSprite, Player};
use bevy::prelude::*;

const SLOT_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.8);
const SELECTED_COLOR: Color = Color::srgba(0.39, 0.39, 0.78, 0.9);

/// 工具栏格子的 UI 节点
#[derive(Component)]
pub struct ToolbarSlotUi(pub usize);

#[derive(Component)]
pub struct ToolbarLabel(pub usize);

/// 处理"give"：往背包里塞物品
pub fn give_item(
    mut ev_add: EventReader<AddItem>,
    mut inventories: Query<&mut Inventory>,
    player: Query<Entity, With<Player>>,
    catalog: Res<ItemCatalog>,
    mut changed: EventWriter<InventoryChanged>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_add.read() {
        let Some(def) = catalog.find(&ev.item) else {
            warn!("unknown item '{}'", ev.item);
            log.write(LogEvent(format!("No such item: {}", ev.item)));
            continue;
        };
        let Some(owner) = ev.owner.or_else(|| player.single().ok()) else {
            warn!("no inventory owner for '{}'", def.name);
            continue;
        };
        let Ok(mut inventory) = inventories.get_mut(owner) else {
            warn!("entity {owner} has no inventory");
            continue;
        };

        let mut added = 0;
        for _ in 0..ev.count {
            match inventory.add(def) {
                Ok(_) => added += 1,
                Err(e) => {
                    warn!("{e}");
                    log.write(LogEvent(format!("Inventory full, {} dropped", def.name)));
                    break;
                }
            }
        }
        if added > 0 {
            info!("added {} x{added} to {owner}", def.name);
            log.write(LogEvent(format!("Got {} x{added}", def.name)));
            changed.write(InventoryChanged { owner });
        }
    }
}

pub fn remove_item(
    mut ev_remove: EventReader<RemoveItem>,
    mut inventories: Query<&mut Inventory>,
    player: Query<Entity, With<Player>>,
    mut changed: EventWriter<InventoryChanged>,
) {
    for ev in ev_remove.read() {
        let Some(owner) = ev.owner.or_else(|| player.single().ok()) else {
            continue;
        };
        let Ok(mut inventory) = inventories.get_mut(owner) else {
            warn!("entity {owner} has no inventory");
            continue;
        };
        match inventory.remove_at(ev.index) {
            Ok(name) => {
                debug!("removed one {name} from slot {}", ev.index);
                changed.write(InventoryChanged { owner });
            }
            Err(e) => warn!("remove skipped: {e}"),
        }
    }
}

pub fn select_slot(
    mut ev_select: EventReader<SelectSlot>,
    mut player: Query<&mut Inventory, With<Player>>,
    catalog: Res<ItemCatalog>,
    mut held: EventWriter<HeldItemChanged>,
) {
    let Ok(mut inventory) = player.single_mut() else {
        ev_select.clear();
        return;
    };
    for ev in ev_select.read() {
        match inventory.select(ev.index) {
            Ok(()) => {
                held.write(HeldItemChanged {
                    held: inventory.held_item(&catalog),
                });
            }
            Err(e) => warn!("select skipped: {e}"),
        }
    }
}

pub fn transfer_item(
    mut ev_transfer: EventReader<TransferItem>,
    mut inventories: Query<&mut Inventory>,
    mut changed: EventWriter<InventoryChanged>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_transfer.read() {
        let result = if ev.from == ev.to {
            let Ok(mut inventory) = inventories.get_mut(ev.from) else {
                warn!("entity {} has no inventory", ev.from);
                continue;
            };
            inventory.swap_slots(ev.from_index, ev.to_index)
        } else {
            let Ok([mut from, mut to]) = inventories.get_many_mut([ev.from, ev.to]) else {
                warn!("transfer skipped: {} or {} has no inventory", ev.from, ev.to);
                continue;
            };
            transfer_between(&mut from, ev.from_index, &mut to, ev.to_index)
        };

        match result {
            Ok(outcome) => {
                debug!("transfer {ev:?}: {outcome:?}");
                changed.write(InventoryChanged { owner: ev.from });
                if ev.to != ev.from {
                    changed.write(InventoryChanged { owner: ev.to });
                }
            }
            Err(e) => {
                warn!("transfer skipped: {e}");
                log.write(LogEvent(format!("Cannot move that: {e}")));
            }
        }
    }
}

pub fn split_stack(
    mut ev_split: EventReader<SplitStack>,
    mut inventories: Query<&mut Inventory>,
    mut changed: EventWriter<InventoryChanged>,
) {
    for ev in ev_split.read() {
        let Ok(mut inventory) = inventories.get_mut(ev.owner) else {
            continue;
        };
        match inventory.split(ev.from_index, ev.to_index) {
            Ok(0) => {}
            Ok(_) => {
                changed.write(InventoryChanged { owner: ev.owner });
            }
            Err(e) => warn!("split skipped: {e}"),
        }
    }
}

/// 玩家背包变化后，手持物可能也变了（比如最后一个被丢掉）
pub fn sync_held_item(
    mut ev_changed: EventReader<InventoryChanged>,
    player: Query<(Entity, &Inventory), With<Player>>,
    catalog: Res<ItemCatalog>,
    mut held: EventWriter<HeldItemChanged>,
) {
    let Ok((entity, inventory)) = player.single() else {
        ev_changed.clear();
        return;
    };
    let ours = ev_changed.read().filter(|ev| ev.owner == entity).count() > 0;
    if ours && inventory.selected().is_some() {
        held.write(HeldItemChanged {
            held: inventory.held_item(&catalog),
        });
    }
}

pub fn show_held_item(
    mut ev_held: EventReader<HeldItemChanged>,
    catalog: Res<ItemCatalog>,
    mut sprite: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<HeldItemSprite>>,
) {
    let Some(ev) = ev_held.read().last() else {
        return;
    };
    let Ok((mut sprite, mut transform, mut visibility)) = sprite.single_mut() else {
        return;
    };
    match ev.held.item.as_deref().and_then(|name| catalog.get(name)) {
        Some(def) => {
            sprite.color = rgba(def.color);
            transform.scale = Vec3::new(ev.held.scale, ev.held.scale, 1.0);
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
}

pub fn spawn_toolbar(mut commands: Commands, config: Res<GameConfig>) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|bar| {
            for i in 0..config.toolbar_size {
                bar.spawn((
                    ToolbarSlotUi(i),
                    Node {
                        width: Val::Px(96.0),
                        height: Val::Px(48.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(SLOT_COLOR),
                ))
                .with_children(|slot| {
                    slot.spawn((
                        ToolbarLabel(i),
                        Text::new(format!("{}", i + 1)),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                    ));
                });
            }
        });
}

pub fn refresh_toolbar(
    mut ev_changed: EventReader<InventoryChanged>,
    mut ev_held: EventReader<HeldItemChanged>,
    player: Query<(Entity, &Inventory), With<Player>>,
    mut labels: Query<(&ToolbarLabel, &mut Text)>,
    mut boxes: Query<(&ToolbarSlotUi, &mut BackgroundColor)>,
) {
    let Ok((entity, inventory)) = player.single() else {
        return;
    };
    let inventory_changed = ev_changed.read().filter(|ev| ev.owner == entity).count() > 0;
    let held_changed = ev_held.read().count() > 0;
    if !inventory_changed && !held_changed {
        return;
    }

    for (label, mut text) in &mut labels {
        text.0 = match inventory.slot(label.0) {
            Some(slot) if !slot.is_empty() => {
                format!("{}\n{} x{}", label.0 + 1, slot.item_name(), slot.count())
            }
            _ => format!("{}", label.0 + 1),
        };
    }
    for (ui, mut bg) in &mut boxes {
        bg.0 = if inventory.selected() == Some(ui.0) {
            SELECTED_COLOR
        } else {
            SLOT_COLOR
        };
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    player: Query<&Inventory, With<Player>>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let Ok(inventory) = player.single() else {
        log.write(LogEvent::new("No player inventory"));
        return;
    };

    let mut lines = Vec::new();
    for (idx, slot) in inventory.slots().iter().enumerate() {
        if !slot.is_empty() {
            let marker = if inventory.selected() == Some(idx) { "*" } else { " " };
            let bar = if inventory.is_toolbar_slot(idx) { "T" } else { " " };
            lines.push(format!(
                "{marker}{bar}[{idx}] {} x{}/{}",
                slot.item_name(),
                slot.count(),
                slot.max_allowed()
            ));
        }
    }
    if lines.is_empty() {
        lines.push("  (empty)".to_string());
    }
    log.write(LogEvent(lines.join("\n")));
}
