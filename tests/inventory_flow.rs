mod common;

use bevy::prelude::*;
use common::*;
use lucid_break::inventory::components::Inventory;
use lucid_break::inventory::events::*;
use lucid_break::inventory::InventoryPlugin;
use lucid_break::player::components::Player;

fn setup() -> (App, Entity) {
    let mut app = base_app();
    app.add_plugins(InventoryPlugin);
    let player = app
        .world_mut()
        .spawn((Player, Inventory::new(3, 3, 20)))
        .id();
    app.update();
    (app, player)
}

fn inventory(app: &App, entity: Entity) -> &Inventory {
    app.world().get::<Inventory>(entity).unwrap()
}

#[test]
fn give_stacks_into_one_slot() {
    let (mut app, player) = setup();
    app.world_mut().send_event(AddItem::to_player("key", 3));
    app.update();

    let inv = inventory(&app, player);
    assert_eq!(inv.slot(0).unwrap().item_name(), "Key");
    assert_eq!(inv.slot(0).unwrap().count(), 3);
    assert!(inv.slot(1).unwrap().is_empty());
    assert!(!drain::<InventoryChanged>(&mut app).is_empty());
}

#[test]
fn full_inventory_keeps_its_contents() {
    let (mut app, player) = setup();
    for name in ["Key", "Flashlight", "Seed"] {
        app.world_mut().send_event(AddItem::to_player(name, 1));
    }
    app.update();
    let before = inventory(&app, player).clone();

    app.world_mut().send_event(AddItem::to_player("Music Box", 1));
    app.update();

    let after = inventory(&app, player);
    assert!(!after.contains("Music Box"));
    for i in 0..3 {
        assert_eq!(after.slot(i), before.slot(i));
    }
}

#[test]
fn selecting_publishes_held_item() {
    let (mut app, _) = setup();
    app.world_mut().send_event(AddItem::to_player("Key", 1));
    app.world_mut().send_event(AddItem::to_player("Seed", 1));
    app.update();
    drain::<HeldItemChanged>(&mut app);

    app.world_mut().send_event(SelectSlot { index: 0 });
    app.update();
    let held = drain::<HeldItemChanged>(&mut app).pop().unwrap().held;
    assert_eq!(held.item.as_deref(), Some("Key"));
    assert_eq!(held.scale, 1.0);

    app.world_mut().send_event(SelectSlot { index: 1 });
    app.update();
    let held = drain::<HeldItemChanged>(&mut app).pop().unwrap().held;
    assert_eq!(held.item.as_deref(), Some("Seed"));
    assert_eq!(held.scale, 0.5);

    app.world_mut().send_event(SelectSlot { index: 2 });
    app.update();
    let held = drain::<HeldItemChanged>(&mut app).pop().unwrap().held;
    assert!(!held.is_visible());
}

#[test]
fn transfer_moves_stack_into_chest() {
    let (mut app, player) = setup();
    let chest = app.world_mut().spawn(Inventory::new(6, 0, 20)).id();
    app.world_mut().send_event(AddItem::to_player("Seed", 2));
    app.update();

    app.world_mut().send_event(TransferItem {
        from: player,
        from_index: 0,
        to: chest,
        to_index: 4,
    });
    app.update();

    assert!(inventory(&app, player).slot(0).unwrap().is_empty());
    let slot = inventory(&app, chest).slot(4).unwrap();
    assert_eq!((slot.item_name(), slot.count()), ("Seed", 2));
}

#[test]
fn transfer_within_inventory_swaps_different_items() {
    let (mut app, player) = setup();
    app.world_mut().send_event(AddItem::to_player("Key", 1));
    app.world_mut().send_event(AddItem::to_player("Seed", 4));
    app.update();

    app.world_mut().send_event(TransferItem {
        from: player,
        from_index: 0,
        to: player,
        to_index: 1,
    });
    app.update();

    let inv = inventory(&app, player);
    assert_eq!(inv.slot(0).unwrap().item_name(), "Seed");
    assert_eq!(inv.slot(0).unwrap().count(), 4);
    assert_eq!(inv.slot(1).unwrap().item_name(), "Key");
}

#[test]
fn removing_last_item_clears_slot() {
    let (mut app, player) = setup();
    app.world_mut().send_event(AddItem::to_player("Flashlight", 1));
    app.update();
    app.world_mut().send_event(RemoveItem {
        owner: None,
        index: 0,
    });
    app.update();
    assert!(inventory(&app, player).is_empty());
}
