mod common;

use bevy::prelude::*;
use common::*;
use lucid_break::collectable::components::Collectable;
use lucid_break::collectable::CollectablePlugin;
use lucid_break::core::session::Session;
use lucid_break::interaction::{Interactable, InteractionPlugin, INTERACT_KEY};
use lucid_break::inventory::components::Inventory;
use lucid_break::inventory::events::{DropItem, SelectSlot};
use lucid_break::inventory::InventoryPlugin;
use lucid_break::player::components::Player;

fn setup(inventory: Inventory) -> (App, Entity) {
    let mut app = base_app();
    app.add_plugins((InventoryPlugin, InteractionPlugin, CollectablePlugin));
    let player = app
        .world_mut()
        .spawn((Player, inventory, Transform::default()))
        .id();
    (app, player)
}

fn spawn_key(app: &mut App, x: f32) -> Entity {
    app.world_mut()
        .spawn((
            Collectable::new("Key"),
            Interactable::new(48.0),
            Transform::from_xyz(x, 0.0, 0.0),
            Visibility::Inherited,
        ))
        .id()
}

fn collectable(app: &App, entity: Entity) -> &Collectable {
    app.world().get::<Collectable>(entity).unwrap()
}

fn visibility(app: &App, entity: Entity) -> Visibility {
    *app.world().get::<Visibility>(entity).unwrap()
}

#[test]
fn pickup_in_range_adds_and_hides() {
    let (mut app, player) = setup(Inventory::new(3, 3, 20));
    let key = spawn_key(&mut app, 10.0);
    app.update();
    assert!(!collectable(&app, key).is_collected());

    tap(&mut app, INTERACT_KEY);

    assert!(collectable(&app, key).is_collected());
    assert_eq!(visibility(&app, key), Visibility::Hidden);
    assert!(app.world().get::<Inventory>(player).unwrap().contains("Key"));
    assert!(app.world().resource::<Session>().collected.contains("Key"));
}

#[test]
fn out_of_range_item_is_ignored() {
    let (mut app, player) = setup(Inventory::new(3, 3, 20));
    let key = spawn_key(&mut app, 500.0);
    app.update();
    tap(&mut app, INTERACT_KEY);

    assert!(!collectable(&app, key).is_collected());
    assert!(!app.world().get::<Inventory>(player).unwrap().contains("Key"));
}

#[test]
fn already_collected_item_spawns_hidden() {
    let (mut app, _) = setup(Inventory::new(3, 3, 20));
    app.world_mut().resource_mut::<Session>().collected.insert("Key");
    let key = spawn_key(&mut app, 500.0);
    app.update();

    assert!(collectable(&app, key).is_collected());
    assert_eq!(visibility(&app, key), Visibility::Hidden);
}

#[test]
fn full_inventory_leaves_item_in_world() {
    let catalog = catalog();
    let mut inventory = Inventory::new(3, 3, 20);
    for name in ["Flashlight", "Seed", "Music Box"] {
        inventory.add(catalog.get(name).unwrap()).unwrap();
    }
    let (mut app, _) = setup(inventory);
    let key = spawn_key(&mut app, 10.0);
    app.update();
    tap(&mut app, INTERACT_KEY);

    assert!(!collectable(&app, key).is_collected());
    assert_eq!(visibility(&app, key), Visibility::Inherited);
    assert!(!app.world().resource::<Session>().collected.contains("Key"));
}

#[test]
fn dropping_returns_item_to_world() {
    let (mut app, player) = setup(Inventory::new(3, 3, 20));
    spawn_key(&mut app, 10.0);
    app.update();
    tap(&mut app, INTERACT_KEY);

    app.world_mut().send_event(SelectSlot { index: 0 });
    app.update();
    app.world_mut().send_event(DropItem::default());
    app.update();
    app.update();

    assert!(!app.world().get::<Inventory>(player).unwrap().contains("Key"));
    assert!(!app.world().resource::<Session>().collected.contains("Key"));

    let mut query = app.world_mut().query::<&Collectable>();
    let states: Vec<bool> = query.iter(app.world()).map(|c| c.is_collected()).collect();
    assert_eq!(states.len(), 2);
    assert_eq!(states.iter().filter(|collected| !**collected).count(), 1);
}

#[test]
fn dropped_unit_returns_to_its_stack() {
    let seed = catalog().get("Seed").unwrap().clone();
    let mut inventory = Inventory::new(3, 3, 20);
    inventory.add(&seed).unwrap();
    inventory.add(&seed).unwrap();
    let (mut app, player) = setup(inventory);
    app.update();

    app.world_mut().send_event(SelectSlot { index: 0 });
    app.update();
    app.world_mut().send_event(DropItem::default());
    app.update();
    app.update();
    assert_eq!(app.world().get::<Inventory>(player).unwrap().count_of("Seed"), 1);

    tap(&mut app, INTERACT_KEY);

    assert_eq!(app.world().get::<Inventory>(player).unwrap().count_of("Seed"), 2);
    let mut query = app.world_mut().query::<&Collectable>();
    let dropped: Vec<&Collectable> = query.iter(app.world()).collect();
    assert_eq!(dropped.len(), 1);
    assert!(dropped[0].is_dropped());
    assert!(dropped[0].is_collected());
}
