use bevy::prelude::*;

use super::components::*;
use super::conditions::ConditionalDialogue;
use crate::core::session::Session;
use crate::dialogue::events::{DialogueEnded, DialogueRejected, StartDialogue};
use crate::dialogue::manager::DialogueManager;
use crate::interaction::{interact_pressed, Interactable, ProximityEvent, ProximityKind};
use crate::inventory::components::Inventory;
use crate::player::components::Player;

fn request(
    entity: Entity,
    trigger: &mut DialogueTrigger,
    interactable: Option<&mut Interactable>,
    ev_start: &mut EventWriter<StartDialogue>,
) {
    if !trigger.fire() {
        return;
    }
    debug!("trigger {entity} requests dialogue '{}'", trigger.dialogue);
    ev_start.write(StartDialogue::by_id(trigger.dialogue.clone(), Some(entity)));
    if let Some(interactable) = interactable {
        interactable.busy = true;
    }
}

pub fn start_triggers_on_spawn(
    mut triggers: Query<(Entity, &mut DialogueTrigger, Option<&mut Interactable>), Added<DialogueTrigger>>,
    mut ev_start: EventWriter<StartDialogue>,
) {
    for (entity, mut trigger, interactable) in &mut triggers {
        if trigger.mode == TriggerMode::OnStart {
            request(entity, &mut trigger, interactable.map(Mut::into_inner), &mut ev_start);
        }
    }
}

/// 进入范围 / 互动键。已有对话在播时不触发，以免请求被拒后卡在已触发状态
pub fn fire_dialogue_triggers(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    mut ev_proximity: EventReader<ProximityEvent>,
    mut triggers: Query<(Entity, &mut DialogueTrigger, &mut Interactable)>,
    mut ev_start: EventWriter<StartDialogue>,
) {
    let entered: Vec<Entity> = ev_proximity
        .read()
        .filter(|ev| ev.kind == ProximityKind::Entered)
        .map(|ev| ev.entity)
        .collect();
    if manager.is_active() {
        return;
    }
    let pressed = interact_pressed(&keys);
    for (entity, mut trigger, mut interactable) in &mut triggers {
        let fire = match trigger.mode {
            TriggerMode::OnStart => false,
            TriggerMode::OnEnter => entered.contains(&entity),
            TriggerMode::OnInteract => pressed && interactable.in_range(),
        };
        if fire {
            request(entity, &mut trigger, Some(&mut *interactable), &mut ev_start);
        }
    }
}

/// 自己的对话结束或请求被拒后重新武装
pub fn rearm_dialogue_triggers(
    mut ev_ended: EventReader<DialogueEnded>,
    mut ev_rejected: EventReader<DialogueRejected>,
    mut triggers: Query<(&mut DialogueTrigger, Option<&mut Interactable>)>,
) {
    let owners = ev_ended
        .read()
        .map(|ev| ev.owner)
        .chain(ev_rejected.read().map(|ev| ev.owner));
    for owner in owners {
        let Some(owner) = owner else {
            continue;
        };
        if let Ok((mut trigger, interactable)) = triggers.get_mut(owner) {
            trigger.reset();
            if let Some(mut interactable) = interactable {
                interactable.busy = false;
            }
        }
    }
}

pub fn check_conditionals_on_spawn(
    session: Res<Session>,
    player: Query<&Inventory, With<Player>>,
    mut conditionals: Query<(Entity, &mut ConditionalDialogue), Added<ConditionalDialogue>>,
    mut ev_start: EventWriter<StartDialogue>,
) {
    let inventory = player.single().ok();
    for (entity, mut conditional) in &mut conditionals {
        let due = conditional.check_on_start(|c| c.is_met(&session, inventory));
        send_entries(entity, &conditional, due, &mut ev_start);
    }
}

pub fn tick_conditionals(
    time: Res<Time>,
    session: Res<Session>,
    player: Query<&Inventory, With<Player>>,
    mut conditionals: Query<(Entity, &mut ConditionalDialogue)>,
    mut ev_start: EventWriter<StartDialogue>,
) {
    let dt = time.delta_secs();
    let inventory = player.single().ok();
    for (entity, mut conditional) in &mut conditionals {
        let mut due = conditional.tick_pending(dt);
        if conditional.interval_elapsed(dt) {
            due.extend(conditional.check_all(|c| c.is_met(&session, inventory)));
        }
        send_entries(entity, &conditional, due, &mut ev_start);
    }
}

fn send_entries(
    entity: Entity,
    conditional: &ConditionalDialogue,
    due: Vec<usize>,
    ev_start: &mut EventWriter<StartDialogue>,
) {
    for index in due {
        let Some(entry) = conditional.entries().get(index) else {
            continue;
        };
        match entry.request(entity) {
            Some(req) => {
                info!("conditional dialogue '{}' triggered", entry.name);
                ev_start.write(req);
            }
            None => warn!("conditional entry '{}' has neither dialogue nor text", entry.name),
        }
    }
}
