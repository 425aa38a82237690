use bevy::prelude::*;

use super::components::SequentialTrigger;
use super::events::*;
use super::runner::{ActionKind, TimedAction};
use crate::core::session::Session;
use crate::dialogue::events::{DialogueEnded, DialogueRejected, StartDialogue};
use crate::dialogue::manager::DialogueManager;
use crate::interaction::{interact_pressed, Interactable, ProximityEvent, ProximityKind};
use crate::level::components::Prop;
use crate::triggers::components::TriggerMode;

/// 把动作作用到所有同名的道具上；返回是否找到目标
fn apply_action(action: &TimedAction, props: &mut Query<(&Prop, &mut Visibility)>) -> bool {
    apply_kind(&action.target, action.kind, props)
}

fn apply_kind(target: &str, kind: ActionKind, props: &mut Query<(&Prop, &mut Visibility)>) -> bool {
    let mut found = false;
    for (prop, mut visibility) in props.iter_mut() {
        if prop.name != target {
            continue;
        }
        found = true;
        let visible = kind.apply(*visibility != Visibility::Hidden);
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    if !found {
        warn!("sequence target '{target}' not found, action skipped");
    }
    found
}

/// 带对话的序列在别的对话播放时不启动，否则请求会被拒
fn begin(
    entity: Entity,
    trigger: &mut SequentialTrigger,
    interactable: Option<&mut Interactable>,
    manager: &DialogueManager,
    ev_start: &mut EventWriter<StartDialogue>,
    ev_started: &mut EventWriter<SequenceStarted>,
) {
    if trigger.dialogue.is_some() && manager.is_active() {
        debug!("sequence {entity} waits: another dialogue is playing");
        return;
    }
    if !trigger.runner.trigger() {
        return;
    }
    info!("sequence {entity} started");
    if let Some(id) = &trigger.dialogue {
        ev_start.write(StartDialogue::by_id(id.clone(), Some(entity)));
    }
    if let Some(interactable) = interactable {
        interactable.busy = true;
    }
    ev_started.write(SequenceStarted { entity });
}

/// 新生成的序列：设置目标初始可见性，OnStart 的立即开始
pub fn setup_sequences(
    mut triggers: Query<
        (Entity, &mut SequentialTrigger, Option<&mut Interactable>),
        Added<SequentialTrigger>,
    >,
    manager: Res<DialogueManager>,
    mut props: Query<(&Prop, &mut Visibility)>,
    mut ev_start: EventWriter<StartDialogue>,
    mut ev_started: EventWriter<SequenceStarted>,
) {
    for (entity, mut trigger, interactable) in &mut triggers {
        for (target, visible) in trigger.runner.initial_visibility() {
            let kind = if visible { ActionKind::Show } else { ActionKind::Hide };
            apply_kind(&target, kind, &mut props);
        }
        if trigger.mode == TriggerMode::OnStart {
            begin(
                entity,
                &mut trigger,
                interactable.map(Mut::into_inner),
                &manager,
                &mut ev_start,
                &mut ev_started,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn fire_sequences(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    mut ev_proximity: EventReader<ProximityEvent>,
    mut ev_trigger: EventReader<TriggerSequence>,
    mut triggers: Query<(Entity, &mut SequentialTrigger, Option<&mut Interactable>)>,
    mut ev_start: EventWriter<StartDialogue>,
    mut ev_started: EventWriter<SequenceStarted>,
) {
    let mut wanted: Vec<Entity> = ev_trigger.read().map(|ev| ev.entity).collect();
    wanted.extend(
        ev_proximity
            .read()
            .filter(|ev| ev.kind == ProximityKind::Entered)
            .filter(|ev| {
                triggers
                    .get(ev.entity)
                    .is_ok_and(|(_, t, _)| t.mode == TriggerMode::OnEnter)
            })
            .map(|ev| ev.entity),
    );
    if interact_pressed(&keys) && !manager.is_active() {
        for (entity, trigger, interactable) in &triggers {
            if trigger.mode == TriggerMode::OnInteract
                && interactable.is_some_and(|i| i.in_range())
            {
                wanted.push(entity);
            }
        }
    }

    for entity in wanted {
        let Ok((entity, mut trigger, interactable)) = triggers.get_mut(entity) else {
            warn!("{entity} is not a sequence trigger");
            continue;
        };
        begin(
            entity,
            &mut trigger,
            interactable.map(Mut::into_inner),
            &manager,
            &mut ev_start,
            &mut ev_started,
        );
    }
}

pub fn run_sequences(
    time: Res<Time>,
    mut session: ResMut<Session>,
    mut triggers: Query<(Entity, &mut SequentialTrigger, Option<&mut Interactable>)>,
    mut props: Query<(&Prop, &mut Visibility)>,
    mut ev_completed: EventWriter<SequenceCompleted>,
) {
    let dt = time.delta_secs();
    for (entity, mut trigger, interactable) in &mut triggers {
        if !trigger.runner.is_running() {
            continue;
        }
        let done = trigger.runner.tick(dt, |action| {
            apply_action(action, &mut props);
        });
        if !done {
            continue;
        }
        info!("sequence {entity} completed");
        if let Some(flag) = &trigger.complete_flag {
            session.flags.set(flag);
        }
        // 有对话的序列等对话结束再解除
        if trigger.dialogue.is_none() {
            if let Some(mut interactable) = interactable {
                interactable.busy = false;
            }
        }
        ev_completed.write(SequenceCompleted { entity });
    }
}

/// 序列自己的对话结束（或请求被拒）后可以再次触发；execute_once 的动作仍然保持已执行
pub fn rearm_after_dialogue(
    mut ev_ended: EventReader<DialogueEnded>,
    mut ev_rejected: EventReader<DialogueRejected>,
    mut triggers: Query<(&mut SequentialTrigger, Option<&mut Interactable>)>,
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
            trigger.runner.rearm();
            if let Some(mut interactable) = interactable {
                interactable.busy = false;
            }
        }
    }
}

pub fn reset_sequences(
    mut ev_reset: EventReader<ResetSequence>,
    mut triggers: Query<(&mut SequentialTrigger, Option<&mut Interactable>)>,
) {
    for ev in ev_reset.read() {
        match triggers.get_mut(ev.entity) {
            Ok((mut trigger, interactable)) => {
                trigger.runner.reset();
                if let Some(mut interactable) = interactable {
                    interactable.busy = false;
                }
                debug!("sequence {} reset", ev.entity);
            }
            Err(_) => warn!("{} is not a sequence trigger", ev.entity),
        }
    }
}

pub fn execute_single_action(
    mut ev_exec: EventReader<ExecuteAction>,
    triggers: Query<&SequentialTrigger>,
    mut props: Query<(&Prop, &mut Visibility)>,
) {
    for ev in ev_exec.read() {
        let action = triggers
            .get(ev.entity)
            .ok()
            .and_then(|t| t.runner.action(ev.index));
        match action {
            Some(action) => {
                apply_action(action, &mut props);
            }
            None => warn!("no action {} on {}", ev.index, ev.entity),
        }
    }
}
