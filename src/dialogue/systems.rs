use bevy::prelude::*;

use super::data::DialogueLibrary;
use super::events::*;
use super::manager::{DialogueError, DialogueManager, DialogueNotice};
use super::runner::DialogueSignal;

/// Enter / Space 继续，Esc 跳过；只在对话显示时响应
pub fn dialogue_input(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    mut ev_continue: EventWriter<ContinueDialogue>,
    mut ev_skip: EventWriter<SkipDialogue>,
) {
    if !manager.is_active() {
        return;
    }
    if keys.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
        ev_continue.write(ContinueDialogue);
    }
    if keys.just_pressed(KeyCode::Escape) {
        ev_skip.write(SkipDialogue);
    }
}

/// 发起者被销毁时结束它的对话
pub fn end_orphaned_dialogue(mut manager: ResMut<DialogueManager>, entities: Query<()>) {
    if let Some(owner) = manager.owner() {
        if entities.get(owner).is_err() {
            debug!("dialogue owner {owner} is gone, ending dialogue");
            manager.abort();
        }
    }
}

/// 推进当前对话，然后处理新的开始请求。所有通知在这里统一发出
#[allow(clippy::too_many_arguments)]
pub fn drive_dialogue(
    time: Res<Time>,
    library: Res<DialogueLibrary>,
    mut manager: ResMut<DialogueManager>,
    mut ev_start: EventReader<StartDialogue>,
    mut ev_continue: EventReader<ContinueDialogue>,
    mut ev_skip: EventReader<SkipDialogue>,
    mut started: EventWriter<DialogueStarted>,
    mut ended: EventWriter<DialogueEnded>,
    mut rejected: EventWriter<DialogueRejected>,
    mut line_done: EventWriter<LineCompleted>,
) {
    for _ in ev_continue.read() {
        manager.advance();
    }
    for _ in ev_skip.read() {
        if !manager.skip() && manager.is_active() {
            debug!("this dialogue cannot be skipped");
        }
    }
    manager.tick(time.delta_secs());
    publish(manager.drain(), &mut ended, &mut line_done);

    for req in ev_start.read() {
        let (requested, data) = match &req.source {
            DialogueSource::Id(id) => (id.clone(), library.get(id)),
            DialogueSource::Inline(data) => (data.id.clone(), Some(data.clone())),
        };
        let result = data
            .ok_or_else(|| DialogueError::Unknown(requested.clone()))
            .and_then(|data| {
                let id = data.id.clone();
                manager.start(data, req.owner).map(|_| id)
            });
        match result {
            Ok(id) => {
                info!("dialogue '{id}' started");
                started.write(DialogueStarted {
                    owner: req.owner,
                    id,
                });
                publish(manager.drain(), &mut ended, &mut line_done);
            }
            Err(e) => {
                warn!("dialogue request rejected: {e}");
                rejected.write(DialogueRejected {
                    owner: req.owner,
                    id: requested,
                });
            }
        }
    }
}

fn publish(
    notices: Vec<DialogueNotice>,
    ended: &mut EventWriter<DialogueEnded>,
    line_done: &mut EventWriter<LineCompleted>,
) {
    for notice in notices {
        match notice.signal {
            DialogueSignal::LineStarted(_) => {}
            DialogueSignal::LineCompleted(index) => {
                line_done.write(LineCompleted { index });
            }
            DialogueSignal::Ended { skipped } => {
                info!("dialogue '{}' ended (skipped: {skipped})", notice.id);
                ended.write(DialogueEnded {
                    owner: notice.owner,
                    id: notice.id,
                    skipped,
                });
            }
        }
    }
}
