use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use super::data::DialogueData;
use super::runner::{DialogueRunner, DialogueSignal};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogueError {
    #[error("dialogue '{0}' is already being displayed")]
    AlreadyActive(String),
    #[error("unknown dialogue '{0}'")]
    Unknown(String),
}

/// 带上发起者和对话 id 的信号
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueNotice {
    pub owner: Option<Entity>,
    pub id: String,
    pub signal: DialogueSignal,
}

#[derive(Debug)]
struct ActiveDialogue {
    runner: DialogueRunner,
    owner: Option<Entity>,
}

/// 全局唯一的对话槽位，同一时间只播放一段
#[derive(Resource, Debug, Default)]
pub struct DialogueManager {
    active: Option<ActiveDialogue>,
}

impl DialogueManager {
    pub fn start(
        &mut self,
        data: Arc<DialogueData>,
        owner: Option<Entity>,
    ) -> Result<(), DialogueError> {
        if let Some(active) = &self.active {
            return Err(DialogueError::AlreadyActive(active.runner.data().id.clone()));
        }
        self.active = Some(ActiveDialogue {
            runner: DialogueRunner::start(data),
            owner,
        });
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn runner(&self) -> Option<&DialogueRunner> {
        self.active.as_ref().map(|a| &a.runner)
    }

    pub fn owner(&self) -> Option<Entity> {
        self.active.as_ref().and_then(|a| a.owner)
    }

    pub fn advance(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.runner.advance();
        }
    }

    pub fn skip(&mut self) -> bool {
        self.active.as_mut().is_some_and(|a| a.runner.skip())
    }

    pub fn abort(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.runner.abort();
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(active) = self.active.as_mut() {
            active.runner.tick(dt);
        }
    }

    /// 取走积压的信号；已结束的对话在这里让出槽位
    pub fn drain(&mut self) -> Vec<DialogueNotice> {
        let Some(active) = self.active.as_mut() else {
            return Vec::new();
        };
        let owner = active.owner;
        let id = active.runner.data().id.clone();
        let notices = active
            .runner
            .drain()
            .map(|signal| DialogueNotice {
                owner,
                id: id.clone(),
                signal,
            })
            .collect();
        if active.runner.is_finished() {
            self.active = None;
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(id: &str) -> Arc<DialogueData> {
        Arc::new(DialogueData::builder(id).line("a").line("b").build())
    }

    #[test]
    fn second_start_is_rejected_while_active() {
        let mut m = DialogueManager::default();
        m.start(data("one"), None).unwrap();
        assert_eq!(
            m.start(data("two"), None),
            Err(DialogueError::AlreadyActive("one".into()))
        );
        assert_eq!(m.runner().unwrap().data().id, "one");
    }

    #[test]
    fn slot_frees_after_end_is_drained() {
        let owner = Entity::from_raw(7);
        let mut m = DialogueManager::default();
        m.start(data("one"), Some(owner)).unwrap();
        assert!(m.skip());
        let notices = m.drain();
        assert!(!m.is_active());
        let last = notices.last().unwrap();
        assert_eq!(last.owner, Some(owner));
        assert_eq!(last.signal, DialogueSignal::Ended { skipped: true });
        assert!(m.start(data("two"), None).is_ok());
    }

    #[test]
    fn finished_but_undrained_still_blocks() {
        let mut m = DialogueManager::default();
        m.start(data("one"), None).unwrap();
        m.abort();
        assert!(m.start(data("two"), None).is_err());
        m.drain();
        assert!(m.start(data("two"), None).is_ok());
    }
}
