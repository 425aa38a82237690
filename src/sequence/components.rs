use bevy::prelude::*;

use super::runner::{SequenceRunner, TimedAction};
use crate::triggers::components::TriggerMode;

/// 场景里按顺序显示/隐藏物体的触发器
#[derive(Component, Debug, Clone)]
pub struct SequentialTrigger {
    pub runner: SequenceRunner,
    pub mode: TriggerMode,
    /// 和动作一起播放的对话
    pub dialogue: Option<String>,
    /// 执行完后在会话里设置的标记
    pub complete_flag: Option<String>,
}

impl SequentialTrigger {
    pub fn new(actions: Vec<TimedAction>, mode: TriggerMode) -> Self {
        Self {
            runner: SequenceRunner::new(actions),
            mode,
            dialogue: None,
            complete_flag: None,
        }
    }

    pub fn with_dialogue(mut self, id: impl Into<String>) -> Self {
        self.dialogue = Some(id.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.complete_flag = Some(flag.into());
        self
    }
}
