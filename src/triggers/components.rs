use bevy::prelude::*;
use serde::Deserialize;

/// 触发方式：关卡开始时 / 玩家走进范围 / 在范围内按互动键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TriggerMode {
    OnStart,
    OnEnter,
    #[default]
    OnInteract,
}

/// 播放某段对话的触发器；对话结束前不会再次触发
#[derive(Component, Debug, Clone)]
pub struct DialogueTrigger {
    pub dialogue: String,
    pub mode: TriggerMode,
    triggered: bool,
}

impl DialogueTrigger {
    pub fn new(dialogue: impl Into<String>, mode: TriggerMode) -> Self {
        Self {
            dialogue: dialogue.into(),
            mode,
            triggered: false,
        }
    }

    /// 返回是否应当发出对话请求
    pub fn fire(&mut self) -> bool {
        if self.triggered || self.dialogue.is_empty() {
            return false;
        }
        self.triggered = true;
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn reset(&mut self) {
        self.triggered = false;
    }

    /// 换一段对话并重新武装
    pub fn set_dialogue(&mut self, dialogue: impl Into<String>) {
        self.dialogue = dialogue.into();
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_until_reset() {
        let mut t = DialogueTrigger::new("intro", TriggerMode::OnInteract);
        assert!(t.fire());
        assert!(!t.fire());
        t.reset();
        assert!(t.fire());
    }

    #[test]
    fn empty_dialogue_never_fires() {
        let mut t = DialogueTrigger::new("", TriggerMode::OnStart);
        assert!(!t.fire());
        t.set_dialogue("note");
        assert!(t.fire());
    }
}
