// 按顺序执行的显示/隐藏动作。每个动作的延迟相对上一个动作计算

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ActionKind {
    #[default]
    Show,
    Hide,
    Toggle,
}

impl ActionKind {
    /// 作用在当前可见性上，返回新的可见性
    pub fn apply(self, visible: bool) -> bool {
        match self {
            ActionKind::Show => true,
            ActionKind::Hide => false,
            ActionKind::Toggle => !visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct TimedAction {
    pub target: String,
    pub kind: ActionKind,
    pub delay: f32,
    pub execute_once: bool,
    #[serde(skip)]
    has_executed: bool,
}

impl TimedAction {
    pub fn new(target: impl Into<String>, kind: ActionKind, delay: f32) -> Self {
        Self {
            target: target.into(),
            kind,
            delay,
            ..Default::default()
        }
    }

    pub fn once(mut self) -> Self {
        self.execute_once = true;
        self
    }

    pub fn has_executed(&self) -> bool {
        self.has_executed
    }

    fn consumed(&self) -> bool {
        self.execute_once && self.has_executed
    }
}

#[derive(Debug, Clone, Default)]
pub struct SequenceRunner {
    actions: Vec<TimedAction>,
    triggered: bool,
    running: bool,
    cursor: usize,
    elapsed: f32,
}

impl SequenceRunner {
    pub fn new(actions: Vec<TimedAction>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    pub fn actions(&self) -> &[TimedAction] {
        &self.actions
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 已触发且未重置、或正在执行时什么都不做；返回是否真的开始了
    pub fn trigger(&mut self) -> bool {
        if self.triggered || self.running {
            return false;
        }
        self.triggered = true;
        self.running = true;
        self.cursor = 0;
        self.elapsed = 0.0;
        true
    }

    /// 推进时间，到期的动作交给 `apply`。返回本次是否刚好执行完整个序列
    pub fn tick(&mut self, dt: f32, mut apply: impl FnMut(&TimedAction)) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt.max(0.0);
        loop {
            while self
                .actions
                .get(self.cursor)
                .is_some_and(TimedAction::consumed)
            {
                self.cursor += 1;
            }
            let Some(action) = self.actions.get_mut(self.cursor) else {
                self.running = false;
                self.cursor = 0;
                self.elapsed = 0.0;
                return true;
            };
            let delay = action.delay.max(0.0);
            if self.elapsed < delay {
                return false;
            }
            self.elapsed -= delay;
            apply(action);
            if action.execute_once {
                action.has_executed = true;
            }
            self.cursor += 1;
        }
    }

    /// 只清掉“已触发”，序列的对话结束时调用
    pub fn rearm(&mut self) {
        self.triggered = false;
    }

    pub fn reset(&mut self) {
        self.triggered = false;
        self.running = false;
        self.cursor = 0;
        self.elapsed = 0.0;
        for action in &mut self.actions {
            action.has_executed = false;
        }
    }

    /// 按下标取动作，供单独执行时使用（不计延迟，不标记 execute_once）
    pub fn action(&self, index: usize) -> Option<&TimedAction> {
        self.actions.get(index)
    }

    pub fn add_action(&mut self, target: impl Into<String>, kind: ActionKind, delay: f32) {
        self.actions.push(TimedAction::new(target, kind, delay));
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
        self.cursor = 0;
    }

    /// 目标的初始可见性：只要有 Show 动作指向它就先显示
    pub fn initial_visibility(&self) -> HashMap<String, bool> {
        let mut out: HashMap<String, bool> = HashMap::new();
        for action in &self.actions {
            if action.target.is_empty() {
                continue;
            }
            let shown = out.entry(action.target.clone()).or_insert(false);
            *shown |= action.kind == ActionKind::Show;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(runner: &mut SequenceRunner, dt: f32) -> (Vec<String>, bool) {
        let mut applied = Vec::new();
        let done = runner.tick(dt, |a| applied.push(format!("{}:{:?}", a.target, a.kind)));
        (applied, done)
    }

    #[test]
    fn delays_are_relative_to_previous_action() {
        let mut r = SequenceRunner::new(vec![
            TimedAction::new("door", ActionKind::Show, 1.0),
            TimedAction::new("lamp", ActionKind::Hide, 0.5),
        ]);
        assert!(r.trigger());
        assert_eq!(run(&mut r, 0.9), (vec![], false));
        assert_eq!(run(&mut r, 0.2), (vec!["door:Show".to_string()], false));
        assert_eq!(run(&mut r, 0.3), (vec![], false));
        let (applied, done) = run(&mut r, 0.3);
        assert_eq!(applied, vec!["lamp:Hide".to_string()]);
        assert!(done);
        assert!(!r.is_running());
        assert!(r.is_triggered());
    }

    #[test]
    fn zero_delays_fire_in_one_tick() {
        let mut r = SequenceRunner::new(vec![
            TimedAction::new("a", ActionKind::Show, 0.0),
            TimedAction::new("b", ActionKind::Toggle, -1.0),
        ]);
        r.trigger();
        let (applied, done) = run(&mut r, 0.0);
        assert_eq!(applied.len(), 2);
        assert!(done);
    }

    #[test]
    fn trigger_twice_runs_once() {
        let mut r = SequenceRunner::new(vec![TimedAction::new("a", ActionKind::Show, 0.0)]);
        assert!(r.trigger());
        assert!(!r.trigger());
        run(&mut r, 0.0);
        // 执行完但没重置，仍然不能再触发
        assert!(!r.trigger());
        r.rearm();
        assert!(r.trigger());
    }

    #[test]
    fn execute_once_actions_skip_until_reset() {
        let mut r = SequenceRunner::new(vec![
            TimedAction::new("a", ActionKind::Show, 0.0).once(),
            TimedAction::new("b", ActionKind::Toggle, 0.0),
        ]);
        r.trigger();
        assert_eq!(run(&mut r, 0.0).0.len(), 2);
        assert!(r.actions()[0].has_executed());

        r.rearm();
        r.trigger();
        assert_eq!(run(&mut r, 0.0).0, vec!["b:Toggle".to_string()]);

        r.reset();
        assert!(!r.actions()[0].has_executed());
        r.trigger();
        assert_eq!(run(&mut r, 0.0).0.len(), 2);
    }

    #[test]
    fn empty_sequence_completes_immediately() {
        let mut r = SequenceRunner::default();
        r.trigger();
        assert_eq!(run(&mut r, 0.016), (vec![], true));
        assert_eq!(run(&mut r, 0.016), (vec![], false));
    }

    #[test]
    fn untriggered_runner_does_nothing() {
        let mut r = SequenceRunner::new(vec![TimedAction::new("a", ActionKind::Show, 0.0)]);
        assert_eq!(run(&mut r, 1.0), (vec![], false));
    }

    #[test]
    fn initial_visibility_follows_show_actions() {
        let mut r = SequenceRunner::default();
        r.add_action("ghost", ActionKind::Hide, 0.0);
        r.add_action("ghost", ActionKind::Show, 1.0);
        r.add_action("wall", ActionKind::Hide, 0.0);
        r.add_action("", ActionKind::Show, 0.0);
        let vis = r.initial_visibility();
        assert_eq!(vis.get("ghost"), Some(&true));
        assert_eq!(vis.get("wall"), Some(&false));
        assert_eq!(vis.len(), 2);
    }

    #[test]
    fn action_lookup_by_index() {
        let mut r = SequenceRunner::default();
        r.add_action("a", ActionKind::Toggle, 5.0);
        assert_eq!(r.action(0).map(|a| a.kind), Some(ActionKind::Toggle));
        assert!(r.action(3).is_none());
        r.clear_actions();
        assert!(r.actions().is_empty());
    }

    #[test]
    fn toggle_flips_visibility() {
        assert!(ActionKind::Toggle.apply(false));
        assert!(!ActionKind::Toggle.apply(true));
        assert!(ActionKind::Show.apply(false));
        assert!(!ActionKind::Hide.apply(true));
    }
}
