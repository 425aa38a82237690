//! 打字机式对话播放器。
//!
//! 不依赖 ECS：宿主每帧调用 [`DialogueRunner::tick`] 推进时间，
//! 输入转成 [`DialogueRunner::advance`] / [`DialogueRunner::skip`]，
//! 产生的信号通过 [`DialogueRunner::drain`] 取走。

use std::collections::VecDeque;
use std::sync::Arc;

use super::data::{DialogueData, DialogueLine};

/// 抖动的台词每个字额外停顿
pub const SHAKE_PAUSE: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogueSignal {
    LineStarted(usize),
    LineCompleted(usize),
    Ended { skipped: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LineState {
    Typing { elapsed: f32 },
    Complete,
    Finished,
}

#[derive(Debug, Clone)]
pub struct DialogueRunner {
    data: Arc<DialogueData>,
    line: usize,
    revealed: usize,
    line_len: usize,
    state: LineState,
    auto_advance_in: Option<f32>,
    signals: VecDeque<DialogueSignal>,
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

impl DialogueRunner {
    /// 从第一句开始。没有台词的对话立即结束
    pub fn start(data: Arc<DialogueData>) -> Self {
        let mut runner = Self {
            data,
            line: 0,
            revealed: 0,
            line_len: 0,
            state: LineState::Complete,
            auto_advance_in: None,
            signals: VecDeque::new(),
        };
        if runner.data.lines.is_empty() {
            runner.finish(false);
        } else {
            runner.start_line();
        }
        runner
    }

    pub fn data(&self) -> &DialogueData {
        &self.data
    }

    pub fn line_index(&self) -> usize {
        self.line
    }

    pub fn current_line(&self) -> Option<&DialogueLine> {
        self.data.lines.get(self.line)
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.state, LineState::Typing { .. })
    }

    pub fn is_finished(&self) -> bool {
        self.state == LineState::Finished
    }

    pub fn auto_advance_pending(&self) -> bool {
        self.auto_advance_in.is_some()
    }

    /// 打字机抖动只在逐字显示时生效
    pub fn is_shaking(&self) -> bool {
        self.is_typing() && self.current_line().is_some_and(|l| l.shake)
    }

    /// 当前已经显示出来的文字
    pub fn visible_text(&self) -> &str {
        let Some(line) = self.current_line() else {
            return "";
        };
        let text = line.text();
        match text.char_indices().nth(self.revealed) {
            Some((byte, _)) => &text[..byte],
            None => text,
        }
    }

    pub fn drain(&mut self) -> impl Iterator<Item = DialogueSignal> + '_ {
        self.signals.drain(..)
    }

    fn char_interval(&self) -> f32 {
        let Some(line) = self.current_line() else {
            return 0.0;
        };
        let pause = if line.shake { SHAKE_PAUSE } else { 0.0 };
        non_negative(line.text_speed) + pause
    }

    /// 自动推进的等待：优先用台词自己的停留时间，否则用全局延迟
    fn post_line_wait(&self) -> f32 {
        let own = self.current_line().map_or(0.0, |l| non_negative(l.wait_after));
        if own > 0.0 {
            own
        } else {
            non_negative(self.data.auto_advance_delay)
        }
    }

    fn start_line(&mut self) {
        self.auto_advance_in = None;
        self.line_len = self.current_line().map_or(0, |l| l.text().chars().count());
        self.signals.push_back(DialogueSignal::LineStarted(self.line));
        if self.line_len == 0 {
            self.revealed = 0;
            self.complete_line();
        } else {
            // 第一个字立即出现
            self.revealed = 1;
            self.state = LineState::Typing { elapsed: 0.0 };
        }
    }

    fn complete_line(&mut self) {
        self.revealed = self.line_len;
        self.state = LineState::Complete;
        self.signals.push_back(DialogueSignal::LineCompleted(self.line));
        if self.data.auto_advance {
            self.auto_advance_in = Some(self.post_line_wait());
        }
    }

    fn finish(&mut self, skipped: bool) {
        self.auto_advance_in = None;
        self.state = LineState::Finished;
        self.signals.push_back(DialogueSignal::Ended { skipped });
    }

    /// 逐字显示中：立即显示整句；已显示完：下一句，最后一句则结束
    pub fn advance(&mut self) {
        match self.state {
            LineState::Finished => {}
            LineState::Typing { .. } => self.complete_line(),
            LineState::Complete => {
                self.auto_advance_in = None;
                self.line += 1;
                if self.line >= self.data.lines.len() {
                    self.line = self.data.lines.len() - 1;
                    self.finish(false);
                } else {
                    self.start_line();
                }
            }
        }
    }

    /// 仅当对话允许跳过时立即结束。返回是否生效
    pub fn skip(&mut self) -> bool {
        if self.is_finished() || !self.data.can_skip {
            return false;
        }
        self.finish(true);
        true
    }

    /// 不看 can_skip 强制结束，用于发起者被销毁的情况
    pub fn abort(&mut self) {
        if !self.is_finished() {
            self.finish(true);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        let dt = non_negative(dt);
        match self.state {
            LineState::Finished => {}
            LineState::Typing { elapsed } => {
                let step = self.char_interval();
                if step <= 0.0 {
                    self.complete_line();
                    return;
                }
                let mut elapsed = elapsed + dt;
                while elapsed >= step {
                    elapsed -= step;
                    if self.revealed < self.line_len {
                        self.revealed += 1;
                    } else {
                        self.complete_line();
                        return;
                    }
                }
                self.state = LineState::Typing { elapsed };
            }
            LineState::Complete => {
                if let Some(remaining) = self.auto_advance_in.as_mut() {
                    *remaining -= dt;
                    if *remaining <= 0.0 {
                        self.auto_advance_in = None;
                        self.advance();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, speed: f32) -> DialogueLine {
        DialogueLine {
            text_speed: speed,
            ..DialogueLine::new(text)
        }
    }

    fn two_lines(can_skip: bool) -> Arc<DialogueData> {
        Arc::new(
            DialogueData::builder("two")
                .line_with(line("Hello", 0.1))
                .line_with(line("World", 0.1))
                .can_skip(can_skip)
                .build(),
        )
    }

    fn ended_count(signals: &[DialogueSignal]) -> usize {
        signals
            .iter()
            .filter(|s| matches!(s, DialogueSignal::Ended { .. }))
            .count()
    }

    #[test]
    fn typewriter_reveals_one_char_per_interval() {
        let mut r = DialogueRunner::start(two_lines(true));
        assert_eq!(r.visible_text(), "H");
        r.tick(0.1);
        assert_eq!(r.visible_text(), "He");
        r.tick(0.25);
        assert_eq!(r.visible_text(), "Hell");
        assert!(r.is_typing());
        r.tick(0.1);
        assert_eq!(r.visible_text(), "Hello");
        assert!(r.is_typing());
        r.tick(0.1);
        assert!(!r.is_typing());
        let signals: Vec<_> = r.drain().collect();
        assert_eq!(
            signals,
            [DialogueSignal::LineStarted(0), DialogueSignal::LineCompleted(0)]
        );
    }

    #[test]
    fn continue_completes_then_advances_then_ends_once() {
        let mut r = DialogueRunner::start(two_lines(true));
        r.tick(0.1);

        r.advance();
        assert_eq!(r.line_index(), 0);
        assert_eq!(r.visible_text(), "Hello");
        assert!(!r.is_typing());

        r.advance();
        assert_eq!(r.line_index(), 1);
        assert!(r.is_typing());

        r.advance();
        r.advance();
        assert!(r.is_finished());
        r.advance();
        r.tick(1.0);

        let signals: Vec<_> = r.drain().collect();
        assert_eq!(ended_count(&signals), 1);
        assert_eq!(
            signals.last(),
            Some(&DialogueSignal::Ended { skipped: false })
        );
    }

    #[test]
    fn skip_respects_can_skip() {
        let mut r = DialogueRunner::start(two_lines(false));
        assert!(!r.skip());
        assert!(!r.is_finished());

        let mut r = DialogueRunner::start(two_lines(true));
        assert!(r.skip());
        assert!(r.is_finished());
        assert!(!r.skip());
        let signals: Vec<_> = r.drain().collect();
        assert_eq!(signals.last(), Some(&DialogueSignal::Ended { skipped: true }));
        assert_eq!(ended_count(&signals), 1);
    }

    #[test]
    fn abort_ignores_can_skip() {
        let mut r = DialogueRunner::start(two_lines(false));
        r.abort();
        assert!(r.is_finished());
    }

    #[test]
    fn auto_advance_fires_after_post_line_wait() {
        let data = DialogueData::builder("auto")
            .line_with(DialogueLine {
                wait_after: 0.5,
                ..line("Hi", 0.0)
            })
            .line_with(line("Bye", 0.0))
            .auto_advance(3.0)
            .build();
        let mut r = DialogueRunner::start(Arc::new(data));
        r.tick(0.016);
        assert!(!r.is_typing());
        assert!(r.auto_advance_pending());
        r.tick(0.3);
        assert_eq!(r.line_index(), 0);
        r.tick(0.3);
        assert_eq!(r.line_index(), 1);
    }

    #[test]
    fn manual_continue_cancels_pending_auto_advance() {
        let data = DialogueData::builder("auto")
            .line_with(line("A", 0.0))
            .line_with(DialogueLine {
                wait_after: 10.0,
                ..line("B", 0.0)
            })
            .line_with(line("C", 0.0))
            .auto_advance(1.0)
            .build();
        let mut r = DialogueRunner::start(Arc::new(data));
        r.tick(0.01);
        assert!(r.auto_advance_pending());

        // the user advances before the timer of line 0 elapses
        r.advance();
        assert_eq!(r.line_index(), 1);
        assert!(!r.auto_advance_pending());

        // the cancelled timer must not push line 1 forward
        r.tick(0.5);
        r.tick(0.6);
        assert_eq!(r.line_index(), 1);
    }

    #[test]
    fn skip_cancels_pending_auto_advance() {
        let data = DialogueData::builder("auto")
            .line_with(line("A", 0.0))
            .line_with(line("B", 0.0))
            .auto_advance(0.5)
            .build();
        let mut r = DialogueRunner::start(Arc::new(data));
        r.tick(0.01);
        assert!(r.skip());
        assert!(!r.auto_advance_pending());
        r.tick(5.0);
        let signals: Vec<_> = r.drain().collect();
        assert_eq!(ended_count(&signals), 1);
        assert_eq!(r.line_index(), 0);
    }

    #[test]
    fn zero_wait_uses_global_delay_and_zero_delay_is_immediate() {
        let data = DialogueData::builder("z")
            .line_with(DialogueLine {
                wait_after: 0.0,
                ..line("A", 0.0)
            })
            .line_with(line("B", 0.0))
            .auto_advance(0.0)
            .build();
        let mut r = DialogueRunner::start(Arc::new(data));
        r.tick(0.01);
        r.tick(0.01);
        assert_eq!(r.line_index(), 1);
    }

    #[test]
    fn missing_text_completes_instantly() {
        let data = DialogueData::builder("gap")
            .line_with(DialogueLine::default())
            .build();
        let mut r = DialogueRunner::start(Arc::new(data));
        assert!(!r.is_typing());
        assert_eq!(r.visible_text(), "");
        r.advance();
        assert!(r.is_finished());
    }

    #[test]
    fn empty_dialogue_ends_at_start() {
        let mut r = DialogueRunner::start(Arc::new(DialogueData::builder("none").build()));
        assert!(r.is_finished());
        let signals: Vec<_> = r.drain().collect();
        assert_eq!(signals, [DialogueSignal::Ended { skipped: false }]);
    }

    #[test]
    fn shaking_lines_pause_longer_per_char() {
        let data = DialogueData::builder("shake")
            .line_with(DialogueLine {
                shake: true,
                ..line("abc", 0.1)
            })
            .build();
        let mut r = DialogueRunner::start(Arc::new(data));
        assert!(r.is_shaking());
        r.tick(0.1);
        assert_eq!(r.visible_text(), "a");
        r.tick(0.02);
        assert_eq!(r.visible_text(), "ab");
    }

    #[test]
    fn visible_text_handles_multibyte_chars() {
        let data = DialogueData::builder("utf8")
            .line_with(line("olá você", 1.0))
            .build();
        let mut r = DialogueRunner::start(Arc::new(data));
        r.tick(2.0);
        assert_eq!(r.visible_text(), "olá");
    }
}
