// 条件对话：满足条件（物品 / 标记）时自动播放

use std::collections::HashSet;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::session::Session;
use crate::dialogue::data::{DialogueData, DialogueLine};
use crate::dialogue::events::{DialogueSource, StartDialogue};
use crate::inventory::components::Inventory;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Condition {
    Always,
    /// 全部拾取过（或正在背包里）
    ItemsCollected(Vec<String>),
    FlagsSet(Vec<String>),
}

impl Condition {
    pub fn is_met(&self, session: &Session, inventory: Option<&Inventory>) -> bool {
        match self {
            Condition::Always => true,
            Condition::ItemsCollected(items) => items.iter().all(|name| {
                session.collected.contains(name) || inventory.is_some_and(|inv| inv.contains(name))
            }),
            Condition::FlagsSet(flags) => flags.iter().all(|flag| session.flags.is_set(flag)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConditionalEntry {
    pub name: String,
    pub condition: Condition,
    /// 对话库里的 id
    pub dialogue: Option<String>,
    /// 或者直接写一句话
    pub text: Option<String>,
    pub custom_font: bool,
    pub trigger_once: bool,
    pub delay: f32,
    pub check_on_start: bool,
}

impl Default for ConditionalEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            condition: Condition::Always,
            dialogue: None,
            text: None,
            custom_font: true,
            trigger_once: true,
            delay: 0.0,
            check_on_start: false,
        }
    }
}

impl ConditionalEntry {
    pub fn source(&self) -> Option<DialogueSource> {
        if let Some(text) = &self.text {
            let line = DialogueLine {
                custom_font: self.custom_font,
                ..DialogueLine::new(text.clone())
            };
            let data = DialogueData::builder(self.name.clone()).line_with(line).build();
            return Some(DialogueSource::Inline(data.into()));
        }
        self.dialogue.clone().map(DialogueSource::Id)
    }

    pub fn request(&self, owner: Entity) -> Option<StartDialogue> {
        self.source().map(|source| StartDialogue {
            source,
            owner: Some(owner),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    index: usize,
    remaining: f32,
}

#[derive(Component, Debug, Clone, Default)]
pub struct ConditionalDialogue {
    entries: Vec<ConditionalEntry>,
    /// 设置后每隔这么久检查一次全部条件
    pub check_interval: Option<f32>,
    fired: HashSet<usize>,
    pending: Vec<Pending>,
    since_check: f32,
}

impl ConditionalDialogue {
    pub fn new(entries: Vec<ConditionalEntry>, check_interval: Option<f32>) -> Self {
        Self {
            entries,
            check_interval,
            ..Default::default()
        }
    }

    pub fn entries(&self) -> &[ConditionalEntry] {
        &self.entries
    }

    /// 返回应立即播放的条目；有延迟的进入等待队列
    pub fn check_all(&mut self, met: impl Fn(&Condition) -> bool) -> Vec<usize> {
        (0..self.entries.len())
            .filter_map(|i| self.check_entry(i, &met))
            .collect()
    }

    pub fn check_on_start(&mut self, met: impl Fn(&Condition) -> bool) -> Vec<usize> {
        let flagged: Vec<usize> = (0..self.entries.len())
            .filter(|&i| self.entries[i].check_on_start)
            .collect();
        flagged
            .into_iter()
            .filter_map(|i| self.check_entry(i, &met))
            .collect()
    }

    fn check_entry(&mut self, index: usize, met: &impl Fn(&Condition) -> bool) -> Option<usize> {
        let entry = self.entries.get(index)?;
        if entry.trigger_once && self.fired.contains(&index) {
            return None;
        }
        if !met(&entry.condition) {
            return None;
        }
        if entry.trigger_once {
            self.fired.insert(index);
        }
        if entry.delay > 0.0 {
            self.pending.push(Pending {
                index,
                remaining: entry.delay,
            });
            None
        } else {
            Some(index)
        }
    }

    /// 倒计时结束的条目
    pub fn tick_pending(&mut self, dt: f32) -> Vec<usize> {
        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            p.remaining -= dt;
            if p.remaining <= 0.0 {
                due.push(p.index);
                false
            } else {
                true
            }
        });
        due
    }

    /// 周期检查是否到点
    pub fn interval_elapsed(&mut self, dt: f32) -> bool {
        let Some(interval) = self.check_interval else {
            return false;
        };
        self.since_check += dt;
        if self.since_check >= interval.max(0.0) {
            self.since_check = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset_triggered(&mut self) {
        self.fired.clear();
        self.pending.clear();
    }
}
