use std::sync::Arc;

use bevy::prelude::*;

use super::data::DialogueData;

/// 对话来源：库里的 id，或者临时拼出来的数据
#[derive(Debug, Clone)]
pub enum DialogueSource {
    Id(String),
    Inline(Arc<DialogueData>),
}

/// 请求开始对话。owner 是发起者，结束通知会带上它
#[derive(Event, Debug, Clone)]
pub struct StartDialogue {
    pub source: DialogueSource,
    pub owner: Option<Entity>,
}

impl StartDialogue {
    pub fn by_id(id: impl Into<String>, owner: Option<Entity>) -> Self {
        Self {
            source: DialogueSource::Id(id.into()),
            owner,
        }
    }

    pub fn inline(data: DialogueData, owner: Option<Entity>) -> Self {
        Self {
            source: DialogueSource::Inline(Arc::new(data)),
            owner,
        }
    }
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ContinueDialogue;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SkipDialogue;

#[derive(Event, Debug, Clone)]
pub struct DialogueStarted {
    pub owner: Option<Entity>,
    pub id: String,
}

#[derive(Event, Debug, Clone)]
pub struct DialogueEnded {
    pub owner: Option<Entity>,
    pub id: String,
    pub skipped: bool,
}

/// 开始请求被拒（已有对话在播或 id 不存在），发起者据此解除等待
#[derive(Event, Debug, Clone)]
pub struct DialogueRejected {
    pub owner: Option<Entity>,
    pub id: String,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct LineCompleted {
    pub index: usize,
}
