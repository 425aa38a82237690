use bevy::prelude::*;

/// 从外部（CLI、其他系统）触发一个序列
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerSequence {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ResetSequence {
    pub entity: Entity,
}

/// 立即执行序列里的第 index 个动作
#[derive(Event, Debug, Clone, Copy)]
pub struct ExecuteAction {
    pub entity: Entity,
    pub index: usize,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SequenceStarted {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SequenceCompleted {
    pub entity: Entity,
}
