use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy)]
pub struct LoadLevel {
    pub index: usize,
}

/// 关卡实体已生成；player_start 是没有出生点时的默认位置
#[derive(Event, Debug, Clone, Copy)]
pub struct LevelLoaded {
    pub index: usize,
    pub player_start: Vec2,
}
