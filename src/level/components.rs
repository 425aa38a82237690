use bevy::prelude::*;

use crate::core::session::SpawnPoint;

/// 属于当前关卡的实体，切关时统一销毁
#[derive(Component)]
pub struct LevelEntity;

/// 序列动作按名字找到的道具
#[derive(Component, Debug, Clone)]
pub struct Prop {
    pub name: String,
}

/// 通往另一个关卡的出口
#[derive(Component, Debug, Clone, Copy)]
pub struct Exit {
    pub target: usize,
    pub spawn: SpawnPoint,
}

#[derive(Component, Debug, Clone)]
pub struct StorageContainer {
    pub name: String,
}
