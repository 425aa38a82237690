use bevy::prelude::*;

use super::components::HeldItem;

/// 往背包里塞物品。owner 为 None 时给玩家
#[derive(Event, Debug, Clone)]
pub struct AddItem {
    pub owner: Option<Entity>,
    pub item: String,
    pub count: u32,
}

impl AddItem {
    pub fn to_player(item: impl Into<String>, count: u32) -> Self {
        Self {
            owner: None,
            item: item.into(),
            count,
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct RemoveItem {
    pub owner: Option<Entity>,
    pub index: usize,
}

/// 选中玩家背包的某一格
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectSlot {
    pub index: usize,
}

/// 两个背包（可以是同一个）之间移动物品
#[derive(Event, Debug, Clone, Copy)]
pub struct TransferItem {
    pub from: Entity,
    pub from_index: usize,
    pub to: Entity,
    pub to_index: usize,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct SplitStack {
    pub owner: Entity,
    pub from_index: usize,
    pub to_index: usize,
}

/// 把玩家背包里的一个物品丢回场景。index 为 None 时丢选中格
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DropItem {
    pub index: Option<usize>,
}

/// 背包内容变化，UI 需要刷新
#[derive(Event, Debug, Clone, Copy)]
pub struct InventoryChanged {
    pub owner: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct HeldItemChanged {
    pub held: HeldItem,
}

/// 让 CLI 请求打印背包
#[derive(Event)]
pub struct ListInventoryEvent;
