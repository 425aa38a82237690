use bevy::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::data::catalog::ItemCatalog;
use crate::data::schema::ItemEntry;

pub const DEFAULT_MAX_STACK: u32 = 20;
/// 非“可用”物品手持时缩小一半
pub const HELD_SCALE_GENERIC: f32 = 0.5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("slot index {index} out of range (inventory has {len} slots)")]
    OutOfRange { index: usize, len: usize },
    #[error("slot {0} is empty")]
    EmptySlot(usize),
    #[error("no room for {0}")]
    Full(String),
    #[error("item definition has no name")]
    InvalidItem,
    #[error("cannot move a stack onto itself")]
    SameSlot,
    #[error("swapping would overflow slot {0}")]
    WouldOverflow(usize),
}

/// 一个背包格。count == 0 与 item_name 为空始终同时成立
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    item_name: String,
    count: u32,
    max_allowed: u32,
    icon: Option<String>,
}

impl Default for Slot {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STACK)
    }
}

impl Slot {
    pub fn new(max_allowed: u32) -> Self {
        Self {
            item_name: String::new(),
            count: 0,
            max_allowed: max_allowed.max(1),
            icon: None,
        }
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max_allowed(&self) -> u32 {
        self.max_allowed
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn holds(&self, name: &str) -> bool {
        !self.is_empty() && self.item_name == name
    }

    pub fn can_add(&self) -> bool {
        self.count < self.max_allowed
    }

    fn room(&self) -> u32 {
        self.max_allowed - self.count
    }

    fn add_one(&mut self, item: &ItemEntry) {
        self.item_name.clone_from(&item.name);
        self.icon.clone_from(&item.icon);
        self.count += 1;
    }

    fn remove_one(&mut self) {
        self.count -= 1;
        if self.count == 0 {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.item_name.clear();
        self.icon = None;
        self.count = 0;
    }
}

/// 物品移动的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// 合并到目标格，moved 为实际移动数量（受目标上限约束）
    Merged { moved: u32 },
    Swapped,
}

/// 手持物品的显示信息
#[derive(Debug, Clone, PartialEq)]
pub struct HeldItem {
    pub item: Option<String>,
    pub icon: Option<String>,
    pub scale: f32,
}

impl HeldItem {
    pub fn nothing() -> Self {
        Self {
            item: None,
            icon: None,
            scale: 1.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.item.is_some()
    }
}

/// 固定容量的背包，挂在玩家或储物箱上。前 toolbar_size 格是工具栏
#[derive(Component, Debug, Clone, Serialize)]
pub struct Inventory {
    slots: Vec<Slot>,
    toolbar_size: usize,
    selected: Option<usize>,
}

impl Inventory {
    pub fn new(slot_count: usize, toolbar_size: usize, max_stack: u32) -> Self {
        Self {
            slots: vec![Slot::new(max_stack); slot_count],
            toolbar_size: toolbar_size.min(slot_count),
            selected: None,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    pub fn toolbar_size(&self) -> usize {
        self.toolbar_size
    }

    pub fn is_toolbar_slot(&self, index: usize) -> bool {
        index < self.toolbar_size
    }

    fn check(&self, index: usize) -> Result<(), InventoryError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(InventoryError::OutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }

    /// 先找同名且未满的格，再找第一个空格
    pub fn slot_for(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.holds(name) && s.can_add())
            .or_else(|| self.slots.iter().position(Slot::is_empty))
    }

    /// 放入 slot_for 找到的格子，返回其下标
    pub fn add(&mut self, item: &ItemEntry) -> Result<usize, InventoryError> {
        if item.name.is_empty() {
            return Err(InventoryError::InvalidItem);
        }
        let index = self
            .slot_for(&item.name)
            .ok_or_else(|| InventoryError::Full(item.name.clone()))?;
        self.slots[index].add_one(item);
        Ok(index)
    }

    /// 减一，减到 0 清空。返回被移除的物品名
    pub fn remove_at(&mut self, index: usize) -> Result<String, InventoryError> {
        self.check(index)?;
        let slot = &mut self.slots[index];
        if slot.is_empty() {
            return Err(InventoryError::EmptySlot(index));
        }
        let name = slot.item_name.clone();
        slot.remove_one();
        Ok(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s.holds(name))
    }

    pub fn count_of(&self, name: &str) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.holds(name))
            .map(Slot::count)
            .sum()
    }

    pub fn select(&mut self, index: usize) -> Result<(), InventoryError> {
        self.check(index)?;
        self.selected = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_slot(&self) -> Option<&Slot> {
        self.selected.and_then(|i| self.slots.get(i))
    }

    /// 选中格的手持表现：可用物品原尺寸，其余半尺寸，空格隐藏
    pub fn held_item(&self, catalog: &ItemCatalog) -> HeldItem {
        let Some(slot) = self.selected_slot().filter(|s| !s.is_empty()) else {
            return HeldItem::nothing();
        };
        let usable = catalog
            .get(slot.item_name())
            .is_some_and(|def| def.usable);
        HeldItem {
            item: Some(slot.item_name.clone()),
            icon: slot.icon.clone(),
            scale: if usable { 1.0 } else { HELD_SCALE_GENERIC },
        }
    }

    fn pair_mut(&mut self, a: usize, b: usize) -> Result<(&mut Slot, &mut Slot), InventoryError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(InventoryError::SameSlot);
        }
        if a < b {
            let (left, right) = self.slots.split_at_mut(b);
            Ok((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.slots.split_at_mut(a);
            Ok((&mut right[0], &mut left[b]))
        }
    }

    /// 同一背包内移动，等价于 transfer_between(self, a, self, b)
    pub fn swap_slots(&mut self, a: usize, b: usize) -> Result<TransferOutcome, InventoryError> {
        let (from, to) = self.pair_mut(a, b)?;
        move_stack(from, to, a, b)
    }

    /// 把一半（向下取整）移到空格或同名格
    pub fn split(&mut self, from: usize, to: usize) -> Result<u32, InventoryError> {
        let (src, dst) = self.pair_mut(from, to)?;
        if src.is_empty() {
            return Err(InventoryError::EmptySlot(from));
        }
        if !dst.is_empty() && dst.item_name != src.item_name {
            return Err(InventoryError::Full(src.item_name.clone()));
        }
        let moved = (src.count / 2).min(dst.room());
        if moved == 0 {
            return Ok(0);
        }
        dst.item_name.clone_from(&src.item_name);
        dst.icon.clone_from(&src.icon);
        dst.count += moved;
        src.count -= moved;
        Ok(moved)
    }
}

/// 跨背包移动。目标为空或同名则合并（不超过目标上限，余量留在源格），否则整格交换
pub fn transfer_between(
    from: &mut Inventory,
    from_index: usize,
    to: &mut Inventory,
    to_index: usize,
) -> Result<TransferOutcome, InventoryError> {
    from.check(from_index)?;
    to.check(to_index)?;
    move_stack(
        &mut from.slots[from_index],
        &mut to.slots[to_index],
        from_index,
        to_index,
    )
}

fn move_stack(
    from: &mut Slot,
    to: &mut Slot,
    from_index: usize,
    to_index: usize,
) -> Result<TransferOutcome, InventoryError> {
    if from.is_empty() {
        return Err(InventoryError::EmptySlot(from_index));
    }

    if to.is_empty() || to.item_name == from.item_name {
        let moved = from.count.min(to.room());
        if moved > 0 {
            to.item_name.clone_from(&from.item_name);
            to.icon.clone_from(&from.icon);
            to.count += moved;
            from.count -= moved;
            if from.count == 0 {
                from.clear();
            }
        }
        return Ok(TransferOutcome::Merged { moved });
    }

    if from.count > to.max_allowed {
        return Err(InventoryError::WouldOverflow(to_index));
    }
    if to.count > from.max_allowed {
        return Err(InventoryError::WouldOverflow(from_index));
    }
    std::mem::swap(&mut from.item_name, &mut to.item_name);
    std::mem::swap(&mut from.icon, &mut to.icon);
    std::mem::swap(&mut from.count, &mut to.count);
    Ok(TransferOutcome::Swapped)
}
