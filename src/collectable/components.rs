use bevy::prelude::*;

use crate::core::session::CollectedItems;
use crate::inventory::components::Inventory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectableState {
    #[default]
    Collectable,
    Collected,
}

/// 场景里可以捡起来的物品
#[derive(Component, Debug, Clone)]
pub struct Collectable {
    pub item: String,
    state: CollectableState,
    /// 生成后是否已经和会话状态对过账
    settled: bool,
    /// 从背包丢出来的实例，捡起时总是放回堆叠
    dropped: bool,
}

impl Collectable {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            state: CollectableState::Collectable,
            settled: false,
            dropped: false,
        }
    }

    /// 从背包丢出来的物品：明确是可拾取的，不再查会话
    pub fn dropped(item: impl Into<String>) -> Self {
        let mut c = Self::new(item);
        c.dropped = true;
        c.set_collected(false);
        c
    }

    pub fn state(&self) -> CollectableState {
        self.state
    }

    pub fn is_collected(&self) -> bool {
        self.state == CollectableState::Collected
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn set_collected(&mut self, collected: bool) {
        self.state = if collected {
            CollectableState::Collected
        } else {
            CollectableState::Collectable
        };
        self.settled = true;
    }

    /// 生成时检查：拾取过的或已经在背包里的直接算已收集
    pub fn settle(&mut self, collected: &CollectedItems, inventory: Option<&Inventory>) -> bool {
        if self.settled {
            return self.is_collected();
        }
        let owned = collected.contains(&self.item)
            || inventory.is_some_and(|inv| inv.contains(&self.item));
        self.set_collected(owned);
        owned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ItemEntry;

    #[test]
    fn settles_collected_from_session() {
        let mut collected = CollectedItems::default();
        collected.insert("Key");
        let mut c = Collectable::new("Key");
        assert!(c.settle(&collected, None));
        assert!(c.is_collected());
        assert!(c.is_settled());
    }

    #[test]
    fn settles_collected_from_inventory() {
        let mut inv = Inventory::new(3, 3, 20);
        inv.add(&ItemEntry {
            name: "Axe".into(),
            ..Default::default()
        })
        .unwrap();
        let mut c = Collectable::new("Axe");
        assert!(c.settle(&CollectedItems::default(), Some(&inv)));
    }

    #[test]
    fn fresh_item_stays_collectable() {
        let mut c = Collectable::new("Lamp");
        assert!(!c.settle(&CollectedItems::default(), None));
        assert_eq!(c.state(), CollectableState::Collectable);
    }

    #[test]
    fn dropped_item_ignores_session() {
        let mut collected = CollectedItems::default();
        collected.insert("Key");
        let mut c = Collectable::dropped("Key");
        assert!(c.is_dropped());
        assert!(!c.settle(&collected, None));
        assert!(!Collectable::new("Key").is_dropped());
    }
}
