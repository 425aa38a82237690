use std::collections::HashSet;

use bevy::prelude::*;

/// 切换关卡后玩家出现的位置与朝向
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    pub facing_left: bool,
}

/// 已经拾取过的场景物品名
#[derive(Debug, Default, Clone)]
pub struct CollectedItems(HashSet<String>);

impl CollectedItems {
    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.0.remove(name);
        if removed {
            debug!("'{name}' removed from collected items");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct GameFlags(HashSet<String>);

impl GameFlags {
    pub fn set(&mut self, flag: &str) {
        if self.0.insert(flag.to_string()) {
            info!("flag set: {flag}");
        }
    }

    pub fn is_set(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    pub fn clear(&mut self, flag: &str) -> bool {
        self.0.remove(flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// 跨关卡存活的会话状态。进程启动时创建，退出时销毁
#[derive(Resource, Debug, Default)]
pub struct Session {
    pub collected: CollectedItems,
    pub flags: GameFlags,
    pub spawn_point: Option<SpawnPoint>,
    pub level: usize,
}

impl Session {
    /// 只能消费一次
    pub fn take_spawn_point(&mut self) -> Option<SpawnPoint> {
        self.spawn_point.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_point_is_consumed_once() {
        let mut session = Session::default();
        session.spawn_point = Some(SpawnPoint {
            position: Vec2::new(4.4, 0.4),
            facing_left: false,
        });
        assert!(session.take_spawn_point().is_some());
        assert!(session.take_spawn_point().is_none());
    }

    #[test]
    fn collected_items_round_trip() {
        let mut collected = CollectedItems::default();
        assert!(collected.insert("Axe"));
        assert!(!collected.insert("Axe"));
        assert!(collected.contains("Axe"));
        assert!(collected.remove("Axe"));
        assert!(!collected.remove("Axe"));
        assert!(collected.is_empty());
    }
}
