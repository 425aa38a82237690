use std::collections::HashMap;

use bevy::prelude::*;

use super::schema::ItemEntry;

/// 物品名 → 定义。名字是唯一键，首个定义生效
#[derive(Resource, Default, Debug, Clone)]
pub struct ItemCatalog {
    by_name: HashMap<String, ItemEntry>,
    order: Vec<String>,
}

impl ItemCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = ItemEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    fn insert(&mut self, entry: ItemEntry) {
        if entry.name.trim().is_empty() {
            warn!("skipping item definition without a name");
            return;
        }
        if self.by_name.contains_key(&entry.name) {
            warn!("duplicate item definition '{}' ignored", entry.name);
            return;
        }
        self.order.push(entry.name.clone());
        self.by_name.insert(entry.name.clone(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&ItemEntry> {
        self.by_name.get(name)
    }

    /// 按名字忽略大小写查找，给控制台用
    pub fn find(&self, token: &str) -> Option<&ItemEntry> {
        self.get(token).or_else(|| {
            self.iter()
                .find(|e| e.name.eq_ignore_ascii_case(token))
        })
    }

    /// 按定义顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ItemEntry> {
        self.order.iter().filter_map(|n| self.by_name.get(n))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, usable: bool) -> ItemEntry {
        ItemEntry {
            name: name.into(),
            usable,
            ..Default::default()
        }
    }

    #[test]
    fn first_definition_wins() {
        let catalog = ItemCatalog::from_entries([entry("Axe", true), entry("Axe", false)]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Axe").unwrap().usable);
    }

    #[test]
    fn nameless_entries_are_skipped() {
        let catalog = ItemCatalog::from_entries([entry("", false), entry("Key", false)]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn find_ignores_case_and_keeps_order() {
        let catalog = ItemCatalog::from_entries([entry("Key", false), entry("Axe", true)]);
        assert_eq!(catalog.find("axe").map(|e| e.name.as_str()), Some("Axe"));
        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Key", "Axe"]);
    }
}
