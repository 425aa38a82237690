// 随游戏发布的数据文件必须能被解析

use bevy::asset::ron;
use lucid_break::core::config::GameConfig;
use lucid_break::data::catalog::ItemCatalog;
use lucid_break::data::schema::{DialogueList, ItemList, LevelList};
use lucid_break::dialogue::data::DialogueLibrary;

#[test]
fn shipped_items_parse() {
    let list: ItemList = ron::de::from_str(include_str!("../assets/data/items.ron")).unwrap();
    let catalog = ItemCatalog::from_entries(list.items);
    assert!(catalog.get("Key").is_some_and(|k| k.usable));
    assert!(catalog.get("Seed").is_some_and(|s| s.plantable));
}

#[test]
fn shipped_levels_reference_known_data() {
    let items: ItemList = ron::de::from_str(include_str!("../assets/data/items.ron")).unwrap();
    let dialogues: DialogueList =
        ron::de::from_str(include_str!("../assets/data/dialogues.ron")).unwrap();
    let levels: LevelList = ron::de::from_str(include_str!("../assets/data/levels.ron")).unwrap();

    let catalog = ItemCatalog::from_entries(items.items);
    let library = DialogueLibrary::from_dialogues(dialogues.dialogues);
    assert!(!levels.levels.is_empty());

    for level in &levels.levels {
        for c in &level.collectables {
            assert!(catalog.get(&c.item).is_some(), "unknown item {}", c.item);
        }
        for t in &level.dialogue_triggers {
            assert!(library.get(&t.dialogue).is_some(), "unknown dialogue {}", t.dialogue);
        }
        for s in &level.sequences {
            if let Some(id) = &s.dialogue {
                assert!(library.get(id).is_some(), "unknown dialogue {id}");
            }
        }
        for e in &level.exits {
            assert!(e.target < levels.levels.len());
        }
    }
}

#[test]
fn shipped_settings_parse() {
    let cfg = GameConfig::from_toml(include_str!("../assets/settings.toml")).unwrap();
    assert_eq!(cfg, GameConfig::default());
}
