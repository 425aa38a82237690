use bevy::asset::Asset;
use bevy::prelude::*;
use bevy::reflect::TypePath;
use serde::Deserialize;

use crate::dialogue::data::DialogueData;
use crate::level::def::LevelDef;

/// 物品静态表条目，载入后只读
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ItemEntry {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tile: Option<String>,
    #[serde(default)]
    pub plantable: bool,
    /// 手持时按原尺寸显示
    #[serde(default)]
    pub usable: bool,
    #[serde(default = "default_item_color")]
    pub color: [f32; 4],
}

fn default_item_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemEntry>,
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct DialogueList {
    pub dialogues: Vec<DialogueData>,
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct LevelList {
    pub levels: Vec<LevelDef>,
}

pub fn rgba(c: [f32; 4]) -> Color {
    Color::srgba(c[0], c[1], c[2], c[3])
}
