// 关卡描述，来自 assets/data/levels.ron

use bevy::prelude::*;
use serde::Deserialize;

use crate::sequence::runner::TimedAction;
use crate::triggers::components::TriggerMode;
use crate::triggers::conditions::ConditionalEntry;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LevelDef {
    pub name: String,
    pub player_start: [f32; 2],
    pub background: [f32; 4],
    pub props: Vec<PropDef>,
    pub collectables: Vec<CollectableDef>,
    pub storage: Vec<StorageDef>,
    pub dialogue_triggers: Vec<DialogueTriggerDef>,
    pub sequences: Vec<SequenceDef>,
    pub conditionals: Vec<ConditionalDef>,
    pub exits: Vec<ExitDef>,
}

impl Default for LevelDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            player_start: [0.0, 0.0],
            background: [0.05, 0.05, 0.08, 1.0],
            props: Vec::new(),
            collectables: Vec::new(),
            storage: Vec::new(),
            dialogue_triggers: Vec::new(),
            sequences: Vec::new(),
            conditionals: Vec::new(),
            exits: Vec::new(),
        }
    }
}

/// 有名字的色块，序列按名字控制它们
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropDef {
    pub name: String,
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl Default for PropDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: [0.0, 0.0],
            size: [16.0, 16.0],
            color: [0.6, 0.6, 0.6, 1.0],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectableDef {
    pub item: String,
    pub position: [f32; 2],
}

/// 箱子之类的储物容器
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageDef {
    pub name: String,
    pub position: [f32; 2],
    pub slots: usize,
    pub items: Vec<String>,
}

impl Default for StorageDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: [0.0, 0.0],
            slots: 6,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DialogueTriggerDef {
    pub dialogue: String,
    pub position: [f32; 2],
    pub mode: TriggerMode,
    pub range: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SequenceDef {
    pub position: [f32; 2],
    pub mode: TriggerMode,
    pub range: Option<f32>,
    pub actions: Vec<TimedAction>,
    pub dialogue: Option<String>,
    pub complete_flag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConditionalDef {
    pub entries: Vec<ConditionalEntry>,
    pub check_interval: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExitDef {
    pub position: [f32; 2],
    pub target: usize,
    pub spawn: [f32; 2],
    pub facing_left: bool,
    pub range: Option<f32>,
}

/// 关卡序号 → 描述
#[derive(Resource, Debug, Default, Clone)]
pub struct LevelLibrary {
    levels: Vec<LevelDef>,
}

impl LevelLibrary {
    pub fn new(levels: Vec<LevelDef>) -> Self {
        Self { levels }
    }

    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

pub fn vec2(p: [f32; 2]) -> Vec2 {
    Vec2::new(p[0], p[1])
}
