use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;
use serde::Deserialize;

/// 一句台词
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialogueLine {
    pub text: Option<String>,
    /// 打字机每个字符的间隔（秒）
    pub text_speed: f32,
    /// 说完后停留多久（自动推进用）
    pub wait_after: f32,
    pub shake: bool,
    pub color: [f32; 4],
    pub custom_font: bool,
}

impl Default for DialogueLine {
    fn default() -> Self {
        Self {
            text: None,
            text_speed: 0.05,
            wait_after: 1.0,
            shake: false,
            color: [1.0, 1.0, 1.0, 1.0],
            custom_font: true,
        }
    }
}

impl DialogueLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// 缺失的文本按空行处理
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialogueData {
    pub id: String,
    pub lines: Vec<DialogueLine>,
    pub can_skip: bool,
    pub auto_advance: bool,
    pub auto_advance_delay: f32,
    pub background: [f32; 4],
    pub border: [f32; 4],
}

impl Default for DialogueData {
    fn default() -> Self {
        Self {
            id: String::new(),
            lines: Vec::new(),
            can_skip: true,
            auto_advance: false,
            auto_advance_delay: 3.0,
            background: [0.0, 0.0, 0.0, 0.8],
            border: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl DialogueData {
    pub fn builder(id: impl Into<String>) -> DialogueBuilder {
        DialogueBuilder {
            data: DialogueData {
                id: id.into(),
                ..Default::default()
            },
        }
    }
}

/// 在代码里临时拼一段对话
#[derive(Debug, Clone)]
pub struct DialogueBuilder {
    data: DialogueData,
}

impl DialogueBuilder {
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.data.lines.push(DialogueLine::new(text));
        self
    }

    pub fn line_with(mut self, line: DialogueLine) -> Self {
        self.data.lines.push(line);
        self
    }

    pub fn can_skip(mut self, can_skip: bool) -> Self {
        self.data.can_skip = can_skip;
        self
    }

    pub fn auto_advance(mut self, delay: f32) -> Self {
        self.data.auto_advance = true;
        self.data.auto_advance_delay = delay;
        self
    }

    pub fn build(self) -> DialogueData {
        self.data
    }
}

/// 对话 id → 数据
#[derive(Resource, Default, Debug, Clone)]
pub struct DialogueLibrary {
    by_id: HashMap<String, Arc<DialogueData>>,
}

impl DialogueLibrary {
    pub fn from_dialogues(dialogues: impl IntoIterator<Item = DialogueData>) -> Self {
        let mut by_id = HashMap::new();
        for d in dialogues {
            if d.id.is_empty() {
                warn!("skipping dialogue without an id");
                continue;
            }
            if by_id.contains_key(&d.id) {
                warn!("duplicate dialogue id '{}' ignored", d.id);
                continue;
            }
            by_id.insert(d.id.clone(), Arc::new(d));
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<Arc<DialogueData>> {
        self.by_id.get(id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::ron;

    #[test]
    fn parses_lines_with_defaults() {
        let src = r#"(
            id: "intro",
            lines: [
                (text: Some("Hello.")),
                (text: Some("Wake up."), shake: true, text_speed: 0.1, color: (1.0, 0.2, 0.2, 1.0)),
                (),
            ],
            auto_advance: true,
        )"#;
        let d: DialogueData = ron::de::from_str(src).unwrap();
        assert_eq!(d.lines.len(), 3);
        assert_eq!(d.lines[0].text_speed, 0.05);
        assert!(d.lines[1].shake);
        assert_eq!(d.lines[2].text(), "");
        assert!(d.can_skip);
        assert!(d.auto_advance);
        assert_eq!(d.auto_advance_delay, 3.0);
    }

    #[test]
    fn builder_collects_lines() {
        let d = DialogueData::builder("note")
            .line("A strange note.")
            .can_skip(false)
            .auto_advance(2.0)
            .build();
        assert_eq!(d.id, "note");
        assert_eq!(d.lines[0].text(), "A strange note.");
        assert!(!d.can_skip);
        assert_eq!(d.auto_advance_delay, 2.0);
    }

    #[test]
    fn library_skips_duplicates_and_nameless() {
        let lib = DialogueLibrary::from_dialogues([
            DialogueData::builder("a").line("first").build(),
            DialogueData::builder("a").line("second").build(),
            DialogueData::builder("").build(),
        ]);
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.get("a").unwrap().lines[0].text(), "first");
    }
}
