use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;

pub const CONFIG_PATH: &str = "assets/settings.toml";

/// 可调参数，全部字段都有默认值，配置文件缺项也能用
#[derive(Resource, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub slot_count: usize,
    pub toolbar_size: usize,
    pub max_stack: u32,
    pub player_speed: f32,
    pub interaction_range: f32,
    pub camera_smoothing: f32,
    pub dialogue_fade_in: f32,
    pub dialogue_fade_out: f32,
    pub start_level: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            slot_count: 3,
            toolbar_size: 3,
            max_stack: 20,
            player_speed: 120.0,
            interaction_range: 48.0,
            camera_smoothing: 6.0,
            dialogue_fade_in: 0.5,
            dialogue_fade_out: 0.3,
            start_level: 0,
        }
    }
}

impl GameConfig {
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let cfg: GameConfig = toml::from_str(s).context("malformed settings")?;
        Ok(cfg.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// 工具栏不能比背包还长；负数时长一律按 0 处理
    fn sanitized(mut self) -> Self {
        self.toolbar_size = self.toolbar_size.min(self.slot_count);
        self.max_stack = self.max_stack.max(1);
        for v in [
            &mut self.player_speed,
            &mut self.interaction_range,
            &mut self.camera_smoothing,
            &mut self.dialogue_fade_in,
            &mut self.dialogue_fade_out,
        ] {
            if !v.is_finite() || *v < 0.0 {
                *v = 0.0;
            }
        }
        self
    }
}

pub fn load_config(mut config: ResMut<GameConfig>) {
    match GameConfig::load(CONFIG_PATH) {
        Ok(cfg) => {
            info!("settings loaded from {CONFIG_PATH}");
            *config = cfg;
        }
        Err(e) => warn!("using default settings: {e:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = GameConfig::from_toml("player_speed = 80.0\n").unwrap();
        assert_eq!(cfg.player_speed, 80.0);
        assert_eq!(cfg.slot_count, 3);
        assert_eq!(cfg.max_stack, 20);
    }

    #[test]
    fn toolbar_is_clamped_to_slot_count() {
        let cfg = GameConfig::from_toml("slot_count = 2\ntoolbar_size = 9\n").unwrap();
        assert_eq!(cfg.toolbar_size, 2);
    }

    #[test]
    fn negative_durations_become_zero() {
        let cfg = GameConfig::from_toml("dialogue_fade_in = -1.0\n").unwrap();
        assert_eq!(cfg.dialogue_fade_in, 0.0);
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "slot_count = 9\ntoolbar_size = 9").unwrap();
        let cfg = GameConfig::load(file.path()).unwrap();
        assert_eq!(cfg.slot_count, 9);
        assert_eq!(cfg.toolbar_size, 9);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = GameConfig::load("does/not/exist.toml").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.toml"));
    }
}
