// 对话框：淡入淡出 + 打字机文字

use std::path::Path;

use bevy::prelude::*;
use rand::Rng;

use super::events::{DialogueEnded, DialogueStarted};
use super::manager::DialogueManager;
use crate::core::config::GameConfig;
use crate::data::schema::rgba;

const CUSTOM_FONT_PATH: &str = "fonts/determination.ttf";
const SHAKE_AMPLITUDE: f32 = 2.0;
const TEXT_PADDING: f32 = 24.0;

#[derive(Component)]
pub struct DialoguePanel;

#[derive(Component)]
pub struct DialogueText;

/// 面板透明度动画
#[derive(Component, Debug, Default)]
pub struct PanelFade {
    pub alpha: f32,
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl PanelFade {
    pub fn fade_to(&mut self, to: f32, duration: f32) {
        self.from = self.alpha;
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration;
    }

    /// 返回本次是否刚好结束
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.elapsed >= self.duration && self.alpha == self.to {
            return false;
        }
        self.elapsed += dt;
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        self.alpha = self.from + (self.to - self.from) * t;
        t >= 1.0
    }
}

#[derive(Resource, Default)]
pub struct DialogueFonts {
    pub custom: Option<Handle<Font>>,
}

pub fn load_fonts(mut fonts: ResMut<DialogueFonts>, asset_server: Res<AssetServer>) {
    if Path::new("assets").join(CUSTOM_FONT_PATH).exists() {
        fonts.custom = Some(asset_server.load(CUSTOM_FONT_PATH));
    } else {
        debug!("{CUSTOM_FONT_PATH} not found, dialogue uses the default font");
    }
}

pub fn spawn_dialogue_panel(mut commands: Commands) {
    commands
        .spawn((
            DialoguePanel,
            PanelFade::default(),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(800.0),
                height: Val::Px(200.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-400.0)),
                bottom: Val::Px(80.0),
                border: UiRect::all(Val::Px(3.0)),
                padding: UiRect::all(Val::Px(TEXT_PADDING)),
                ..default()
            },
            BackgroundColor(Color::NONE),
            BorderColor(Color::NONE),
            Visibility::Hidden,
            GlobalZIndex(50),
        ))
        .with_children(|panel| {
            panel.spawn((
                DialogueText,
                Text::new(""),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Relative,
                    ..default()
                },
            ));
        });
}

pub fn start_panel_fade(
    mut ev_started: EventReader<DialogueStarted>,
    mut ev_ended: EventReader<DialogueEnded>,
    config: Res<GameConfig>,
    manager: Res<DialogueManager>,
    mut panel: Query<(&mut PanelFade, &mut Visibility), With<DialoguePanel>>,
) {
    let Ok((mut fade, mut visibility)) = panel.single_mut() else {
        return;
    };
    if ev_started.read().count() > 0 {
        *visibility = Visibility::Inherited;
        fade.fade_to(1.0, config.dialogue_fade_in);
    }
    // 一帧内结束又立刻开始了新对话时保持显示
    if ev_ended.read().count() > 0 && !manager.is_active() {
        fade.fade_to(0.0, config.dialogue_fade_out);
    }
}

pub fn animate_panel_fade(
    time: Res<Time>,
    manager: Res<DialogueManager>,
    mut panel: Query<(&mut PanelFade, &mut Visibility), With<DialoguePanel>>,
) {
    let Ok((mut fade, mut visibility)) = panel.single_mut() else {
        return;
    };
    let done = fade.advance(time.delta_secs());
    if done && fade.alpha <= 0.0 && !manager.is_active() {
        *visibility = Visibility::Hidden;
    }
}

pub fn render_dialogue(
    manager: Res<DialogueManager>,
    fonts: Res<DialogueFonts>,
    mut panel: Query<(&PanelFade, &mut BackgroundColor, &mut BorderColor), With<DialoguePanel>>,
    mut text: Query<(&mut Text, &mut TextColor, &mut TextFont, &mut Node), With<DialogueText>>,
) {
    let Ok((fade, mut bg, mut border)) = panel.single_mut() else {
        return;
    };
    let Ok((mut text, mut color, mut font, mut node)) = text.single_mut() else {
        return;
    };

    let Some(runner) = manager.runner() else {
        // 淡出期间保留最后一句，只调透明度
        color.0 = color.0.with_alpha(fade.alpha);
        bg.0 = bg.0.with_alpha(bg.0.alpha().min(fade.alpha));
        border.0 = border.0.with_alpha(fade.alpha);
        return;
    };

    let data = runner.data();
    bg.0 = rgba(data.background).with_alpha(data.background[3] * fade.alpha);
    border.0 = rgba(data.border).with_alpha(data.border[3] * fade.alpha);

    if let Some(line) = runner.current_line() {
        color.0 = rgba(line.color).with_alpha(line.color[3] * fade.alpha);
        font.font = match (&fonts.custom, line.custom_font) {
            (Some(custom), true) => custom.clone(),
            _ => Handle::default(),
        };
    }
    let visible = runner.visible_text();
    if text.0 != visible {
        text.0 = visible.to_string();
    }

    if runner.is_shaking() {
        let mut rng = rand::rng();
        node.left = Val::Px(rng.random_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE));
        node.top = Val::Px(rng.random_range(-SHAKE_AMPLITUDE..SHAKE_AMPLITUDE));
    } else {
        node.left = Val::Px(0.0);
        node.top = Val::Px(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_reaches_target_and_reports_once() {
        let mut fade = PanelFade::default();
        fade.fade_to(1.0, 0.5);
        assert!(!fade.advance(0.25));
        assert!((fade.alpha - 0.5).abs() < 1e-5);
        assert!(fade.advance(0.25));
        assert_eq!(fade.alpha, 1.0);
        assert!(!fade.advance(0.1));
    }

    #[test]
    fn zero_duration_fade_is_immediate() {
        let mut fade = PanelFade {
            alpha: 1.0,
            ..Default::default()
        };
        fade.fade_to(0.0, 0.0);
        assert!(fade.advance(0.0));
        assert_eq!(fade.alpha, 0.0);
    }
}
