// 接近检测与交互提示。替代碰撞体的 enter / exit 回调

use bevy::prelude::*;

use crate::core::states::AppState;
use crate::player::components::Player;

pub const INTERACT_KEY: KeyCode = KeyCode::KeyE;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProximityEvent>().add_systems(
            Update,
            (detect_proximity, update_prompts)
                .chain()
                .in_set(ProximitySet)
                .run_if(in_state(AppState::InGame)),
        );
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProximitySet;

/// 可以和玩家互动的物体
#[derive(Component, Debug, Clone)]
pub struct Interactable {
    pub range: f32,
    pub show_prompt: bool,
    /// 互动进行中（比如对话播放时）隐藏提示
    pub busy: bool,
    in_range: bool,
}

impl Interactable {
    pub fn new(range: f32) -> Self {
        Self {
            range,
            show_prompt: true,
            busy: false,
            in_range: false,
        }
    }

    pub fn without_prompt(mut self) -> Self {
        self.show_prompt = false;
        self
    }

    pub fn in_range(&self) -> bool {
        self.in_range
    }

    /// 由接近检测调用；返回状态是否发生变化
    pub fn set_in_range(&mut self, in_range: bool) -> Option<ProximityKind> {
        if self.in_range == in_range {
            return None;
        }
        self.in_range = in_range;
        Some(if in_range {
            ProximityKind::Entered
        } else {
            ProximityKind::Exited
        })
    }

    pub fn prompt_visible(&self) -> bool {
        self.in_range && self.show_prompt && !self.busy
    }
}

/// 挂在 Interactable 子实体上的“按 E 互动”文字
#[derive(Component)]
pub struct InteractionPrompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityKind {
    Entered,
    Exited,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ProximityEvent {
    pub entity: Entity,
    pub kind: ProximityKind,
}

pub fn interact_pressed(keys: &ButtonInput<KeyCode>) -> bool {
    keys.just_pressed(INTERACT_KEY)
}

pub fn prompt_bundle(text: &str) -> impl Bundle + use<> {
    (
        InteractionPrompt,
        Text2d::new(text.to_string()),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        Transform::from_xyz(0.0, 28.0, 5.0),
        Visibility::Hidden,
    )
}

pub fn detect_proximity(
    player: Query<&Transform, With<Player>>,
    mut interactables: Query<(Entity, &Transform, &mut Interactable), Without<Player>>,
    mut ev_proximity: EventWriter<ProximityEvent>,
) {
    let player_pos = player.single().ok().map(|t| t.translation.truncate());
    for (entity, transform, mut interactable) in &mut interactables {
        let near = player_pos.is_some_and(|p| {
            p.distance(transform.translation.truncate()) <= interactable.range
        });
        if let Some(kind) = interactable.set_in_range(near) {
            ev_proximity.write(ProximityEvent { entity, kind });
        }
    }
}

pub fn update_prompts(
    interactables: Query<(&Interactable, &Children)>,
    mut prompts: Query<&mut Visibility, With<InteractionPrompt>>,
) {
    for (interactable, children) in &interactables {
        let wanted = if interactable.prompt_visible() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        for &child in &**children {
            if let Ok(mut visibility) = prompts.get_mut(child) {
                visibility.set_if_neq(wanted);
            }
        }
    }
}
