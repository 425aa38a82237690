use bevy::prelude::*;

/// 玩家标记组件
#[derive(Component)]
pub struct Player;

/// 手上拿着的物品（玩家的子实体）
#[derive(Component)]
pub struct HeldItemSprite;

/// 跟随玩家的相机
#[derive(Component)]
pub struct PlayerCamera;

/// 本帧的移动方向，已归一化；对话中为零
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct MoveInput(pub Vec2);

#[derive(Component, Debug, Clone, Copy)]
pub struct Speed(pub f32);

/// 朝向，精灵据此翻转
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// 水平速度为零时保持原朝向
    pub fn from_motion(x: f32, current: Facing) -> Facing {
        if x < 0.0 {
            Facing::Left
        } else if x > 0.0 {
            Facing::Right
        } else {
            current
        }
    }

    pub fn is_left(self) -> bool {
        self == Facing::Left
    }
}

/// 把按键状态变成方向向量
pub fn direction_from_keys(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        dir.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        dir.x += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        dir.y -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        dir.y += 1.0;
    }
    dir.normalize_or_zero()
}

/// 数字键 1..=9 对应的工具栏格子
pub fn toolbar_index(key: KeyCode) -> Option<usize> {
    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    DIGITS.iter().position(|k| *k == key)
}
