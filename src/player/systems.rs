use super::components::*;
use crate::core::{config::GameConfig, session::Session};
use crate::dialogue::manager::DialogueManager;
use crate::inventory::components::Inventory;
use crate::inventory::events::{DropItem, SelectSlot};
use crate::level::LevelLoaded;
use bevy::prelude::*;

const PLAYER_SIZE: Vec2 = Vec2::new(16.0, 24.0);
const PLAYER_COLOR: Color = Color::srgb(0.85, 0.85, 0.95);
const HELD_OFFSET: Vec3 = Vec3::new(10.0, -2.0, 1.0);
const HELD_SIZE: Vec2 = Vec2::new(12.0, 12.0);
pub const DROP_KEY: KeyCode = KeyCode::KeyQ;

/// 玩家和相机只生成一次，跨关卡保留
pub fn spawn_player(
    mut commands: Commands,
    config: Res<GameConfig>,
    existing: Query<(), With<Player>>,
) {
    if !existing.is_empty() {
        return;
    }
    commands.spawn((Camera2d, PlayerCamera));
    commands
        .spawn((
            Player,
            Name::new("Player"),
            Inventory::new(config.slot_count, config.toolbar_size, config.max_stack),
            MoveInput::default(),
            Speed(config.player_speed),
            Facing::default(),
            Sprite::from_color(PLAYER_COLOR, PLAYER_SIZE),
            Transform::from_xyz(0.0, 0.0, 10.0),
        ))
        .with_children(|p| {
            p.spawn((
                HeldItemSprite,
                Sprite::from_color(Color::WHITE, HELD_SIZE),
                Transform::from_translation(HELD_OFFSET),
                Visibility::Hidden,
            ));
        });
    info!(
        "player spawned with {} slots ({} on the toolbar)",
        config.slot_count, config.toolbar_size
    );
}

/// 对话显示时玩家不能动
pub fn read_move_input(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    mut player: Query<&mut MoveInput, With<Player>>,
) {
    let Ok(mut input) = player.single_mut() else {
        return;
    };
    input.0 = if manager.is_active() {
        Vec2::ZERO
    } else {
        direction_from_keys(&keys)
    };
}

pub fn toolbar_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    manager: Res<DialogueManager>,
    player: Query<&Inventory, With<Player>>,
    mut ev_select: EventWriter<SelectSlot>,
    mut ev_drop: EventWriter<DropItem>,
) {
    if manager.is_active() {
        return;
    }
    let Ok(inventory) = player.single() else {
        return;
    };
    for key in keys.get_just_pressed() {
        if let Some(index) = toolbar_index(*key) {
            if index < inventory.toolbar_size() {
                ev_select.write(SelectSlot { index });
            }
        }
    }
    if keys.just_pressed(DROP_KEY) {
        ev_drop.write(DropItem::default());
    }
}

/// FixedUpdate：按速度积分位置
pub fn move_player(
    time: Res<Time>,
    mut player: Query<(&MoveInput, &Speed, &mut Facing, &mut Transform, &mut Sprite), With<Player>>,
) {
    let Ok((input, speed, mut facing, mut transform, mut sprite)) = player.single_mut() else {
        return;
    };
    let step = input.0 * speed.0 * time.delta_secs();
    transform.translation += step.extend(0.0);

    let next = Facing::from_motion(input.0.x, *facing);
    if next != *facing {
        *facing = next;
    }
    sprite.flip_x = facing.is_left();
}

/// 指数平滑跟随
pub fn camera_follow(
    time: Res<Time>,
    config: Res<GameConfig>,
    player: Query<&Transform, With<Player>>,
    mut camera: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
) {
    let (Ok(target), Ok(mut cam)) = (player.single(), camera.single_mut()) else {
        return;
    };
    let t = smoothing_factor(config.camera_smoothing, time.delta_secs());
    let goal = target.translation.truncate();
    let pos = cam.translation.truncate().lerp(goal, t);
    cam.translation.x = pos.x;
    cam.translation.y = pos.y;
}

/// 每帧跟上的比例；smoothing 不为正时直接贴住
pub fn smoothing_factor(smoothing: f32, dt: f32) -> f32 {
    if smoothing <= 0.0 {
        1.0
    } else {
        1.0 - (-smoothing * dt).exp()
    }
}

/// 关卡生成后放置玩家；出口留下的出生点只用一次
pub fn place_player(
    mut ev_loaded: EventReader<LevelLoaded>,
    mut session: ResMut<Session>,
    mut player: Query<(&mut Transform, &mut Facing), With<Player>>,
    mut camera: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
) {
    let Some(ev) = ev_loaded.read().last() else {
        return;
    };
    let Ok((mut transform, mut facing)) = player.single_mut() else {
        return;
    };
    let (position, face) = match session.take_spawn_point() {
        Some(spawn) => {
            debug!("using spawn point {:?}", spawn.position);
            let face = if spawn.facing_left {
                Facing::Left
            } else {
                Facing::Right
            };
            (spawn.position, face)
        }
        None => (ev.player_start, *facing),
    };
    transform.translation.x = position.x;
    transform.translation.y = position.y;
    *facing = face;
    if let Ok(mut cam) = camera.single_mut() {
        cam.translation.x = position.x;
        cam.translation.y = position.y;
    }
}
