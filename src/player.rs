//! First-person player: camera look, hotbar selection, and the fixed-tick
//! physics driver. The camera entity carries the physics body; physics runs
//! in `FixedUpdate`, the render tick only syncs the camera to the body.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::physics::{PlayerBody, TickInput, PLAYER_EYE_HEIGHT, SPAWN_POSITION};
use crate::voxel::VoxelWorld;

/// Physics tick rate in Hz. The frame loop runs physics through Bevy's
/// fixed-step accumulator, so simulation rate is decoupled from display rate.
pub const TICK_RATE: f64 = 60.0;

#[derive(Component)]
pub struct PlayerCamera;

#[derive(Component, Debug, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Resource)]
pub struct PlayerSettings {
    pub look_sensitivity: f32,
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PlayerSettings {
            look_sensitivity: 0.0025,
        })
        .insert_resource(Time::<Fixed>::from_hz(TICK_RATE))
        .add_systems(Startup, setup_player)
        .add_systems(FixedUpdate, physics_step)
        .add_systems(Update, (player_look, select_hotbar_slot, sync_camera));
    }
}

fn setup_player(mut commands: Commands, mut cursor_options: Single<&mut CursorOptions>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(SPAWN_POSITION + Vec3::Y * PLAYER_EYE_HEIGHT),
        PlayerCamera,
        LookAngles::default(),
        PlayerBody::default(),
    ));

    cursor_options.grab_mode = CursorGrabMode::Locked;
    cursor_options.visible = false;
}

fn player_look(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut query: Query<(&mut Transform, &mut LookAngles), With<PlayerCamera>>,
    settings: Res<PlayerSettings>,
) {
    let delta = mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }
    let Ok((mut transform, mut angles)) = query.single_mut() else {
        return;
    };
    angles.yaw -= delta.x * settings.look_sensitivity;
    angles.pitch = (angles.pitch - delta.y * settings.look_sensitivity).clamp(-1.54, 1.54);
    let yaw = Quat::from_axis_angle(Vec3::Y, angles.yaw);
    let pitch = Quat::from_axis_angle(Vec3::X, angles.pitch);
    transform.rotation = yaw * pitch;
}

/// One whole physics tick: sample held keys into a tick input, rotate the
/// wish direction into camera yaw space, and advance the body.
fn physics_step(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    world: Res<VoxelWorld>,
    mut query: Query<(&Transform, &mut PlayerBody), With<PlayerCamera>>,
) {
    let Ok((transform, mut body)) = query.single_mut() else {
        return;
    };

    let forward = transform.forward().as_vec3();
    let right = transform.right().as_vec3();
    let forward_flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    let right_flat = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();

    let mut wish_dir = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        wish_dir += forward_flat;
    }
    if keys.pressed(KeyCode::KeyS) {
        wish_dir -= forward_flat;
    }
    if keys.pressed(KeyCode::KeyA) {
        wish_dir -= right_flat;
    }
    if keys.pressed(KeyCode::KeyD) {
        wish_dir += right_flat;
    }

    let input = TickInput {
        wish_dir,
        jump: keys.pressed(KeyCode::Space),
        sprint: keys.pressed(KeyCode::ControlLeft),
    };
    body.step(&world, &input, time.delta_secs());
}

/// Render-tick camera sync only; no physics here.
fn sync_camera(mut query: Query<(&mut Transform, &PlayerBody), With<PlayerCamera>>) {
    let Ok((mut transform, body)) = query.single_mut() else {
        return;
    };
    transform.translation = body.position + Vec3::Y * PLAYER_EYE_HEIGHT;
}

const SLOT_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

/// Hotbar slot selection via number keys or scroll wheel.
fn select_hotbar_slot(
    keys: Res<ButtonInput<KeyCode>>,
    scroll: Res<AccumulatedMouseScroll>,
    mut query: Query<&mut PlayerBody>,
) {
    let Ok(mut body) = query.single_mut() else {
        return;
    };
    let previous = body.selected_slot;

    for (slot, key) in SLOT_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) {
            body.select_slot(slot);
        }
    }

    if scroll.delta.y != 0.0 {
        let step = if scroll.delta.y > 0.0 { -1 } else { 1 };
        let slots = body.hotbar.len() as i32;
        let slot = (body.selected_slot as i32 + step).rem_euclid(slots);
        body.select_slot(slot as usize);
    }

    if body.selected_slot != previous {
        info!("hotbar: {}", body.selected_block().def().name);
    }
}
