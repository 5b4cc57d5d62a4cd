//! Block targeting and editing: a grid-walking raycast from the camera, a
//! wireframe highlight on the targeted block, and mouse-driven break/place.

use bevy::prelude::*;

use crate::physics::PlayerBody;
use crate::player::PlayerCamera;
use crate::voxel::{BlockKind, VoxelSet, VoxelWorld};

/// Maximum interaction distance in blocks.
pub const REACH: f32 = 5.0;

/// A solid block hit by [`raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelHit {
    /// Cell coordinates of the hit block.
    pub pos: IVec3,
    /// Outward normal of the entered face. Zero when the ray starts
    /// inside a solid block.
    pub normal: IVec3,
    pub kind: BlockKind,
    /// Distance from the ray origin to the entered face.
    pub distance: f32,
}

/// The block currently under the crosshair, refreshed every frame.
#[derive(Resource, Debug, Default)]
pub struct TargetedBlock(pub Option<VoxelHit>);

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetedBlock>().add_systems(
            Update,
            (update_target, draw_block_highlight, apply_block_edits)
                .chain()
                .before(VoxelSet::Remesh),
        );
    }
}

/// Walks the voxel grid cell by cell along the ray (Amanatides & Woo) and
/// returns the first solid block within `max_distance`.
pub fn raycast(
    world: &VoxelWorld,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<VoxelHit> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut cell = origin.floor().as_ivec3();
    let start_kind = world.get_block(cell);
    if start_kind.is_solid() {
        return Some(VoxelHit {
            pos: cell,
            normal: IVec3::ZERO,
            kind: start_kind,
            distance: 0.0,
        });
    }

    let step = IVec3::new(
        if dir.x > 0.0 { 1 } else { -1 },
        if dir.y > 0.0 { 1 } else { -1 },
        if dir.z > 0.0 { 1 } else { -1 },
    );

    // Distance along the ray to the next grid plane on each axis, and the
    // distance between consecutive planes.
    let next_boundary = |cell: i32, origin: f32, dir: f32, step: i32| -> f32 {
        if dir == 0.0 {
            f32::INFINITY
        } else {
            let boundary = if step > 0 { cell as f32 + 1.0 } else { cell as f32 };
            (boundary - origin) / dir
        }
    };
    let mut t_max = Vec3::new(
        next_boundary(cell.x, origin.x, dir.x, step.x),
        next_boundary(cell.y, origin.y, dir.y, step.y),
        next_boundary(cell.z, origin.z, dir.z, step.z),
    );
    let t_delta = Vec3::new(
        if dir.x == 0.0 { f32::INFINITY } else { (1.0 / dir.x).abs() },
        if dir.y == 0.0 { f32::INFINITY } else { (1.0 / dir.y).abs() },
        if dir.z == 0.0 { f32::INFINITY } else { (1.0 / dir.z).abs() },
    );

    loop {
        // Advance to the nearest grid plane and remember which axis we
        // crossed; the entered face's normal opposes the step direction.
        let (t, axis) = if t_max.x < t_max.y && t_max.x < t_max.z {
            (t_max.x, 0)
        } else if t_max.y < t_max.z {
            (t_max.y, 1)
        } else {
            (t_max.z, 2)
        };
        if t > max_distance {
            return None;
        }

        match axis {
            0 => {
                cell.x += step.x;
                t_max.x += t_delta.x;
            }
            1 => {
                cell.y += step.y;
                t_max.y += t_delta.y;
            }
            _ => {
                cell.z += step.z;
                t_max.z += t_delta.z;
            }
        }

        let kind = world.get_block(cell);
        if kind.is_solid() {
            let mut normal = IVec3::ZERO;
            normal[axis] = -step[axis];
            return Some(VoxelHit {
                pos: cell,
                normal,
                kind,
                distance: t,
            });
        }
    }
}

fn update_target(
    world: Res<VoxelWorld>,
    camera: Query<&Transform, With<PlayerCamera>>,
    mut target: ResMut<TargetedBlock>,
) {
    let Ok(transform) = camera.single() else {
        return;
    };
    target.0 = raycast(
        &world,
        transform.translation,
        transform.forward().as_vec3(),
        REACH,
    );
}

/// Slightly oversized wireframe cube around the targeted block.
fn draw_block_highlight(target: Res<TargetedBlock>, mut gizmos: Gizmos) {
    let Some(hit) = target.0 else {
        return;
    };
    let center = hit.pos.as_vec3() + Vec3::splat(0.5);
    let transform = Transform::from_translation(center).with_scale(Vec3::splat(1.02));
    gizmos.cube(transform, Color::BLACK);
}

/// Left click breaks the targeted block, right click places the selected
/// hotbar block against the targeted face. Placement is rejected when the
/// destination cell overlaps the player's body.
fn apply_block_edits(
    buttons: Res<ButtonInput<MouseButton>>,
    target: Res<TargetedBlock>,
    mut world: ResMut<VoxelWorld>,
    player: Query<&PlayerBody>,
) {
    let Some(hit) = target.0 else {
        return;
    };
    let Ok(body) = player.single() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        world.set_block(hit.pos, BlockKind::Air);
    }

    if buttons.just_pressed(MouseButton::Right) && hit.normal != IVec3::ZERO {
        let dest = hit.pos + hit.normal;
        if world.get_block(dest).is_solid() {
            return;
        }
        if body.intersects_cell(dest) {
            return;
        }
        world.set_block(dest, body.selected_block());
    }
}
