//! Fixed-tick player physics: velocity integration with drag and gravity,
//! plus per-axis swept AABB collision against the voxel store.

use bevy::prelude::*;

use crate::voxel::{BlockKind, VoxelWorld, HOTBAR_BLOCKS, WORLD_HEIGHT};

pub const WALK_SPEED: f32 = 4.317;
pub const SPRINT_SPEED: f32 = 5.612;
pub const HORIZONTAL_ACCELERATION: f32 = 30.0;
pub const GROUND_DRAG: f32 = 8.0;
pub const AIR_DRAG: f32 = 2.0;
pub const JUMP_VELOCITY: f32 = 8.4;
pub const GRAVITY: f32 = 32.0;
/// Per-second vertical velocity decay factor, raised to dt so the
/// simulation stays tick-rate independent.
pub const VERTICAL_DRAG: f32 = 0.6676;

pub const PLAYER_WIDTH: f32 = 0.6;
pub const PLAYER_HEIGHT: f32 = 1.8;
pub const PLAYER_EYE_HEIGHT: f32 = 1.62;
const HALF_WIDTH: f32 = PLAYER_WIDTH / 2.0;

/// Excluded from the box top during horizontal passes, so a box resting
/// exactly under a ceiling does not collide with its own top cell row.
const CEILING_EPSILON: f32 = 0.01;

/// Below this the player has fallen through ungenerated terrain.
pub const FALL_RESET_Y: f32 = -20.0;
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.5, WORLD_HEIGHT as f32 + 5.0, 0.5);

/// Input sampled for one physics tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Horizontal wish direction in world space (already rotated by camera yaw).
    pub wish_dir: Vec3,
    pub jump: bool,
    pub sprint: bool,
}

/// The player's physical body. Position is the feet origin in grid space;
/// the bounding box is derived from the fixed half-width and height.
#[derive(Component, Debug)]
pub struct PlayerBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    pub hotbar: [BlockKind; 5],
    pub selected_slot: usize,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            position: SPAWN_POSITION,
            velocity: Vec3::ZERO,
            on_ground: false,
            hotbar: HOTBAR_BLOCKS,
            selected_slot: 0,
        }
    }
}

impl PlayerBody {
    /// Currently selected hotbar block.
    pub fn selected_block(&self) -> BlockKind {
        self.hotbar[self.selected_slot]
    }

    pub fn select_slot(&mut self, slot: usize) {
        if slot < self.hotbar.len() {
            self.selected_slot = slot;
        }
    }

    /// AABB as (min, max) corners.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let min = Vec3::new(
            self.position.x - HALF_WIDTH,
            self.position.y,
            self.position.z - HALF_WIDTH,
        );
        let max = Vec3::new(
            self.position.x + HALF_WIDTH,
            self.position.y + PLAYER_HEIGHT,
            self.position.z + HALF_WIDTH,
        );
        (min, max)
    }

    /// Whether the body's AABB overlaps the unit cell at `cell`.
    pub fn intersects_cell(&self, cell: IVec3) -> bool {
        let (min, max) = self.bounds();
        let cell_min = cell.as_vec3();
        let cell_max = cell_min + Vec3::ONE;
        min.x < cell_max.x
            && max.x > cell_min.x
            && min.y < cell_max.y
            && max.y > cell_min.y
            && min.z < cell_max.z
            && max.z > cell_min.z
    }

    /// Advance the body by one fixed tick.
    ///
    /// Axis order is fixed: X, then Z, then Y. Resolving Y last lets
    /// horizontal sliding along walls happen before the vertical
    /// snap-to-ground, so the body does not catch on block edges mid-jump.
    pub fn step(&mut self, world: &VoxelWorld, input: &TickInput, dt: f32) {
        // Horizontal drag, then acceleration along the wish direction.
        let drag = if self.on_ground { GROUND_DRAG } else { AIR_DRAG };
        self.velocity.x -= self.velocity.x * drag * dt;
        self.velocity.z -= self.velocity.z * drag * dt;

        if input.wish_dir.length_squared() > 0.0 {
            let dir = input.wish_dir.normalize();
            self.velocity.x += dir.x * HORIZONTAL_ACCELERATION * dt;
            self.velocity.z += dir.z * HORIZONTAL_ACCELERATION * dt;
        }

        let speed_cap = if input.sprint { SPRINT_SPEED } else { WALK_SPEED };
        let horizontal = Vec2::new(self.velocity.x, self.velocity.z);
        if horizontal.length() > speed_cap {
            let clamped = horizontal.normalize() * speed_cap;
            self.velocity.x = clamped.x;
            self.velocity.z = clamped.y;
        }

        self.velocity.y -= GRAVITY * dt;
        self.velocity.y *= VERTICAL_DRAG.powf(dt);

        if input.jump && self.on_ground {
            self.velocity.y = JUMP_VELOCITY;
        }

        self.on_ground = false;
        self.position.x += self.velocity.x * dt;
        self.collide_x(world);
        self.position.z += self.velocity.z * dt;
        self.collide_z(world);
        self.position.y += self.velocity.y * dt;
        self.collide_y(world);

        // Safety net against falling through ungenerated terrain.
        if self.position.y < FALL_RESET_Y {
            self.position = SPAWN_POSITION;
            self.velocity = Vec3::ZERO;
        }
    }

    fn collide_x(&mut self, world: &VoxelWorld) {
        let (min, max) = self.bounds();
        let (x1, x2) = (min.x.floor() as i32, max.x.floor() as i32);
        let (y1, y2) = (
            min.y.floor() as i32,
            (max.y - CEILING_EPSILON).floor() as i32,
        );
        let (z1, z2) = (min.z.floor() as i32, max.z.floor() as i32);

        for y in y1..=y2 {
            for z in z1..=z2 {
                if self.velocity.x < 0.0 && world.get_block(IVec3::new(x1, y, z)).is_solid() {
                    self.position.x = (x1 + 1) as f32 + HALF_WIDTH;
                    self.velocity.x = 0.0;
                    return;
                }
                if self.velocity.x > 0.0 && world.get_block(IVec3::new(x2, y, z)).is_solid() {
                    self.position.x = x2 as f32 - HALF_WIDTH;
                    self.velocity.x = 0.0;
                    return;
                }
            }
        }
    }

    fn collide_z(&mut self, world: &VoxelWorld) {
        let (min, max) = self.bounds();
        let (x1, x2) = (min.x.floor() as i32, max.x.floor() as i32);
        let (y1, y2) = (
            min.y.floor() as i32,
            (max.y - CEILING_EPSILON).floor() as i32,
        );
        let (z1, z2) = (min.z.floor() as i32, max.z.floor() as i32);

        for y in y1..=y2 {
            for x in x1..=x2 {
                if self.velocity.z < 0.0 && world.get_block(IVec3::new(x, y, z1)).is_solid() {
                    self.position.z = (z1 + 1) as f32 + HALF_WIDTH;
                    self.velocity.z = 0.0;
                    return;
                }
                if self.velocity.z > 0.0 && world.get_block(IVec3::new(x, y, z2)).is_solid() {
                    self.position.z = z2 as f32 - HALF_WIDTH;
                    self.velocity.z = 0.0;
                    return;
                }
            }
        }
    }

    fn collide_y(&mut self, world: &VoxelWorld) {
        let (min, max) = self.bounds();
        let (x1, x2) = (min.x.floor() as i32, max.x.floor() as i32);
        let (y1, y2) = (min.y.floor() as i32, max.y.floor() as i32);
        let (z1, z2) = (min.z.floor() as i32, max.z.floor() as i32);

        for x in x1..=x2 {
            for z in z1..=z2 {
                if self.velocity.y <= 0.0 && world.get_block(IVec3::new(x, y1, z)).is_solid() {
                    self.position.y = (y1 + 1) as f32;
                    self.velocity.y = 0.0;
                    self.on_ground = true;
                    return;
                }
                if self.velocity.y > 0.0 && world.get_block(IVec3::new(x, y2, z)).is_solid() {
                    self.position.y = y2 as f32 - PLAYER_HEIGHT;
                    self.velocity.y = 0.0;
                    return;
                }
            }
        }
    }
}
