//! 体素系统插件

use bevy::prelude::*;

use crate::voxel::chunk::VoxelWorld;
use crate::voxel::materials::setup_materials;
use crate::voxel::seed::WorldSeed;
use crate::voxel::systems::{rebuild_dirty_chunks, update_chunk_loading};

/// 体素系统集 - 供其他插件相对排序
/// 方块编辑必须安排在 Remesh 之前，编辑才能在同一帧内可见
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelSet {
    /// 区块加载/卸载
    Load,
    /// 脏区块网格重建
    Remesh,
}

/// 体素系统插件 - 负责注册体素相关的资源和系统
pub struct VoxelPlugin;

impl Plugin for VoxelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VoxelWorld>()
            .init_resource::<WorldSeed>()
            .configure_sets(Update, (VoxelSet::Load, VoxelSet::Remesh).chain())
            .add_systems(Startup, setup_materials)
            .add_systems(
                Update,
                (
                    update_chunk_loading.in_set(VoxelSet::Load),
                    rebuild_dirty_chunks.in_set(VoxelSet::Remesh),
                ),
            );
    }
}
