//! 区块网格生成 - 面剔除、环境光遮蔽采样和跨区块邻居查询

use bevy::prelude::*;

use crate::voxel::block::BlockKind;
use crate::voxel::chunk::{ChunkPos, VoxelWorld};
use crate::voxel::constants::{CHUNK_SIZE, WORLD_HEIGHT};
use crate::voxel::mesh::{face_corners, vertex_ao, ChunkMeshBuilder, ChunkMeshData, FACE_DIRECTIONS};

/// 为指定区块整体构建网格数据
///
/// 每次失效都完整重建（不做增量差分）。邻居查询全部使用世界坐标，
/// 跨入相邻区块的查询对剔除逻辑完全透明，因此区块边界处
/// 两个实心方块之间不会产生内部面。
///
/// 区块未生成或没有任何暴露面时返回 None
pub fn build_chunk_mesh(world: &VoxelWorld, chunk_pos: ChunkPos) -> Option<ChunkMeshData> {
    let chunk = world.chunks.get(&chunk_pos)?;
    let origin = chunk_pos.world_origin();
    let mut builder = ChunkMeshBuilder::new();
    let is_solid = |pos: IVec3| world.get_block(pos).is_solid();

    for y in 0..WORLD_HEIGHT {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let kind = chunk.get(x, y, z);
                if kind == BlockKind::Air {
                    continue;
                }

                let local = IVec3::new(x, y, z);
                let world_cell = origin + local;

                for (dir, normal) in FACE_DIRECTIONS {
                    // 只有邻居是空气时才输出这个面
                    let neighbor = world.get_block(world_cell + dir);
                    if neighbor.is_solid() {
                        continue;
                    }

                    let corners = face_corners(dir);
                    let mut vertices = [[0.0; 3]; 4];
                    let mut ao_levels = [0; 4];
                    for i in 0..4 {
                        // 顶点位置使用区块局部坐标，实体Transform放在区块原点
                        vertices[i] = (local + corners[i]).as_vec3().to_array();
                        // 遮蔽采样使用世界坐标，跨区块同样透明
                        ao_levels[i] = vertex_ao(is_solid, world_cell, dir, corners[i]);
                    }

                    builder.add_face(kind, vertices, normal, ao_levels);
                }
            }
        }
    }

    builder.build()
}
