//! 地形生成器

use noise::NoiseFn;

use crate::voxel::block::BlockKind;
use crate::voxel::chunk::{ChunkData, ChunkPos};
use crate::voxel::constants::{CHUNK_SIZE, NOISE_SCALE, WORLD_HEIGHT};
use crate::voxel::seed::WorldSeed;

/// 地形生成器 - 基于二维柏林噪声逐列生成地形
///
/// 噪声始终在世界坐标下采样，因此同一列的高度与区块加载顺序无关，
/// 相邻区块的地形在边界处天然连续
pub struct TerrainGenerator<'a> {
    seed: &'a WorldSeed,
}

impl<'a> TerrainGenerator<'a> {
    /// 创建新的地形生成器
    pub fn new(seed: &'a WorldSeed) -> Self {
        Self { seed }
    }

    /// 计算指定世界坐标列的地表高度
    /// 噪声输出范围[-1,1]，映射到 [WORLD_HEIGHT/4, 3*WORLD_HEIGHT/4]
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let noise_val = self.seed.terrain_noise.get([
            world_x as f64 / NOISE_SCALE,
            world_z as f64 / NOISE_SCALE,
        ]);
        let half = WORLD_HEIGHT as f64 / 2.0;
        ((noise_val + 1.0) / 2.0 * half).round() as i32 + WORLD_HEIGHT / 4
    }

    /// 生成指定区块的完整地形数据
    /// 每一列从下到上填充：石头 → 4层泥土 → 1层草方块
    pub fn generate_chunk(&self, chunk_pos: ChunkPos) -> ChunkData {
        let mut chunk = ChunkData::new();
        let origin = chunk_pos.world_origin();

        for local_x in 0..CHUNK_SIZE {
            for local_z in 0..CHUNK_SIZE {
                let world_x = origin.x + local_x;
                let world_z = origin.z + local_z;
                let height = self.surface_height(world_x, world_z);

                for y in 0..height {
                    let kind = if y == height - 1 {
                        BlockKind::Grass
                    } else if y >= height - 5 {
                        BlockKind::Dirt
                    } else {
                        BlockKind::Stone
                    };
                    chunk.set(local_x, y, local_z, kind);
                }
            }
        }

        chunk
    }
}
