//! 区块数据结构与世界注册表

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::voxel::block::BlockKind;
use crate::voxel::constants::{CHUNK_SIZE, WORLD_HEIGHT};

/// 区块坐标 - 用于标识世界中区块柱体的位置
/// 注意：这是区块坐标，不是体素（方块）坐标；Y方向不分块
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    /// 创建新的区块坐标
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// 从世界坐标（体素坐标）转换为区块坐标
    /// 使用欧几里德除法确保负坐标也能正确转换
    pub fn from_world(world_x: i32, world_z: i32) -> Self {
        Self {
            x: world_x.div_euclid(CHUNK_SIZE),
            z: world_z.div_euclid(CHUNK_SIZE),
        }
    }

    /// 获取区块在世界坐标系中的起始位置
    pub fn world_origin(&self) -> IVec3 {
        IVec3::new(self.x * CHUNK_SIZE, 0, self.z * CHUNK_SIZE)
    }
}

/// 区块标记组件 - 用于标识游戏实体对应的区块位置
#[derive(Component)]
pub struct ChunkMarker {
    pub pos: ChunkPos,
}

/// 区块数据 - 存储区块内所有方块的类型编码
pub struct ChunkData {
    /// 方块数组，大小固定为 CHUNK_SIZE² × WORLD_HEIGHT
    /// 使用一维数组存储三维数据，通过 index() 函数计算索引
    pub blocks: Vec<BlockKind>,
}

impl ChunkData {
    /// 区块方块总数
    pub const BLOCK_COUNT: usize = (CHUNK_SIZE * CHUNK_SIZE * WORLD_HEIGHT) as usize;

    /// 创建一个空的区块数据，所有方块初始化为空气
    pub fn new() -> Self {
        Self {
            blocks: vec![BlockKind::Air; Self::BLOCK_COUNT],
        }
    }

    /// 将三维局部坐标转换为一维数组索引（Y-Z-X顺序）
    #[inline]
    pub fn index(x: i32, y: i32, z: i32) -> usize {
        ((y * CHUNK_SIZE * CHUNK_SIZE) + (z * CHUNK_SIZE) + x) as usize
    }

    /// 局部坐标是否在区块范围内
    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < CHUNK_SIZE && y >= 0 && y < WORLD_HEIGHT && z >= 0 && z < CHUNK_SIZE
    }

    /// 获取指定局部位置的方块类型
    /// 如果坐标超出边界，返回空气
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockKind {
        if !Self::in_bounds(x, y, z) {
            return BlockKind::Air;
        }
        self.blocks[Self::index(x, y, z)]
    }

    /// 设置指定局部位置的方块类型
    /// 如果坐标超出边界，不执行任何写入
    pub fn set(&mut self, x: i32, y: i32, z: i32, kind: BlockKind) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        self.blocks[Self::index(x, y, z)] = kind;
    }

    /// 检查区块是否完全为空气
    /// 用于优化：空气区块不需要生成网格
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&kind| kind == BlockKind::Air)
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new()
    }
}

/// 体素世界 - 所有方块查询的唯一数据源
/// 网格构建器和物理积分器只通过这个资源读取方块数据
#[derive(Resource, Default)]
pub struct VoxelWorld {
    /// 所有已生成的区块数据
    pub chunks: HashMap<ChunkPos, ChunkData>,
    /// 已加载区块对应的场景实体，用于渲染挂载
    pub chunk_entities: HashMap<ChunkPos, Entity>,
    /// 需要整体重建网格的区块集合
    pub dirty: HashSet<ChunkPos>,
}

impl VoxelWorld {
    /// 获取世界中指定位置的方块类型
    /// 垂直越界或区块未加载时返回空气
    pub fn get_block(&self, pos: IVec3) -> BlockKind {
        if pos.y < 0 || pos.y >= WORLD_HEIGHT {
            return BlockKind::Air;
        }
        let chunk_pos = ChunkPos::from_world(pos.x, pos.z);
        let local_x = pos.x.rem_euclid(CHUNK_SIZE);
        let local_z = pos.z.rem_euclid(CHUNK_SIZE);

        self.chunks
            .get(&chunk_pos)
            .map(|chunk| chunk.get(local_x, pos.y, local_z))
            .unwrap_or(BlockKind::Air)
    }

    /// 设置世界中指定位置的方块类型
    /// 垂直越界或区块未加载时静默忽略
    ///
    /// 写入成功后标记所在区块待重建；如果写入位置在区块边界上，
    /// 共享该面的相邻区块的剔除结果依赖本区块数据，因此一并标记。
    /// 每次写入最多触发3个区块重建（自身 + 角落处的两个面邻居）
    pub fn set_block(&mut self, pos: IVec3, kind: BlockKind) {
        if pos.y < 0 || pos.y >= WORLD_HEIGHT {
            return;
        }
        let chunk_pos = ChunkPos::from_world(pos.x, pos.z);
        let local_x = pos.x.rem_euclid(CHUNK_SIZE);
        let local_z = pos.z.rem_euclid(CHUNK_SIZE);

        let Some(chunk) = self.chunks.get_mut(&chunk_pos) else {
            return;
        };
        chunk.set(local_x, pos.y, local_z, kind);
        self.mark_dirty(chunk_pos);

        if local_x == 0 {
            self.mark_dirty(ChunkPos::new(chunk_pos.x - 1, chunk_pos.z));
        }
        if local_x == CHUNK_SIZE - 1 {
            self.mark_dirty(ChunkPos::new(chunk_pos.x + 1, chunk_pos.z));
        }
        if local_z == 0 {
            self.mark_dirty(ChunkPos::new(chunk_pos.x, chunk_pos.z - 1));
        }
        if local_z == CHUNK_SIZE - 1 {
            self.mark_dirty(ChunkPos::new(chunk_pos.x, chunk_pos.z + 1));
        }
    }

    /// 标记区块待重建（仅对已生成的区块生效）
    pub fn mark_dirty(&mut self, pos: ChunkPos) {
        if self.chunks.contains_key(&pos) {
            self.dirty.insert(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_chunks(positions: &[(i32, i32)]) -> VoxelWorld {
        let mut world = VoxelWorld::default();
        for &(x, z) in positions {
            world.chunks.insert(ChunkPos::new(x, z), ChunkData::new());
        }
        world
    }

    #[test]
    fn test_block_array_length() {
        let chunk = ChunkData::new();
        assert_eq!(
            chunk.blocks.len(),
            (CHUNK_SIZE * CHUNK_SIZE * WORLD_HEIGHT) as usize
        );
    }

    #[test]
    fn test_coordinate_round_trip() {
        // 负坐标的欧几里德取模必须落在 [0, CHUNK_SIZE) 内，
        // 并且 (区块坐标, 局部坐标) 能还原出原始世界坐标
        for world_x in [-33i32, -17, -16, -1, 0, 1, 15, 16, 31] {
            let chunk_x = world_x.div_euclid(CHUNK_SIZE);
            let local_x = world_x.rem_euclid(CHUNK_SIZE);
            assert!((0..CHUNK_SIZE).contains(&local_x));
            assert_eq!(chunk_x * CHUNK_SIZE + local_x, world_x);
        }
    }

    #[test]
    fn test_out_of_range_local_set_rejected() {
        let mut chunk = ChunkData::new();
        chunk.set(-1, 0, 0, BlockKind::Stone);
        chunk.set(CHUNK_SIZE, 0, 0, BlockKind::Stone);
        chunk.set(0, WORLD_HEIGHT, 0, BlockKind::Stone);
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_reads_outside_world_are_air() {
        let mut world = world_with_chunks(&[(0, 0)]);
        world.set_block(IVec3::new(1, 1, 1), BlockKind::Dirt);

        // 垂直越界
        assert_eq!(world.get_block(IVec3::new(1, -1, 1)), BlockKind::Air);
        assert_eq!(
            world.get_block(IVec3::new(1, WORLD_HEIGHT, 1)),
            BlockKind::Air
        );
        // 未加载区块
        assert_eq!(world.get_block(IVec3::new(100, 1, 100)), BlockKind::Air);
    }

    #[test]
    fn test_writes_outside_world_are_noops() {
        let mut world = world_with_chunks(&[(0, 0)]);
        world.set_block(IVec3::new(1, -1, 1), BlockKind::Stone);
        world.set_block(IVec3::new(1, WORLD_HEIGHT, 1), BlockKind::Stone);
        world.set_block(IVec3::new(100, 1, 100), BlockKind::Stone);
        assert!(world.chunks[&ChunkPos::new(0, 0)].is_empty());
        assert!(world.dirty.is_empty());
    }

    #[test]
    fn test_negative_world_coordinates_map_into_chunk() {
        let mut world = world_with_chunks(&[(-1, -1)]);
        world.set_block(IVec3::new(-1, 5, -16), BlockKind::Stone);
        let chunk = &world.chunks[&ChunkPos::new(-1, -1)];
        // -1 → 局部15，-16 → 局部0
        assert_eq!(chunk.get(15, 5, 0), BlockKind::Stone);
        assert_eq!(world.get_block(IVec3::new(-1, 5, -16)), BlockKind::Stone);
    }

    #[test]
    fn test_interior_edit_marks_only_self() {
        let mut world = world_with_chunks(&[(0, 0), (1, 0), (0, 1)]);
        world.set_block(IVec3::new(5, 5, 5), BlockKind::Stone);
        assert_eq!(world.dirty.len(), 1);
        assert!(world.dirty.contains(&ChunkPos::new(0, 0)));
    }

    #[test]
    fn test_boundary_edit_marks_face_neighbor() {
        let mut world = world_with_chunks(&[(0, 0), (1, 0)]);
        // 区块(1,0)的局部X=0（世界X=16）
        world.set_block(IVec3::new(16, 5, 5), BlockKind::Stone);
        assert!(world.dirty.contains(&ChunkPos::new(1, 0)));
        assert!(world.dirty.contains(&ChunkPos::new(0, 0)));
        assert_eq!(world.dirty.len(), 2);
    }

    #[test]
    fn test_corner_edit_marks_both_face_neighbors_never_diagonal() {
        let mut world = world_with_chunks(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        // 区块(1,1)的局部X=0、Z=0角落（世界坐标(16,5,16)）
        world.set_block(IVec3::new(16, 5, 16), BlockKind::Stone);
        assert!(world.dirty.contains(&ChunkPos::new(1, 1)));
        assert!(world.dirty.contains(&ChunkPos::new(0, 1)));
        assert!(world.dirty.contains(&ChunkPos::new(1, 0)));
        // 对角区块不共享任何面，永远不标记
        assert!(!world.dirty.contains(&ChunkPos::new(0, 0)));
    }

    #[test]
    fn test_boundary_edit_skips_unloaded_neighbor() {
        let mut world = world_with_chunks(&[(0, 0)]);
        world.set_block(IVec3::new(0, 5, 5), BlockKind::Stone);
        // 邻居(-1,0)未加载，只标记自身
        assert_eq!(world.dirty.len(), 1);
        assert!(world.dirty.contains(&ChunkPos::new(0, 0)));
    }
}
