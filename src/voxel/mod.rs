//! 体素世界模块
//!
//! 这个模块包含了体素游戏的核心系统，包括：
//!
//! - **constants**: 常量定义（区块大小、世界高度、视距等）
//! - **block**: 方块类型定义（编码、名称、颜色的静态注册表）
//! - **seed**: 世界种子与噪声生成器
//! - **chunk**: 区块数据结构（区块坐标、方块存储、世界注册表）
//! - **terrain**: 地形生成器（噪声高度图、分层填充）
//! - **mesh**: 网格构建（面片几何、环境光遮蔽、按材质分批）
//! - **mesh_gen**: 区块网格生成（面剔除、跨区块邻居查询）
//! - **systems**: ECS系统函数（区块加载、卸载、网格重建）
//! - **materials**: 材质系统（每种方块一个材质）
//! - **plugin**: Bevy插件

pub mod block;
pub mod chunk;
pub mod constants;
pub mod materials;
pub mod mesh;
pub mod mesh_gen;
pub mod plugin;
pub mod seed;
pub mod systems;
pub mod terrain;

// 重新导出常用类型，方便外部使用
pub use block::{BlockKind, HOTBAR_BLOCKS};
pub use chunk::{ChunkData, ChunkMarker, ChunkPos, VoxelWorld};
pub use constants::{CHUNK_SIZE, VIEW_DISTANCE, WORLD_HEIGHT};
pub use materials::BlockMaterials;
pub use mesh::{ChunkMeshData, DrawGroup};
pub use mesh_gen::build_chunk_mesh;
pub use plugin::{VoxelPlugin, VoxelSet};
pub use seed::WorldSeed;
pub use terrain::TerrainGenerator;
