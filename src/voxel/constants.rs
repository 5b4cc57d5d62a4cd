//! 体素世界常量定义

/// 区块水平尺寸（单位：体素）- X和Z方向均为16
pub const CHUNK_SIZE: i32 = 16;

/// 世界高度（单位：体素）- 区块在Y方向的总层数，区块是一个16×32×16的柱体
pub const WORLD_HEIGHT: i32 = 32;

/// 地形噪声采样尺度 - 值越大地形起伏越平缓
pub const NOISE_SCALE: f64 = 30.0;

/// 视距（单位：区块数）- 以玩家所在区块为中心，每个方向加载的区块数
pub const VIEW_DISTANCE: i32 = 4;
