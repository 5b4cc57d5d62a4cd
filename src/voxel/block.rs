//! 方块类型定义与静态注册表

use bevy::prelude::*;

/// 方块种类枚举 - 定义游戏中所有可用的方块类型
/// `Air` 编码为0，表示"没有方块"，既不渲染也不参与碰撞
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum BlockKind {
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
    Wood = 4,
    Leaves = 5,
}

/// 快捷栏中可放置的方块列表（按槽位顺序）
pub const HOTBAR_BLOCKS: [BlockKind; 5] = [
    BlockKind::Grass,
    BlockKind::Dirt,
    BlockKind::Stone,
    BlockKind::Wood,
    BlockKind::Leaves,
];

/// 方块的静态外观定义 - 由注册表持有，不属于任何区块
#[derive(Debug, Clone, Copy)]
pub struct BlockDef {
    /// 方块名称
    pub name: &'static str,
    /// 材质基础颜色
    pub color: Color,
}

impl BlockKind {
    /// 方块编码（u8）
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// 从编码还原方块种类，未注册的编码视为空气
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => BlockKind::Grass,
            2 => BlockKind::Dirt,
            3 => BlockKind::Stone,
            4 => BlockKind::Wood,
            5 => BlockKind::Leaves,
            _ => BlockKind::Air,
        }
    }

    /// 是否为实心方块（参与碰撞和面剔除）
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockKind::Air
    }

    /// 查询方块的静态定义
    pub fn def(self) -> BlockDef {
        match self {
            BlockKind::Air => BlockDef {
                name: "air",
                color: Color::NONE,
            },
            BlockKind::Grass => BlockDef {
                name: "grass",
                color: Color::srgb_u8(0x55, 0x90, 0x2f),
            },
            BlockKind::Dirt => BlockDef {
                name: "dirt",
                color: Color::srgb_u8(0x8b, 0x45, 0x13),
            },
            BlockKind::Stone => BlockDef {
                name: "stone",
                color: Color::srgb_u8(0x80, 0x80, 0x80),
            },
            BlockKind::Wood => BlockDef {
                name: "wood",
                color: Color::srgb_u8(0x65, 0x43, 0x21),
            },
            BlockKind::Leaves => BlockDef {
                name: "leaves",
                color: Color::srgb_u8(0x22, 0x8b, 0x22),
            },
        }
    }

    /// 所有非空气方块种类
    pub const ALL_SOLID: [BlockKind; 5] = [
        BlockKind::Grass,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Wood,
        BlockKind::Leaves,
    ];
}
