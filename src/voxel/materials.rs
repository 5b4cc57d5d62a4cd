//! 材质系统 - 每种方块一个材质，由静态注册表的颜色派生

use bevy::prelude::*;

use crate::voxel::block::BlockKind;

/// 方块材质资源 - 按方块编码索引的材质句柄表
#[derive(Resource)]
pub struct BlockMaterials {
    handles: Vec<Handle<StandardMaterial>>,
}

impl BlockMaterials {
    /// 获取指定方块类型的材质句柄
    pub fn handle(&self, kind: BlockKind) -> Handle<StandardMaterial> {
        self.handles[kind.id() as usize].clone()
    }
}

/// 初始化材质系统
/// 为每种方块创建一个不透明材质，顶点颜色（灰度遮蔽值）会调制基础色
pub fn setup_materials(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    let mut handles = Vec::new();
    // 编码0（空气）占位，保持句柄表可以直接按编码索引
    handles.push(materials.add(StandardMaterial::default()));

    for kind in BlockKind::ALL_SOLID {
        handles.push(materials.add(StandardMaterial {
            base_color: kind.def().color,
            perceptual_roughness: 0.9,
            ..default()
        }));
    }

    commands.insert_resource(BlockMaterials { handles });
}
