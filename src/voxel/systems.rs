//! 体素世界的系统函数 - 区块加载/卸载与网格重建

use bevy::prelude::*;

use crate::physics::PlayerBody;
use crate::voxel::chunk::{ChunkMarker, ChunkPos, VoxelWorld};
use crate::voxel::constants::VIEW_DISTANCE;
use crate::voxel::materials::BlockMaterials;
use crate::voxel::mesh_gen::build_chunk_mesh;
use crate::voxel::seed::WorldSeed;
use crate::voxel::terrain::TerrainGenerator;

// ============================================================================
// 区块加载系统
// ============================================================================

/// 根据玩家位置同步加载/卸载区块
///
/// 只在玩家跨越区块边界时执行。新区块的地形生成是同步的，
/// 网格构建通过脏标记交给同一帧内随后运行的重建系统。
/// 新区块加载后，与其相邻的已加载区块需要重建，
/// 否则它们边界上原本朝向"空气"的面会残留
pub fn update_chunk_loading(
    mut commands: Commands,
    mut world: ResMut<VoxelWorld>,
    mut meshes: ResMut<Assets<Mesh>>,
    seed: Res<WorldSeed>,
    player: Query<&PlayerBody>,
    children_query: Query<&Children>,
    mesh_query: Query<&Mesh3d>,
    mut last_center: Local<Option<ChunkPos>>,
) {
    let Ok(body) = player.single() else {
        return;
    };

    let center = ChunkPos::from_world(
        body.position.x.floor() as i32,
        body.position.z.floor() as i32,
    );
    if *last_center == Some(center) {
        return;
    }
    *last_center = Some(center);

    // 加载视距内缺失的区块
    let generator = TerrainGenerator::new(&seed);
    let mut loaded = 0;
    for dx in -VIEW_DISTANCE..=VIEW_DISTANCE {
        for dz in -VIEW_DISTANCE..=VIEW_DISTANCE {
            let chunk_pos = ChunkPos::new(center.x + dx, center.z + dz);
            if world.chunks.contains_key(&chunk_pos) {
                continue;
            }

            let chunk = generator.generate_chunk(chunk_pos);
            world.chunks.insert(chunk_pos, chunk);

            let origin = chunk_pos.world_origin();
            let entity = commands
                .spawn((
                    Transform::from_translation(origin.as_vec3()),
                    Visibility::default(),
                    ChunkMarker { pos: chunk_pos },
                ))
                .id();
            world.chunk_entities.insert(chunk_pos, entity);

            world.mark_dirty(chunk_pos);
            for neighbor in [
                ChunkPos::new(chunk_pos.x - 1, chunk_pos.z),
                ChunkPos::new(chunk_pos.x + 1, chunk_pos.z),
                ChunkPos::new(chunk_pos.x, chunk_pos.z - 1),
                ChunkPos::new(chunk_pos.x, chunk_pos.z + 1),
            ] {
                world.mark_dirty(neighbor);
            }
            loaded += 1;
        }
    }

    // 卸载超出视距+1的区块，释放网格资源
    let to_unload: Vec<ChunkPos> = world
        .chunks
        .keys()
        .filter(|pos| {
            (pos.x - center.x).abs() > VIEW_DISTANCE + 1
                || (pos.z - center.z).abs() > VIEW_DISTANCE + 1
        })
        .copied()
        .collect();

    for chunk_pos in &to_unload {
        if let Some(entity) = world.chunk_entities.remove(chunk_pos) {
            release_group_meshes(entity, &children_query, &mesh_query, &mut meshes);
            commands.entity(entity).despawn();
        }
        world.chunks.remove(chunk_pos);
        world.dirty.remove(chunk_pos);
    }

    if loaded > 0 || !to_unload.is_empty() {
        info!(
            "chunk streaming: center {:?}, loaded {}, unloaded {}",
            center,
            loaded,
            to_unload.len()
        );
    }
}

// ============================================================================
// 网格重建系统
// ============================================================================

/// 重建所有脏区块的网格
///
/// 同一帧内在方块编辑和区块加载之后运行，保证编辑立即可见。
/// 先释放旧网格资源再挂载新的绘制组实体，重建不泄漏GPU资源
pub fn rebuild_dirty_chunks(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<BlockMaterials>,
    mut world: ResMut<VoxelWorld>,
    children_query: Query<&Children>,
    mesh_query: Query<&Mesh3d>,
) {
    if world.dirty.is_empty() {
        return;
    }
    let dirty: Vec<ChunkPos> = world.dirty.drain().collect();

    for chunk_pos in dirty {
        let Some(&chunk_entity) = world.chunk_entities.get(&chunk_pos) else {
            continue;
        };

        // 分离并释放上一次的网格
        release_group_meshes(chunk_entity, &children_query, &mesh_query, &mut meshes);
        commands.entity(chunk_entity).despawn_related::<Children>();

        // 没有暴露面的区块（全空或完全封闭）不产生网格
        let Some(data) = build_chunk_mesh(&world, chunk_pos) else {
            continue;
        };

        // 每个绘制组一个子实体：本组的顶点/索引切片 + 对应材质
        for group in &data.groups {
            let mesh_handle = meshes.add(data.group_mesh(group));
            commands.spawn((
                Mesh3d(mesh_handle),
                MeshMaterial3d(materials.handle(group.kind)),
                Transform::default(),
                ChildOf(chunk_entity),
            ));
        }
    }
}

/// 释放一个区块实体下所有绘制组子实体持有的网格资源
fn release_group_meshes(
    chunk_entity: Entity,
    children_query: &Query<&Children>,
    mesh_query: &Query<&Mesh3d>,
    meshes: &mut Assets<Mesh>,
) {
    let Ok(children) = children_query.get(chunk_entity) else {
        return;
    };
    for &child in children {
        if let Ok(mesh) = mesh_query.get(child) {
            meshes.remove(mesh.id());
        }
    }
}
