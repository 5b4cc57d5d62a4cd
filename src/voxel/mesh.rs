//! 网格构建 - 面片几何、环境光遮蔽和按材质分批的网格构建器

use bevy::mesh::{Indices, Mesh, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::voxel::block::BlockKind;

// ============================================================================
// 面片几何
// ============================================================================

/// 6个面的方向和对应的法线
pub const FACE_DIRECTIONS: [(IVec3, [f32; 3]); 6] = [
    (IVec3::X, [1.0, 0.0, 0.0]),
    (IVec3::NEG_X, [-1.0, 0.0, 0.0]),
    (IVec3::Y, [0.0, 1.0, 0.0]),
    (IVec3::NEG_Y, [0.0, -1.0, 0.0]),
    (IVec3::Z, [0.0, 0.0, 1.0]),
    (IVec3::NEG_Z, [0.0, 0.0, -1.0]),
];

/// 每个面的固定UV四元组（按角点顺序）
pub const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// 根据面方向获取4个角点相对单位立方体原点的偏移
///
/// 角点按逆时针环绕（从面外侧看），配合 (v, v+1, v+2, v, v+2, v+3)
/// 的索引模式使法线朝外。环境光遮蔽的探测偏移由同一套角点推导，
/// 两者不会出现错位
pub fn face_corners(dir: IVec3) -> [IVec3; 4] {
    match (dir.x, dir.y, dir.z) {
        // 右面 (+X)
        (1, 0, 0) => [
            IVec3::new(1, 1, 0),
            IVec3::new(1, 1, 1),
            IVec3::new(1, 0, 1),
            IVec3::new(1, 0, 0),
        ],
        // 左面 (-X)
        (-1, 0, 0) => [
            IVec3::new(0, 1, 1),
            IVec3::new(0, 1, 0),
            IVec3::new(0, 0, 0),
            IVec3::new(0, 0, 1),
        ],
        // 上面 (+Y)
        (0, 1, 0) => [
            IVec3::new(0, 1, 1),
            IVec3::new(1, 1, 1),
            IVec3::new(1, 1, 0),
            IVec3::new(0, 1, 0),
        ],
        // 下面 (-Y)
        (0, -1, 0) => [
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(1, 0, 1),
            IVec3::new(0, 0, 1),
        ],
        // 前面 (+Z)
        (0, 0, 1) => [
            IVec3::new(1, 1, 1),
            IVec3::new(0, 1, 1),
            IVec3::new(0, 0, 1),
            IVec3::new(1, 0, 1),
        ],
        // 后面 (-Z)
        (0, 0, -1) => [
            IVec3::new(0, 1, 0),
            IVec3::new(1, 1, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(0, 0, 0),
        ],
        _ => [IVec3::ZERO; 4],
    }
}

// ============================================================================
// 环境光遮蔽
// ============================================================================

/// 遮蔽等级对应的亮度表，0最暗、3最亮
/// 亮度值写入顶点颜色的三个通道，只做灰度着色
pub const AO_BRIGHTNESS: [f32; 4] = [0.5, 0.7, 0.85, 1.0];

/// 推导某个面角点的3个遮蔽探测偏移：两个与角点共边的侧向单元，
/// 以及一个对角单元，全部位于面法线方向外侧一层
///
/// 偏移直接由角点坐标推导而不是查表，保证与面几何使用同一套角点约定
pub fn ao_probe_offsets(dir: IVec3, corner: IVec3) -> [IVec3; 3] {
    // 角点在每个切向轴上的符号：角点坐标为1则朝正方向，为0则朝负方向
    let tangent = |axis: IVec3| {
        let sign = if corner.dot(axis) == 1 { 1 } else { -1 };
        axis * sign
    };

    let (t1, t2) = if dir.x != 0 {
        (tangent(IVec3::Y), tangent(IVec3::Z))
    } else if dir.y != 0 {
        (tangent(IVec3::X), tangent(IVec3::Z))
    } else {
        (tangent(IVec3::X), tangent(IVec3::Y))
    };

    [dir + t1, dir + t2, dir + t1 + t2]
}

/// 计算某个面角点的遮蔽等级（0最暗，3最亮）
///
/// 特殊规则：两个侧向单元都是实心时直接取最暗，
/// 因为此时对角单元在几何上必然被挡住，避免出现角落亮斑
pub fn vertex_ao(is_solid: impl Fn(IVec3) -> bool, cell: IVec3, dir: IVec3, corner: IVec3) -> usize {
    let [side1, side2, diagonal] = ao_probe_offsets(dir, corner);
    let side1 = is_solid(cell + side1);
    let side2 = is_solid(cell + side2);

    if side1 && side2 {
        return 0;
    }

    let diagonal = is_solid(cell + diagonal);
    3 - (side1 as usize + side2 as usize + diagonal as usize)
}

// ============================================================================
// 按材质分批的网格构建器
// ============================================================================

/// 单个方块类型的几何批次
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBatch {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl MeshBatch {
    /// 添加一个面片：4个顶点和两个三角形
    /// 索引模式固定为 (v, v+1, v+2, v, v+2, v+3)
    pub fn add_face(&mut self, vertices: [[f32; 3]; 4], normal: [f32; 3], ao_levels: [usize; 4]) {
        let v = self.positions.len() as u32;
        for i in 0..4 {
            self.positions.push(vertices[i]);
            self.normals.push(normal);
            self.uvs.push(FACE_UVS[i]);
            let brightness = AO_BRIGHTNESS[ao_levels[i]];
            self.colors.push([brightness, brightness, brightness, 1.0]);
        }
        self.indices
            .extend_from_slice(&[v, v + 1, v + 2, v, v + 2, v + 3]);
    }
}

/// 合并网格中的绘制组 - 一段连续的顶点和索引范围，使用同一种方块材质渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawGroup {
    /// 方块类型（决定材质）
    pub kind: BlockKind,
    /// 在合并顶点缓冲中的起始位置
    pub vertex_start: u32,
    /// 顶点数量
    pub vertex_count: u32,
    /// 在合并索引缓冲中的起始位置
    pub index_start: u32,
    /// 索引数量
    pub index_count: u32,
}

/// 一个区块的完整网格数据：合并后的顶点/索引缓冲加上有序的绘制组列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
    pub groups: Vec<DrawGroup>,
}

impl ChunkMeshData {
    /// 为指定绘制组构建渲染网格
    /// 顶点和索引都只取该组的范围，索引重新以组内第一个顶点为基，
    /// 多材质区块不会重复上传其他组的顶点数据
    pub fn group_mesh(&self, group: &DrawGroup) -> Mesh {
        let vs = group.vertex_start as usize;
        let ve = vs + group.vertex_count as usize;
        let is = group.index_start as usize;
        let ie = is + group.index_count as usize;

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions[vs..ve].to_vec());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals[vs..ve].to_vec());
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs[vs..ve].to_vec());
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_COLOR,
            VertexAttributeValues::Float32x4(self.colors[vs..ve].to_vec()),
        );
        mesh.insert_indices(Indices::U32(
            self.indices[is..ie]
                .iter()
                .map(|i| i - group.vertex_start)
                .collect(),
        ));
        mesh
    }

    /// 面片总数
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }
}

/// 区块网格构建器 - 按方块类型累积几何批次，最后合并为单一缓冲
pub struct ChunkMeshBuilder {
    batches: BTreeMap<BlockKind, MeshBatch>,
}

impl ChunkMeshBuilder {
    pub fn new() -> Self {
        Self {
            batches: BTreeMap::new(),
        }
    }

    /// 向指定方块类型的批次添加一个面片
    pub fn add_face(
        &mut self,
        kind: BlockKind,
        vertices: [[f32; 3]; 4],
        normal: [f32; 3],
        ao_levels: [usize; 4],
    ) {
        self.batches
            .entry(kind)
            .or_default()
            .add_face(vertices, normal, ao_levels);
    }

    /// 合并所有批次：索引按累计顶点数偏移，每个批次记录一个绘制组
    /// 没有任何面片时返回 None（完全封闭或全空的区块没有网格）
    pub fn build(self) -> Option<ChunkMeshData> {
        if self.batches.values().all(|b| b.indices.is_empty()) {
            return None;
        }

        let mut data = ChunkMeshData::default();
        for (kind, batch) in self.batches {
            if batch.indices.is_empty() {
                continue;
            }
            let vertex_offset = data.positions.len() as u32;
            let index_start = data.indices.len() as u32;

            data.positions.extend_from_slice(&batch.positions);
            data.normals.extend_from_slice(&batch.normals);
            data.uvs.extend_from_slice(&batch.uvs);
            data.colors.extend_from_slice(&batch.colors);
            data.indices
                .extend(batch.indices.iter().map(|i| i + vertex_offset));

            data.groups.push(DrawGroup {
                kind,
                vertex_start: vertex_offset,
                vertex_count: batch.positions.len() as u32,
                index_start,
                index_count: batch.indices.len() as u32,
            });
        }
        Some(data)
    }
}

impl Default for ChunkMeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 计算三角形 (v0, v1, v2) 的几何法线
    fn triangle_normal(v0: IVec3, v1: IVec3, v2: IVec3) -> IVec3 {
        (v1 - v0).cross(v2 - v0)
    }

    #[test]
    fn test_face_winding_matches_normal() {
        // 对每个面，索引模式 (0,1,2) 和 (0,2,3) 两个三角形的
        // 几何法线都必须指向面方向（法线朝外）
        for (dir, _) in FACE_DIRECTIONS {
            let c = face_corners(dir);
            let n1 = triangle_normal(c[0], c[1], c[2]);
            let n2 = triangle_normal(c[0], c[2], c[3]);
            assert_eq!(n1, dir, "triangle 1 of face {dir:?}");
            assert_eq!(n2, dir, "triangle 2 of face {dir:?}");
        }
    }

    #[test]
    fn test_corners_lie_on_face_plane() {
        for (dir, _) in FACE_DIRECTIONS {
            for corner in face_corners(dir) {
                // 角点在法线轴上的坐标：正方向的面为1，负方向的面为0
                let expected = if dir.x + dir.y + dir.z > 0 { 1 } else { 0 };
                assert_eq!(corner.dot(dir.abs()), expected);
            }
        }
    }

    #[test]
    fn test_ao_probe_offsets_consistent_for_all_24_entries() {
        // 对全部 6面×4角点 的组合验证：
        // 两个侧向偏移 = 法线 + 一个指向角点的切向单位偏移，
        // 对角偏移 = 法线 + 两个切向偏移之和
        for (dir, _) in FACE_DIRECTIONS {
            for corner in face_corners(dir) {
                let [side1, side2, diagonal] = ao_probe_offsets(dir, corner);

                for side in [side1, side2] {
                    let tangent = side - dir;
                    // 切向偏移是单位向量且与法线垂直
                    assert_eq!(tangent.abs().dot(IVec3::ONE), 1);
                    assert_eq!(tangent.dot(dir), 0);
                    // 切向偏移指向角点所在的一侧
                    let axis = tangent.abs();
                    let expected_sign = if corner.dot(axis) == 1 { 1 } else { -1 };
                    assert_eq!(tangent.dot(axis), expected_sign);
                }
                assert_eq!(diagonal, side1 + side2 - dir);
                assert_ne!(side1, side2);
            }
        }
    }

    #[test]
    fn test_ao_level_monotonic_over_all_combinations() {
        let dir = IVec3::Y;
        let corner = IVec3::new(0, 1, 0);
        let [side1, side2, diagonal] = ao_probe_offsets(dir, corner);
        let cell = IVec3::new(5, 5, 5);

        // 枚举3个探测单元实心与否的全部8种组合
        for mask in 0u8..8 {
            let s1 = mask & 1 != 0;
            let s2 = mask & 2 != 0;
            let d = mask & 4 != 0;
            let level = vertex_ao(
                |p| {
                    (s1 && p == cell + side1)
                        || (s2 && p == cell + side2)
                        || (d && p == cell + diagonal)
                },
                cell,
                dir,
                corner,
            );

            let count = s1 as usize + s2 as usize + d as usize;
            if s1 && s2 {
                // 两侧都实心：无论对角如何，强制最暗
                assert_eq!(level, 0, "mask {mask:#05b}");
            } else {
                assert_eq!(level, 3 - count, "mask {mask:#05b}");
            }
        }
    }

    #[test]
    fn test_ao_hand_computed_top_face_scenario() {
        // 方块在(0,0,0)，左上方(-1,1,0)有一个遮挡方块：
        // 上面中 x=0 的两个角点各有一个侧向遮挡（等级2），
        // x=1 的两个角点完全无遮挡（等级3）
        let occluder = IVec3::new(-1, 1, 0);
        let is_solid = |p: IVec3| p == occluder;
        let cell = IVec3::ZERO;

        for corner in face_corners(IVec3::Y) {
            let level = vertex_ao(is_solid, cell, IVec3::Y, corner);
            if corner.x == 0 {
                assert_eq!(level, 2, "corner {corner:?}");
            } else {
                assert_eq!(level, 3, "corner {corner:?}");
            }
        }
    }

    #[test]
    fn test_batch_index_pattern() {
        let mut batch = MeshBatch::default();
        let corners = face_corners(IVec3::Y).map(|c| c.as_vec3().to_array());
        batch.add_face(corners, [0.0, 1.0, 0.0], [3; 4]);
        batch.add_face(corners, [0.0, 1.0, 0.0], [3; 4]);

        assert_eq!(batch.positions.len(), 8);
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_builder_concatenates_batches_with_offset_indices() {
        let mut builder = ChunkMeshBuilder::new();
        let corners = face_corners(IVec3::Y).map(|c| c.as_vec3().to_array());
        builder.add_face(BlockKind::Stone, corners, [0.0, 1.0, 0.0], [3; 4]);
        builder.add_face(BlockKind::Grass, corners, [0.0, 1.0, 0.0], [0, 1, 2, 3]);

        let data = builder.build().unwrap();
        assert_eq!(data.positions.len(), 8);
        assert_eq!(data.indices.len(), 12);

        // 绘制组按方块编码有序排列
        assert_eq!(data.groups.len(), 2);
        assert_eq!(data.groups[0].kind, BlockKind::Grass);
        assert_eq!(data.groups[0].index_start, 0);
        assert_eq!(data.groups[0].index_count, 6);
        assert_eq!(data.groups[1].kind, BlockKind::Stone);
        assert_eq!(data.groups[1].index_start, 6);
        assert_eq!(data.groups[1].index_count, 6);

        // 第二个批次的索引按累计顶点数偏移
        assert_eq!(&data.indices[6..], &[4, 5, 6, 4, 6, 7]);

        // 草方块批次的顶点颜色来自亮度表
        assert_eq!(data.colors[0][0], AO_BRIGHTNESS[0]);
        assert_eq!(data.colors[3][0], AO_BRIGHTNESS[3]);
    }

    #[test]
    fn test_group_mesh_contains_only_its_own_vertices() {
        let mut builder = ChunkMeshBuilder::new();
        let corners = face_corners(IVec3::Y).map(|c| c.as_vec3().to_array());
        builder.add_face(BlockKind::Stone, corners, [0.0, 1.0, 0.0], [3; 4]);
        builder.add_face(BlockKind::Grass, corners, [0.0, 1.0, 0.0], [3; 4]);
        let data = builder.build().unwrap();

        // 每个组的渲染网格只包含本组的4个顶点，索引以组内顶点为基
        for group in &data.groups {
            assert_eq!(group.vertex_count, 4);
            let mesh = data.group_mesh(group);
            assert_eq!(mesh.count_vertices(), 4);
            let indices: Vec<usize> = mesh.indices().unwrap().iter().collect();
            assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        }
        // 两个组的顶点范围首尾相接，覆盖整个合并缓冲
        assert_eq!(data.groups[0].vertex_start, 0);
        assert_eq!(data.groups[1].vertex_start, 4);
    }

    #[test]
    fn test_builder_with_no_faces_yields_none() {
        assert_eq!(ChunkMeshBuilder::new().build(), None);
    }
}
