use crate::models::PointSet;

/// 三角网格
///
/// 持有它所索引的点集，网格与点集永远不会分离。
/// 每个三角形是三个指向 `point_set` 的 `u32` 索引。
///
/// 相等性比较时三角形内部的顶点顺序（环绕方向）不计入，
/// 三角形列表本身的顺序计入。
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    point_set: PointSet,
    triangles: Vec<[u32; 3]>,
}

/// [`TriangleMesh::validate`] 发现的第一个缺陷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshDefect {
    /// 索引超出点集范围
    IndexOutOfRange { triangle: usize, index: u32 },
    /// 同一个三角形中出现重复索引
    RepeatedIndex { triangle: usize, index: u32 },
}

impl TriangleMesh {
    /// 直接组装网格，不做校验
    ///
    /// 越界索引会在编码时被拒绝，也可以先调用 [`TriangleMesh::validate`]。
    pub fn new(point_set: PointSet, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            point_set,
            triangles,
        }
    }

    /// 没有三角形的网格
    pub fn empty(point_set: PointSet) -> Self {
        Self::new(point_set, Vec::new())
    }

    pub fn point_set(&self) -> &PointSet {
        &self.point_set
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// 检查每个三角形的索引都不越界且互不相同
    pub fn validate(&self) -> Result<(), MeshDefect> {
        let count = self.point_set.count();

        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= count) {
                return Err(MeshDefect::IndexOutOfRange { triangle, index });
            }
            if tri[0] == tri[1] || tri[0] == tri[2] {
                return Err(MeshDefect::RepeatedIndex {
                    triangle,
                    index: tri[0],
                });
            }
            if tri[1] == tri[2] {
                return Err(MeshDefect::RepeatedIndex {
                    triangle,
                    index: tri[1],
                });
            }
        }

        Ok(())
    }

    pub fn into_parts(self) -> (PointSet, Vec<[u32; 3]>) {
        (self.point_set, self.triangles)
    }
}

fn sorted(tri: &[u32; 3]) -> [u32; 3] {
    let mut t = *tri;
    t.sort_unstable();
    t
}

impl PartialEq for TriangleMesh {
    fn eq(&self, other: &Self) -> bool {
        self.point_set == other.point_set
            && self.triangles.len() == other.triangles.len()
            && self
                .triangles
                .iter()
                .zip(&other.triangles)
                .all(|(a, b)| sorted(a) == sorted(b))
    }
}
