//! Delaunay 三角剖分工具函数模块
//!
//! 提供坐标归一化、初始三角形选择、共线检测以及结果验证。

use std::collections::{HashMap, HashSet};

use crate::delaunay::triangle::{in_circle, orient2d, Vertex};
use crate::models::{Point, PointSet, TriangleMesh};

// ============================================================================
// 公开 API
// ============================================================================

/// 验证三角网格是否满足 Delaunay 性质
///
/// Delaunay 性质：任意三角形的外接圆内不包含其他点。
/// 判定在与引擎相同的归一化坐标系中进行，`epsilon` 为外接圆容差。
///
/// # 返回值
/// - `true`: 满足 Delaunay 性质
/// - `false`: 不满足，或存在越界/重复索引、退化三角形
///
/// # 示例
/// ```
/// use triangulator::{delaunay::validate_delaunay, PointSet, Triangulator};
///
/// let ps = PointSet::from_coords(&[[0.0, 0.0], [4.0, 0.0], [0.0, 3.0], [5.0, 4.0]]);
/// let mesh = Triangulator::default().triangulate(ps).unwrap();
/// assert!(validate_delaunay(&mesh, 1e-9));
/// ```
pub fn validate_delaunay(mesh: &TriangleMesh, epsilon: f64) -> bool {
    if mesh.validate().is_err() {
        return false;
    }

    let points = mesh.point_set().points();
    let Some(frame) = Frame::fit(points) else {
        return mesh.is_empty();
    };
    let vertices = frame.normalize_all(points);

    for tri in mesh.triangles() {
        let Some([a, b, c]) = ccw_corners(tri, &vertices) else {
            return false;
        };

        for (j, &p) in vertices.iter().enumerate() {
            // 与顶点重合的点（包括重复点）不参与判定
            if tri.iter().any(|&i| i as usize == j || points[i as usize] == points[j]) {
                continue;
            }

            if in_circle(a, b, c, p) > epsilon {
                return false;
            }
        }
    }

    true
}

/// 检查网格是否为合法的平面三角剖分
///
/// 要求：
/// - 没有退化三角形
/// - 每条边最多被两个三角形共享
/// - 共享同一条边的两个三角形位于边的两侧（统一为逆时针后有向边不重复）
pub fn is_planar(mesh: &TriangleMesh) -> bool {
    if mesh.validate().is_err() {
        return false;
    }

    let points = mesh.point_set().points();
    let Some(frame) = Frame::fit(points) else {
        return mesh.is_empty();
    };
    let vertices = frame.normalize_all(points);

    let mut directed = HashSet::with_capacity(mesh.triangle_count() * 3);
    let mut undirected: HashMap<(u32, u32), u8> = HashMap::with_capacity(mesh.triangle_count() * 3);

    for tri in mesh.triangles() {
        let Some(ccw) = ccw_indices(tri, &vertices) else {
            return false;
        };

        for k in 0..3 {
            let (u, v) = (ccw[k], ccw[(k + 1) % 3]);
            if !directed.insert((u, v)) {
                return false;
            }

            let shared = undirected.entry((u.min(v), u.max(v))).or_insert(0);
            *shared += 1;
            if *shared > 2 {
                return false;
            }
        }
    }

    true
}

/// 计算凸包上的顶点数量（不含凸包边上的共线点）
///
/// 使用 Andrew 单调链算法。
/// 对处于一般位置的 n 个点（其中 k 个在凸包上），
/// Delaunay 三角剖分产生的三角形数为 `2n - 2 - k`。
pub fn convex_hull_size(point_set: &PointSet) -> usize {
    let mut points: Vec<Vertex> = point_set
        .points()
        .iter()
        .map(|p| Vertex::new(f64::from(p.x), f64::from(p.y)))
        .collect();

    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();

    if points.len() < 3 {
        return points.len();
    }

    let mut hull: Vec<Vertex> = Vec::with_capacity(points.len() * 2);

    // 下凸包
    for &p in &points {
        while hull.len() >= 2 && orient2d(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // 上凸包
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && orient2d(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // 最后一个点与起点重复
    hull.len() - 1
}

// ============================================================================
// 内部辅助函数
// ============================================================================

/// 归一化坐标系：平移到包围盒中心，再按最大边长缩放
///
/// 归一化后所有点都落在 `[-0.5, 0.5]²` 内。
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    center_x: f64,
    center_y: f64,
    scale: f64,
}

impl Frame {
    /// 包围盒退化为一个点（或点集为空、含非有限值）时返回 `None`
    pub fn fit(points: &[Point]) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for p in points {
            let (x, y) = (f64::from(p.x), f64::from(p.y));
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let scale = (max_x - min_x).max(max_y - min_y);
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }

        Some(Self {
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
            scale,
        })
    }

    pub fn normalize(&self, p: Point) -> Vertex {
        Vertex::new(
            (f64::from(p.x) - self.center_x) / self.scale,
            (f64::from(p.y) - self.center_y) / self.scale,
        )
    }

    pub fn normalize_all(&self, points: &[Point]) -> Vec<Vertex> {
        points.iter().map(|&p| self.normalize(p)).collect()
    }
}

/// 选出起始三角形（逆时针）
///
/// 以第一个点为锚点，取离它最远的点，再取与这两点围成面积最大的点。
/// 调用前必须已排除共线情况。
pub(crate) fn initial_triangle(vertices: &[Vertex]) -> [usize; 3] {
    let anchor = vertices[0];
    let far = farthest_from(vertices, anchor);
    let third = (0..vertices.len())
        .max_by(|&i, &j| {
            let a = orient2d(anchor, vertices[far], vertices[i]).abs();
            let b = orient2d(anchor, vertices[far], vertices[j]).abs();
            a.total_cmp(&b)
        })
        .unwrap_or(0);

    if orient2d(anchor, vertices[far], vertices[third]) > 0.0 {
        [0, far, third]
    } else {
        [0, third, far]
    }
}

/// 判断所有点是否共线
///
/// 以第一个点为锚点、离它最远的点确定方向，
/// 所有点到该直线的距离都不超过 `epsilon` 时视为共线。
pub(crate) fn is_collinear(vertices: &[Vertex], epsilon: f64) -> bool {
    let Some(&anchor) = vertices.first() else {
        return true;
    };

    let far = vertices[farthest_from(vertices, anchor)];

    let length = anchor.distance_sq(far).sqrt();
    if length <= epsilon {
        return true;
    }

    vertices
        .iter()
        .all(|&p| (orient2d(anchor, far, p) / length).abs() <= epsilon)
}

fn farthest_from(vertices: &[Vertex], anchor: Vertex) -> usize {
    (0..vertices.len())
        .max_by(|&i, &j| {
            anchor
                .distance_sq(vertices[i])
                .total_cmp(&anchor.distance_sq(vertices[j]))
        })
        .unwrap_or(0)
}

/// 三角形的逆时针顶点索引，退化时返回 `None`
fn ccw_indices(tri: &[u32; 3], vertices: &[Vertex]) -> Option<[u32; 3]> {
    let [i0, i1, i2] = *tri;
    let area = orient2d(
        vertices[i0 as usize],
        vertices[i1 as usize],
        vertices[i2 as usize],
    );

    if area > 0.0 {
        Some([i0, i1, i2])
    } else if area < 0.0 {
        Some([i0, i2, i1])
    } else {
        None
    }
}

fn ccw_corners(tri: &[u32; 3], vertices: &[Vertex]) -> Option<[Vertex; 3]> {
    ccw_indices(tri, vertices).map(|t| t.map(|i| vertices[i as usize]))
}
