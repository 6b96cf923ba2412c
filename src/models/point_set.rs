use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 二维点，线格式中每个分量为 32 位浮点数
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 两个分量都是有限值
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// 二维点集
///
/// 点的数量由内部向量长度决定，因此 `count() == points().len()` 恒成立。
/// 构造后不可变，点的顺序即三角形索引所引用的顺序。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 从 `[x, y]` 坐标数组构建点集
    ///
    /// # 示例
    /// ```
    /// use triangulator::PointSet;
    ///
    /// let ps = PointSet::from_coords(&[[1.0, 2.0], [1.0, 6.0], [4.0, 4.0]]);
    /// assert_eq!(ps.count(), 3);
    /// ```
    pub fn from_coords(coords: &[[f32; 2]]) -> Self {
        Self {
            points: coords.iter().copied().map(Point::from).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// 以 `[x0, y0, x1, y1, ...]` 形式零拷贝地查看所有坐标
    pub fn as_flat_coords(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }

    /// 第一个非有限坐标所在的点索引
    pub fn first_non_finite(&self) -> Option<usize> {
        self.points.iter().position(|p| !p.is_finite())
    }

    /// 计算包围盒，空点集返回 `None`
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };

        for p in &self.points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }

        Some(bounds)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}
