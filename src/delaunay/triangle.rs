//! 几何谓词与索引三角形
//!
//! 坐标在进入引擎前已提升为 `f64` 并归一化，因此这里的容差都是绝对值。

/// 引擎内部使用的高精度顶点
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Vertex) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// 有向面积的两倍，`a, b, c` 逆时针时为正
pub(crate) fn orient2d(a: Vertex, b: Vertex, c: Vertex) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// 外接圆行列式
///
/// `a, b, c` 逆时针时，`p` 在外接圆内为正、圆外为负、圆上为零。
/// 使用相对 `p` 的坐标减少数值误差。
pub(crate) fn in_circle(a: Vertex, b: Vertex, c: Vertex, p: Vertex) -> f64 {
    let adx = a.x - p.x;
    let ady = a.y - p.y;
    let bdx = b.x - p.x;
    let bdy = b.y - p.y;
    let cdx = c.x - p.x;
    let cdy = c.y - p.y;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    a_lift * (bdx * cdy - cdx * bdy) + b_lift * (cdx * ady - adx * cdy)
        + c_lift * (adx * bdy - bdx * ady)
}

/// 索引三角形，顶点按逆时针存储
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Triangle {
    pub v: [usize; 3],
}

impl Triangle {
    pub fn new(v: [usize; 3]) -> Self {
        Self { v }
    }

    /// 三条有向边 `(v0, v1)`, `(v1, v2)`, `(v2, v0)`
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }

    pub fn corners(&self, vertices: &[Vertex]) -> [Vertex; 3] {
        [vertices[self.v[0]], vertices[self.v[1]], vertices[self.v[2]]]
    }

    /// 判断点是否严格位于外接圆内超过 `epsilon`
    ///
    /// 距离圆周不超过 `epsilon` 的点视为在圆外，避免共圆点集反复重剖分。
    pub fn contains_in_circumcircle(&self, vertices: &[Vertex], p: Vertex, epsilon: f64) -> bool {
        let [a, b, c] = self.corners(vertices);
        in_circle(a, b, c, p) > epsilon
    }

    /// 判断点是否在三角形内或边上（容差 `epsilon`）
    pub fn contains_point(&self, vertices: &[Vertex], p: Vertex, epsilon: f64) -> bool {
        let [a, b, c] = self.corners(vertices);
        orient2d(a, b, p) >= -epsilon && orient2d(b, c, p) >= -epsilon && orient2d(c, a, p) >= -epsilon
    }

    /// 有向面积的两倍
    pub fn doubled_area(&self, vertices: &[Vertex]) -> f64 {
        let [a, b, c] = self.corners(vertices);
        orient2d(a, b, c)
    }

    /// 有向边 `(a, b)` 属于该三角形时，返回对面的顶点
    pub fn opposite(&self, a: usize, b: usize) -> Option<usize> {
        (0..3)
            .find(|&i| self.v[i] == a && self.v[(i + 1) % 3] == b)
            .map(|i| self.v[(i + 2) % 3])
    }
}
