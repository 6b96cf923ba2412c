use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rayon::prelude::*;

use crate::config::TriangulatorConfig;
use crate::delaunay::triangle::{in_circle, orient2d, Triangle, Vertex};
use crate::delaunay::utils::{convex_hull_size, initial_triangle, is_collinear, Frame};
use crate::error::TriangulationError;
use crate::models::PointSet;

/// 执行 Delaunay 三角剖分，返回指向原始点序的三角形索引（逆时针）
///
/// 策略：
/// - 少于 3 个点：空结果
/// - 所有点共线：空结果
/// - 恰好 3 个不共线的点：一个三角形
/// - 其余情况：Bowyer-Watson 逐点插入
///
/// 重复点保留原索引，但不会被任何三角形引用。
pub fn triangulate(
    point_set: &PointSet,
    config: &TriangulatorConfig,
) -> Result<Vec<[u32; 3]>, TriangulationError> {
    let start_time = Instant::now();
    let count = point_set.count();

    if count < 3 {
        return Ok(Vec::new());
    }

    // 输出索引为 u32，无穷远顶点紧随输入点之后
    if u32::try_from(count).is_err() {
        return Err(TriangulationError::TooManyPoints { count });
    }

    if let Some(index) = point_set.first_non_finite() {
        log::warn!("point {index} has a non-finite coordinate, cannot triangulate");
        return Err(TriangulationError::NonFiniteCoordinate { index });
    }

    let Some(frame) = Frame::fit(point_set.points()) else {
        log::warn!("all {count} points are coincident, cannot triangulate");
        return Err(TriangulationError::CoincidentPoints { count });
    };
    let vertices = frame.normalize_all(point_set.points());

    if is_collinear(&vertices, config.collinear_epsilon) {
        log::debug!("{count} points are collinear, no triangle has positive area");
        return Ok(Vec::new());
    }

    if count == 3 {
        let tri = if orient2d(vertices[0], vertices[1], vertices[2]) > 0.0 {
            [0, 1, 2]
        } else {
            [0, 2, 1]
        };
        return Ok(vec![tri]);
    }

    log::trace!("triangulating {count} points");

    let first = initial_triangle(&vertices);
    let mut workspace = Workspace::new(vertices, first, config);
    let mut duplicates = 0;
    let mut flips = 0;
    for index in (0..count).filter(|i| !first.contains(i)) {
        match workspace.insert(index) {
            Insertion::Inserted { flips: n } => flips += n,
            Insertion::Skipped => duplicates += 1,
        }
    }
    flips += workspace.legalize_all();

    let (triangles, degenerate) = workspace.finish();

    log::debug!(
        "triangulated {count} points into {} triangles in {:.2?} ({duplicates} coincident points skipped, {flips} edges flipped, {degenerate} degenerate triangles discarded)",
        triangles.len(),
        start_time.elapsed(),
    );

    // 理论上，对于n个点（其中k个在凸包边界上），三角形数为2n-2-k
    if log::log_enabled!(log::Level::Trace) {
        let hull = convex_hull_size(point_set);
        let unique = count - duplicates;
        log::trace!(
            "expected about {} triangles for {unique} unique points with {hull} on the hull",
            (2 * unique).saturating_sub(2 + hull),
        );
    }

    Ok(triangles)
}

// ============================================================================
// 内部实现
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Insertion {
    Inserted { flips: usize },
    /// 与已插入的顶点重合（或无法形成合法空腔）
    Skipped,
}

/// 空腔修复动作
enum Repair {
    /// 移除一个未固定的三角形
    Shrink(usize),
    /// 把固定三角形外侧的邻居并入空腔
    Grow(Option<usize>),
}

/// Bowyer-Watson 工作区
///
/// 超级三角形用一个符号化的无穷远顶点表示：凸包的每条边都与它组成一个幽灵三角形
/// `[u, v, ∞]`（无穷远顶点总在最后），整个剖分因此覆盖全平面，每条有向边都有反向边。
/// 幽灵三角形的"外接圆"是边 `(u, v)` 左侧的开半平面。
///
/// 三角形存放在带空闲列表的槽位中；有向边 `(a, b)` 映射到以逆时针顺序拥有它的三角形，
/// 因此边 `(a, b)` 另一侧的邻居就是拥有 `(b, a)` 的三角形。
struct Workspace<'a> {
    /// 归一化后的输入顶点
    vertices: Vec<Vertex>,
    /// 无穷远顶点的索引，等于输入点数
    infinite: usize,
    triangles: Vec<Option<Triangle>>,
    free: Vec<usize>,
    edges: HashMap<(usize, usize), usize>,
    live: usize,
    config: &'a TriangulatorConfig,
}

impl<'a> Workspace<'a> {
    /// 以一个逆时针的非退化三角形及其三个幽灵三角形起步
    fn new(vertices: Vec<Vertex>, first: [usize; 3], config: &'a TriangulatorConfig) -> Self {
        let infinite = vertices.len();
        let mut workspace = Self {
            vertices,
            infinite,
            triangles: Vec::new(),
            free: Vec::new(),
            edges: HashMap::new(),
            live: 0,
            config,
        };

        let seed = Triangle::new(first);
        workspace.add(seed);
        for (a, b) in seed.edges() {
            workspace.add(Triangle::new([b, a, infinite]));
        }
        workspace
    }

    fn triangle(&self, slot: usize) -> Triangle {
        match self.triangles[slot] {
            Some(tri) => tri,
            None => unreachable!("triangle slot {slot} is not live"),
        }
    }

    fn add(&mut self, tri: Triangle) {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.triangles[slot] = Some(tri);
                slot
            }
            None => {
                self.triangles.push(Some(tri));
                self.triangles.len() - 1
            }
        };

        for edge in tri.edges() {
            self.edges.insert(edge, slot);
        }
        self.live += 1;
    }

    fn remove(&mut self, slot: usize) {
        if let Some(tri) = self.triangles[slot].take() {
            for edge in tri.edges() {
                self.edges.remove(&edge);
            }
            self.free.push(slot);
            self.live -= 1;
        }
    }

    /// 边 `(a, b)` 另一侧的三角形
    fn neighbor(&self, a: usize, b: usize) -> Option<usize> {
        self.edges.get(&(b, a)).copied()
    }

    fn is_ghost(&self, tri: &Triangle) -> bool {
        tri.v[2] == self.infinite
    }

    /// 幽灵三角形 `[u, v, ∞]` 外侧的有向面积，`p` 严格在凸包边外侧时为正
    fn ghost_side(&self, tri: &Triangle, p: Vertex) -> f64 {
        let [u, v, _] = tri.v;
        orient2d(self.vertices[u], self.vertices[v], p)
    }

    /// 判断三角形（含幽灵三角形）的外接圆是否严格包含 `p`
    fn circumcircle_contains(&self, tri: &Triangle, p: Vertex) -> bool {
        if self.is_ghost(tri) {
            self.ghost_side(tri, p) > self.config.area_epsilon
        } else {
            tri.contains_in_circumcircle(&self.vertices, p, self.config.circumcircle_epsilon)
        }
    }

    /// 判断三角形是否包含该点：实三角形含边界，幽灵三角形要求点严格在凸包外
    fn contains(&self, tri: &Triangle, p: Vertex) -> bool {
        if self.is_ghost(tri) {
            self.ghost_side(tri, p) > self.config.area_epsilon
        } else {
            tri.contains_point(&self.vertices, p, self.config.area_epsilon)
        }
    }

    /// 找出所有包含该点的三角形
    ///
    /// 点恰好落在凸包边的容差带外侧时可能找不到任何三角形，
    /// 此时退回到该点最靠外侧的那个幽灵三角形。
    fn locate(&self, p: Vertex) -> Vec<usize> {
        let contains = |(slot, tri): (usize, &Option<Triangle>)| {
            tri.as_ref()
                .filter(|t| self.contains(t, p))
                .map(|_| slot)
        };

        let seeds: Vec<usize> = if self.live > self.config.parallel_threshold {
            self.triangles
                .par_iter()
                .enumerate()
                .filter_map(contains)
                .collect()
        } else {
            self.triangles
                .iter()
                .enumerate()
                .filter_map(contains)
                .collect()
        };
        if !seeds.is_empty() {
            return seeds;
        }

        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(slot, tri)| tri.filter(|t| self.is_ghost(t)).map(|t| (slot, t)))
            .max_by(|(_, a), (_, b)| self.ghost_side(a, p).total_cmp(&self.ghost_side(b, p)))
            .map(|(slot, _)| slot)
            .into_iter()
            .collect()
    }

    /// 插入第 `index` 个顶点
    fn insert(&mut self, index: usize) -> Insertion {
        let p = self.vertices[index];
        let seeds = self.locate(p);
        if seeds.is_empty() {
            log::warn!("point {index} could not be located");
            return Insertion::Skipped;
        }

        let Some(cavity) = self.carve_cavity(p, seeds) else {
            log::trace!("point {index} could not be inserted, skipping");
            return Insertion::Skipped;
        };

        // 空腔内部若有顶点没落在边界上，说明该点与其重合
        let boundary = self.cavity_boundary(&cavity);
        let on_boundary: HashSet<usize> = boundary.iter().map(|&(a, _)| a).collect();
        let orphaned = cavity
            .iter()
            .flat_map(|&slot| self.triangle(slot).v)
            .any(|v| !on_boundary.contains(&v));
        if orphaned {
            log::trace!("point {index} coincides with an inserted vertex, skipping");
            return Insertion::Skipped;
        }

        for slot in cavity {
            self.remove(slot);
        }

        let mut pending = Vec::with_capacity(boundary.len() * 3);
        for (a, b) in boundary {
            let tri = if a == self.infinite {
                Triangle::new([b, index, a])
            } else if b == self.infinite {
                Triangle::new([index, a, b])
            } else {
                Triangle::new([a, b, index])
            };
            if !self.is_ghost(&tri) {
                pending.extend(tri.edges());
            }
            self.add(tri);
        }

        let flips = self.legalize(pending);
        Insertion::Inserted { flips }
    }

    /// 计算插入点 `p` 需要移除的三角形
    ///
    /// 1. 以包含 `p` 的三角形为种子
    /// 2. 跨越公共边扩展到外接圆严格包含 `p` 的三角形
    /// 3. 修复：每条实边界边都必须与 `p` 构成正向三角形，
    ///    否则收缩未固定的三角形，或把固定三角形的外侧邻居并入
    ///
    /// 收缩会留下外接圆包含 `p` 的三角形，由插入后的翻边修正。
    fn carve_cavity(&self, p: Vertex, seeds: Vec<usize>) -> Option<Vec<usize>> {
        let mut in_cavity: HashSet<usize> = seeds.iter().copied().collect();
        let mut pinned = in_cavity.clone();
        let mut cavity = seeds.clone();
        let mut visited = HashSet::new();

        let mut stack = seeds;
        while let Some(slot) = stack.pop() {
            for (a, b) in self.triangle(slot).edges() {
                let Some(nb) = self.neighbor(a, b) else {
                    continue;
                };
                if in_cavity.contains(&nb) || !visited.insert(nb) {
                    continue;
                }
                if self.circumcircle_contains(&self.triangle(nb), p) {
                    in_cavity.insert(nb);
                    cavity.push(nb);
                    stack.push(nb);
                }
            }
        }

        loop {
            match self.find_repair(p, &cavity, &in_cavity, &pinned) {
                None => break,
                Some(Repair::Shrink(slot)) => {
                    in_cavity.remove(&slot);
                    cavity.retain(|&s| s != slot);
                }
                Some(Repair::Grow(Some(nb))) => {
                    in_cavity.insert(nb);
                    pinned.insert(nb);
                    cavity.push(nb);
                }
                Some(Repair::Grow(None)) => return None,
            }
        }

        Some(cavity)
    }

    fn find_repair(
        &self,
        p: Vertex,
        cavity: &[usize],
        in_cavity: &HashSet<usize>,
        pinned: &HashSet<usize>,
    ) -> Option<Repair> {
        for &slot in cavity {
            for (a, b) in self.triangle(slot).edges() {
                // 与无穷远顶点相连的边生成幽灵三角形，没有面积要求
                if a == self.infinite || b == self.infinite {
                    continue;
                }
                let nb = self.neighbor(a, b);
                if nb.is_some_and(|nb| in_cavity.contains(&nb)) {
                    continue;
                }
                if orient2d(self.vertices[a], self.vertices[b], p) > self.config.area_epsilon {
                    continue;
                }

                return Some(if pinned.contains(&slot) {
                    Repair::Grow(nb)
                } else {
                    Repair::Shrink(slot)
                });
            }
        }

        None
    }

    /// 空腔边界：只属于一个被移除三角形的有向边
    fn cavity_boundary(&self, cavity: &[usize]) -> Vec<(usize, usize)> {
        let members: HashSet<usize> = cavity.iter().copied().collect();
        cavity
            .iter()
            .flat_map(|&slot| self.triangle(slot).edges())
            .filter(|&(a, b)| {
                self.neighbor(a, b)
                    .map_or(true, |nb| !members.contains(&nb))
            })
            .collect()
    }

    /// Lawson 翻边：逐条检查待定边，对面顶点落在外接圆内时翻转，
    /// 并把四边形的四条外边重新放入待定栈。返回翻边次数。
    fn legalize(&mut self, mut pending: Vec<(usize, usize)>) -> usize {
        let circumcircle_epsilon = self.config.circumcircle_epsilon;
        let area_epsilon = self.config.area_epsilon;
        let mut flips = 0;

        while let Some((a, b)) = pending.pop() {
            // 边可能已被先前的翻边替换
            let Some(&slot) = self.edges.get(&(a, b)) else {
                continue;
            };
            let Some(nb) = self.neighbor(a, b) else {
                continue;
            };
            let (tri, other) = (self.triangle(slot), self.triangle(nb));
            if self.is_ghost(&tri) || self.is_ghost(&other) {
                continue;
            }
            let (Some(c), Some(d)) = (tri.opposite(a, b), other.opposite(b, a)) else {
                continue;
            };

            let [va, vb, vc, vd] = [a, b, c, d].map(|i| self.vertices[i]);
            if in_circle(va, vb, vc, vd) <= circumcircle_epsilon {
                continue;
            }

            // 四边形 a-d-b-c 必须是凸的，翻出的两个三角形才有正面积
            if orient2d(vc, va, vd) <= area_epsilon || orient2d(vd, vb, vc) <= area_epsilon {
                continue;
            }

            self.remove(slot);
            self.remove(nb);
            self.add(Triangle::new([c, a, d]));
            self.add(Triangle::new([d, b, c]));
            pending.extend([(a, d), (d, b), (b, c), (c, a)]);
            flips += 1;
        }

        flips
    }

    /// 对所有实三角形的边再做一轮翻边，保证每条内部边都局部 Delaunay
    fn legalize_all(&mut self) -> usize {
        let pending: Vec<(usize, usize)> = self
            .triangles
            .iter()
            .flatten()
            .filter(|tri| !self.is_ghost(tri))
            .flat_map(|tri| tri.edges())
            .collect();
        self.legalize(pending)
    }

    /// 移除幽灵三角形与退化三角形，返回结果和丢弃的退化三角形数量
    fn finish(self) -> (Vec<[u32; 3]>, usize) {
        let mut degenerate = 0;
        let mut result = Vec::with_capacity(self.live);

        for tri in self.triangles.iter().flatten() {
            if self.is_ghost(tri) {
                continue;
            }
            if tri.doubled_area(&self.vertices) <= self.config.area_epsilon {
                degenerate += 1;
                continue;
            }

            // 顶点数已检查过不超过 u32::MAX
            let [a, b, c] = tri.v;
            result.push([a as u32, b as u32, c as u32]);
        }

        (result, degenerate)
    }
}
