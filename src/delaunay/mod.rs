//! Delaunay 三角剖分模块
//!
//! 自包含的 Bowyer-Watson 实现，不依赖外部几何库。
//!
//! # 架构概览
//!
//! ```text
//! 输入点集 (PointSet, f32)
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ 归一化到 [-0.5,0.5]² │  ── 提升为 f64，平移并缩放
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ 共线 / 重合检测      │  ── 共线返回空结果，全部重合报错
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ 无穷远顶点 + 逐点插入 │  ── 挖空腔，连接空腔边界，Lawson 翻边
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ 移除幽灵与退化三角形  │
//! └──────────┬──────────┘
//!            │
//!            ▼
//!   三角形索引 (Vec<[u32; 3]>，逆时针)
//! ```
//!
//! # 数值策略
//!
//! 所有谓词在归一化后的 `f64` 坐标上计算，容差见 [`TriangulatorConfig`][crate::TriangulatorConfig]。
//! 外接圆测试采用保守判定：距离圆周不超过 ε 的点视为圆外，
//! 共圆点集（正方形、网格）因此不会被反复重剖分。
//!
//! 超级三角形的顶点取在无穷远处：凸包外侧的每条边都挂一个幽灵三角形，
//! 因此任何细长的凸包三角形都不会因为外接圆碰到有限的超级顶点而丢失。
//!
//! # 模块结构
//!
//! - `delaunay`: 三角剖分算法实现
//! - `triangle`: 几何谓词与索引三角形
//! - `utils`: 归一化、初始三角形、验证工具

#[allow(clippy::module_inception)]
mod delaunay;
mod triangle;
mod utils;


// ============================================================================
// 公开 API
// ============================================================================

/// Delaunay 三角剖分函数
///
/// 返回指向原始点序的三角形索引。
pub use delaunay::triangulate;

/// 结果验证函数
///
/// 验证三角网格是否满足 Delaunay 性质、是否为合法的平面剖分。
pub use utils::{convex_hull_size, is_planar, validate_delaunay};
