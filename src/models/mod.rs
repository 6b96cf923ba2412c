//! 数据模型
//!
//! - [`PointSet`][]: 二维点集，三角剖分的输入
//! - [`TriangleMesh`][]: 三角网格，持有其索引的点集
//!
//! 两者构造后均不可变。

mod point_set;
mod triangle_mesh;

pub use point_set::{Bounds, Point, PointSet};
pub use triangle_mesh::{MeshDefect, TriangleMesh};
