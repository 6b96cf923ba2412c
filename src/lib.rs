#![warn(clippy::all, rust_2018_idioms)]

//! 二维 Delaunay 三角剖分核心
//!
//! - [`codec`]: 点集与三角网格的小端二进制格式
//! - [`delaunay`]: Bowyer-Watson 三角剖分引擎与验证工具
//! - [`Triangulator`]: 对外入口，处理小输入策略并串联完整流程

pub mod codec;
mod config;
pub mod delaunay;
mod error;
mod models;
mod triangulator;

pub use codec::{decode_point_set, decode_triangle_mesh, encode_point_set, encode_triangle_mesh};
pub use config::TriangulatorConfig;
pub use error::{DecodeError, EncodeError, Error, FailureKind, Result, TriangulationError};
pub use models::{Bounds, MeshDefect, Point, PointSet, TriangleMesh};
pub use triangulator::Triangulator;
