//! 三角剖分入口
//!
//! [`Triangulator`] 只持有配置，不保存任何可变状态，可以在线程间自由共享。
//! 边界层拿到原始字节后，既可以分步调用编解码与 [`Triangulator::triangulate`]，
//! 也可以直接使用 [`Triangulator::triangulate_bytes`] 走完整流程。

use std::time::Instant;

use rayon::prelude::*;

use crate::codec;
use crate::config::TriangulatorConfig;
use crate::delaunay;
use crate::error::TriangulationError;
use crate::models::{PointSet, TriangleMesh};

/// Delaunay 三角剖分器
#[derive(Debug, Clone, Default)]
pub struct Triangulator {
    config: TriangulatorConfig,
}

impl Triangulator {
    /// 使用自定义配置创建，配置非法时返回错误
    pub fn new(config: TriangulatorConfig) -> Result<Self, TriangulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TriangulatorConfig {
        &self.config
    }

    /// 对点集做三角剖分
    ///
    /// 少于 3 个点时直接返回空网格，不进入引擎。
    /// 所有点重合或坐标非有限值时返回 [`TriangulationError`]，
    /// 不会被降级为空网格。
    ///
    /// # 示例
    /// ```
    /// use triangulator::{PointSet, Triangulator};
    ///
    /// let ps = PointSet::from_coords(&[[1.0, 2.0], [1.0, 6.0], [4.0, 4.0]]);
    /// let mesh = Triangulator::default().triangulate(ps).unwrap();
    /// assert_eq!(mesh.triangle_count(), 1);
    /// ```
    pub fn triangulate(&self, point_set: PointSet) -> Result<TriangleMesh, TriangulationError> {
        if point_set.count() < 3 {
            log::trace!("{} points, nothing to triangulate", point_set.count());
            return Ok(TriangleMesh::empty(point_set));
        }

        let triangles = delaunay::triangulate(&point_set, &self.config)?;
        Ok(TriangleMesh::new(point_set, triangles))
    }

    /// 完整流程：解码点集 → 三角剖分 → 编码网格
    ///
    /// 三类失败通过 [`Error::kind`][crate::Error::kind] 区分，
    /// 调用方据此映射到自己的状态码。
    pub fn triangulate_bytes(&self, bytes: &[u8]) -> crate::Result<Vec<u8>> {
        let start_time = Instant::now();

        let point_set = codec::decode_point_set(bytes).inspect_err(|e| {
            log::warn!("rejecting point set payload of {} bytes: {e}", bytes.len());
        })?;
        let mesh = self.triangulate(point_set)?;
        let encoded = codec::encode_triangle_mesh(&mesh)?;

        log::debug!(
            "triangulated payload: {} bytes in, {} triangles, {} bytes out, {:.2?}",
            bytes.len(),
            mesh.triangle_count(),
            encoded.len(),
            start_time.elapsed(),
        );

        Ok(encoded)
    }

    /// 并行处理多个互相独立的点集，结果顺序与输入一致
    pub fn triangulate_batch(
        &self,
        point_sets: Vec<PointSet>,
    ) -> Vec<Result<TriangleMesh, TriangulationError>> {
        log::debug!("triangulating a batch of {} point sets", point_sets.len());
        point_sets
            .into_par_iter()
            .map(|ps| self.triangulate(ps))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_triangle_mesh, encode_point_set};
    use crate::error::FailureKind;

    #[test]
    fn test_small_inputs_are_empty() {
        let triangulator = Triangulator::default();
        for coords in [&[][..], &[[1.0, 1.0]][..], &[[1.0, 1.0], [2.0, 2.0]][..]] {
            let ps = PointSet::from_coords(coords);
            let mesh = triangulator.triangulate(ps.clone()).unwrap();
            assert_eq!(mesh.triangle_count(), 0);
            assert_eq!(mesh.point_set(), &ps);
        }

        // 少于 3 个点时不检查坐标
        let ps = PointSet::from_coords(&[[f32::NAN, 0.0]]);
        assert!(Triangulator::default().triangulate(ps).unwrap().is_empty());
    }

    #[test]
    fn test_three_points() {
        let ps = PointSet::from_coords(&[[1.0, 2.0], [1.0, 6.0], [4.0, 4.0]]);
        let mesh = Triangulator::default().triangulate(ps).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        let mut tri = mesh.triangles()[0];
        tri.sort_unstable();
        assert_eq!(tri, [0, 1, 2]);
    }

    #[test]
    fn test_coincident_is_not_an_empty_mesh() {
        let ps = PointSet::from_coords(&[[1.0, 1.0], [1.0, 1.0], [1.0, 1.0], [1.0, 1.0]]);
        let err = Triangulator::default().triangulate(ps).unwrap_err();
        assert_eq!(err, TriangulationError::CoincidentPoints { count: 4 });
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TriangulatorConfig::default().with_circumcircle_epsilon(-1.0);
        assert!(Triangulator::new(config).is_err());

        let config = TriangulatorConfig::default().with_parallel_threshold(16);
        let triangulator = Triangulator::new(config).unwrap();
        assert_eq!(triangulator.config().parallel_threshold, 16);
    }

    #[test]
    fn test_triangulate_bytes() {
        let ps = PointSet::from_coords(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [1.0, 0.5]]);
        let input = encode_point_set(&ps).unwrap();

        let output = Triangulator::default().triangulate_bytes(&input).unwrap();
        let mesh = decode_triangle_mesh(&output).unwrap();
        assert_eq!(mesh.point_set(), &ps);
        assert_eq!(mesh.triangle_count(), 2 * 5 - 2 - 4);
    }

    #[test]
    fn test_failure_kinds_are_distinct() {
        let triangulator = Triangulator::default();

        let err = triangulator.triangulate_bytes(&[1, 2, 3, 4, 5]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedInput);
        assert_eq!(err.kind().code(), "INVALID_FORMAT");

        let ps = PointSet::from_coords(&[[3.0, 3.0], [3.0, 3.0], [3.0, 3.0]]);
        let input = encode_point_set(&ps).unwrap();
        let err = triangulator.triangulate_bytes(&input).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Triangulation);
        assert_eq!(err.kind().code(), "TRIANGULATION_FAILED");

        // count = 0 是合法的空结果，不是失败
        let output = triangulator.triangulate_bytes(&[0, 0, 0, 0]).unwrap();
        assert_eq!(output, vec![0; 8]);
    }

    #[test]
    fn test_batch_preserves_order() {
        let batch = vec![
            PointSet::from_coords(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            PointSet::from_coords(&[[5.0, 5.0], [5.0, 5.0], [5.0, 5.0]]),
            PointSet::from_coords(&[[0.0, 0.0], [1.0, 0.0]]),
            PointSet::from_coords(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        ];

        let results = Triangulator::default().triangulate_batch(batch);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().triangle_count(), 1);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().triangle_count(), 0);
        assert_eq!(results[3].as_ref().unwrap().triangle_count(), 2);
    }
}
