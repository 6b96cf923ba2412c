//! 二进制编解码模块
//!
//! 所有整数与浮点数均为小端序。
//!
//! ```text
//! PointSet:
//! ┌───────────┬──────────┬──────────┬─────┐
//! │ u32 count │ f32 x₀   │ f32 y₀   │ ... │   count × 8 字节
//! └───────────┴──────────┴──────────┴─────┘
//!
//! TriangleMesh:
//! ┌────────────────┬─────────────────────┬───────────────────────┬─────┐
//! │ PointSet 字节  │ u32 triangle_count  │ u32 i₀ │ u32 i₁ │ u32 i₂│ ... │
//! └────────────────┴─────────────────────┴───────────────────────┴─────┘
//! ```
//!
//! 解码时超出 `count` 所需长度的尾部字节会被忽略；
//! 编码失败时不返回任何部分字节。

mod reader;


use crate::error::{DecodeError, EncodeError};
use crate::models::{Point, PointSet, TriangleMesh};
use reader::ByteReader;

// ============================================================================
// 常量
// ============================================================================

/// 数量字段的字节数
pub const COUNT_SIZE: usize = 4;

/// 每个点的字节数（两个 f32）
pub const POINT_SIZE: usize = 8;

/// 每个三角形的字节数（三个 u32）
pub const TRIANGLE_SIZE: usize = 12;

// ============================================================================
// 公开 API
// ============================================================================

/// 将点集编码为字节
///
/// 任意坐标不是有限值时失败。
pub fn encode_point_set(point_set: &PointSet) -> Result<Vec<u8>, EncodeError> {
    let count = point_count_u32(point_set)?;
    if let Some(index) = point_set.first_non_finite() {
        return Err(EncodeError::NonFiniteCoordinate { index });
    }

    let mut out = Vec::with_capacity(COUNT_SIZE + point_set.count() * POINT_SIZE);
    out.extend_from_slice(&count.to_le_bytes());
    write_points(&mut out, point_set.points());
    Ok(out)
}

/// 从字节解码点集
///
/// 缓冲区短于 `4 + count * 8` 时失败。
pub fn decode_point_set(bytes: &[u8]) -> Result<PointSet, DecodeError> {
    read_point_set(&mut ByteReader::new(bytes))
}

/// 将三角网格编码为字节
///
/// 先校验所有索引都小于点数；任何一个越界则整体失败，
/// 点集部分也不会输出。
pub fn encode_triangle_mesh(mesh: &TriangleMesh) -> Result<Vec<u8>, EncodeError> {
    let point_set = mesh.point_set();
    let count = point_set.count();

    for (triangle, tri) in mesh.triangles().iter().enumerate() {
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= count) {
            return Err(EncodeError::IndexOutOfRange {
                triangle,
                index,
                count,
            });
        }
    }

    let triangle_count =
        u32::try_from(mesh.triangle_count()).map_err(|_| EncodeError::TooManyTriangles {
            count: mesh.triangle_count(),
        })?;

    let mut out = encode_point_set(point_set)?;
    out.reserve(COUNT_SIZE + mesh.triangle_count() * TRIANGLE_SIZE);
    out.extend_from_slice(&triangle_count.to_le_bytes());
    for tri in mesh.triangles() {
        for index in tri {
            out.extend_from_slice(&index.to_le_bytes());
        }
    }

    Ok(out)
}

/// 从字节解码三角网格
///
/// 先用内嵌点集自身的 `count` 确定其长度，再接着读取三角形段。
/// 截断错误中的字节数都相对整个缓冲区。
/// 索引不做范围校验，与线格式内容保持一致。
pub fn decode_triangle_mesh(bytes: &[u8]) -> Result<TriangleMesh, DecodeError> {
    let mut cursor = ByteReader::new(bytes);
    let point_set = read_point_set(&mut cursor)?;

    let triangle_count = cursor.read_u32("triangle count")?;
    let body = cursor.take_records(triangle_count, TRIANGLE_SIZE, "triangles")?;

    let triangles = body
        .chunks_exact(TRIANGLE_SIZE)
        .map(|chunk| {
            [
                reader::le_u32(&chunk[0..4]),
                reader::le_u32(&chunk[4..8]),
                reader::le_u32(&chunk[8..12]),
            ]
        })
        .collect();

    Ok(TriangleMesh::new(point_set, triangles))
}

/// 点集编码后的字节长度
pub fn encoded_point_set_len(point_set: &PointSet) -> usize {
    COUNT_SIZE + point_set.count() * POINT_SIZE
}

// ============================================================================
// 内部辅助函数
// ============================================================================

/// 从游标当前位置读取一个点集
fn read_point_set(cursor: &mut ByteReader<'_>) -> Result<PointSet, DecodeError> {
    let count = cursor.read_u32("point count")?;
    let body = cursor.take_records(count, POINT_SIZE, "points")?;

    let points = body
        .chunks_exact(POINT_SIZE)
        .map(|chunk| Point::new(reader::le_f32(&chunk[0..4]), reader::le_f32(&chunk[4..8])))
        .collect();

    Ok(PointSet::new(points))
}

fn point_count_u32(point_set: &PointSet) -> Result<u32, EncodeError> {
    u32::try_from(point_set.count()).map_err(|_| EncodeError::TooManyPoints {
        count: point_set.count(),
    })
}

/// 小端平台上 `Point` 的内存布局与线格式一致，可以整体拷贝
#[cfg(target_endian = "little")]
fn write_points(out: &mut Vec<u8>, points: &[Point]) {
    out.extend_from_slice(bytemuck::cast_slice(points));
}

#[cfg(not(target_endian = "little"))]
fn write_points(out: &mut Vec<u8>, points: &[Point]) {
    for p in points {
        out.extend_from_slice(&p.x.to_le_bytes());
        out.extend_from_slice(&p.y.to_le_bytes());
    }
}
