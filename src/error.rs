//! 错误类型
//!
//! 三类失败互相独立，边界层只需根据 [`FailureKind`] 决定对外行为：
//!
//! | 类型 | 含义 | 标签 |
//! |---|---|---|
//! | [`DecodeError`] | 输入字节被截断或结构非法 | `INVALID_FORMAT` |
//! | [`EncodeError`] | 索引越界或坐标非有限值 | `ENCODE_FAILED` |
//! | [`TriangulationError`] | 无法计算有效的三角网格 | `TRIANGULATION_FAILED` |

use thiserror::Error;

/// 顶层结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// 解码失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// 缓冲区长度不足
    #[error("truncated {section}: need {needed} bytes, got {available}")]
    Truncated {
        /// 正在解码的段落
        section: &'static str,
        needed: usize,
        available: usize,
    },

    /// 声明的数量换算成字节数时溢出
    #[error("declared count {count} overflows the addressable length")]
    LengthOverflow { count: u32 },
}

/// 编码失败，失败时不会返回任何部分字节
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("triangle {triangle} references point {index}, but the point set has {count} points")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        count: usize,
    },

    #[error("{count} points do not fit a u32 count")]
    TooManyPoints { count: usize },

    #[error("{count} triangles do not fit a u32 count")]
    TooManyTriangles { count: usize },
}

/// 三角剖分失败
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriangulationError {
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// 所有点重合，无法构造初始三角形
    #[error("all {count} points are coincident")]
    CoincidentPoints { count: usize },

    /// 点数超出 `u32` 索引范围
    #[error("{count} points cannot be indexed with u32")]
    TooManyPoints { count: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TriangulationError {
    /// 创建配置错误
    #[must_use]
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }
}

/// 失败分类，对应边界层的状态码映射
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// 输入非法（例如 400）
    MalformedInput,
    /// 结果无法编码（例如 500）
    Encode,
    /// 计算失败（例如 500）
    Triangulation,
}

impl FailureKind {
    /// 稳定的字符串标签
    pub const fn code(self) -> &'static str {
        match self {
            Self::MalformedInput => "INVALID_FORMAT",
            Self::Encode => "ENCODE_FAILED",
            Self::Triangulation => "TRIANGULATION_FAILED",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// 顶层错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),
}

impl Error {
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Decode(_) => FailureKind::MalformedInput,
            Self::Encode(_) => FailureKind::Encode,
            Self::Triangulation(_) => FailureKind::Triangulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::Truncated {
            section: "point set",
            needed: 28,
            available: 5,
        };
        assert!(format!("{err}").contains("28"));

        let err = EncodeError::IndexOutOfRange {
            triangle: 0,
            index: 3,
            count: 3,
        };
        assert!(format!("{err}").contains("point 3"));

        let err = TriangulationError::invalid_config("bad threshold");
        assert!(format!("{err}").contains("bad threshold"));
    }

    #[test]
    fn test_kind_tags() {
        let decode: Error = DecodeError::LengthOverflow { count: 7 }.into();
        let encode: Error = EncodeError::NonFiniteCoordinate { index: 0 }.into();
        let tri: Error = TriangulationError::CoincidentPoints { count: 3 }.into();

        assert_eq!(decode.kind(), FailureKind::MalformedInput);
        assert_eq!(encode.kind(), FailureKind::Encode);
        assert_eq!(tri.kind(), FailureKind::Triangulation);

        assert_eq!(decode.kind().code(), "INVALID_FORMAT");
        assert_eq!(tri.kind().to_string(), "TRIANGULATION_FAILED");
        assert_ne!(decode.kind(), tri.kind());
    }
}
