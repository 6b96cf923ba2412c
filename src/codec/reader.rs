//! 带边界检查的小端字节读取器

use crate::error::DecodeError;

/// 顺序读取字节切片，越界时返回 [`DecodeError`] 而不是 panic
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// 读取 `len` 字节
    pub(crate) fn take(&mut self, len: usize, section: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                section,
                needed: self.position + len,
                available: self.bytes.len(),
            });
        }

        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub(crate) fn read_u32(&mut self, section: &'static str) -> Result<u32, DecodeError> {
        self.take(4, section).map(le_u32)
    }

    /// 读取 `count` 条定长记录；先检查长度再切片，不会按声明的数量预分配
    pub(crate) fn take_records(
        &mut self,
        count: u32,
        record_size: usize,
        section: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        let len = (count as usize)
            .checked_mul(record_size)
            .ok_or(DecodeError::LengthOverflow { count })?;
        self.take(len, section)
    }
}

/// 调用方保证 `bytes.len() == 4`
pub(crate) fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub(crate) fn le_f32(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
