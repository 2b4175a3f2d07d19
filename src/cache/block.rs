//! 缓存块结构
//!
//! 一个缓存块覆盖某个驱动器上连续且按 `SPAN` 对齐的一段扇区。
//! 块在缓存池创建时一次性构造，之后只会被重新打标签，不会单独分配或释放。

use crate::consts::{Drive, Sector, SECTOR_SIZE};

/// 缓存块
///
/// # 字段说明
///
/// - `drive`: 当前标签所属驱动器，`None` 表示未分配
/// - `start`: 起始扇区，始终是 `SPAN` 的整数倍
/// - `buffer`: `SPAN` 个扇区的数据
/// - `valid`: 数据是否为标签范围的完整、最新映像
pub struct CacheBlock<const SPAN: usize> {
    drive: Option<Drive>,
    start: Sector,
    buffer: [[u8; SECTOR_SIZE]; SPAN],
    valid: bool,
}

impl<const SPAN: usize> CacheBlock<SPAN> {
    /// 空块
    pub const EMPTY: Self = Self {
        drive: None,
        start: 0,
        buffer: [[0u8; SECTOR_SIZE]; SPAN],
        valid: false,
    };

    /// 是否命中 `(drive, start)`
    #[inline]
    pub fn matches(&self, drive: Drive, start: Sector) -> bool {
        self.valid && self.drive == Some(drive) && self.start == start
    }

    /// 数据是否有效
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// 当前标签，块无效时返回 `None`
    pub fn tag(&self) -> Option<(Drive, Sector)> {
        match (self.valid, self.drive) {
            (true, Some(drive)) => Some((drive, self.start)),
            _ => None,
        }
    }

    /// 使块无效并解除标签
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.drive = None;
    }

    /// 打上新标签并标记为有效
    ///
    /// 调用前 `buffer` 必须已经是 `(drive, start)` 的完整映像。
    pub fn assign(&mut self, drive: Drive, start: Sector) {
        debug_assert_eq!(start % SPAN as u64, 0, "cache block start must be span aligned");
        self.drive = Some(drive);
        self.start = start;
        self.valid = true;
    }

    /// 整块数据
    pub fn data(&self) -> &[u8] {
        self.buffer.as_flattened()
    }

    /// 整块数据（可变）
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.buffer.as_flattened_mut()
    }

    /// 块内从 `offset` 扇区开始的 `count` 个扇区
    pub fn sectors(&self, offset: usize, count: usize) -> &[u8] {
        &self.data()[offset * SECTOR_SIZE..(offset + count) * SECTOR_SIZE]
    }

    /// 块内从 `offset` 扇区开始的 `count` 个扇区（可变）
    pub fn sectors_mut(&mut self, offset: usize, count: usize) -> &mut [u8] {
        &mut self.data_mut()[offset * SECTOR_SIZE..(offset + count) * SECTOR_SIZE]
    }
}

impl<const SPAN: usize> core::fmt::Debug for CacheBlock<SPAN> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheBlock")
            .field("drive", &self.drive)
            .field("start", &self.start)
            .field("span", &SPAN)
            .field("valid", &self.valid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block() {
        let block = CacheBlock::<4>::EMPTY;
        assert!(!block.is_valid());
        assert_eq!(block.tag(), None);
        assert!(!block.matches(0, 0));
        assert_eq!(block.data().len(), 4 * SECTOR_SIZE);
    }

    #[test]
    fn test_assign_and_invalidate() {
        let mut block = CacheBlock::<4>::EMPTY;

        block.assign(1, 8);
        assert!(block.is_valid());
        assert_eq!(block.tag(), Some((1, 8)));
        assert!(block.matches(1, 8));
        assert!(!block.matches(0, 8));
        assert!(!block.matches(1, 4));

        block.invalidate();
        assert!(!block.is_valid());
        assert_eq!(block.tag(), None);
        assert!(!block.matches(1, 8));
    }

    #[test]
    fn test_sector_slices() {
        let mut block = CacheBlock::<4>::EMPTY;
        block.sectors_mut(2, 1).fill(0x5A);

        assert!(block.sectors(0, 2).iter().all(|&b| b == 0));
        assert!(block.sectors(2, 1).iter().all(|&b| b == 0x5A));
        assert_eq!(block.data()[2 * SECTOR_SIZE], 0x5A);
        assert_eq!(block.sectors(1, 3).len(), 3 * SECTOR_SIZE);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_unaligned_assign_panics() {
        let mut block = CacheBlock::<4>::EMPTY;
        block.assign(0, 6);
    }
}
