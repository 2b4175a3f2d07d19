//! 块存储接口
//!
//! 对应 FatFs 的 `diskio` 层（`disk_read` / `disk_write` / `disk_status` /
//! `disk_initialize` / `disk_ioctl`）。缓存本身不做重试，所有错误都由实现者上报。

use crate::consts::{Drive, Sector};
use crate::error::Result;
use bitflags::bitflags;

bitflags! {
    /// 磁盘状态标志
    ///
    /// 对应 FatFs 的 `STA_*` 常量
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DiskStatus: u8 {
        /// 驱动器未初始化
        const NOINIT  = 0x01;
        /// 驱动器中无介质
        const NODISK  = 0x02;
        /// 介质写保护
        const PROTECT = 0x04;
    }
}

impl DiskStatus {
    /// 是否可以进行 I/O
    pub fn is_ready(&self) -> bool {
        !self.intersects(DiskStatus::NOINIT | DiskStatus::NODISK)
    }
}

/// 块存储接口
///
/// 以扇区为单位的原始读写，不带缓存。
///
/// # 示例
///
/// ```rust,ignore
/// use diskcache_core::{BlockStore, Result};
///
/// struct SdCard { /* ... */ }
///
/// impl BlockStore for SdCard {
///     fn read(&mut self, drive: u8, buf: &mut [u8], sector: u64, count: u32) -> Result<()> {
///         // SDIO 读取
///         Ok(())
///     }
///
///     fn write(&mut self, drive: u8, buf: &[u8], sector: u64, count: u32) -> Result<()> {
///         // SDIO 写入
///         Ok(())
///     }
/// }
/// ```
pub trait BlockStore {
    /// 读取扇区
    ///
    /// # 参数
    ///
    /// * `drive` - 驱动器号
    /// * `buf` - 目标缓冲区（大小至少为 count * SECTOR_SIZE）
    /// * `sector` - 起始扇区
    /// * `count` - 扇区数
    fn read(&mut self, drive: Drive, buf: &mut [u8], sector: Sector, count: u32) -> Result<()>;

    /// 写入扇区
    ///
    /// # 参数
    ///
    /// * `drive` - 驱动器号
    /// * `buf` - 源缓冲区（大小至少为 count * SECTOR_SIZE）
    /// * `sector` - 起始扇区
    /// * `count` - 扇区数
    fn write(&mut self, drive: Drive, buf: &[u8], sector: Sector, count: u32) -> Result<()>;

    /// 查询驱动器状态
    fn status(&self, _drive: Drive) -> DiskStatus {
        DiskStatus::empty()
    }

    /// 初始化驱动器，返回初始化后的状态
    fn initialize(&mut self, drive: Drive) -> Result<DiskStatus> {
        Ok(self.status(drive))
    }

    /// 驱动器总扇区数
    ///
    /// 返回 `None` 表示未知，此时不做越界检查。
    fn sector_count(&self, _drive: Drive) -> Option<u64> {
        None
    }

    /// 把设备内部的写缓冲刷到介质（`CTRL_SYNC`）
    fn sync(&mut self, _drive: Drive) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ready() {
        assert!(DiskStatus::empty().is_ready());
        assert!(DiskStatus::PROTECT.is_ready());
        assert!(!DiskStatus::NOINIT.is_ready());
        assert!(!(DiskStatus::NODISK | DiskStatus::PROTECT).is_ready());
    }

    struct NullStore;

    impl BlockStore for NullStore {
        fn read(&mut self, _: Drive, _: &mut [u8], _: Sector, _: u32) -> Result<()> {
            Ok(())
        }

        fn write(&mut self, _: Drive, _: &[u8], _: Sector, _: u32) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_methods() {
        let mut store = NullStore;
        assert_eq!(store.status(0), DiskStatus::empty());
        assert_eq!(store.initialize(0).unwrap(), DiskStatus::empty());
        assert_eq!(store.sector_count(0), None);
        store.sync(0).unwrap();
    }
}
