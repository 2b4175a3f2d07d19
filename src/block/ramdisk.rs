//! 内存块存储
//!
//! 用于模拟器和主机工具的 `BlockStore` 实现，同时记录物理读写次数。

use super::store::{BlockStore, DiskStatus};
use crate::consts::{Drive, Sector, SECTOR_SIZE};
use crate::error::{Error, ErrorKind, Result};
use alloc::vec;
use alloc::vec::Vec;

/// 内存块存储，支持多个驱动器
pub struct RamDisk {
    /// 每个驱动器的扇区数据
    drives: Vec<Vec<u8>>,
    /// 每个驱动器的扇区数
    sectors: u64,
    /// 写保护
    write_protected: bool,
    /// 物理读调用次数
    read_calls: u64,
    /// 物理写调用次数
    write_calls: u64,
}

impl RamDisk {
    /// 创建内存块存储，内容全部清零
    ///
    /// # 参数
    ///
    /// * `drives` - 驱动器数量
    /// * `sectors` - 每个驱动器的扇区数
    pub fn new(drives: usize, sectors: u64) -> Self {
        let bytes = sectors as usize * SECTOR_SIZE;
        Self {
            drives: (0..drives).map(|_| vec![0u8; bytes]).collect(),
            sectors,
            write_protected: false,
            read_calls: 0,
            write_calls: 0,
        }
    }

    /// 设置写保护
    pub fn set_write_protected(&mut self, protected: bool) {
        self.write_protected = protected;
    }

    /// 物理读调用次数
    pub fn read_calls(&self) -> u64 {
        self.read_calls
    }

    /// 物理写调用次数
    pub fn write_calls(&self) -> u64 {
        self.write_calls
    }

    /// 重置读写计数
    pub fn reset_counters(&mut self) {
        self.read_calls = 0;
        self.write_calls = 0;
    }

    /// 直接访问某个扇区（不计数）
    pub fn sector(&self, drive: Drive, sector: Sector) -> Option<&[u8]> {
        let range = self.byte_range(sector, 1)?;
        self.drives.get(drive as usize).map(|d| &d[range])
    }

    /// 直接修改某个扇区（不计数），用于模拟介质被外部改写
    pub fn sector_mut(&mut self, drive: Drive, sector: Sector) -> Option<&mut [u8]> {
        let range = self.byte_range(sector, 1)?;
        self.drives.get_mut(drive as usize).map(|d| &mut d[range])
    }

    fn byte_range(&self, sector: Sector, count: u32) -> Option<core::ops::Range<usize>> {
        let end = sector.checked_add(count as u64)?;
        if end > self.sectors {
            return None;
        }
        let start = sector as usize * SECTOR_SIZE;
        Some(start..start + count as usize * SECTOR_SIZE)
    }

    fn checked_range(&self, drive: Drive, len: usize, sector: Sector, count: u32) -> Result<core::ops::Range<usize>> {
        if drive as usize >= self.drives.len() {
            return Err(Error::new(ErrorKind::InvalidInput, "no such drive"));
        }
        let range = self
            .byte_range(sector, count)
            .ok_or(Error::new(ErrorKind::InvalidInput, "sector out of range"))?;
        if len < range.len() {
            return Err(Error::new(ErrorKind::InvalidInput, "buffer too small for sectors"));
        }
        Ok(range)
    }
}

impl BlockStore for RamDisk {
    fn read(&mut self, drive: Drive, buf: &mut [u8], sector: Sector, count: u32) -> Result<()> {
        self.read_calls += 1;
        let range = self.checked_range(drive, buf.len(), sector, count)?;
        let len = range.len();
        buf[..len].copy_from_slice(&self.drives[drive as usize][range]);
        Ok(())
    }

    fn write(&mut self, drive: Drive, buf: &[u8], sector: Sector, count: u32) -> Result<()> {
        self.write_calls += 1;
        if self.write_protected {
            return Err(Error::new(ErrorKind::WriteProtected, "ramdisk is write protected"));
        }
        let range = self.checked_range(drive, buf.len(), sector, count)?;
        let len = range.len();
        self.drives[drive as usize][range].copy_from_slice(&buf[..len]);
        Ok(())
    }

    fn status(&self, drive: Drive) -> DiskStatus {
        if drive as usize >= self.drives.len() {
            return DiskStatus::NOINIT | DiskStatus::NODISK;
        }
        if self.write_protected {
            DiskStatus::PROTECT
        } else {
            DiskStatus::empty()
        }
    }

    fn sector_count(&self, drive: Drive) -> Option<u64> {
        if (drive as usize) < self.drives.len() {
            Some(self.sectors)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut disk = RamDisk::new(2, 64);
        let data = vec![0xA5u8; 2 * SECTOR_SIZE];
        disk.write(1, &data, 10, 2).unwrap();

        let mut buf = vec![0u8; 2 * SECTOR_SIZE];
        disk.read(1, &mut buf, 10, 2).unwrap();
        assert_eq!(buf, data);

        // 另一个驱动器不受影响
        disk.read(0, &mut buf, 10, 2).unwrap();
        assert!(buf.iter().all(|&b| b == 0));

        assert_eq!(disk.read_calls(), 2);
        assert_eq!(disk.write_calls(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut disk = RamDisk::new(1, 16);
        let mut buf = vec![0u8; 4 * SECTOR_SIZE];

        let err = disk.read(0, &mut buf, 14, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = disk.read(3, &mut buf, 0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = disk.read(0, &mut buf[..SECTOR_SIZE], 0, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_write_protect() {
        let mut disk = RamDisk::new(1, 16);
        disk.set_write_protected(true);
        assert_eq!(disk.status(0), DiskStatus::PROTECT);

        let err = disk.write(0, &[1u8; SECTOR_SIZE], 0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteProtected);
        assert_eq!(disk.sector(0, 0).unwrap()[0], 0);
    }

    #[test]
    fn test_sector_access() {
        let mut disk = RamDisk::new(1, 8);
        disk.sector_mut(0, 3).unwrap().fill(7);
        assert!(disk.sector(0, 3).unwrap().iter().all(|&b| b == 7));
        assert!(disk.sector(0, 8).is_none());
        assert!(disk.sector(1, 0).is_none());
        assert_eq!(disk.sector_count(0), Some(8));
        assert_eq!(disk.sector_count(1), None);
        assert_eq!(disk.read_calls(), 0);
    }
}
