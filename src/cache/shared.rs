//! 多上下文共享的缓存
//!
//! 当文件系统层可能在多个执行上下文中被调用时，每一次完整的
//! `read` / `write` / `clear` 都必须在同一个临界区内执行。
//! 这里用一把 `Mutex` 包住整个缓存，每次调用只加锁一次。

use std::sync::{Mutex, MutexGuard};

use crate::block::BlockStore;
use crate::consts::{Drive, Sector};
use crate::error::{Error, ErrorKind, Result};

use super::disk_cache::DiskCache;
use super::policy::{ReplacementPolicy, RoundRobin};
use super::stats::CacheStats;

/// 由互斥锁保护的缓存
///
/// # 示例
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// let cache = Arc::new(SharedDiskCache::new(DiskCache::<_, 32, 16>::new(sd)));
/// let worker = Arc::clone(&cache);
/// std::thread::spawn(move || worker.read(0, &mut buf, 0, 1));
/// ```
pub struct SharedDiskCache<D, const BLOCKS: usize, const SPAN: usize, P = RoundRobin> {
    inner: Mutex<DiskCache<D, BLOCKS, SPAN, P>>,
}

impl<D, const BLOCKS: usize, const SPAN: usize, P> SharedDiskCache<D, BLOCKS, SPAN, P>
where
    D: BlockStore,
    P: ReplacementPolicy,
{
    /// 包装一个缓存
    pub fn new(cache: DiskCache<D, BLOCKS, SPAN, P>) -> Self {
        Self { inner: Mutex::new(cache) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DiskCache<D, BLOCKS, SPAN, P>>> {
        self.inner
            .lock()
            .map_err(|_| Error::new(ErrorKind::Io, "Failed to acquire mutex lock"))
    }

    /// 读取扇区（整个调用持锁）
    pub fn read(&self, drive: Drive, buf: &mut [u8], sector: Sector, count: u32) -> Result<()> {
        self.lock()?.read(drive, buf, sector, count)
    }

    /// 写入扇区（整个调用持锁）
    pub fn write(&self, drive: Drive, buf: &[u8], sector: Sector, count: u32) -> Result<()> {
        self.lock()?.write(drive, buf, sector, count)
    }

    /// 清空缓存
    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    /// 统计快照
    pub fn stats(&self) -> Result<CacheStats> {
        Ok(self.lock()?.stats())
    }

    /// 整数命中率百分比
    pub fn hit_rate(&self) -> Result<u32> {
        Ok(self.lock()?.hit_rate())
    }

    /// 在锁内对缓存执行任意操作
    pub fn with<R>(&self, f: impl FnOnce(&mut DiskCache<D, BLOCKS, SPAN, P>) -> R) -> Result<R> {
        Ok(f(&mut *self.lock()?))
    }

    /// 取回内部缓存
    pub fn into_inner(self) -> Result<DiskCache<D, BLOCKS, SPAN, P>> {
        self.inner
            .into_inner()
            .map_err(|_| Error::new(ErrorKind::Io, "Failed to acquire mutex lock"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RamDisk;
    use crate::consts::SECTOR_SIZE;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_shared_read_write() {
        let cache = SharedDiskCache::new(DiskCache::<_, 4, 4>::new(RamDisk::new(1, 64)));

        let data = vec![0x33u8; 4 * SECTOR_SIZE];
        cache.write(0, &data, 0, 4).unwrap();

        let mut buf = vec![0u8; 4 * SECTOR_SIZE];
        cache.read(0, &mut buf, 0, 4).unwrap();
        assert_eq!(buf, data);
        assert_eq!(cache.hit_rate().unwrap(), 100);

        cache.clear().unwrap();
        assert_eq!(cache.stats().unwrap(), CacheStats::default());
        assert_eq!(cache.with(|c| c.valid_blocks()).unwrap(), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(SharedDiskCache::new(DiskCache::<_, 4, 4>::new(RamDisk::new(4, 64))));

        let handles: std::vec::Vec<_> = (0..4u8)
            .map(|drive| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let data = vec![drive + 1; 2 * SECTOR_SIZE];
                    for round in 0..20u64 {
                        let sector = (round * 3) % 60;
                        cache.write(drive, &data, sector, 2).unwrap();
                        let mut buf = vec![0u8; 2 * SECTOR_SIZE];
                        cache.read(drive, &mut buf, sector, 2).unwrap();
                        assert_eq!(buf, data);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let cache = Arc::try_unwrap(cache).ok().unwrap().into_inner().unwrap();
        assert_eq!(cache.stats().writes, 80);
        assert_eq!(cache.store().write_calls(), 80);
    }

    #[test]
    fn test_poisoned_lock_reports_io_error() {
        let cache = Arc::new(SharedDiskCache::new(DiskCache::<_, 2, 4>::new(RamDisk::new(1, 64))));

        let worker = Arc::clone(&cache);
        let result = thread::spawn(move || {
            let _ = worker.with(|_| panic!("panic while holding the cache lock"));
        })
        .join();
        assert!(result.is_err());

        let mut buf = vec![0u8; SECTOR_SIZE];
        let err = cache.read(0, &mut buf, 0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.message(), "Failed to acquire mutex lock");
        assert_eq!(cache.stats().unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(cache.write(0, &buf, 0, 1).unwrap_err().kind(), ErrorKind::Io);
    }
}
