//! 扇区块缓存
//!
//! 位于文件系统驱动和块存储之间，以 `SPAN` 个扇区为单位缓存读取结果。
//!
//! # 读路径
//!
//! 请求被拆成若干对齐块：`aligned = sector / SPAN * SPAN`。
//! - 命中：直接从缓存块复制重叠部分
//! - 未命中：选一个槽位，从存储读取整块 `SPAN` 个扇区，打标签后复制
//! - 对齐块超出驱动器末尾时，该部分直接透传读取，不进入缓存
//!
//! # 写路径（写穿）
//!
//! 每次 `write` 恰好发出一次物理写，成功后：
//! - 已缓存的重叠块原地更新
//! - 被完整覆盖但未缓存的块直接用写入数据建立缓存（无需先读）
//! - 部分覆盖且未缓存的块保持未缓存
//!
//! 因为是写穿，缓存中不存在未落盘的数据，`clear()` 可以直接丢弃所有块。

use crate::block::{BlockStore, DiskStatus};
use crate::consts::{Drive, Sector, SECTOR_SIZE};
use crate::error::{Error, ErrorKind, Result};

use super::block::CacheBlock;
use super::policy::{ReplacementPolicy, RoundRobin};
use super::stats::CacheStats;

/// 扇区块缓存
///
/// * `D` - 底层块存储
/// * `BLOCKS` - 缓存块数量
/// * `SPAN` - 每个缓存块的扇区数
/// * `P` - 缓存池满时的替换策略
///
/// 缓存池内嵌在结构体中，大小为 `BLOCKS × SPAN × SECTOR_SIZE` 字节，
/// 构造后不再分配内存。
///
/// # 示例
///
/// ```rust,ignore
/// use diskcache_core::{DiskCache, RamDisk};
///
/// let mut cache: DiskCache<_, 32, 16> = DiskCache::new(RamDisk::new(1, 4096));
///
/// let mut buf = [0u8; 512];
/// cache.read(0, &mut buf, 100, 1)?;   // miss，读取 96..112
/// cache.read(0, &mut buf, 101, 1)?;   // hit
/// assert_eq!(cache.hit_rate(), 50);
/// ```
pub struct DiskCache<D, const BLOCKS: usize, const SPAN: usize, P = RoundRobin> {
    store: D,
    blocks: [CacheBlock<SPAN>; BLOCKS],
    policy: P,
    stats: CacheStats,
}

impl<D, const BLOCKS: usize, const SPAN: usize, P> DiskCache<D, BLOCKS, SPAN, P>
where
    D: BlockStore,
    P: ReplacementPolicy,
{
    const GEOMETRY_OK: () = assert!(BLOCKS > 0 && SPAN > 0, "cache needs at least one block of one sector");

    /// 创建缓存，所有块无效，计数清零
    pub fn new(store: D) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::GEOMETRY_OK;
        Self {
            store,
            blocks: [const { CacheBlock::EMPTY }; BLOCKS],
            policy: P::with_capacity(BLOCKS),
            stats: CacheStats::default(),
        }
    }

    /// 读取扇区
    ///
    /// 从 `drive` 的 `sector` 开始读取 `count` 个扇区到 `buf`。
    ///
    /// # 错误
    ///
    /// - 参数无效时返回 `InvalidInput`，驱动器未就绪或不存在时返回 `NotReady`，
    ///   此时不访问缓存池和存储
    /// - 存储读取失败时原样返回其错误；`buf` 中尚未填充的部分内容未定义，
    ///   失败的块保持无效
    pub fn read(&mut self, drive: Drive, buf: &mut [u8], sector: Sector, count: u32) -> Result<()> {
        let end = self.check_request(drive, buf.len(), sector, count)?;
        let limit = self.store.sector_count(drive);

        let mut cur = sector;
        while cur < end {
            let aligned = Self::align(cur);
            let offset = (cur - aligned) as usize;
            let n = (SPAN - offset).min((end - cur) as usize);
            let dst_start = (cur - sector) as usize * SECTOR_SIZE;
            let dst = &mut buf[dst_start..dst_start + n * SECTOR_SIZE];

            if let Some(slot) = self.lookup(drive, aligned) {
                self.stats.record_hit();
                self.policy.touch(slot);
                log::trace!("[DISKCACHE] read drv={} sector={:#x} HIT slot={}", drive, aligned, slot);
                dst.copy_from_slice(self.blocks[slot].sectors(offset, n));
            } else {
                self.stats.record_miss();
                if limit.is_some_and(|total| aligned.saturating_add(SPAN as u64) > total) {
                    // 末尾不完整的对齐块，直接透传
                    log::debug!("[DISKCACHE] read drv={} sector={:#x} pass-through n={}", drive, cur, n);
                    self.store.read(drive, dst, cur, n as u32).inspect_err(|e| {
                        log::warn!("[DISKCACHE] pass-through read failed drv={} sector={:#x}: {}", drive, cur, e);
                    })?;
                } else {
                    let slot = self.fill(drive, aligned)?;
                    dst.copy_from_slice(self.blocks[slot].sectors(offset, n));
                }
            }

            cur += n as u64;
        }

        Ok(())
    }

    /// 写入扇区（写穿）
    ///
    /// 整个请求只发出一次物理写，随后更新缓存。
    ///
    /// # 错误
    ///
    /// - 参数无效（`InvalidInput`）或驱动器未就绪（`NotReady`）时，
    ///   不发出物理写，也不计入写次数
    /// - 存储写入失败时原样返回其错误，并使重叠的已缓存块失效
    pub fn write(&mut self, drive: Drive, buf: &[u8], sector: Sector, count: u32) -> Result<()> {
        let end = self.check_request(drive, buf.len(), sector, count)?;

        self.stats.record_write();
        if let Err(e) = self.store.write(drive, buf, sector, count) {
            log::warn!("[DISKCACHE] write drv={} sector={:#x} count={} failed: {}", drive, sector, count, e);
            // 介质上这段内容已不可知
            self.invalidate_range(drive, sector, end);
            return Err(e);
        }

        let mut cur = sector;
        while cur < end {
            let aligned = Self::align(cur);
            let offset = (cur - aligned) as usize;
            let n = (SPAN - offset).min((end - cur) as usize);
            let src_start = (cur - sector) as usize * SECTOR_SIZE;
            let src = &buf[src_start..src_start + n * SECTOR_SIZE];

            if let Some(slot) = self.lookup(drive, aligned) {
                self.blocks[slot].sectors_mut(offset, n).copy_from_slice(src);
                self.policy.touch(slot);
                log::trace!("[DISKCACHE] write drv={} sector={:#x} updated slot={}", drive, aligned, slot);
            } else if n == SPAN {
                let slot = self.select_slot();
                let block = &mut self.blocks[slot];
                block.data_mut().copy_from_slice(src);
                block.assign(drive, aligned);
                self.policy.touch(slot);
                log::debug!("[DISKCACHE] write drv={} sector={:#x} cached full span slot={}", drive, aligned, slot);
            }

            cur += n as u64;
        }

        Ok(())
    }

    /// 清空缓存并清零统计
    ///
    /// 不会刷新任何数据：写穿保证缓存中没有未落盘的内容。
    /// 用于介质被外部修改或拔出之后。
    pub fn clear(&mut self) {
        for block in self.blocks.iter_mut() {
            block.invalidate();
        }
        self.policy.reset();
        self.stats = CacheStats::default();
        log::debug!("[DISKCACHE] cleared {} blocks", BLOCKS);
    }

    /// 丢弃某个驱动器的所有缓存块，保留统计
    ///
    /// # 返回
    ///
    /// 被丢弃的块数量
    pub fn invalidate_drive(&mut self, drive: Drive) -> usize {
        let mut dropped = 0;
        for block in self.blocks.iter_mut() {
            if matches!(block.tag(), Some((d, _)) if d == drive) {
                block.invalidate();
                dropped += 1;
            }
        }
        log::debug!("[DISKCACHE] invalidated {} blocks of drv={}", dropped, drive);
        dropped
    }

    /// 统计快照
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// 整数命中率百分比
    pub fn hit_rate(&self) -> u32 {
        self.stats.hit_rate()
    }

    /// 初始化驱动器
    ///
    /// 重新初始化意味着介质可能已被更换，因此无论初始化成功与否，
    /// 都先丢弃该驱动器的缓存。
    pub fn initialize(&mut self, drive: Drive) -> Result<DiskStatus> {
        self.invalidate_drive(drive);
        self.store.initialize(drive)
    }

    /// 驱动器状态（透传）
    pub fn status(&self, drive: Drive) -> DiskStatus {
        self.store.status(drive)
    }

    /// 同步驱动器（透传）
    pub fn sync(&mut self, drive: Drive) -> Result<()> {
        self.store.sync(drive)
    }

    /// 缓存块数量
    pub const fn capacity(&self) -> usize {
        BLOCKS
    }

    /// 每块扇区数
    pub const fn block_sectors(&self) -> usize {
        SPAN
    }

    /// 当前有效块数量
    pub fn valid_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_valid()).count()
    }

    /// 当前缓存的 `(drive, start)` 标签
    pub fn cached_spans(&self) -> impl Iterator<Item = (Drive, Sector)> + '_ {
        self.blocks.iter().filter_map(|b| b.tag())
    }

    /// 替换策略
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// 获取底层存储的引用
    pub fn store(&self) -> &D {
        &self.store
    }

    /// 获取底层存储的可变引用
    ///
    /// 绕过缓存直接写入存储会破坏一致性，之后应调用 `clear()` 或 `invalidate_drive()`。
    pub fn store_mut(&mut self) -> &mut D {
        &mut self.store
    }

    /// 取回底层存储
    pub fn into_inner(self) -> D {
        self.store
    }

    // 内部辅助方法

    #[inline]
    fn align(sector: Sector) -> Sector {
        sector / SPAN as u64 * SPAN as u64
    }

    /// 参数检查，返回结束扇区（不含）
    ///
    /// 在访问缓存池和统计之前调用，任何失败都不会改变缓存状态。
    fn check_request(&self, drive: Drive, len: usize, sector: Sector, count: u32) -> Result<Sector> {
        if !self.store.status(drive).is_ready() {
            return Err(Error::new(ErrorKind::NotReady, "drive not ready"));
        }
        if count == 0 {
            return Err(Error::new(ErrorKind::InvalidInput, "sector count must not be zero"));
        }
        let bytes = (count as usize)
            .checked_mul(SECTOR_SIZE)
            .ok_or(Error::new(ErrorKind::InvalidInput, "sector count too large"))?;
        if len < bytes {
            return Err(Error::new(ErrorKind::InvalidInput, "buffer too small for sectors"));
        }
        let end = sector
            .checked_add(count as u64)
            .ok_or(Error::new(ErrorKind::InvalidInput, "sector range overflows"))?;
        if let Some(total) = self.store.sector_count(drive) {
            if end > total {
                return Err(Error::new(ErrorKind::InvalidInput, "sector out of range"));
            }
        }
        Ok(end)
    }

    /// 查找命中 `(drive, aligned)` 的槽位
    fn lookup(&self, drive: Drive, aligned: Sector) -> Option<usize> {
        let slot = self.blocks.iter().position(|b| b.matches(drive, aligned));
        debug_assert!(
            self.blocks.iter().filter(|b| b.matches(drive, aligned)).count() <= 1,
            "duplicate cache tag"
        );
        slot
    }

    /// 选择要重新打标签的槽位：优先空闲块，否则交给替换策略
    fn select_slot(&mut self) -> usize {
        if let Some(slot) = self.blocks.iter().position(|b| !b.is_valid()) {
            return slot;
        }
        let slot = self.policy.select_victim();
        if let Some((drive, start)) = self.blocks[slot].tag() {
            log::debug!("[DISKCACHE] evict slot={} drv={} sector={:#x}", slot, drive, start);
        }
        slot
    }

    /// 把 `(drive, aligned)` 整块读入一个槽位
    fn fill(&mut self, drive: Drive, aligned: Sector) -> Result<usize> {
        let slot = self.select_slot();
        let block = &mut self.blocks[slot];
        block.invalidate();

        log::debug!("[DISKCACHE] read drv={} sector={:#x} MISS, fill slot={}", drive, aligned, slot);
        if let Err(e) = self.store.read(drive, block.data_mut(), aligned, SPAN as u32) {
            log::warn!("[DISKCACHE] fill drv={} sector={:#x} failed: {}", drive, aligned, e);
            return Err(e);
        }

        block.assign(drive, aligned);
        self.policy.touch(slot);
        Ok(slot)
    }

    /// 使 `[start, end)` 重叠的已缓存块失效
    fn invalidate_range(&mut self, drive: Drive, start: Sector, end: Sector) {
        for block in self.blocks.iter_mut() {
            if let Some((d, s)) = block.tag() {
                if d == drive && s < end && s.saturating_add(SPAN as u64) > start {
                    block.invalidate();
                }
            }
        }
    }
}

/// 缓存本身也是一个块存储，文件系统层可以面向 trait 编程
impl<D, const BLOCKS: usize, const SPAN: usize, P> BlockStore for DiskCache<D, BLOCKS, SPAN, P>
where
    D: BlockStore,
    P: ReplacementPolicy,
{
    fn read(&mut self, drive: Drive, buf: &mut [u8], sector: Sector, count: u32) -> Result<()> {
        Self::read(self, drive, buf, sector, count)
    }

    fn write(&mut self, drive: Drive, buf: &[u8], sector: Sector, count: u32) -> Result<()> {
        Self::write(self, drive, buf, sector, count)
    }

    fn status(&self, drive: Drive) -> DiskStatus {
        Self::status(self, drive)
    }

    fn initialize(&mut self, drive: Drive) -> Result<DiskStatus> {
        Self::initialize(self, drive)
    }

    fn sector_count(&self, drive: Drive) -> Option<u64> {
        self.store.sector_count(drive)
    }

    fn sync(&mut self, drive: Drive) -> Result<()> {
        Self::sync(self, drive)
    }
}

impl<D, const BLOCKS: usize, const SPAN: usize, P> core::fmt::Debug for DiskCache<D, BLOCKS, SPAN, P>
where
    D: BlockStore,
    P: ReplacementPolicy,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DiskCache")
            .field("blocks", &BLOCKS)
            .field("span", &SPAN)
            .field("valid", &self.valid_blocks())
            .field("stats", &self.stats)
            .finish()
    }
}
