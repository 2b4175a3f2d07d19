//! 缓存统计信息

/// 缓存统计快照
///
/// 自上次 `clear()` 以来的累计计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// 命中次数（按对齐块计）
    pub hits: u32,
    /// 未命中次数（按对齐块计）
    pub misses: u32,
    /// 物理写调用次数
    pub writes: u32,
}

impl CacheStats {
    /// 整数命中率百分比 `[0, 100]`
    ///
    /// 没有任何读访问时返回 0。
    pub fn hit_rate(&self) -> u32 {
        let total = self.hits as u64 + self.misses as u64;
        if total == 0 {
            0
        } else {
            (self.hits as u64 * 100 / total) as u32
        }
    }

    /// 总读访问次数
    pub fn accesses(&self) -> u64 {
        self.hits as u64 + self.misses as u64
    }

    pub(super) fn record_hit(&mut self) {
        self.hits = self.hits.wrapping_add(1);
    }

    pub(super) fn record_miss(&mut self) {
        self.misses = self.misses.wrapping_add(1);
    }

    pub(super) fn record_write(&mut self) {
        self.writes = self.writes.wrapping_add(1);
    }
}
