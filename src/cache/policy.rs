//! 替换策略
//!
//! 缓存池满时由策略选出被回收的块。策略只处理槽位下标，
//! 不接触块内容；空闲块的优先使用由 [`DiskCache`](super::DiskCache) 负责。
//!
//! - [`RoundRobin`] - 轮转下标（默认），无任何额外簿记
//! - [`Lru`] - 真正的最近最少使用，基于 lru crate

use core::num::NonZeroUsize;
use lru::LruCache;

/// 替换策略
pub trait ReplacementPolicy {
    /// 为 `capacity` 个槽位创建策略
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// 槽位被访问（命中或刚填充）
    fn touch(&mut self, slot: usize);

    /// 选出下一个被回收的槽位
    fn select_victim(&mut self) -> usize;

    /// 恢复初始状态
    fn reset(&mut self);
}

/// 轮转替换
///
/// 每次回收 `next` 指向的槽位，然后向后移动一格并回绕。
#[derive(Debug, Clone)]
pub struct RoundRobin {
    next: usize,
    capacity: usize,
}

impl RoundRobin {
    /// 下一个将被回收的槽位
    pub fn next_victim(&self) -> usize {
        self.next
    }
}

impl ReplacementPolicy for RoundRobin {
    fn with_capacity(capacity: usize) -> Self {
        Self { next: 0, capacity: capacity.max(1) }
    }

    #[inline]
    fn touch(&mut self, _slot: usize) {}

    fn select_victim(&mut self) -> usize {
        let victim = self.next;
        self.next = (self.next + 1) % self.capacity;
        victim
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

/// LRU 替换
///
/// 构造时把所有槽位放入 `LruCache`，之后只调整顺序，访问路径上不再分配内存。
pub struct Lru {
    order: LruCache<usize, ()>,
    capacity: usize,
}

impl Lru {
    /// 当前最久未使用的槽位
    pub fn peek_victim(&self) -> Option<usize> {
        self.order.peek_lru().map(|(slot, _)| *slot)
    }
}

impl ReplacementPolicy for Lru {
    fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let mut order = LruCache::new(cap);
        for slot in 0..cap.get() {
            order.put(slot, ());
        }
        Self { order, capacity: cap.get() }
    }

    fn touch(&mut self, slot: usize) {
        self.order.promote(&slot);
    }

    fn select_victim(&mut self) -> usize {
        let victim = self.peek_victim().unwrap_or(0);
        self.order.promote(&victim);
        victim
    }

    fn reset(&mut self) {
        // 逆序降级，最终 0 号槽位位于 LRU 端
        for slot in (0..self.capacity).rev() {
            self.order.demote(&slot);
        }
    }
}

impl core::fmt::Debug for Lru {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lru")
            .field("capacity", &self.capacity)
            .field("victim", &self.peek_victim())
            .finish()
    }
}
