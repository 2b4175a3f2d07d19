//! 扇区块缓存模块
//!
//! 位于文件系统层和块存储之间的固定大小块缓存。
//!
//! # 主要组件
//!
//! - [`CacheBlock`] - 单个缓存块，覆盖一段对齐的连续扇区
//! - [`DiskCache`] - 缓存管理器：查找、填充、写穿、统计
//! - [`ReplacementPolicy`] - 池满时的回收策略（[`RoundRobin`] / [`Lru`]）
//! - [`CacheStats`] - 命中 / 未命中 / 写入计数
//! - `SharedDiskCache` - 互斥锁保护的缓存（需要 `std` 特性）
//!
//! # 设计原理
//!
//! 1. **固定内存**：缓存池是 `[CacheBlock<SPAN>; BLOCKS]`，随 `DiskCache` 一起分配，
//!    块只会被重新打标签，不会单独分配或释放
//! 2. **写穿**：每次写都同步落到介质，缓存里没有脏数据，拔卡或掉电都不会丢数据
//! 3. **轮转回收**：默认用一个循环下标选择被回收的块，访问路径上没有链表维护；
//!    内存和 CPU 充裕时可以换成 [`Lru`]
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use diskcache_core::{SdDiskCache, DiskCache};
//!
//! let mut cache: SdDiskCache<_> = DiskCache::new(sd_card);
//!
//! cache.read(0, &mut buf, sector, 1)?;
//! cache.write(0, &data, sector, 1)?;
//!
//! let stats = cache.stats();
//! log::info!("hits={} misses={} writes={} ({}%)",
//!            stats.hits, stats.misses, stats.writes, cache.hit_rate());
//!
//! // 介质被更换
//! cache.clear();
//! ```

mod block;
mod disk_cache;
mod policy;
#[cfg(feature = "std")]
mod shared;
mod stats;

pub use block::CacheBlock;
pub use disk_cache::DiskCache;
pub use policy::{Lru, ReplacementPolicy, RoundRobin};
#[cfg(feature = "std")]
pub use shared::SharedDiskCache;
pub use stats::CacheStats;
