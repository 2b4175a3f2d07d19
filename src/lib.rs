//! diskcache_core: 固定大小的扇区块缓存
//!
//! 位于 FAT 文件系统驱动和 SD 卡一类的慢速扇区设备之间，
//! 吸收对相邻扇区的重复读写，并提供命中率统计：
//! - **无动态分配**：缓存池大小在编译期确定
//! - **写穿**：每次写都同步落盘，缓存中没有未落盘的数据
//! - **可替换的回收策略**：默认轮转，可选 LRU
//! - **错误原样透传**：与 FatFs `DRESULT` 一一对应
//!
//! # 示例
//!
//! ```rust,ignore
//! use diskcache_core::{BlockStore, DiskCache, Result};
//!
//! struct SdCard { /* ... */ }
//!
//! impl BlockStore for SdCard {
//!     // 实现 read / write
//!     // ...
//! }
//!
//! fn main() -> Result<()> {
//!     let mut cache: DiskCache<_, 32, 16> = DiskCache::new(SdCard::new());
//!
//!     let mut buf = [0u8; 512];
//!     cache.read(0, &mut buf, 0, 1)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`block`] - 块存储接口和内存实现
//! - [`consts`] - 常量定义
//! - [`cache`] - 扇区块缓存

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

/// 错误处理
pub mod error;

/// 块存储抽象
pub mod block;

/// 常量定义
pub mod consts;

/// 扇区块缓存
pub mod cache;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 块存储
pub use block::{BlockStore, DiskStatus, RamDisk};

// 常量
pub use consts::{Drive, Sector, DEFAULT_BLOCK_SECTORS, DEFAULT_CACHE_BLOCKS, SECTOR_SIZE};

// 缓存
pub use cache::{CacheBlock, CacheStats, DiskCache, Lru, ReplacementPolicy, RoundRobin};

#[cfg(feature = "std")]
pub use cache::SharedDiskCache;

/// 默认配置的缓存：32 块，每块 16 个扇区
pub type SdDiskCache<D, P = RoundRobin> = DiskCache<D, DEFAULT_CACHE_BLOCKS, DEFAULT_BLOCK_SECTORS, P>;
