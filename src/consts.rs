//! 常量定义
//!
//! 缓存的几何参数在编译期固定，运行时不可调整。
//! 最坏情况下的内存占用为 `块数 × 每块扇区数 × 扇区大小` 字节。

/// 扇区大小（字节），与 FatFs 的 `FF_MIN_SS` 一致
pub const SECTOR_SIZE: usize = 512;

/// 默认缓存块数量
pub const DEFAULT_CACHE_BLOCKS: usize = 32;

/// 默认每个缓存块覆盖的扇区数
pub const DEFAULT_BLOCK_SECTORS: usize = 16;

/// 默认配置下缓存数据区的字节数（256 KiB）
pub const DEFAULT_CACHE_BYTES: usize = DEFAULT_CACHE_BLOCKS * DEFAULT_BLOCK_SECTORS * SECTOR_SIZE;

/// 扇区号
pub type Sector = u64;

/// 驱动器号（FatFs 的 `BYTE drv`）
pub type Drive = u8;
