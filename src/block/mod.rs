//! 块存储抽象
//!
//! block/store.rs 定义缓存下层的块存储接口（对应 FatFs diskio）
//! block/ramdisk.rs 提供一个基于内存的实现，供模拟器和测试使用

mod ramdisk;
mod store;

pub use ramdisk::RamDisk;
pub use store::{BlockStore, DiskStatus};
