//! 错误类型定义
//!
//! 提供扇区缓存和底层块存储共用的错误类型。
//! 错误类别与 FatFs 的 `DRESULT` 一一对应，便于直接透传给文件系统层。

use core::fmt;

/// 缓存/块存储操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 一般 I/O 错误（`RES_ERROR`）
    Io,
    /// 介质写保护（`RES_WRPRT`）
    WriteProtected,
    /// 介质未就绪（`RES_NOTRDY`）
    NotReady,
    /// 无效参数（`RES_PARERR`）
    InvalidInput,
}

/// FatFs `DRESULT` 取值
pub mod dresult {
    /// 成功
    pub const RES_OK: u8 = 0;
    /// 读写错误
    pub const RES_ERROR: u8 = 1;
    /// 写保护
    pub const RES_WRPRT: u8 = 2;
    /// 未就绪
    pub const RES_NOTRDY: u8 = 3;
    /// 参数错误
    pub const RES_PARERR: u8 = 4;
}

impl ErrorKind {
    /// 对应的 FatFs `DRESULT` 码
    pub const fn dresult(self) -> u8 {
        match self {
            ErrorKind::Io => dresult::RES_ERROR,
            ErrorKind::WriteProtected => dresult::RES_WRPRT,
            ErrorKind::NotReady => dresult::RES_NOTRDY,
            ErrorKind::InvalidInput => dresult::RES_PARERR,
        }
    }
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 从 FatFs `DRESULT` 码构造错误
    ///
    /// `RES_OK` 返回 `None`；未知的码按一般 I/O 错误处理。
    pub const fn from_dresult(code: u8) -> Option<Self> {
        match code {
            dresult::RES_OK => None,
            dresult::RES_WRPRT => Some(Self::new(ErrorKind::WriteProtected, "media is write protected")),
            dresult::RES_NOTRDY => Some(Self::new(ErrorKind::NotReady, "media not ready")),
            dresult::RES_PARERR => Some(Self::new(ErrorKind::InvalidInput, "invalid parameter")),
            _ => Some(Self::new(ErrorKind::Io, "disk I/O error")),
        }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// 对应的 FatFs `DRESULT` 码
    pub const fn dresult(&self) -> u8 {
        self.kind.dresult()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dresult_mapping() {
        assert_eq!(ErrorKind::Io.dresult(), dresult::RES_ERROR);
        assert_eq!(ErrorKind::WriteProtected.dresult(), dresult::RES_WRPRT);
        assert_eq!(ErrorKind::NotReady.dresult(), dresult::RES_NOTRDY);
        assert_eq!(ErrorKind::InvalidInput.dresult(), dresult::RES_PARERR);
    }

    #[test]
    fn test_from_dresult() {
        assert!(Error::from_dresult(dresult::RES_OK).is_none());

        let err = Error::from_dresult(dresult::RES_WRPRT).unwrap();
        assert_eq!(err.kind(), ErrorKind::WriteProtected);
        assert_eq!(err.dresult(), dresult::RES_WRPRT);

        let err = Error::from_dresult(dresult::RES_NOTRDY).unwrap();
        assert_eq!(err.kind(), ErrorKind::NotReady);

        let err = Error::from_dresult(dresult::RES_PARERR).unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // 未知码归为 I/O 错误
        let err = Error::from_dresult(42).unwrap();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::Io, "boom");
        assert_eq!(alloc::format!("{}", err), "Io: boom");
    }
}
