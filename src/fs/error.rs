use std::{fmt, io};

/// Structural problems in the volume itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes than the boot sector layout needs.
    Truncated { needed: usize, available: usize },
    ZeroBytesPerSector,
    ZeroSectorsPerCluster,
    /// The FAT entry for `cluster` lies past the end of the loaded table.
    FatIndexOutOfRange { cluster: u16, table_len: usize },
    /// A chain pointed at cluster 0 or 1.
    ReservedCluster(u16),
    /// More links than the table has entries, i.e. the chain loops.
    ChainTooLong { start: u16 },
    /// End of chain reached before `expected` bytes were covered.
    ChainTooShort { expected: u32, actual: usize },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Truncated { needed, available } => {
                write!(f, "boot sector truncated: need {needed} bytes, got {available}")
            }
            FormatError::ZeroBytesPerSector => write!(f, "bytes per sector is zero"),
            FormatError::ZeroSectorsPerCluster => write!(f, "sectors per cluster is zero"),
            FormatError::FatIndexOutOfRange { cluster, table_len } => write!(
                f,
                "cluster {cluster:#05x} has no entry in a {table_len}-byte FAT"
            ),
            FormatError::ReservedCluster(c) => write!(f, "chain references reserved cluster {c}"),
            FormatError::ChainTooLong { start } => {
                write!(f, "cluster chain starting at {start:#05x} does not terminate")
            }
            FormatError::ChainTooShort { expected, actual } => write!(
                f,
                "cluster chain covers {actual} bytes but the entry claims {expected}"
            ),
        }
    }
}

#[derive(Debug)]
pub enum FsError {
    Io(io::Error),
    Format(FormatError),
    NotFound,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::Io(e) => write!(f, "i/o error: {e}"),
            FsError::Format(e) => write!(f, "malformed volume: {e}"),
            FsError::NotFound => write!(f, "file not found"),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FsError {
    fn from(e: io::Error) -> Self { FsError::Io(e) }
}

impl From<FormatError> for FsError {
    fn from(e: FormatError) -> Self { FsError::Format(e) }
}

/// Which part of mounting failed. The harness maps each stage to its own exit code.
#[derive(Debug)]
pub enum MountError {
    BootSector(FsError),
    Fat(FsError),
    RootDirectory(FsError),
}

impl MountError {
    pub fn inner(&self) -> &FsError {
        match self {
            MountError::BootSector(e) | MountError::Fat(e) | MountError::RootDirectory(e) => e,
        }
    }
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::BootSector(e) => write!(f, "failed to read boot sector: {e}"),
            MountError::Fat(e) => write!(f, "failed to read FAT: {e}"),
            MountError::RootDirectory(e) => write!(f, "failed to read root directory: {e}"),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner())
    }
}
