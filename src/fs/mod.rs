pub mod block_device;
pub mod boot_sector;
pub mod directory;
pub mod error;
pub mod fat_constants;
pub mod fat_table;
pub mod fs;
pub mod image_device;
pub mod mock_device;

pub use block_device::{BlockDevice, SectorReader};
pub use boot_sector::BootSector;
pub use directory::{short_name, DirectoryEntry, RootDirectory};
pub use error::{FormatError, FsError, MountError};
pub use fat_table::FatTable;
pub use fs::{read_cluster_chain, FileSystem};
pub use image_device::ImageDevice;
pub use mock_device::MockDevice;
