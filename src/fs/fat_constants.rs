// On-disk constants for the FAT12 layout read by this crate.
// Kept in one place so the parsers and the tests agree on them.

/// Bytes of the boot sector the decoder looks at (BPB + extended BPB).
pub const BOOT_SECTOR_SIZE: usize = 62;

/// Size of one root directory record.
pub const DIR_ENTRY_SIZE: usize = 32;

/// Length of a padded 8.3 name, without the dot.
pub const SHORT_NAME_LEN: usize = 11;

// FAT12 link values
pub const FAT12_ENTRY_MASK: u16 = 0x0FFF;
pub const FAT12_EOC_MIN: u16 = 0x0FF8; // >= means end of chain
pub const FIRST_DATA_CLUSTER: u16 = 2; // 0 and 1 are reserved

// Directory entry markers
pub const DIR_ENTRY_END: u8 = 0x00;
pub const DIR_ENTRY_DELETED: u8 = 0xE5;

// Attribute bits
pub const ATTR_READ_ONLY: u8 = 0x01;
pub const ATTR_HIDDEN: u8 = 0x02;
pub const ATTR_SYSTEM: u8 = 0x04;
pub const ATTR_VOLUME_ID: u8 = 0x08;
pub const ATTR_DIRECTORY: u8 = 0x10;
pub const ATTR_ARCHIVE: u8 = 0x20;
pub const ATTR_LONG_NAME: u8 = ATTR_READ_ONLY | ATTR_HIDDEN | ATTR_SYSTEM | ATTR_VOLUME_ID;
