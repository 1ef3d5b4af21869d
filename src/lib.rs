//! Read-only FAT12 image reader.
//!
//! Mirrors what the stage-2 loader does with a floppy image: decode the boot
//! sector, pull the FAT and root directory into memory, then walk a file's
//! cluster chain.

pub mod fs;
pub mod logger;
pub mod render;
