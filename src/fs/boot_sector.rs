use crate::fs::block_device::BlockDevice;
use crate::fs::error::{FormatError, FsError};
use crate::fs::fat_constants::{BOOT_SECTOR_SIZE, DIR_ENTRY_SIZE};

/// BIOS parameter block plus the FAT12 extended fields, decoded from the
/// first 62 bytes of the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootSector {
    pub jump: [u8; 3],
    pub oem_id: [u8; 8],
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub max_root_dir_entries: u16,
    pub total_sectors: u16,
    pub media_descriptor: u8,
    pub sectors_per_fat: u16,
    pub sectors_per_track: u16,
    pub heads: u16,
    pub hidden_sectors: u32,
    pub large_sector_count: u32,
    pub drive_number: u8,
    pub reserved: u8,
    pub signature: u8,
    pub volume_id: u32,
    pub volume_label: [u8; 11],
    pub system_id: [u8; 8],
}

fn le16(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

fn le32(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

impl BootSector {
    /// Read the boot sector straight off the device. The sector size is not
    /// known yet, so this bypasses [`SectorReader`](crate::fs::block_device::SectorReader).
    pub fn read<D: BlockDevice>(device: &mut D) -> Result<Self, FsError> {
        let mut buf = [0u8; BOOT_SECTOR_SIZE];
        let got = device.read_at(0, &mut buf)?;
        Self::parse(&buf[..got])
    }

    pub fn parse(buf: &[u8]) -> Result<Self, FsError> {
        if buf.len() < BOOT_SECTOR_SIZE {
            return Err(FormatError::Truncated { needed: BOOT_SECTOR_SIZE, available: buf.len() }.into());
        }

        let mut jump = [0u8; 3];
        jump.copy_from_slice(&buf[0..3]);
        let mut oem_id = [0u8; 8];
        oem_id.copy_from_slice(&buf[3..11]);
        let mut volume_label = [0u8; 11];
        volume_label.copy_from_slice(&buf[43..54]);
        let mut system_id = [0u8; 8];
        system_id.copy_from_slice(&buf[54..62]);

        let bs = BootSector {
            jump,
            oem_id,
            bytes_per_sector: le16(buf, 11),
            sectors_per_cluster: buf[13],
            reserved_sectors: le16(buf, 14),
            num_fats: buf[16],
            max_root_dir_entries: le16(buf, 17),
            total_sectors: le16(buf, 19),
            media_descriptor: buf[21],
            sectors_per_fat: le16(buf, 22),
            sectors_per_track: le16(buf, 24),
            heads: le16(buf, 26),
            hidden_sectors: le32(buf, 28),
            large_sector_count: le32(buf, 32),
            drive_number: buf[36],
            reserved: buf[37],
            signature: buf[38],
            volume_id: le32(buf, 39),
            volume_label,
            system_id,
        };

        // Both are divisors or loop strides further down.
        if bs.bytes_per_sector == 0 { return Err(FormatError::ZeroBytesPerSector.into()); }
        if bs.sectors_per_cluster == 0 { return Err(FormatError::ZeroSectorsPerCluster.into()); }

        log::debug!(
            "boot sector: {} B/sector, {} sectors/cluster, {} reserved, {} FATs x {} sectors, {} root entries",
            bs.bytes_per_sector, bs.sectors_per_cluster, bs.reserved_sectors,
            bs.num_fats, bs.sectors_per_fat, bs.max_root_dir_entries
        );
        Ok(bs)
    }

    /// Write the 62-byte layout back out; the rest of `buf` is left alone.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<(), FsError> {
        if buf.len() < BOOT_SECTOR_SIZE {
            return Err(FormatError::Truncated { needed: BOOT_SECTOR_SIZE, available: buf.len() }.into());
        }
        buf[0..3].copy_from_slice(&self.jump);
        buf[3..11].copy_from_slice(&self.oem_id);
        buf[11..13].copy_from_slice(&self.bytes_per_sector.to_le_bytes());
        buf[13] = self.sectors_per_cluster;
        buf[14..16].copy_from_slice(&self.reserved_sectors.to_le_bytes());
        buf[16] = self.num_fats;
        buf[17..19].copy_from_slice(&self.max_root_dir_entries.to_le_bytes());
        buf[19..21].copy_from_slice(&self.total_sectors.to_le_bytes());
        buf[21] = self.media_descriptor;
        buf[22..24].copy_from_slice(&self.sectors_per_fat.to_le_bytes());
        buf[24..26].copy_from_slice(&self.sectors_per_track.to_le_bytes());
        buf[26..28].copy_from_slice(&self.heads.to_le_bytes());
        buf[28..32].copy_from_slice(&self.hidden_sectors.to_le_bytes());
        buf[32..36].copy_from_slice(&self.large_sector_count.to_le_bytes());
        buf[36] = self.drive_number;
        buf[37] = self.reserved;
        buf[38] = self.signature;
        buf[39..43].copy_from_slice(&self.volume_id.to_le_bytes());
        buf[43..54].copy_from_slice(&self.volume_label);
        buf[54..62].copy_from_slice(&self.system_id);
        Ok(())
    }

    pub fn fat_start_lba(&self) -> u32 { self.reserved_sectors as u32 }

    pub fn root_dir_start_lba(&self) -> u32 {
        self.fat_start_lba() + self.sectors_per_fat as u32 * self.num_fats as u32
    }

    /// Sectors taken by the root directory, rounded up to a whole sector.
    pub fn root_dir_sectors(&self) -> u32 {
        let size = self.max_root_dir_entries as u32 * DIR_ENTRY_SIZE as u32;
        size.div_ceil(self.bytes_per_sector as u32)
    }

    pub fn data_start_lba(&self) -> u32 { self.root_dir_start_lba() + self.root_dir_sectors() }

    pub fn bytes_per_cluster(&self) -> u32 {
        self.sectors_per_cluster as u32 * self.bytes_per_sector as u32
    }

    pub fn fat_size_bytes(&self) -> usize {
        self.sectors_per_fat as usize * self.bytes_per_sector as usize
    }
}
