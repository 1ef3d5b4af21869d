use crate::fs::block_device::{BlockDevice, SectorReader};
use crate::fs::boot_sector::BootSector;
use crate::fs::error::{FormatError, FsError};
use crate::fs::fat_constants::{FAT12_ENTRY_MASK, FAT12_EOC_MIN, FIRST_DATA_CLUSTER};

/// In-memory copy of the first FAT.
pub struct FatTable {
    data: Vec<u8>,
}

/// True for the FAT12 end-of-chain range `0xFF8..=0xFFF`.
pub fn is_end_of_chain(value: u16) -> bool {
    value >= FAT12_EOC_MIN
}

impl FatTable {
    pub fn load<D: BlockDevice>(reader: &mut SectorReader<D>, bs: &BootSector) -> Result<Self, FsError> {
        let data = reader.read_sectors(bs.fat_start_lba(), bs.sectors_per_fat as u32)?;
        log::debug!("loaded FAT: {} bytes at lba {}", data.len(), bs.fat_start_lba());
        Ok(FatTable { data })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self { FatTable { data } }

    pub fn as_bytes(&self) -> &[u8] { &self.data }

    /// Number of 12-bit entries that fit completely in the table.
    pub fn entry_count(&self) -> usize { self.data.len() * 2 / 3 }

    /// Read the FAT12 entry (12-bit) for `cluster`.
    pub fn next(&self, cluster: u16) -> Result<u16, FsError> {
        let idx = cluster as usize * 3 / 2;
        if idx + 1 >= self.data.len() {
            return Err(FormatError::FatIndexOutOfRange { cluster, table_len: self.data.len() }.into());
        }
        let word = u16::from_le_bytes([self.data[idx], self.data[idx + 1]]);
        if cluster % 2 == 0 {
            Ok(word & FAT12_ENTRY_MASK)
        } else {
            Ok(word >> 4)
        }
    }

    /// Follow chain starting at `start` until end of chain and return every cluster visited.
    pub fn chain(&self, start: u16) -> Result<Vec<u16>, FsError> {
        let mut out = Vec::new();
        let mut cur = start;
        loop {
            if cur < FIRST_DATA_CLUSTER {
                return Err(FormatError::ReservedCluster(cur).into());
            }
            if out.len() >= self.entry_count() {
                return Err(FormatError::ChainTooLong { start }.into());
            }
            out.push(cur);
            let next = self.next(cur)?;
            if is_end_of_chain(next) { break; }
            cur = next;
        }
        Ok(out)
    }
}
