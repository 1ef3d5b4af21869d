use crate::fs::block_device::{BlockDevice, SectorReader};
use crate::fs::boot_sector::BootSector;
use crate::fs::directory::{DirectoryEntry, RootDirectory};
use crate::fs::error::{FormatError, FsError, MountError};
use crate::fs::fat_constants::{FIRST_DATA_CLUSTER, SHORT_NAME_LEN};
use crate::fs::fat_table::{is_end_of_chain, FatTable};

/// Read every cluster of `entry`'s chain, whole clusters at a time.
///
/// The result is a multiple of the cluster size; bytes past `entry.size`
/// are whatever the last cluster holds. Any failed read aborts the walk and
/// nothing is returned.
pub fn read_cluster_chain<D: BlockDevice>(
    entry: &DirectoryEntry,
    fat: &FatTable,
    reader: &mut SectorReader<D>,
    bs: &BootSector,
    data_start_lba: u32,
) -> Result<Vec<u8>, FsError> {
    let cluster_bytes = bs.bytes_per_cluster() as usize;
    let clusters_needed = (entry.size as usize).div_ceil(cluster_bytes);
    let mut out: Vec<u8> = Vec::with_capacity(clusters_needed * cluster_bytes);

    let mut cluster = entry.first_cluster_low;
    let mut links = 0usize;
    loop {
        if cluster < FIRST_DATA_CLUSTER {
            log::error!("{}: chain reaches reserved cluster {cluster}", entry.display_name());
            return Err(FormatError::ReservedCluster(cluster).into());
        }
        if links >= fat.entry_count() {
            return Err(FormatError::ChainTooLong { start: entry.first_cluster_low }.into());
        }
        links += 1;

        let lba = data_start_lba + (cluster - FIRST_DATA_CLUSTER) as u32 * bs.sectors_per_cluster as u32;
        log::trace!("cluster {cluster:#05x} -> lba {lba}");
        let start = out.len();
        out.resize(start + cluster_bytes, 0);
        reader.read_sectors_into(lba, &mut out[start..])?;

        cluster = fat.next(cluster)?;
        if is_end_of_chain(cluster) { break; }
    }
    Ok(out)
}

/// A mounted volume: the image plus everything loaded from it up front.
pub struct FileSystem<D: BlockDevice> {
    reader: SectorReader<D>,
    boot_sector: BootSector,
    fat: FatTable,
    root: RootDirectory,
}

impl<D: BlockDevice> FileSystem<D> {
    pub fn mount(mut device: D) -> Result<Self, MountError> {
        let boot_sector = BootSector::read(&mut device).map_err(MountError::BootSector)?;
        let mut reader = SectorReader::new(device, boot_sector.bytes_per_sector);
        let fat = FatTable::load(&mut reader, &boot_sector).map_err(MountError::Fat)?;
        let root = RootDirectory::load(&mut reader, &boot_sector).map_err(MountError::RootDirectory)?;
        log::info!(
            "mounted FAT12 volume: {} sectors, data area at lba {}",
            boot_sector.total_sectors,
            root.data_start_lba()
        );
        Ok(FileSystem { reader, boot_sector, fat, root })
    }

    pub fn boot_sector(&self) -> &BootSector { &self.boot_sector }
    pub fn fat(&self) -> &FatTable { &self.fat }
    pub fn root_directory(&self) -> &RootDirectory { &self.root }

    pub fn find(&self, name: &[u8; SHORT_NAME_LEN]) -> Option<DirectoryEntry> {
        self.root.find(name)
    }

    pub fn list_root(&self) -> Vec<DirectoryEntry> {
        self.root.entries().copied().collect()
    }

    /// File content, exactly `entry.size` bytes.
    pub fn read_file(&mut self, entry: &DirectoryEntry) -> Result<Vec<u8>, FsError> {
        if entry.size == 0 {
            return Ok(Vec::new());
        }
        let mut out = read_cluster_chain(
            entry,
            &self.fat,
            &mut self.reader,
            &self.boot_sector,
            self.root.data_start_lba(),
        )?;
        if out.len() < entry.size as usize {
            return Err(FormatError::ChainTooShort { expected: entry.size, actual: out.len() }.into());
        }
        out.truncate(entry.size as usize);
        Ok(out)
    }

    pub fn read_file_by_name(&mut self, name: &[u8; SHORT_NAME_LEN]) -> Result<Vec<u8>, FsError> {
        let entry = self.find(name).ok_or(FsError::NotFound)?;
        self.read_file(&entry)
    }

    /// Cluster numbers of `entry`'s chain; empty for a zero-length file.
    pub fn cluster_chain(&self, entry: &DirectoryEntry) -> Result<Vec<u16>, FsError> {
        if entry.size == 0 && entry.first_cluster_low == 0 {
            return Ok(Vec::new());
        }
        self.fat.chain(entry.first_cluster_low)
    }
}
