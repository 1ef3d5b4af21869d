use crate::fs::block_device::{BlockDevice, SectorReader};
use crate::fs::boot_sector::BootSector;
use crate::fs::error::FsError;
use crate::fs::fat_constants::*;

/// One 32-byte root directory record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DirectoryEntry {
    pub name: [u8; SHORT_NAME_LEN],
    pub attr: u8,
    pub reserved: u8,
    pub created_time_tenths: u8,
    pub created_time: u16,
    pub created_date: u16,
    pub accessed_date: u16,
    pub first_cluster_high: u16,
    pub modified_time: u16,
    pub modified_date: u16,
    pub first_cluster_low: u16,
    pub size: u32,
}

impl DirectoryEntry {
    pub fn parse(raw: &[u8; DIR_ENTRY_SIZE]) -> Self {
        let le16 = |off: usize| u16::from_le_bytes([raw[off], raw[off + 1]]);
        let mut name = [0u8; SHORT_NAME_LEN];
        name.copy_from_slice(&raw[0..11]);
        DirectoryEntry {
            name,
            attr: raw[11],
            reserved: raw[12],
            created_time_tenths: raw[13],
            created_time: le16(14),
            created_date: le16(16),
            accessed_date: le16(18),
            first_cluster_high: le16(20),
            modified_time: le16(22),
            modified_date: le16(24),
            first_cluster_low: le16(26),
            size: u32::from_le_bytes([raw[28], raw[29], raw[30], raw[31]]),
        }
    }

    pub fn serialize(&self, out: &mut [u8; DIR_ENTRY_SIZE]) {
        out[0..11].copy_from_slice(&self.name);
        out[11] = self.attr;
        out[12] = self.reserved;
        out[13] = self.created_time_tenths;
        out[14..16].copy_from_slice(&self.created_time.to_le_bytes());
        out[16..18].copy_from_slice(&self.created_date.to_le_bytes());
        out[18..20].copy_from_slice(&self.accessed_date.to_le_bytes());
        out[20..22].copy_from_slice(&self.first_cluster_high.to_le_bytes());
        out[22..24].copy_from_slice(&self.modified_time.to_le_bytes());
        out[24..26].copy_from_slice(&self.modified_date.to_le_bytes());
        out[26..28].copy_from_slice(&self.first_cluster_low.to_le_bytes());
        out[28..32].copy_from_slice(&self.size.to_le_bytes());
    }

    pub fn is_end_marker(&self) -> bool { self.name[0] == DIR_ENTRY_END }
    pub fn is_deleted(&self) -> bool { self.name[0] == DIR_ENTRY_DELETED }
    pub fn is_long_name(&self) -> bool { self.attr & ATTR_LONG_NAME == ATTR_LONG_NAME }
    pub fn is_volume_label(&self) -> bool { !self.is_long_name() && self.attr & ATTR_VOLUME_ID != 0 }
    pub fn is_directory(&self) -> bool { self.attr & ATTR_DIRECTORY != 0 }

    /// "NAME.EXT" with the padding stripped, for listings.
    pub fn display_name(&self) -> String {
        let base = String::from_utf8_lossy(&self.name[0..8]);
        let ext = String::from_utf8_lossy(&self.name[8..11]);
        let base = base.trim_end_matches(' ');
        let ext = ext.trim_end_matches(' ');
        if ext.is_empty() {
            String::from(base)
        } else {
            format!("{base}.{ext}")
        }
    }
}

/// Turn a human name like `kernel.bin` into the padded on-disk form `KERNEL  BIN`.
/// Parts longer than 8 or 3 characters are cut.
pub fn short_name(name: &str) -> [u8; SHORT_NAME_LEN] {
    let up = name.to_ascii_uppercase();
    let (base, ext) = match up.rsplit_once('.') {
        Some((b, e)) if !b.is_empty() => (b, e),
        _ => (up.as_str(), ""),
    };
    let mut out = [b' '; SHORT_NAME_LEN];
    for (i, &b) in base.as_bytes().iter().take(8).enumerate() {
        out[i] = b;
    }
    for (i, &b) in ext.as_bytes().iter().take(3).enumerate() {
        out[8 + i] = b;
    }
    out
}

/// The whole root directory, loaded once.
pub struct RootDirectory {
    entries: Vec<DirectoryEntry>,
    start_lba: u32,
    data_start_lba: u32,
}

impl RootDirectory {
    pub fn load<D: BlockDevice>(reader: &mut SectorReader<D>, bs: &BootSector) -> Result<Self, FsError> {
        let start_lba = bs.root_dir_start_lba();
        let sectors = bs.root_dir_sectors();
        let data_start_lba = start_lba + sectors;
        let raw = reader.read_sectors(start_lba, sectors)?;
        log::debug!(
            "loaded root directory: {} entries in {sectors} sectors at lba {start_lba}, data at lba {data_start_lba}",
            bs.max_root_dir_entries
        );
        Ok(Self::from_bytes(&raw, bs.max_root_dir_entries, start_lba, data_start_lba))
    }

    /// Build from a raw directory region. Slots beyond `raw` are dropped.
    pub fn from_bytes(raw: &[u8], num_entries: u16, start_lba: u32, data_start_lba: u32) -> Self {
        let entries = raw
            .chunks_exact(DIR_ENTRY_SIZE)
            .take(num_entries as usize)
            .map(|chunk| {
                let mut rec = [0u8; DIR_ENTRY_SIZE];
                rec.copy_from_slice(chunk);
                DirectoryEntry::parse(&rec)
            })
            .collect();
        RootDirectory { entries, start_lba, data_start_lba }
    }

    pub fn start_lba(&self) -> u32 { self.start_lba }

    /// First sector after the root directory, where cluster 2 begins.
    pub fn data_start_lba(&self) -> u32 { self.data_start_lba }

    /// Every slot, used or not.
    pub fn slots(&self) -> &[DirectoryEntry] { &self.entries }

    /// Exact 11-byte match over every slot; first hit wins.
    pub fn find(&self, name: &[u8; SHORT_NAME_LEN]) -> Option<DirectoryEntry> {
        self.entries.iter().find(|e| &e.name == name).copied()
    }

    /// Files and directories in use, stopping at the end marker.
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries
            .iter()
            .take_while(|e| !e.is_end_marker())
            .filter(|e| !e.is_deleted() && !e.is_long_name() && !e.is_volume_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &[u8; 11], cluster: u16, size: u32) -> DirectoryEntry {
        DirectoryEntry { name: *name, attr: ATTR_ARCHIVE, first_cluster_low: cluster, size, ..Default::default() }
    }

    fn region(entries: &[DirectoryEntry], slots: usize) -> Vec<u8> {
        let mut raw = vec![0u8; slots * DIR_ENTRY_SIZE];
        for (i, e) in entries.iter().enumerate() {
            let mut rec = [0u8; DIR_ENTRY_SIZE];
            e.serialize(&mut rec);
            raw[i * 32..i * 32 + 32].copy_from_slice(&rec);
        }
        raw
    }

    #[test]
    fn parse_reads_fixed_offsets() {
        let mut rec = [0u8; DIR_ENTRY_SIZE];
        rec[0..11].copy_from_slice(b"KERNEL  BIN");
        rec[11] = ATTR_ARCHIVE;
        rec[20..22].copy_from_slice(&0x0001u16.to_le_bytes());
        rec[26..28].copy_from_slice(&0x0123u16.to_le_bytes());
        rec[28..32].copy_from_slice(&70_000u32.to_le_bytes());
        let e = DirectoryEntry::parse(&rec);
        assert_eq!(&e.name, b"KERNEL  BIN");
        assert_eq!(e.first_cluster_high, 1);
        assert_eq!(e.first_cluster_low, 0x123);
        assert_eq!(e.size, 70_000);
        assert_eq!(e.display_name(), "KERNEL.BIN");
    }

    #[test]
    fn find_exact_padded_name() {
        let raw = region(&[entry(b"FOO     TXT", 2, 12), entry(b"BAR     TXT", 3, 7)], 16);
        let dir = RootDirectory::from_bytes(&raw, 16, 19, 20);
        let bar = dir.find(b"BAR     TXT").expect("BAR missing");
        assert_eq!(bar.first_cluster_low, 3);
        assert_eq!(bar.size, 7);
        assert!(dir.find(b"BAR.TXT    ").is_none());
        assert!(dir.find(b"bar     txt").is_none());
        assert!(dir.find(b"MISSING    ").is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let raw = region(&[entry(b"DUP     TXT", 2, 1), entry(b"DUP     TXT", 9, 2)], 4);
        let dir = RootDirectory::from_bytes(&raw, 4, 0, 1);
        assert_eq!(dir.find(b"DUP     TXT").unwrap().first_cluster_low, 2);
    }

    #[test]
    fn listing_skips_unused_slots() {
        let mut deleted = entry(b"GONE    TXT", 4, 1);
        deleted.name[0] = DIR_ENTRY_DELETED;
        let label = DirectoryEntry { name: *b"MY VOLUME  ", attr: ATTR_VOLUME_ID, ..Default::default() };
        let lfn = DirectoryEntry { name: *b"Ah\0e\0l\0l\0o\0", attr: ATTR_LONG_NAME, ..Default::default() };
        let raw = region(&[label, deleted, lfn, entry(b"HELLO   TXT", 2, 5)], 8);
        let dir = RootDirectory::from_bytes(&raw, 8, 0, 1);
        let names: Vec<String> = dir.entries().map(|e| e.display_name()).collect();
        assert_eq!(names, vec!["HELLO.TXT"]);
        assert_eq!(dir.slots().len(), 8);
    }

    #[test]
    fn slot_count_follows_boot_sector() {
        // 17 entries occupy two 512-byte sectors but only 17 slots are indexed
        let raw = vec![0u8; 1024];
        let dir = RootDirectory::from_bytes(&raw, 17, 0, 2);
        assert_eq!(dir.slots().len(), 17);
    }

    #[test]
    fn short_name_pads_and_uppercases() {
        assert_eq!(&short_name("kernel.bin"), b"KERNEL  BIN");
        assert_eq!(&short_name("README"), b"README     ");
        assert_eq!(&short_name("a.b"), b"A       B  ");
        assert_eq!(&short_name("verylongname.text"), b"VERYLONGTEX");
    }
}
