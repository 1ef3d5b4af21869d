#![allow(dead_code)]

use fat12_reader::fs::fat_constants::{ATTR_ARCHIVE, DIR_ENTRY_SIZE};
use fat12_reader::fs::{BootSector, DirectoryEntry};

/// Lays out a FAT12 volume byte by byte, without going through any FAT library.
pub struct ImageBuilder {
    pub bs: BootSector,
    image: Vec<u8>,
    fat: Vec<u8>,
    next_cluster: u16,
    next_slot: usize,
}

impl ImageBuilder {
    /// 1.44MB floppy: 512-byte sectors, 1 sector/cluster, 2 FATs of 9 sectors, 224 root entries.
    pub fn floppy() -> Self {
        Self::new(BootSector {
            jump: [0xEB, 0x3C, 0x90],
            oem_id: *b"MSWIN4.1",
            bytes_per_sector: 512,
            sectors_per_cluster: 1,
            reserved_sectors: 1,
            num_fats: 2,
            max_root_dir_entries: 224,
            total_sectors: 2880,
            media_descriptor: 0xF0,
            sectors_per_fat: 9,
            sectors_per_track: 18,
            heads: 2,
            signature: 0x29,
            volume_id: 0xCAFE_F00D,
            volume_label: *b"TEST DISK  ",
            system_id: *b"FAT12   ",
            ..Default::default()
        })
    }

    pub fn new(bs: BootSector) -> Self {
        let image = vec![0u8; bs.total_sectors as usize * bs.bytes_per_sector as usize];
        let fat = vec![0u8; bs.fat_size_bytes()];
        let mut b = ImageBuilder { bs, image, fat, next_cluster: 2, next_slot: 0 };
        b.set_fat(0, 0xF00 | bs.media_descriptor as u16);
        b.set_fat(1, 0xFFF);
        b
    }

    pub fn set_fat(&mut self, cluster: u16, value: u16) -> &mut Self {
        let idx = cluster as usize * 3 / 2;
        let word = u16::from_le_bytes([self.fat[idx], self.fat[idx + 1]]);
        let word = if cluster % 2 == 0 {
            (word & 0xF000) | (value & 0x0FFF)
        } else {
            (word & 0x000F) | ((value & 0x0FFF) << 4)
        };
        self.fat[idx..idx + 2].copy_from_slice(&word.to_le_bytes());
        self
    }

    pub fn add_entry(&mut self, entry: DirectoryEntry) -> &mut Self {
        let mut rec = [0u8; DIR_ENTRY_SIZE];
        entry.serialize(&mut rec);
        let off = self.bs.root_dir_start_lba() as usize * self.bs.bytes_per_sector as usize
            + self.next_slot * DIR_ENTRY_SIZE;
        self.image[off..off + DIR_ENTRY_SIZE].copy_from_slice(&rec);
        self.next_slot += 1;
        self
    }

    /// Store `data` in consecutive free clusters.
    pub fn add_file(&mut self, name: &[u8; 11], data: &[u8]) -> &mut Self {
        let count = data.len().div_ceil(self.bs.bytes_per_cluster() as usize) as u16;
        let clusters: Vec<u16> = (self.next_cluster..self.next_cluster + count).collect();
        self.add_file_at(name, data, &clusters)
    }

    /// Store `data` in exactly the given clusters, linked in that order.
    pub fn add_file_at(&mut self, name: &[u8; 11], data: &[u8], clusters: &[u16]) -> &mut Self {
        let cluster_bytes = self.bs.bytes_per_cluster() as usize;
        for (i, &c) in clusters.iter().enumerate() {
            let next = clusters.get(i + 1).copied().unwrap_or(0xFFF);
            self.set_fat(c, next);
            let chunk = &data[(i * cluster_bytes).min(data.len())..((i + 1) * cluster_bytes).min(data.len())];
            let off = self.cluster_offset(c);
            self.image[off..off + chunk.len()].copy_from_slice(chunk);
            self.next_cluster = self.next_cluster.max(c + 1);
        }
        self.add_entry(DirectoryEntry {
            name: *name,
            attr: ATTR_ARCHIVE,
            first_cluster_low: clusters.first().copied().unwrap_or(0),
            size: data.len() as u32,
            ..Default::default()
        })
    }

    /// Fill a cluster's bytes directly, e.g. to put garbage after a file's end.
    pub fn fill_cluster(&mut self, cluster: u16, byte: u8) -> &mut Self {
        let off = self.cluster_offset(cluster);
        let len = self.bs.bytes_per_cluster() as usize;
        self.image[off..off + len].fill(byte);
        self
    }

    fn cluster_offset(&self, cluster: u16) -> usize {
        let lba = self.bs.data_start_lba() as usize
            + (cluster as usize - 2) * self.bs.sectors_per_cluster as usize;
        lba * self.bs.bytes_per_sector as usize
    }

    pub fn build(&self) -> Vec<u8> {
        let mut image = self.image.clone();
        self.bs.serialize(&mut image).expect("boot sector does not fit");
        let bps = self.bs.bytes_per_sector as usize;
        if bps >= 512 {
            image[510] = 0x55;
            image[511] = 0xAA;
        }
        for copy in 0..self.bs.num_fats as usize {
            let off = (self.bs.fat_start_lba() as usize + copy * self.bs.sectors_per_fat as usize) * bps;
            image[off..off + self.fat.len()].copy_from_slice(&self.fat);
        }
        image
    }
}

/// Deterministic filler so multi-cluster contents are not all the same byte.
pub fn pattern(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x >> 24) as u8
        })
        .collect()
}
