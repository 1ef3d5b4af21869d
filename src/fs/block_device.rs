use crate::fs::error::FsError;
use std::io;

/// Upper bound on one device read; large requests are split so a short image
/// is detected before the whole buffer is allocated.
const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Minimal byte-addressed medium the FAT modules read from.
pub trait BlockDevice {
    /// Read up to `buf.len()` bytes starting at byte `offset`.
    ///
    /// Returns how many bytes were filled. Anything short of `buf.len()`
    /// means the end of the medium was reached.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;
}

/// Sector-granular reads on top of a [`BlockDevice`], once the sector size is known.
pub struct SectorReader<D: BlockDevice> {
    device: D,
    bytes_per_sector: u16,
}

impl<D: BlockDevice> SectorReader<D> {
    pub fn new(device: D, bytes_per_sector: u16) -> Self {
        SectorReader { device, bytes_per_sector }
    }

    /// Read `count` sectors starting at `lba` into a new buffer.
    ///
    /// The buffer grows as data arrives, so a count larger than the medium
    /// fails at its end instead of allocating the full request up front.
    pub fn read_sectors(&mut self, lba: u32, count: u32) -> Result<Vec<u8>, FsError> {
        let sector = self.bytes_per_sector as usize;
        let per_chunk = (READ_CHUNK_BYTES / sector).max(1) as u32;
        let mut buf = Vec::new();
        let mut done = 0u32;
        while done < count {
            let n = per_chunk.min(count - done);
            let start = buf.len();
            buf.resize(start + n as usize * sector, 0);
            self.read_sectors_into(lba + done, &mut buf[start..])?;
            done += n;
        }
        Ok(buf)
    }

    /// Fill `buf` with the sectors starting at `lba`. `buf.len()` decides how
    /// much is read and should be a whole number of sectors.
    pub fn read_sectors_into(&mut self, lba: u32, buf: &mut [u8]) -> Result<(), FsError> {
        debug_assert_eq!(buf.len() % self.bytes_per_sector as usize, 0);
        let offset = lba as u64 * self.bytes_per_sector as u64;
        let got = self.device.read_at(offset, buf)?;
        if got < buf.len() {
            log::debug!("short read at lba {lba}: wanted {} bytes, got {got}", buf.len());
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("lba {lba}: read {got} of {} bytes", buf.len()),
            )));
        }
        Ok(())
    }
}
