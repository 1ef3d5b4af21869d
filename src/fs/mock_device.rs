use crate::fs::block_device::BlockDevice;
use std::io;

/// In-memory image. Reads past the end come back short, like a truncated file.
pub struct MockDevice<'a> {
    pub buf: &'a [u8],
}

impl<'a> MockDevice<'a> {
    pub fn new(buf: &'a [u8]) -> Self { MockDevice { buf } }
    pub fn len(&self) -> u64 { self.buf.len() as u64 }
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }
}

impl<'a> BlockDevice for MockDevice<'a> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if offset >= self.len() { return Ok(0); }
        let start = offset as usize;
        let n = buf.len().min(self.buf.len() - start);
        buf[..n].copy_from_slice(&self.buf[start..start + n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_and_past_end_reads() {
        let data = [1u8, 2, 3, 4];
        let mut dev = MockDevice::new(&data);
        let mut out = [0u8; 3];
        assert_eq!(dev.read_at(2, &mut out).unwrap(), 2);
        assert_eq!(&out[..2], &[3, 4]);
        assert_eq!(dev.read_at(10, &mut out).unwrap(), 0);
    }
}
