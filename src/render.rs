use std::io::{self, Write};

/// Printable ASCII goes out as-is, every other byte as `<hh>`.
pub fn write_escaped(out: &mut impl Write, data: &[u8]) -> io::Result<()> {
    for &b in data {
        if (0x20..=0x7E).contains(&b) {
            out.write_all(&[b])?;
        } else {
            write!(out, "<{b:02x}>")?;
        }
    }
    Ok(())
}

pub fn escape(data: &[u8]) -> String {
    let mut out = Vec::with_capacity(data.len());
    // writing into a Vec cannot fail
    let _ = write_escaped(&mut out, data);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_bytes_pass_through() {
        assert_eq!(escape(b"Hello, World! ~"), "Hello, World! ~");
    }

    #[test]
    fn control_and_high_bytes_are_hex() {
        assert_eq!(escape(b"a\nb\0\x7f\xff"), "a<0a>b<00><7f><ff>");
    }
}
