//! Big-endian int framing and an in-memory byte sink.

use std::io::{self, Write};

use crate::error::{HarnessError, Result};

/// Decode a network-order `i32` from the first four bytes of `bytes`.
pub fn read_int(bytes: &[u8]) -> Result<i32> {
    let head: [u8; 4] = bytes
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            HarnessError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("need 4 bytes for an int, got {}", bytes.len()),
            ))
        })?;
    Ok(i32::from_be_bytes(head))
}

pub fn write_int(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Collects everything written to it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ByteArrayOutput {
    buffer: Vec<u8>,
}

impl ByteArrayOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// No-op; the buffer stays readable.
    pub fn close(&mut self) {}
}

impl Write for ByteArrayOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_are_network_order() {
        assert_eq!(write_int(1), [0, 0, 0, 1]);
        assert_eq!(write_int(-2), [0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(read_int(&[0, 0, 1, 0, 99]).unwrap(), 256);
        assert!(read_int(&[0, 1]).is_err());
    }

    #[test]
    fn byte_output_collects_framed_writes() {
        let mut out = ByteArrayOutput::new();
        out.write_all(&write_int(7)).unwrap();
        out.write_all(b"abc").unwrap();
        out.close();
        assert_eq!(read_int(out.as_bytes()).unwrap(), 7);
        assert_eq!(&out.into_inner()[4..], b"abc");
    }
}
