//! Random-access reading primitives shared by both container engines.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};

/// A seekable byte source with its total length cached at construction.
///
/// Both engines walk a `Source` strictly forward; the only backwards moves
/// are peeks and the position save/restore around CRC recomputation.
#[derive(Debug)]
pub struct Source<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> Source<R> {
    /// Wrap a reader, caching its length and rewinding to the start.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    /// Total length of the underlying stream in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the underlying stream is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Move the read position to an absolute offset.
    pub fn set_position(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    /// Read one byte and restore the position.
    pub fn peek_u8(&mut self) -> Result<u8> {
        let pos = self.inner.stream_position()?;
        let byte = self.inner.read_u8()?;
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(byte)
    }

    pub fn read_be_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<BigEndian>()?)
    }

    pub fn read_be_u24(&mut self) -> Result<u32> {
        Ok(self.inner.read_u24::<BigEndian>()?)
    }

    pub fn read_be_u32(&mut self) -> Result<u32> {
        Ok(self.inner.read_u32::<BigEndian>()?)
    }

    pub fn read_be_u64(&mut self) -> Result<u64> {
        Ok(self.inner.read_u64::<BigEndian>()?)
    }

    pub fn read_be_i16(&mut self) -> Result<i16> {
        Ok(self.inner.read_i16::<BigEndian>()?)
    }

    pub fn read_be_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<BigEndian>()?)
    }

    pub fn read_be_i64(&mut self) -> Result<i64> {
        Ok(self.inner.read_i64::<BigEndian>()?)
    }

    /// Read a big-endian u32 and restore the position.
    pub fn peek_be_u32(&mut self) -> Result<u32> {
        let pos = self.inner.stream_position()?;
        let value = self.inner.read_u32::<BigEndian>()?;
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(value)
    }

    /// Read exactly `n` bytes into an owned vector.
    pub fn read_slice(&mut self, n: u64) -> Result<Vec<u8>> {
        if n > self.len {
            return Err(Error::FileEndedEarly);
        }
        let mut buf = vec![0u8; n as usize];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Fill a caller-provided buffer, used by the CRC verifier's block loop.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        Ok(())
    }
}

impl Source<std::fs::File> {
    /// Open a file, surfacing a missing path as [`Error::FileNotFound`] and
    /// an empty file as [`Error::FileEmpty`].
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound,
            _ => Error::Io(e),
        })?;
        let len = file.metadata().map_err(Error::Io)?.len();
        if len == 0 {
            return Err(Error::FileEmpty);
        }
        Ok(Self { inner: file, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn peek_restores_position() {
        let mut src = Source::new(Cursor::new(vec![1u8, 2, 3, 4, 5, 6, 7, 8])).unwrap();
        assert_eq!(src.peek_u8().unwrap(), 1);
        assert_eq!(src.position().unwrap(), 0);
        assert_eq!(src.peek_be_u32().unwrap(), 0x0102_0304);
        assert_eq!(src.position().unwrap(), 0);
        assert_eq!(src.read_be_u32().unwrap(), 0x0102_0304);
        assert_eq!(src.position().unwrap(), 4);
    }

    #[test]
    fn short_read_is_file_ended_early() {
        let mut src = Source::new(Cursor::new(vec![1u8, 2])).unwrap();
        assert!(matches!(src.read_slice(3), Err(Error::FileEndedEarly)));
        src.set_position(1).unwrap();
        assert!(matches!(src.read_be_u32(), Err(Error::FileEndedEarly)));
    }

    #[test]
    fn length_is_cached() {
        let mut src = Source::new(Cursor::new(vec![0u8; 37])).unwrap();
        assert_eq!(src.len(), 37);
        src.set_position(30).unwrap();
        assert_eq!(src.len(), 37);
    }
}
