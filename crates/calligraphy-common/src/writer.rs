//! Binary writer, the inverse of [`BinaryReader`](crate::BinaryReader).

use byteorder::{LittleEndian, WriteBytesExt};
use zerocopy::{Immutable, IntoBytes};

use crate::{Error, Result};

/// Little-endian writer into a growable byte buffer.
///
/// # Example
///
/// ```
/// use calligraphy_common::{BinaryReader, BinaryWriter};
///
/// let mut writer = BinaryWriter::new();
/// writer.write_u16(0x0201).unwrap();
/// writer.write_u64(7).unwrap();
///
/// let bytes = writer.into_inner();
/// let mut reader = BinaryReader::new(&bytes);
/// assert_eq!(reader.read_u16().unwrap(), 0x0201);
/// assert_eq!(reader.read_u64().unwrap(), 7);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a pre-allocated buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Borrow the written bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Take the written bytes.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.buffer.write_u8(value)?)
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.buffer.write_u16::<LittleEndian>(value)?)
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.buffer.write_u32::<LittleEndian>(value)?)
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        Ok(self.buffer.write_u64::<LittleEndian>(value)?)
    }

    #[inline]
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        Ok(self.buffer.write_i64::<LittleEndian>(value)?)
    }

    #[inline]
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        Ok(self.buffer.write_f64::<LittleEndian>(value)?)
    }

    /// Write a count into a u16 wire field, failing if it does not fit.
    pub fn write_count_u16(&mut self, what: &'static str, count: usize) -> Result<()> {
        let value = u16::try_from(count).map_err(|_| Error::CountOverflow {
            what,
            count,
            max: u16::MAX as usize,
        })?;
        self.write_u16(value)
    }

    /// Write a struct's raw bytes using zerocopy.
    #[inline]
    pub fn write_struct<T: IntoBytes + Immutable>(&mut self, value: &T) {
        self.buffer.extend_from_slice(value.as_bytes());
    }
}
