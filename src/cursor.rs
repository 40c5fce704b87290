//! Little-endian reader over `&[u8]`.

use crate::error::CoolError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    Header,
    Payload,
}

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    region: Region,
}

impl<'a> Cursor<'a> {
    /// Reader over header bytes; running out is `TruncatedInput`.
    pub(crate) fn header(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            region: Region::Header,
        }
    }

    /// Reader over pixel data; running out is `InsufficientPixelData`.
    pub(crate) fn payload(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            region: Region::Payload,
        }
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn short(&self, n: usize) -> CoolError {
        let needed = self.pos.saturating_add(n);
        let actual = self.data.len();
        match self.region {
            Region::Header => CoolError::TruncatedInput { needed, actual },
            Region::Payload => CoolError::InsufficientPixelData { needed, actual },
        }
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CoolError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.short(n))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), CoolError> {
        self.read_bytes(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CoolError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, CoolError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub(crate) fn read_u16_le(&mut self) -> Result<u16, CoolError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub(crate) fn read_u32_le(&mut self) -> Result<u32, CoolError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub(crate) fn read_i32_le(&mut self) -> Result<i32, CoolError> {
        self.read_array().map(i32::from_le_bytes)
    }
}
