use crate::error::{Error, Result};
use std::ops::Range;

/// A byte buffer that holds a mutable or immutable byte slice.
#[derive(Debug)]
enum Buffer<'a> {
    Immutable(&'a [u8]),
    Mutable(&'a mut [u8]),
}

impl Buffer<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Immutable(bytes) => bytes,
            Buffer::Mutable(bytes) => bytes,
        }
    }

    fn as_slice_mut(&mut self) -> Option<&mut [u8]> {
        match self {
            Buffer::Immutable(_) => None,
            Buffer::Mutable(bytes) => Some(bytes),
        }
    }
}

/// A bounds checked window over a shared byte buffer.
///
/// A view never owns the bytes it reads: writes through a mutable view land directly in the
/// backing buffer and are seen by every later reader of the same range.
///
/// Multi-byte values are read and written in network byte order (big-endian). Bit fields are
/// numbered from the most significant bit of the first byte of the view.
///
/// The `offset` of a view is the absolute position of its first byte within the root buffer it
/// was derived from and is carried through to sub-views.
#[derive(Debug)]
pub struct ByteView<'a> {
    buf: Buffer<'a>,
    offset: usize,
}

impl<'a> ByteView<'a> {
    /// A read-only view over `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            buf: Buffer::Immutable(bytes),
            offset: 0,
        }
    }

    /// A mutable view over `bytes`.
    #[must_use]
    pub fn new_mut(bytes: &'a mut [u8]) -> Self {
        Self {
            buf: Buffer::Mutable(bytes),
            offset: 0,
        }
    }

    /// Set the absolute offset of this view within its root buffer.
    #[must_use]
    pub fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    #[must_use]
    pub fn is_mutable(&self) -> bool {
        matches!(self.buf, Buffer::Mutable(_))
    }

    /// Access the view as an immutable slice of bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Access the view as a mutable slice of bytes.
    pub fn as_slice_mut(&mut self) -> Result<&mut [u8]> {
        self.buf.as_slice_mut().ok_or(Error::ReadOnlyBuffer)
    }

    /// A read-only sub-view of `len` bytes starting at `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<ByteView<'_>> {
        let range = self.range(start, len)?;
        Ok(ByteView {
            buf: Buffer::Immutable(&self.as_slice()[range]),
            offset: self.offset + start,
        })
    }

    /// A mutable sub-view of `len` bytes starting at `start`.
    pub fn slice_mut(&mut self, start: usize, len: usize) -> Result<ByteView<'_>> {
        let range = self.range(start, len)?;
        let offset = self.offset + start;
        let bytes = self.as_slice_mut()?;
        Ok(ByteView {
            buf: Buffer::Mutable(&mut bytes[range]),
            offset,
        })
    }

    /// Narrow this view to `len` bytes starting at `start`, keeping the backing lifetime.
    pub fn narrow(self, start: usize, len: usize) -> Result<ByteView<'a>> {
        let range = self.range(start, len)?;
        let offset = self.offset + start;
        let buf = match self.buf {
            Buffer::Immutable(bytes) => Buffer::Immutable(&bytes[range]),
            Buffer::Mutable(bytes) => Buffer::Mutable(&mut bytes[range]),
        };
        Ok(ByteView { buf, offset })
    }

    pub fn get_u8(&self, offset: usize) -> Result<u8> {
        let [b] = self.get_array::<1>(offset)?;
        Ok(b)
    }

    pub fn get_u16(&self, offset: usize) -> Result<u16> {
        Ok(u16::from_be_bytes(self.get_array(offset)?))
    }

    pub fn get_u32(&self, offset: usize) -> Result<u32> {
        Ok(u32::from_be_bytes(self.get_array(offset)?))
    }

    /// Get N bytes at a given byte offset.
    pub fn get_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let range = self.range(offset, N)?;
        let mut bytes = [0_u8; N];
        bytes.copy_from_slice(&self.as_slice()[range]);
        Ok(bytes)
    }

    pub fn set_u8(&mut self, offset: usize, val: u8) -> Result<()> {
        self.set_array(offset, [val])
    }

    pub fn set_u16(&mut self, offset: usize, val: u16) -> Result<()> {
        self.set_array(offset, val.to_be_bytes())
    }

    pub fn set_u32(&mut self, offset: usize, val: u32) -> Result<()> {
        self.set_array(offset, val.to_be_bytes())
    }

    /// Set N bytes at a given byte offset.
    pub fn set_array<const N: usize>(&mut self, offset: usize, bytes: [u8; N]) -> Result<()> {
        let range = self.range(offset, N)?;
        self.as_slice_mut()?[range].copy_from_slice(&bytes);
        Ok(())
    }

    /// Get a bit field of `bit_width` bits starting `bit_offset` bits into the view.
    pub fn get_bits(&self, bit_offset: usize, bit_width: usize) -> Result<u64> {
        self.check_bits(bit_offset, bit_width)?;
        Ok(self.read_bits(bit_offset, bit_width))
    }

    /// Set a bit field of `bit_width` bits starting `bit_offset` bits into the view.
    ///
    /// Bits of `val` beyond `bit_width` are ignored.
    pub fn set_bits(&mut self, bit_offset: usize, bit_width: usize, val: u64) -> Result<()> {
        self.check_bits(bit_offset, bit_width)?;
        if !self.is_mutable() {
            return Err(Error::ReadOnlyBuffer);
        }
        self.write_bits(bit_offset, bit_width, val);
        Ok(())
    }

    /// Get the value at a given offset.
    ///
    /// Codecs only call this for offsets within the minimum size validated on construction.
    pub(crate) fn read(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    /// Set the value at a given offset.
    pub(crate) fn write(&mut self, offset: usize) -> &mut u8 {
        &mut self.bytes_mut()[offset]
    }

    /// Get N bytes from the view at a given byte offset.
    pub(crate) fn get_bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        core::array::from_fn(|i| self.read(offset + i))
    }

    /// Set N bytes in the view at a given offset.
    pub(crate) fn set_bytes<const N: usize>(&mut self, offset: usize, bytes: [u8; N]) {
        self.bytes_mut()[offset..offset + N].copy_from_slice(&bytes);
    }

    /// Copy `bytes` into the view at a given offset.
    pub(crate) fn set_slice(&mut self, offset: usize, bytes: &[u8]) {
        self.bytes_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        match self.buf.as_slice_mut() {
            Some(bytes) => bytes,
            None => panic!("write operation called on readonly buffer"),
        }
    }

    pub(crate) fn read_bits(&self, bit_offset: usize, bit_width: usize) -> u64 {
        let (first, last, shift) = bit_span(bit_offset, bit_width);
        let acc = fold_be(&self.as_slice()[first..=last]);
        ((acc >> shift) & u128::from(bit_mask(bit_width))) as u64
    }

    pub(crate) fn write_bits(&mut self, bit_offset: usize, bit_width: usize, val: u64) {
        let (first, last, shift) = bit_span(bit_offset, bit_width);
        let bytes = &mut self.bytes_mut()[first..=last];
        let mask = u128::from(bit_mask(bit_width)) << shift;
        let acc = (fold_be(bytes) & !mask) | ((u128::from(val) << shift) & mask);
        for (i, b) in bytes.iter_mut().rev().enumerate() {
            *b = (acc >> (8 * i)) as u8;
        }
    }

    fn range(&self, start: usize, len: usize) -> Result<Range<usize>> {
        match start.checked_add(len) {
            Some(end) if end <= self.len() => Ok(start..end),
            _ => Err(Error::OutOfRange {
                offset: start,
                length: len,
                bound: self.len(),
            }),
        }
    }

    fn check_bits(&self, bit_offset: usize, bit_width: usize) -> Result<()> {
        if bit_width == 0 || bit_width > 64 {
            return Err(Error::InvalidBitWidth(bit_width));
        }
        match bit_offset.checked_add(bit_width) {
            Some(end) if end <= self.len().saturating_mul(8) => Ok(()),
            _ => Err(Error::OutOfRange {
                offset: bit_offset / 8,
                length: bit_width.div_ceil(8),
                bound: self.len(),
            }),
        }
    }
}

/// The first and last byte touched by a bit field and the right shift which aligns it.
const fn bit_span(bit_offset: usize, bit_width: usize) -> (usize, usize, usize) {
    let end = bit_offset + bit_width;
    let first = bit_offset / 8;
    let last = (end - 1) / 8;
    (first, last, (last + 1) * 8 - end)
}

const fn bit_mask(bit_width: usize) -> u64 {
    if bit_width >= 64 {
        u64::MAX
    } else {
        (1 << bit_width) - 1
    }
}

// a bit field spans at most 9 bytes
fn fold_be(bytes: &[u8]) -> u128 {
    bytes
        .iter()
        .fold(0_u128, |acc, b| (acc << 8) | u128::from(*b))
}
