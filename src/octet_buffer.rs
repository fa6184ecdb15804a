//! Buffered octet output with mark/resume semantics, plus a plain octet reader.
//!
//! `OctetBuffer` batches writes into an owned `Vec<u8>` and hands full batches
//! to the sink. While a mark is set the buffer never flushes: octets at or
//! after the mark may still be patched (the element octet of a
//! namespace-bearing element learns its attribute flag late), so the buffer
//! grows instead.

use std::io::Write;

use crate::{Error, Result};

/// Default batch size before octets are handed to the sink.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Growable octet buffer in front of an output sink.
#[derive(Debug)]
pub struct OctetBuffer<W: Write> {
    buf: Vec<u8>,
    /// Kapazitaet ab der geflusht wird (waechst nur bei gesetzter Mark).
    capacity: usize,
    mark: Option<usize>,
    sink: W,
}

impl<W: Write> OctetBuffer<W> {
    /// Creates a buffer with [`DEFAULT_BUFFER_SIZE`] in front of `sink`.
    pub fn new(sink: W) -> Self {
        Self::with_capacity(sink, DEFAULT_BUFFER_SIZE)
    }

    /// Creates a buffer that flushes in batches of `capacity` octets.
    pub fn with_capacity(sink: W, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            mark: None,
            sink,
        }
    }

    /// Writes one octet.
    ///
    /// A full buffer without mark is handed to the sink first; with a mark
    /// it grows by half its size.
    #[inline]
    pub fn write(&mut self, octet: u8) -> Result<()> {
        if self.buf.len() >= self.capacity {
            if self.mark.is_none() {
                self.sink.write_all(&self.buf)?;
                self.buf.clear();
            } else {
                self.resize(self.capacity * 3 / 2);
            }
        }
        self.buf.push(octet);
        Ok(())
    }

    /// Writes a slice of octets.
    ///
    /// Without mark an overflowing slice is written straight through to the
    /// sink after the pending batch.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.buf.len() + bytes.len() < self.capacity {
            self.buf.extend_from_slice(bytes);
        } else if self.mark.is_none() {
            self.sink.write_all(&self.buf)?;
            self.sink.write_all(bytes)?;
            self.buf.clear();
        } else {
            self.resize((self.capacity + bytes.len()) * 3 / 2 + 1);
            self.buf.extend_from_slice(bytes);
        }
        Ok(())
    }

    /// Guarantees room for `additional` octets without an intermediate flush.
    pub fn ensure_size(&mut self, additional: usize) {
        let needed = self.buf.len() + additional;
        if needed > self.capacity {
            self.resize(needed * 3 / 2 + 1);
        }
    }

    fn resize(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.buf.reserve(capacity.saturating_sub(self.buf.len()));
    }

    /// Remembers the current position; octets from here on stay patchable.
    pub fn mark(&mut self) {
        self.mark = Some(self.buf.len());
    }

    /// Clears the mark, allowing flushes again.
    pub fn reset_mark(&mut self) {
        self.mark = None;
    }

    pub fn has_mark(&self) -> bool {
        self.mark.is_some()
    }

    /// ORs `bits` into the octet at the mark.
    ///
    /// Returns `IllegalState` if no mark is set or nothing was written after it.
    pub fn or_at_mark(&mut self, bits: u8) -> Result<()> {
        let octet = self
            .mark
            .and_then(|pos| self.buf.get_mut(pos))
            .ok_or(Error::IllegalState { table: "mark", octet: bits })?;
        *octet |= bits;
        Ok(())
    }

    /// Hands all buffered octets to the sink (does not flush the sink itself).
    pub fn flush_buffer(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.sink.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Writes buffered octets and flushes the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.flush_buffer()?;
        self.sink.flush()?;
        Ok(())
    }

    /// Discards buffered octets and the mark (between documents).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.mark = None;
    }

    /// Octets currently held in the buffer.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush_buffer()?;
        Ok(self.sink)
    }
}

// ============================================================================
// OctetReader
// ============================================================================

/// Cursor over an octet slice, used by the decode helpers.
#[derive(Debug, Clone)]
pub struct OctetReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> OctetReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn read(&mut self) -> Result<u8> {
        let b = *self.data.get(self.pos).ok_or(Error::PrematureEndOfStream)?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    pub fn peek(&self) -> Result<u8> {
        self.data.get(self.pos).copied().ok_or(Error::PrematureEndOfStream)
    }

    /// Reads `n` octets as a borrowed slice.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::PrematureEndOfStream)?;
        let slice = self.data.get(self.pos..end).ok_or(Error::PrematureEndOfStream)?;
        self.pos = end;
        Ok(slice)
    }

    /// Reads a big-endian `u32` (the large tier of the length codecs).
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink der jeden write-Aufruf einzeln protokolliert.
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl RecordingSink {
        fn all(&self) -> Vec<u8> {
            self.writes.concat()
        }
    }

    // --- write(u8) ---

    #[test]
    fn single_octets_stay_buffered_until_full() {
        let mut b = OctetBuffer::with_capacity(RecordingSink::default(), 4);
        for i in 0..4 {
            b.write(i).unwrap();
        }
        assert!(b.sink().writes.is_empty());
        b.write(4).unwrap();
        assert_eq!(b.sink().all(), vec![0, 1, 2, 3]);
        assert_eq!(b.buffered(), &[4]);
    }

    #[test]
    fn marked_buffer_grows_instead_of_flushing() {
        let mut b = OctetBuffer::with_capacity(RecordingSink::default(), 4);
        b.mark();
        for i in 0..10 {
            b.write(i).unwrap();
        }
        assert!(b.sink().writes.is_empty());
        assert_eq!(b.len(), 10);
        b.reset_mark();
        b.flush().unwrap();
        assert_eq!(b.sink().all(), (0..10).collect::<Vec<u8>>());
    }

    // --- write_bytes ---

    #[test]
    fn overflowing_slice_is_written_through() {
        let mut b = OctetBuffer::with_capacity(RecordingSink::default(), 4);
        b.write(0xAA).unwrap();
        b.write_bytes(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(b.sink().writes, vec![vec![0xAA], vec![1, 2, 3, 4, 5]]);
        assert!(b.is_empty());
    }

    #[test]
    fn overflowing_slice_with_mark_is_kept() {
        let mut b = OctetBuffer::with_capacity(RecordingSink::default(), 4);
        b.mark();
        b.write(0x38).unwrap();
        b.write_bytes(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert!(b.sink().writes.is_empty());
        assert_eq!(b.buffered(), &[0x38, 1, 2, 3, 4, 5, 6]);
    }

    // --- mark / patch ---

    #[test]
    fn or_at_mark_patches_marked_octet() {
        let mut b = OctetBuffer::new(Vec::new());
        b.write(0xF0).unwrap();
        b.mark();
        b.write(0x38).unwrap();
        b.write(0xCC).unwrap();
        b.or_at_mark(0x40).unwrap();
        assert_eq!(b.buffered(), &[0xF0, 0x78, 0xCC]);
        assert!(b.has_mark());
    }

    #[test]
    fn or_at_mark_without_mark_fails() {
        let mut b = OctetBuffer::new(Vec::new());
        b.write(0).unwrap();
        assert!(b.or_at_mark(0x40).is_err());
    }

    #[test]
    fn ensure_size_prevents_intermediate_flush() {
        let mut b = OctetBuffer::with_capacity(RecordingSink::default(), 2);
        b.ensure_size(8);
        for i in 0..8 {
            b.write(i).unwrap();
        }
        assert!(b.sink().writes.is_empty());
    }

    #[test]
    fn flush_flushes_sink_and_reset_discards() {
        let mut b = OctetBuffer::new(RecordingSink::default());
        b.write_bytes(&[1, 2]).unwrap();
        b.flush().unwrap();
        assert_eq!(b.sink().flushes, 1);
        b.write(9).unwrap();
        b.mark();
        b.reset();
        assert!(b.is_empty());
        assert!(!b.has_mark());
        assert_eq!(b.into_inner().unwrap().all(), vec![1, 2]);
    }

    // --- OctetReader ---

    #[test]
    fn reader_reads_and_reports_eof() {
        let data = [1u8, 2, 0, 0, 1, 0];
        let mut r = OctetReader::new(&data);
        assert_eq!(r.peek().unwrap(), 1);
        assert_eq!(r.read().unwrap(), 1);
        assert_eq!(r.read_bytes(1).unwrap(), &[2]);
        assert_eq!(r.read_u32().unwrap(), 0x0000_0100);
        assert_eq!(r.remaining(), 0);
        assert!(r.is_at_end());
        assert_eq!(r.read(), Err(Error::PrematureEndOfStream));
    }
}
