//! Bounds-checked binary reader.

use crate::BufferError;

/// A cursor over a borrowed byte slice.
///
/// All multi-byte reads are big-endian. The `try_*` methods never advance
/// the cursor on failure, so the position reported in a decode error is
/// the position of the item that could not be read.
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Remaining bytes from the cursor to the end of input.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        // Subtraction cannot overflow: the cursor never passes the end.
        if n > self.uint8.len() - self.x {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Looks at the current byte without advancing.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    #[inline]
    pub fn try_u16(&mut self) -> Result<u16, BufferError> {
        self.check(2)?;
        let x = self.x;
        let val = u16::from_be_bytes([self.uint8[x], self.uint8[x + 1]]);
        self.x += 2;
        Ok(val)
    }

    #[inline]
    pub fn try_u32(&mut self) -> Result<u32, BufferError> {
        self.check(4)?;
        let x = self.x;
        let val = u32::from_be_bytes([
            self.uint8[x],
            self.uint8[x + 1],
            self.uint8[x + 2],
            self.uint8[x + 3],
        ]);
        self.x += 4;
        Ok(val)
    }

    #[inline]
    pub fn try_u64(&mut self) -> Result<u64, BufferError> {
        self.check(8)?;
        let x = self.x;
        let val = u64::from_be_bytes([
            self.uint8[x],
            self.uint8[x + 1],
            self.uint8[x + 2],
            self.uint8[x + 3],
            self.uint8[x + 4],
            self.uint8[x + 5],
            self.uint8[x + 6],
            self.uint8[x + 7],
        ]);
        self.x += 8;
        Ok(val)
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        let end = x + size;
        self.x = end;
        Ok(&self.uint8[x..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_widths_in_order() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_u8(), Ok(0x01));
        assert_eq!(reader.try_u16(), Ok(0x0203));
        assert_eq!(reader.try_u32(), Ok(0x04050607));
        assert_eq!(reader.size(), 0);
    }

    #[test]
    fn u64_roundtrip() {
        let data = 0x0102030405060708u64.to_be_bytes();
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_u64(), Ok(0x0102030405060708));
    }

    #[test]
    fn short_read_does_not_advance() {
        let data = [0x01];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_u16(), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.x, 0);
        assert_eq!(reader.try_u8(), Ok(0x01));
    }

    #[test]
    fn peek_leaves_cursor() {
        let data = [0x55];
        let reader = Reader::new(&data);
        assert_eq!(reader.try_peek(), Ok(0x55));
        assert_eq!(reader.x, 0);
    }

    #[test]
    fn buf_and_bounds() {
        let data = [1u8, 2, 3, 4];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_buf(3), Ok([1u8, 2, 3].as_ref()));
        assert_eq!(reader.try_buf(2), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.x, 3);
    }

    #[test]
    fn oversized_request_fails_without_overflow() {
        let data = [1u8, 2];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_buf(usize::MAX), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.x, 0);
        reader.try_buf(2).unwrap();
        // Cursor at the very end: any further request must still fail cleanly.
        assert_eq!(reader.try_buf(usize::MAX), Err(BufferError::EndOfBuffer));
    }
}
