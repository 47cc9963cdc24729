//! Auto-growing binary writer.

/// An output buffer that grows as needed.
///
/// The cursor `x` points past the last written byte; `flush` hands back
/// everything written since the previous flush. The combined
/// `u8u16`/`u8u32`/`u8u64` writes cover the header-byte-plus-big-endian-field
/// shape the binary codec emits constantly.
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position of the last flush.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Allocation step when the buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a writer with the default 64KB allocation step.
    pub fn new() -> Self {
        Self::with_alloc_size(64 * 1024)
    }

    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Makes sure `capacity` more bytes can be written.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Forgets anything written but not yet flushed.
    pub fn reset(&mut self) {
        self.x = self.x0;
    }

    /// Returns the bytes written since the last flush.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.ensure_capacity(2);
        let bytes = val.to_be_bytes();
        self.uint8[self.x] = bytes[0];
        self.uint8[self.x + 1] = bytes[1];
        self.x += 2;
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.ensure_capacity(4);
        self.uint8[self.x..self.x + 4].copy_from_slice(&val.to_be_bytes());
        self.x += 4;
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.ensure_capacity(8);
        self.uint8[self.x..self.x + 8].copy_from_slice(&val.to_be_bytes());
        self.x += 8;
    }

    /// Writes a header byte followed by a big-endian u16.
    pub fn u8u16(&mut self, u8_val: u8, u16_val: u16) {
        self.ensure_capacity(3);
        self.uint8[self.x] = u8_val;
        let bytes = u16_val.to_be_bytes();
        self.uint8[self.x + 1] = bytes[0];
        self.uint8[self.x + 2] = bytes[1];
        self.x += 3;
    }

    /// Writes a header byte followed by a big-endian u32.
    pub fn u8u32(&mut self, u8_val: u8, u32_val: u32) {
        self.ensure_capacity(5);
        self.uint8[self.x] = u8_val;
        self.uint8[self.x + 1..self.x + 5].copy_from_slice(&u32_val.to_be_bytes());
        self.x += 5;
    }

    /// Writes a header byte followed by a big-endian u64.
    pub fn u8u64(&mut self, u8_val: u8, u64_val: u64) {
        self.ensure_capacity(9);
        self.uint8[self.x] = u8_val;
        self.uint8[self.x + 1..self.x + 9].copy_from_slice(&u64_val.to_be_bytes());
        self.x += 9;
    }

    /// Writes a raw byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }
}
