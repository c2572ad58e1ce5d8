//! Append-only bit sink, the inverse of [`BitReader`](super::reader::BitReader).

/// Accumulates bits most significant first and pads the final byte with zeros.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    #[inline]
    pub fn bits_written(&self) -> usize {
        self.len
    }

    pub fn write_bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - self.len % 8);
        }
        self.len += 1;
    }

    /// Write the `n` low bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, n: usize) {
        debug_assert!(n <= 64, "cannot write more than 64 bits at once");
        for i in (0..n).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(bytes);
            self.len += bytes.len() * 8;
        } else {
            for &b in bytes {
                self.write_bits(b as u64, 8);
            }
        }
    }

    /// Write a natural number using the self-delimiting code read by
    /// [`BitReader::read_natural`](super::reader::BitReader::read_natural).
    ///
    /// # Panics
    /// Panics if `value` is zero; naturals start at one.
    pub fn write_natural(&mut self, value: u64) {
        assert!(value >= 1, "naturals start at one");
        let prefix = 63 - value.leading_zeros() as usize;
        for _ in 0..prefix {
            self.write_bit(true);
        }
        self.write_bit(false);
        self.write_bits(value, prefix);
    }

    /// Consume the writer, returning the zero-padded bytes.
    pub fn finalize(self) -> Vec<u8> {
        self.bytes
    }
}

/// Number of bits [`BitWriter::write_natural`] spends on `value`.
pub fn natural_bit_len(value: u64) -> usize {
    debug_assert!(value >= 1);
    let prefix = 63 - value.leading_zeros() as usize;
    2 * prefix + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::reader::BitReader;

    #[test]
    fn natural_encoding_shape() {
        let mut w = BitWriter::new();
        w.write_natural(1);
        w.write_natural(2);
        w.write_natural(3);
        w.write_natural(4);
        assert_eq!(w.bits_written(), 12);
        assert_eq!(w.finalize(), vec![0b0100_1011, 0b1000_0000]);
    }

    #[test]
    fn natural_lengths() {
        for &v in &[1u64, 2, 3, 7, 8, 255, 256, 1 << 40, u64::MAX] {
            let mut w = BitWriter::new();
            w.write_natural(v);
            assert_eq!(w.bits_written(), natural_bit_len(v), "value {v}");
            let bytes = w.finalize();
            let mut r = BitReader::new(&bytes);
            assert_eq!(r.read_natural().unwrap(), v, "value {v}");
        }
    }

    #[test]
    fn unaligned_bytes_after_a_bit() {
        let mut w = BitWriter::new();
        w.write_bit(true);
        w.write_bytes(&[0b1010_1010]);
        assert_eq!(w.finalize(), vec![0b1101_0101, 0b0000_0000]);
    }
}
