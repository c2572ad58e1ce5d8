//! Forward-only bit cursor over a byte slice.

use crate::error::{DecodeError, DecodeResult};

/// Largest number of one-bits accepted in the unary prefix of a natural.
const MAX_NATURAL_PREFIX: usize = 63;

/// Reads a byte slice as a stream of bits, most significant bit first.
///
/// The cursor never moves backwards; every successful read advances it by
/// exactly the number of bits returned.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Number of bits read so far.
    #[inline]
    pub fn bits_consumed(&self) -> usize {
        self.position
    }

    /// Number of bits left before the end of the input.
    #[inline]
    pub fn bits_remaining(&self) -> usize {
        self.bytes.len() * 8 - self.position
    }

    fn require(&self, needed: usize) -> DecodeResult<()> {
        let remaining = self.bits_remaining();
        if remaining < needed {
            Err(DecodeError::TruncatedInput {
                position: self.position,
                needed: needed - remaining,
            })
        } else {
            Ok(())
        }
    }

    pub fn read_bit(&mut self) -> DecodeResult<bool> {
        self.require(1)?;
        let byte = self.bytes[self.position / 8];
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Ok(bit)
    }

    /// Read `n` bits (at most 64) as an unsigned big-endian integer.
    pub fn read_bits(&mut self, n: usize) -> DecodeResult<u64> {
        debug_assert!(n <= 64, "cannot read more than 64 bits at once");
        self.require(n)?;
        let mut value = 0u64;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()? as u64;
        }
        Ok(value)
    }

    /// Read `n` whole bytes; they need not be byte aligned.
    pub fn read_bytes(&mut self, n: usize) -> DecodeResult<Vec<u8>> {
        self.require(n.saturating_mul(8))?;
        if self.position % 8 == 0 {
            let start = self.position / 8;
            self.position += n * 8;
            return Ok(self.bytes[start..start + n].to_vec());
        }
        (0..n).map(|_| self.read_bits(8).map(|b| b as u8)).collect()
    }

    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        let bytes = self.read_bytes(N)?;
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// Read a self-delimiting natural number (always `>= 1`).
    ///
    /// The code is a unary count `k` of one-bits closed by a zero-bit, followed
    /// by the `k` low bits of the value; the leading one of the value is implied.
    pub fn read_natural(&mut self) -> DecodeResult<u64> {
        let start = self.position;
        let mut prefix = 0usize;
        while self.read_bit()? {
            prefix += 1;
            if prefix > MAX_NATURAL_PREFIX {
                return Err(DecodeError::NaturalOverflow { position: start });
            }
        }
        let low = self.read_bits(prefix)?;
        Ok((1u64 << prefix) | low)
    }

    /// Check that everything after the cursor is zero padding inside the last byte.
    pub fn finish(self) -> DecodeResult<()> {
        let remaining = self.bits_remaining();
        if remaining >= 8 {
            return Err(DecodeError::MalformedPadding {
                position: self.position,
            });
        }
        if remaining > 0 {
            let last = self.bytes[self.bytes.len() - 1];
            let mask = (1u8 << remaining) - 1;
            if last & mask != 0 {
                return Err(DecodeError::MalformedPadding {
                    position: self.position,
                });
            }
        }
        Ok(())
    }
}
