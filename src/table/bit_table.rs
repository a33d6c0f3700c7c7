use std::fmt;

use super::transpose::transpose_64x64;

/// Number of bits in one padding word.
const WORD_BITS: usize = 64;

/// Round `n` up to a whole number of 64-bit words.
#[inline]
fn words_for(n: usize) -> usize {
    n.div_ceil(WORD_BITS)
}

/// Dense boolean matrix, padded to 64-bit words in both dimensions.
///
/// The minor index addresses shots (writers), the major index addresses samples.
/// See the [module documentation](crate::table) for the byte layout.
#[derive(Clone, PartialEq, Eq)]
pub struct BitTable {
    num_major: usize,
    num_minor: usize,
    num_major_u64_padded: usize,
    num_minor_u64_padded: usize,
    data: Vec<u8>,
}

impl BitTable {
    /// Create a zeroed table with the given logical dimensions.
    pub fn new(num_major: usize, num_minor: usize) -> Self {
        let num_major_u64_padded = words_for(num_major);
        let num_minor_u64_padded = words_for(num_minor);
        let len = num_major_u64_padded * WORD_BITS * num_minor_u64_padded * 8;
        Self {
            num_major,
            num_minor,
            num_major_u64_padded,
            num_minor_u64_padded,
            data: vec![0u8; len],
        }
    }

    /// Build a table where `(major, minor)` is set when `f(major, minor)` is true.
    pub fn from_fn<F>(num_major: usize, num_minor: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut table = Self::new(num_major, num_minor);
        for major in 0..num_major {
            for minor in 0..num_minor {
                if f(major, minor) {
                    table.set(major, minor, true);
                }
            }
        }
        table
    }

    /// Logical number of major rows (samples).
    pub fn num_major(&self) -> usize {
        self.num_major
    }

    /// Logical number of minor columns (shots).
    pub fn num_minor(&self) -> usize {
        self.num_minor
    }

    /// Number of 64-bit words covering the major dimension.
    pub fn num_major_u64_padded(&self) -> usize {
        self.num_major_u64_padded
    }

    /// Number of 64-bit words in one major row.
    pub fn num_minor_u64_padded(&self) -> usize {
        self.num_minor_u64_padded
    }

    /// Byte stride between consecutive major rows.
    pub fn num_minor_u8_padded(&self) -> usize {
        self.num_minor_u64_padded * 8
    }

    /// Number of major rows physically present, including padding.
    pub fn num_major_padded(&self) -> usize {
        self.num_major_u64_padded * WORD_BITS
    }

    /// Read one bit.
    ///
    /// Panics if `major` or `minor` lies outside the padded extent.
    #[inline]
    pub fn get(&self, major: usize, minor: usize) -> bool {
        let byte = self.data[major * self.num_minor_u8_padded() + minor / 8];
        (byte >> (minor % 8)) & 1 == 1
    }

    /// Write one bit.
    ///
    /// Panics if `major` or `minor` lies outside the padded extent.
    #[inline]
    pub fn set(&mut self, major: usize, minor: usize, value: bool) {
        let idx = major * self.num_minor_u8_padded() + minor / 8;
        let mask = 1u8 << (minor % 8);
        if value {
            self.data[idx] |= mask;
        } else {
            self.data[idx] &= !mask;
        }
    }

    /// Raw bytes of the whole table, row after row.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Raw bytes of one major row (`num_minor_u8_padded()` bytes).
    pub fn row(&self, major: usize) -> &[u8] {
        let stride = self.num_minor_u8_padded();
        &self.data[major * stride..(major + 1) * stride]
    }

    /// Mutable raw bytes of one major row.
    pub fn row_mut(&mut self, major: usize) -> &mut [u8] {
        let stride = self.num_minor_u8_padded();
        &mut self.data[major * stride..(major + 1) * stride]
    }

    /// Read the little-endian word at `(major, word)` in minor-word units.
    #[inline]
    fn word(&self, major: usize, word: usize) -> u64 {
        let start = major * self.num_minor_u8_padded() + word * 8;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[start..start + 8]);
        u64::from_le_bytes(bytes)
    }

    #[inline]
    fn set_word(&mut self, major: usize, word: usize, value: u64) {
        let start = major * self.num_minor_u8_padded() + word * 8;
        self.data[start..start + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// Return a copy with the major and minor dimensions swapped.
    ///
    /// Row `s` of the result holds every sample of shot `s` as one contiguous
    /// bit run, which is the writer-major layout the serial fan-out needs.
    pub fn transposed(&self) -> BitTable {
        let mut out = BitTable::new(self.num_minor, self.num_major);
        // Padding on both sides is whole words, so every block is complete.
        debug_assert_eq!(out.num_major_u64_padded, self.num_minor_u64_padded);
        debug_assert_eq!(out.num_minor_u64_padded, self.num_major_u64_padded);

        let mut block = [0u64; 64];
        for major_block in 0..self.num_major_u64_padded {
            for minor_word in 0..self.num_minor_u64_padded {
                for (r, slot) in block.iter_mut().enumerate() {
                    *slot = self.word(major_block * WORD_BITS + r, minor_word);
                }
                transpose_64x64(&mut block);
                for (r, value) in block.iter().enumerate() {
                    out.set_word(minor_word * WORD_BITS + r, major_block, *value);
                }
            }
        }
        out
    }

    /// Clear every bit, keeping the dimensions.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl fmt::Debug for BitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitTable({}x{}) [", self.num_major, self.num_minor)?;
        for major in 0..self.num_major {
            f.write_str("  ")?;
            for minor in 0..self.num_minor {
                f.write_str(if self.get(major, minor) { "1" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        f.write_str("]")
    }
}

/// Pack booleans into little-endian bit order, padded to whole 64-bit words.
///
/// The result has the same packing as a [`BitTable`] row, so it can be handed to
/// [`BatchWriter::batch_write_bit`](crate::batch::BatchWriter::batch_write_bit).
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; words_for(bits.len()) * 8];
    for (i, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
        out[i / 8] |= 1 << (i % 8);
    }
    out
}
