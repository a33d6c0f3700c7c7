/// Transpose a 64x64 bit block held as 64 little-endian words.
///
/// On entry bit `c` of `block[r]` is element `(r, c)`; on return it is element `(c, r)`.
/// Works by recursively swapping the off-diagonal quadrants, halving the quadrant size
/// each pass (32, 16, ..., 1).
#[inline]
pub fn transpose_64x64(block: &mut [u64; 64]) {
    let mut width = 32;
    let mut mask: u64 = 0x0000_0000_FFFF_FFFF;
    while width != 0 {
        let mut k = 0;
        while k < 64 {
            let t = ((block[k] >> width) ^ block[k + width]) & mask;
            block[k] ^= t << width;
            block[k + width] ^= t;
            k = (k + width + 1) & !width;
        }
        width >>= 1;
        mask ^= mask << width;
    }
}
