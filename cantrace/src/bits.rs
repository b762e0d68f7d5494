//! Bit, nibble, byte and word manipulation on unsigned integers
//!
//! Everything in here is plain arithmetic on `u8`, `u16`, `u32` and `u64`.
//! Operations that modify a value do so in place through `&mut self`;
//! queries take `self` by value.
//!
//! Bit indices outside `0..WIDTH` are a contract violation of the caller.
//! They trip a `debug_assert!` in debug builds; in release builds the
//! selected mask is empty, so queries return 0 and mutators do nothing.
//!
//! # In-place bit values
//!
//! [`Bits::get_bit`] returns the selected bit *where it is*, not shifted down
//! to bit 0:
//!
//! ```
//! use cantrace::bits::Bits as _;
//!
//! assert_eq!(0x80_u8.get_bit(7), 0x80);
//! assert_eq!(0x80_u8.get_bit(6), 0x00);
//! ```
//!
//! Use `!= 0` to turn it into a `bool`.

/// Operations shared by all supported widths
pub trait Bits: Copy + Sized {
    /// Number of bits in the type
    const WIDTH: u32;

    /// Returns `self & (1 << bit)`, the bit in its original position
    fn get_bit(self, bit: u32) -> Self;
    /// Returns the bit like [`Self::get_bit`] and clears it afterwards
    fn get_and_clear_bit(&mut self, bit: u32) -> Self;
    /// Sets a single bit
    fn set_bit(&mut self, bit: u32);
    /// Clears a single bit
    fn clear_bit(&mut self, bit: u32);
    /// Inverts a single bit
    fn invert_bit(&mut self, bit: u32);
    /// Sets (`true`) or clears (`false`) a single bit
    fn set_bit_state(&mut self, bit: u32, state: bool);

    /// Returns `self & mask`
    fn get_bits(self, mask: Self) -> Self;
    /// Returns `self & mask` and clears the masked bits afterwards
    fn get_and_clear_bits(&mut self, mask: Self) -> Self;
    /// Sets all bits in `mask`
    fn set_bits(&mut self, mask: Self);
    /// Clears all bits in `mask`
    fn clear_bits(&mut self, mask: Self);
    /// Inverts all bits in `mask`
    fn invert_bits(&mut self, mask: Self);

    /// Logical shift towards the MSB. Shifting by `WIDTH` or more yields 0.
    fn shift_left(&mut self, positions: u32);
    /// Logical shift towards the LSB. Shifting by `WIDTH` or more yields 0.
    fn shift_right(&mut self, positions: u32);

    /// Reverses the bit order, bit 0 <-> bit `WIDTH - 1` and so on
    fn mirror_bits(&mut self);
}

macro_rules! impl_bits {
    ($t:ty) => {
        impl Bits for $t {
            const WIDTH: u32 = <$t>::BITS;

            #[inline]
            fn get_bit(self, bit: u32) -> Self {
                self & mask_of::<$t>(bit)
            }

            #[inline]
            fn get_and_clear_bit(&mut self, bit: u32) -> Self {
                let value = self.get_bit(bit);
                self.clear_bit(bit);
                value
            }

            #[inline]
            fn set_bit(&mut self, bit: u32) {
                *self |= mask_of::<$t>(bit);
            }

            #[inline]
            fn clear_bit(&mut self, bit: u32) {
                *self &= !mask_of::<$t>(bit);
            }

            #[inline]
            fn invert_bit(&mut self, bit: u32) {
                *self ^= mask_of::<$t>(bit);
            }

            fn set_bit_state(&mut self, bit: u32, state: bool) {
                if state {
                    self.set_bit(bit);
                } else {
                    self.clear_bit(bit);
                }
            }

            #[inline]
            fn get_bits(self, mask: Self) -> Self {
                self & mask
            }

            #[inline]
            fn get_and_clear_bits(&mut self, mask: Self) -> Self {
                let value = *self & mask;
                *self &= !mask;
                value
            }

            #[inline]
            fn set_bits(&mut self, mask: Self) {
                *self |= mask;
            }

            #[inline]
            fn clear_bits(&mut self, mask: Self) {
                *self &= !mask;
            }

            #[inline]
            fn invert_bits(&mut self, mask: Self) {
                *self ^= mask;
            }

            fn shift_left(&mut self, positions: u32) {
                *self = if positions >= Self::WIDTH {
                    0
                } else {
                    *self << positions
                };
            }

            fn shift_right(&mut self, positions: u32) {
                *self = if positions >= Self::WIDTH {
                    0
                } else {
                    *self >> positions
                };
            }

            fn mirror_bits(&mut self) {
                let mut result: $t = 0;
                let mut from: $t = 1 << (Self::WIDTH - 1);
                let mut to: $t = 1;
                while from != 0 {
                    if *self & from != 0 {
                        result |= to;
                    }
                    from >>= 1;
                    to = to.wrapping_shl(1);
                }
                *self = result;
            }
        }
    };
}

/// Single bit mask, empty for out of range indices
#[inline]
fn mask_of<T: MaskOne>(bit: u32) -> T {
    debug_assert!(bit < T::BITS, "bit index {} out of range", bit);
    T::one_shl(bit)
}

trait MaskOne {
    const BITS: u32;
    fn one_shl(bit: u32) -> Self;
}

macro_rules! impl_mask_one {
    ($($t:ty),*) => {
        $(
            impl MaskOne for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn one_shl(bit: u32) -> Self {
                    (1 as $t).checked_shl(bit).unwrap_or(0)
                }
            }
        )*
    };
}

impl_mask_one!(u8, u16, u32, u64);

impl_bits!(u8);
impl_bits!(u16);
impl_bits!(u32);
impl_bits!(u64);

/// Access to the two halves of an integer
///
/// Setters leave the other half untouched. Values passed to a setter are
/// truncated to the width of a half.
pub trait Halves: Copy {
    /// Type used to carry one half
    type Half;

    /// Lower half
    fn low_half(self) -> Self::Half;
    /// Upper half
    fn high_half(self) -> Self::Half;
    /// Replaces the lower half
    fn set_low_half(&mut self, half: Self::Half);
    /// Replaces the upper half
    fn set_high_half(&mut self, half: Self::Half);
    /// Exchanges the two halves
    fn swap_halves(&mut self);
}

macro_rules! impl_halves {
    ($t:ty, $half:ty, $shift:literal, $mask:literal) => {
        impl Halves for $t {
            type Half = $half;

            #[inline]
            fn low_half(self) -> $half {
                (self & $mask) as $half
            }

            #[inline]
            fn high_half(self) -> $half {
                ((self >> $shift) & $mask) as $half
            }

            fn set_low_half(&mut self, half: $half) {
                *self = (*self & !$mask) | (half as $t & $mask);
            }

            fn set_high_half(&mut self, half: $half) {
                *self = (*self & $mask) | ((half as $t & $mask) << $shift);
            }

            fn swap_halves(&mut self) {
                *self = (*self >> $shift) | (*self << $shift);
            }
        }
    };
}

// Nibbles of a byte are carried in the low four bits of a `u8`.
impl_halves!(u8, u8, 4, 0x0f);
impl_halves!(u16, u8, 8, 0x00ff);
impl_halves!(u32, u16, 16, 0x0000_ffff);
impl_halves!(u64, u32, 32, 0x0000_0000_ffff_ffff);

/// Bits 3..0 of a byte
pub fn low_nibble(value: u8) -> u8 {
    value.low_half()
}

/// Bits 7..4 of a byte, shifted down
pub fn high_nibble(value: u8) -> u8 {
    value.high_half()
}

/// Replaces bits 3..0
pub fn set_low_nibble(value: &mut u8, nibble: u8) {
    value.set_low_half(nibble)
}

/// Replaces bits 7..4
pub fn set_high_nibble(value: &mut u8, nibble: u8) {
    value.set_high_half(nibble)
}

/// Bits 7..0 of a half word
pub fn low_byte(value: u16) -> u8 {
    value.low_half()
}

/// Bits 15..8 of a half word
pub fn high_byte(value: u16) -> u8 {
    value.high_half()
}

/// Replaces bits 7..0
pub fn set_low_byte(value: &mut u16, byte: u8) {
    value.set_low_half(byte)
}

/// Replaces bits 15..8
pub fn set_high_byte(value: &mut u16, byte: u8) {
    value.set_high_half(byte)
}

/// Bits 15..0 of a word
pub fn low_word(value: u32) -> u16 {
    value.low_half()
}

/// Bits 31..16 of a word
pub fn high_word(value: u32) -> u16 {
    value.high_half()
}

/// Replaces bits 15..0
pub fn set_low_word(value: &mut u32, word: u16) {
    value.set_low_half(word)
}

/// Replaces bits 31..16
pub fn set_high_word(value: &mut u32, word: u16) {
    value.set_high_half(word)
}

/// Reverses the byte order of a value in place
pub trait SwapBytes {
    /// Reverses the byte order
    fn swap_byte_order(&mut self);
}

macro_rules! impl_swap_bytes {
    ($($t:ty),*) => {
        $(
            impl SwapBytes for $t {
                #[inline]
                fn swap_byte_order(&mut self) {
                    *self = self.swap_bytes();
                }
            }
        )*
    };
}

impl_swap_bytes!(u16, u32, u64);

/// Exchanges the 16-bit halves of a `u32`
pub fn swap_words_32(value: &mut u32) {
    value.swap_halves()
}

/// Exchanges the 32-bit halves of a `u64`
pub fn swap_words_64(value: &mut u64) {
    value.swap_halves()
}

/// Checks that shifting behaves the way this module assumes: zeros are
/// shifted in and everything shifted past the width is lost.
pub fn self_test() -> bool {
    let shl = |mut v: u8, n| {
        v.shift_left(n);
        v
    };
    let shr = |mut v: u8, n| {
        v.shift_right(n);
        v
    };
    let mut msb = 1_u32;
    msb.shift_left(31);
    let mut lsb = u32::MAX;
    lsb.shift_right(31);

    shl(0xff, 7) == 0x80
        && shr(0xff, 7) == 0x01
        && shl(0xff, 8) == 0x00
        && shr(0xff, 8) == 0x00
        && msb == 0x8000_0000
        && lsb == 0x0000_0001
}

/// Slice longer than the four bytes of a `u32`
#[derive(Debug, PartialEq, Eq)]
pub struct TooManyBytes;

/// Stores the lowest `out.len()` bytes of `value` big-endian into `out`.
/// An empty slice is left alone.
pub fn u32_to_be_bytes(value: u32, out: &mut [u8]) -> Result<(), TooManyBytes> {
    if out.len() > 4 {
        return Err(TooManyBytes);
    }
    let bytes = [
        high_byte(high_word(value)),
        low_byte(high_word(value)),
        high_byte(low_word(value)),
        low_byte(low_word(value)),
    ];
    let skip = bytes.len() - out.len();
    out.copy_from_slice(&bytes[skip..]);
    Ok(())
}

/// Inverse of [`u32_to_be_bytes`]: the last byte of `bytes` ends up in bits
/// 7..0. An empty slice yields 0.
pub fn be_bytes_to_u32(bytes: &[u8]) -> Result<u32, TooManyBytes> {
    if bytes.len() > 4 {
        return Err(TooManyBytes);
    }
    let mut result = 0_u32;
    for &byte in bytes {
        result.shift_left(8);
        result |= u32::from(byte);
    }
    Ok(result)
}
