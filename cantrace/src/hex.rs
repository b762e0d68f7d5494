//! Conversion between bytes and their two character ASCII hex form ("hex8")
//!
//! Encoding always produces uppercase digits. Decoding accepts both cases.

use crate::bits::{high_nibble, low_nibble};

/// Two ASCII hex digits representing one byte, most significant digit first
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Hex8(pub [u8; 2]);

/// At least one digit of a [`Hex8`] is not a hex digit
///
/// `partial` holds the value decoded anyway, with every invalid digit counted
/// as 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidHex8 {
    /// Best effort result
    pub partial: u8,
}

/// Errors of the slice conversions
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Input and output slices differ in length; nothing was converted
    LengthMismatch {
        /// Length of the input slice
        input: usize,
        /// Length of the output slice
        output: usize,
    },
    /// `count` pairs held invalid digits. The output is fully written, using
    /// [`InvalidHex8::partial`] for those pairs.
    InvalidDigits {
        /// Number of invalid pairs
        count: usize,
    },
}

impl Hex8 {
    /// Builds a pair from two ASCII characters
    pub const fn new(high: u8, low: u8) -> Self {
        Self([high, low])
    }

    /// Uppercase hex representation of `byte`
    pub fn from_byte(byte: u8) -> Self {
        Self([digit(high_nibble(byte)), digit(low_nibble(byte))])
    }

    /// Decodes the pair. Both digits are always evaluated, so the error
    /// carries a usable partial value.
    pub fn to_byte(self) -> Result<u8, InvalidHex8> {
        let mut value = 0_u8;
        let mut valid = true;
        for &c in &self.0 {
            let nibble = match c {
                b'0'..=b'9' => c - b'0',
                b'A'..=b'F' => c - b'A' + 10,
                b'a'..=b'f' => c - b'a' + 10,
                _ => {
                    valid = false;
                    0
                }
            };
            value = (value << 4) | nibble;
        }
        if valid {
            Ok(value)
        } else {
            Err(InvalidHex8 { partial: value })
        }
    }

    /// The two digits
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl From<u8> for Hex8 {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

#[inline]
fn digit(nibble: u8) -> u8 {
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'A' + nibble - 10
    }
}

/// Encodes every byte of `input` into the matching element of `output`
pub fn encode_slice(input: &[u8], output: &mut [Hex8]) -> Result<(), Error> {
    check_lengths(input.len(), output.len())?;
    for (byte, pair) in input.iter().zip(output.iter_mut()) {
        *pair = Hex8::from_byte(*byte);
    }
    Ok(())
}

/// Decodes every pair of `input` into the matching element of `output`.
///
/// Invalid pairs do not stop the conversion.
pub fn decode_slice(input: &[Hex8], output: &mut [u8]) -> Result<(), Error> {
    check_lengths(input.len(), output.len())?;
    let mut count = 0;
    for (pair, byte) in input.iter().zip(output.iter_mut()) {
        *byte = pair.to_byte().unwrap_or_else(|e| {
            count += 1;
            e.partial
        });
    }
    if count == 0 {
        Ok(())
    } else {
        Err(Error::InvalidDigits { count })
    }
}

fn check_lengths(input: usize, output: usize) -> Result<(), Error> {
    if input == output {
        Ok(())
    } else {
        Err(Error::LengthMismatch { input, output })
    }
}
