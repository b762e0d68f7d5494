//! Fixed width ASCII trace lines
//!
//! Every received frame is rendered into one line with fixed column offsets
//! so that log tooling can slice it without parsing:
//!
//! ```text
//! 0       8         18  22 25       34 37 40
//! 0000001 000000001.500 FB 00000123 Rx 08 DE AD BE EF 00 .. 00 \n
//! ```
//!
//! | Field | Offset | Width |
//! |---|---|---|
//! | sequence number, decimal | 0 | 7 |
//! | timestamp seconds, decimal | 8 | 9 |
//! | `.` | 17 | 1 |
//! | timestamp milliseconds | 18 | 3 |
//! | `FB` | 22 | 2 |
//! | identifier, uppercase hex | 25 | 8 |
//! | `Rx` | 34 | 2 |
//! | payload length, decimal | 37 | 2 |
//! | 64 payload bytes, `XX ` each | 40 | 192 |
//! | line ending | 232 | 1 or 2 |
//!
//! Numbers are zero padded. A number with more digits than its column keeps
//! its leading digits; the columns next to it are never touched. All other
//! positions hold a space.

use core::fmt::{self, Write as _};

use crate::frame::{data_length_bytes, CanFrameRecord, PAYLOAD_LEN};
use crate::hex::Hex8;

const SEQUENCE: Field = Field::new(0, 7);
const SECONDS: Field = Field::new(8, 9);
const SEPARATOR: usize = 17;
const MILLIS: Field = Field::new(18, 3);
const FRAME_TYPE: Field = Field::new(22, 2);
const IDENTIFIER: Field = Field::new(25, 8);
const DIRECTION: Field = Field::new(34, 2);
const DATA_LENGTH: Field = Field::new(37, 2);
const PAYLOAD: usize = 40;
const PAYLOAD_STRIDE: usize = 3;
const LINE_ENDING: usize = PAYLOAD + PAYLOAD_LEN * PAYLOAD_STRIDE;

/// Length of a line terminated by [`LineEnding::Lf`]
pub const TRACE_LEN: usize = LINE_ENDING + 1;
/// Length of the longest line any [`LineEnding`] produces
pub const MAX_TRACE_LEN: usize = LINE_ENDING + 2;

/// Terminator of a trace line
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEnding {
    /// `\n`, 233 byte lines
    #[default]
    Lf,
    /// `\r\n`, 234 byte lines
    CrLf,
}

impl LineEnding {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::CrLf => b"\r\n",
        }
    }

    /// Total length of a line using this terminator
    pub const fn line_len(self) -> usize {
        match self {
            Self::Lf => TRACE_LEN,
            Self::CrLf => TRACE_LEN + 1,
        }
    }
}

/// Output buffer cannot hold a full line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferTooSmall {
    /// Length the line needs
    pub required: usize,
}

#[derive(Copy, Clone)]
struct Field {
    offset: usize,
    width: usize,
}

impl Field {
    const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }

    fn write(self, line: &mut [u8], args: fmt::Arguments<'_>) {
        let mut column = Column {
            buf: &mut line[self.offset..self.offset + self.width],
            pos: 0,
        };
        // `Column` never fails, it drops what does not fit.
        let _ = column.write_fmt(args);
    }
}

/// Sink that keeps the first `buf.len()` bytes written to it
struct Column<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl fmt::Write for Column<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let n = s.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + n].copy_from_slice(&s.as_bytes()[..n]);
        self.pos += n;
        Ok(())
    }
}

/// Renders `frame` as trace line number `sequence` into the start of `buf`.
///
/// Returns the line length. Bytes of `buf` past the line are left alone.
pub fn format_into(
    buf: &mut [u8],
    sequence: u32,
    frame: &CanFrameRecord,
    line_ending: LineEnding,
) -> Result<usize, BufferTooSmall> {
    let len = line_ending.line_len();
    let line = buf
        .get_mut(..len)
        .ok_or(BufferTooSmall { required: len })?;

    line.fill(b' ');

    SEQUENCE.write(line, format_args!("{:07}", sequence));
    SECONDS.write(line, format_args!("{:09}", frame.rx_timestamp_ms / 1000));
    line[SEPARATOR] = b'.';
    MILLIS.write(line, format_args!("{:03}", frame.rx_timestamp_ms % 1000));
    FRAME_TYPE.write(line, format_args!("FB"));
    IDENTIFIER.write(line, format_args!("{:08X}", frame.identifier));
    DIRECTION.write(line, format_args!("Rx"));
    DATA_LENGTH.write(
        line,
        format_args!("{:02}", data_length_bytes(frame.data_length)),
    );

    for (i, &byte) in frame.payload.iter().enumerate() {
        let at = PAYLOAD + i * PAYLOAD_STRIDE;
        line[at..at + 2].copy_from_slice(Hex8::from_byte(byte).as_bytes());
    }

    // Terminator goes last so nothing above can clobber it.
    line[LINE_ENDING..].copy_from_slice(line_ending.as_bytes());

    Ok(len)
}

/// Reusable buffer holding the most recently formatted line
pub struct TraceLine {
    buf: [u8; MAX_TRACE_LEN],
    len: usize,
}

impl Default for TraceLine {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceLine {
    /// Empty line
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_TRACE_LEN],
            len: 0,
        }
    }

    /// Overwrites the buffer with the line for `frame` and returns it
    pub fn format(
        &mut self,
        sequence: u32,
        frame: &CanFrameRecord,
        line_ending: LineEnding,
    ) -> &[u8] {
        // `buf` is sized for the longest terminator.
        self.len = format_into(&mut self.buf, sequence, frame, line_ending).unwrap_or(0);
        self.as_bytes()
    }

    /// The last formatted line, empty before the first call to
    /// [`Self::format`]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Forgets the current line
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.len = 0;
    }
}
