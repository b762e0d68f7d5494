//! Received frames and their data length codes

use bitfield::bitfield;
use embedded_can::{ExtendedId, Id, StandardId};

/// Number of payload bytes carried by every record, independent of the DLC
pub const PAYLOAD_LEN: usize = 64;

/// Data length field values as found in the second header word of an RX
/// element (DLC in bits 19:16)
pub mod dlc {
    /// 0 data bytes
    pub const BYTES_0: u32 = 0x0000_0000;
    /// 1 data byte
    pub const BYTES_1: u32 = 0x0001_0000;
    /// 2 data bytes
    pub const BYTES_2: u32 = 0x0002_0000;
    /// 3 data bytes
    pub const BYTES_3: u32 = 0x0003_0000;
    /// 4 data bytes
    pub const BYTES_4: u32 = 0x0004_0000;
    /// 5 data bytes
    pub const BYTES_5: u32 = 0x0005_0000;
    /// 6 data bytes
    pub const BYTES_6: u32 = 0x0006_0000;
    /// 7 data bytes
    pub const BYTES_7: u32 = 0x0007_0000;
    /// 8 data bytes
    pub const BYTES_8: u32 = 0x0008_0000;
    /// 12 data bytes
    pub const BYTES_12: u32 = 0x0009_0000;
    /// 16 data bytes
    pub const BYTES_16: u32 = 0x000a_0000;
    /// 20 data bytes
    pub const BYTES_20: u32 = 0x000b_0000;
    /// 24 data bytes
    pub const BYTES_24: u32 = 0x000c_0000;
    /// 32 data bytes
    pub const BYTES_32: u32 = 0x000d_0000;
    /// 48 data bytes
    pub const BYTES_48: u32 = 0x000e_0000;
    /// 64 data bytes
    pub const BYTES_64: u32 = 0x000f_0000;

    /// Bits of the header word holding the DLC
    pub const MASK: u32 = 0x000f_0000;
}

/// Converts a data length field into a byte count.
///
/// Values that are not one of the [`dlc`] constants map to 0. So does
/// [`dlc::BYTES_24`], which the tracer never reports.
pub fn data_length_bytes(data_length: u32) -> u8 {
    match data_length {
        dlc::BYTES_0 => 0,
        dlc::BYTES_1 => 1,
        dlc::BYTES_2 => 2,
        dlc::BYTES_3 => 3,
        dlc::BYTES_4 => 4,
        dlc::BYTES_5 => 5,
        dlc::BYTES_6 => 6,
        dlc::BYTES_7 => 7,
        dlc::BYTES_8 => 8,
        dlc::BYTES_12 => 12,
        dlc::BYTES_16 => 16,
        dlc::BYTES_20 => 20,
        dlc::BYTES_32 => 32,
        dlc::BYTES_48 => 48,
        dlc::BYTES_64 => 64,
        _ => 0,
    }
}

/// One received frame as consumed by the trace formatter
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanFrameRecord {
    /// Raw identifier, 11 or 29 bits
    pub identifier: u32,
    /// Data length field, see [`dlc`]
    pub data_length: u32,
    /// Payload, always [`PAYLOAD_LEN`] bytes. Bytes past the DLC are whatever
    /// the receive element held.
    pub payload: [u8; PAYLOAD_LEN],
    /// Reception time in milliseconds
    pub rx_timestamp_ms: u32,
}

impl Default for CanFrameRecord {
    fn default() -> Self {
        Self {
            identifier: 0,
            data_length: dlc::BYTES_0,
            payload: [0; PAYLOAD_LEN],
            rx_timestamp_ms: 0,
        }
    }
}

impl CanFrameRecord {
    /// Record with `data` copied to the start of the payload. `data` beyond
    /// [`PAYLOAD_LEN`] bytes is ignored.
    pub fn new(identifier: u32, data_length: u32, data: &[u8]) -> Self {
        let mut record = Self {
            identifier,
            data_length,
            ..Self::default()
        };
        let len = data.len().min(PAYLOAD_LEN);
        record.payload[..len].copy_from_slice(&data[..len]);
        record
    }

    /// Payload bytes covered by the data length field
    pub fn data(&self) -> &[u8] {
        &self.payload[..usize::from(data_length_bytes(self.data_length))]
    }
}

bitfield! {
    /// First header word of an RX element
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct R0(u32);
    impl Debug;
    /// Error State Indicator
    pub esi, set_esi: 31;
    /// Extended Identifier
    pub xtd, set_xtd: 30;
    /// Remote Transmission Request
    pub rtr, set_rtr: 29;
    /// Identifier, standard identifiers live in bits 28:18
    pub u32, id, set_id: 28, 0;
}

bitfield! {
    /// Second header word of an RX element
    #[derive(Copy, Clone, Default, PartialEq, Eq)]
    pub struct R1(u32);
    impl Debug;
    /// Accepted Non-matching Frame
    pub anmf, set_anmf: 31;
    /// Filter Index
    pub u8, fidx, set_fidx: 30, 24;
    /// FD Format
    pub fdf, set_fdf: 21;
    /// Bit Rate Switch
    pub brs, set_brs: 20;
    /// Data Length Code
    pub u8, dlc, set_dlc: 19, 16;
    /// RX Timestamp
    pub u16, rxts, set_rxts: 15, 0;
}

/// RX FIFO element of the FDCAN message RAM, sized for 64 byte payloads
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct RxElement {
    /// Header word 0
    pub r0: R0,
    /// Header word 1
    pub r1: R1,
    /// Data field
    pub data: [u8; PAYLOAD_LEN],
}

impl RxElement {
    /// Builds an element from the raw words read out of the message RAM
    pub fn from_raw(header: [u32; 2], data: [u8; PAYLOAD_LEN]) -> Self {
        Self {
            r0: R0(header[0]),
            r1: R1(header[1]),
            data,
        }
    }

    /// Returns the CAN identifier of the element
    pub fn id(&self) -> Id {
        if self.r0.xtd() {
            // The mask ensures the ID is in range for a 29-bit integer
            Id::Extended(unsafe {
                ExtendedId::new_unchecked(self.r0.id() & ExtendedId::MAX.as_raw())
            })
        } else {
            // The mask ensures the ID is in range for a 11-bit integer
            Id::Standard(unsafe {
                StandardId::new_unchecked((self.r0.id() >> 18) as u16 & StandardId::MAX.as_raw())
            })
        }
    }

    /// Data length field in the header encoding, see [`dlc`]
    pub fn data_length(&self) -> u32 {
        self.r1.0 & dlc::MASK
    }
}

impl From<RxElement> for CanFrameRecord {
    fn from(element: RxElement) -> Self {
        let identifier = match element.id() {
            Id::Standard(id) => u32::from(id.as_raw()),
            Id::Extended(id) => id.as_raw(),
        };
        Self {
            identifier,
            data_length: element.data_length(),
            payload: element.data,
            rx_timestamp_ms: u32::from(element.r1.rxts()),
        }
    }
}
