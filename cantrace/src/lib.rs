#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
//! # cantrace
//!
//! ## Overview
//! This crate turns frames received by an FDCAN peripheral into fixed width
//! ASCII trace lines and forwards them to a local serial port and, over an
//! RPMsg virtual UART, to the Linux host running on the Cortex-A cores of an
//! STM32MP1.
//!
//! It provides
//!
//! - bit, nibble, byte and word manipulation helpers ([`bits`])
//! - byte <-> ASCII hex conversion ([`hex`])
//! - decoding of FDCAN message RAM RX elements and data length codes
//!   ([`frame`])
//! - the trace line formatter ([`trace`])
//! - the `start`/`stop` control protocol ([`control`])
//! - a polling engine driving all of the above ([`tracer`])
//! - printing helpers for diagnostics ([`util`], [`time`])
//!
//! Peripherals are reached through the traits of [`cantrace_core`], which the
//! board support code implements on top of the vendor HAL, and through the
//! `embedded-hal` serial traits for the local UART.
//!
//! ## Trace lines
//!
//! ```
//! use cantrace::frame::{dlc, CanFrameRecord};
//! use cantrace::trace::{LineEnding, TraceLine};
//!
//! let mut frame = CanFrameRecord::new(0x123, dlc::BYTES_8, &[0xde, 0xad, 0xbe, 0xef]);
//! frame.rx_timestamp_ms = 1500;
//!
//! let mut line = TraceLine::new();
//! let bytes = line.format(1, &frame, LineEnding::Lf);
//!
//! assert_eq!(bytes.len(), 233);
//! assert!(bytes.starts_with(b"0000001 000000001.500 FB 00000123 Rx 08 DE AD BE EF 00 "));
//! assert!(bytes.ends_with(b"00 \n"));
//! ```
//!
//! ## Main loop
//!
//! ```ignore
//! let mut tracer = Tracer::new(
//!     Parts {
//!         fifo: board.fdcan2_fifo0,
//!         serial: board.usart3,
//!         clock: board.systick,
//!         control: board.virt_uart0,
//!         data: board.virt_uart1,
//!     },
//!     Config::default(),
//! );
//!
//! loop {
//!     let report = tracer.poll();
//!     if let Some(traced) = report.traced {
//!         board.red_led.set_state(traced.remote_failed.into()).ok();
//!     }
//! }
//! ```

#[macro_use]
mod fmt;

pub mod bits;
pub mod config;
pub mod control;
pub mod frame;
pub mod hex;
pub mod prelude;
pub mod time;
pub mod trace;
pub mod tracer;
pub mod util;

pub use cantrace_core as core;
pub use embedded_can;
