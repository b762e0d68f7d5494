#![no_std]
#![warn(missing_docs)]

//! `cantrace-core` provides the small set of abstractions that connect the
//! platform independent [`cantrace`] crate to the board it runs on.
//!
//! Traits from this crate are expected to be implemented by the board support
//! code on top of the vendor HAL: the millisecond tick, the FDCAN receive FIFO
//! and the RPMsg virtual UART channels towards the Linux host. `cantrace`
//! itself never touches a peripheral register or an OpenAMP endpoint.
//!
//! [`cantrace`]: <https://docs.rs/crate/cantrace/>

pub use fugit;
pub use nb;

/// Millisecond instant as produced by the system tick
pub type Instant = fugit::TimerInstantU32<1_000>;

/// Free running millisecond tick source
///
/// On the Cortex-M4 side of an STM32MP1 this is the SysTick driven counter
/// the HAL increments once per millisecond. The counter is expected to wrap
/// at `u32::MAX`.
///
/// # Examples
/// ```
/// use cantrace_core::{Clock, Instant};
///
/// struct Fixed(u32);
///
/// impl Clock for Fixed {
///     fn now(&self) -> Instant {
///         Instant::from_ticks(self.0)
///     }
/// }
///
/// assert_eq!(Fixed(1500).now().ticks(), 1500);
/// ```
pub trait Clock {
    /// Current value of the tick counter
    fn now(&self) -> Instant;
}

/// Receive FIFO of the FDCAN peripheral
///
/// `Message` is whatever the integration layer reads out of the message RAM;
/// `cantrace` requires it to be convertible into its frame record.
pub trait RxFifo {
    /// Received element
    type Message;
    /// Error reported by the peripheral when reading an element
    type Error;

    /// Number of elements waiting in the FIFO
    fn fill_level(&self) -> usize;

    /// Pops the oldest element. Returns [`nb::Error::WouldBlock`] if the FIFO
    /// is empty.
    fn receive(&mut self) -> nb::Result<Self::Message, Self::Error>;
}

/// RPMsg channel presenting a UART-like interface to the remote processor
///
/// Reception is callback driven on the OpenAMP side; implementations are
/// expected to stash the last received message and hand it out on the next
/// call to [`VirtualUart::read`].
pub trait VirtualUart {
    /// Error reported by the transport
    type Error;

    /// Sends `data` as one message to the remote processor
    fn transmit(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Copies a pending message into `buffer`, truncating it to the length of
    /// `buffer`. Returns the number of bytes copied, or `None` if no message
    /// arrived since the previous call.
    fn read(&mut self, buffer: &mut [u8]) -> Option<usize>;
}
