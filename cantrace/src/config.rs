//! Tracer configuration

pub use crate::trace::LineEnding;

/// Largest message carried by one RPMsg buffer: 512 byte buffers minus the
/// 16 byte RPMsg header
pub const MAX_MESSAGE_LEN: usize = 512 - 16;

/// Configuration for the [`Tracer`](crate::tracer::Tracer)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Terminator of every trace line. [`LineEnding::Lf`] gives the 233 byte
    /// lines log tooling expects.
    pub line_ending: LineEnding,
    /// Trace from the first poll on, without waiting for a `start` command
    pub start_active: bool,
    /// Send every message received on either virtual UART back on the
    /// control channel
    pub echo: bool,
}

impl Default for Config {
    /// Default values are:
    /// - line_ending: [`LineEnding::Lf`]
    /// - start_active: `false`
    /// - echo: `true`
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            start_active: false,
            echo: true,
        }
    }
}
