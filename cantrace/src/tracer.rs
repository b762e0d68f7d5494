//! Polling loop tying the FDCAN receive FIFO to the trace sinks
//!
//! One call to [`Tracer::poll`] does what the firmware main loop does per
//! iteration:
//!
//! - while tracing is active, take at most one frame out of the receive FIFO,
//!   stamp it with the current tick, format it and hand the line to the local
//!   serial port and to the data channel towards the host
//! - check both virtual UART channels for a message, echo it on the control
//!   channel and apply it as a start/stop command
//!
//! The tracer owns every piece of state involved: the active flag, the
//! sequence counter and the scratch buffers. Nothing is shared between two
//! tracers.

use cantrace_core::{Clock, RxFifo, VirtualUart};
use embedded_hal::serial;

use crate::config::{Config, MAX_MESSAGE_LEN};
use crate::control::{Command, Gate};
use crate::frame::CanFrameRecord;
use crate::trace::TraceLine;

/// Outcome of forwarding one frame
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Traced {
    /// Sequence number printed in the line
    pub sequence: u32,
    /// The local serial port rejected the line
    pub serial_failed: bool,
    /// The data channel rejected the line. Boards usually light an error LED
    /// on this.
    pub remote_failed: bool,
}

/// What happened during one [`Tracer::poll`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Report {
    /// Frame that was traced, if any
    pub traced: Option<Traced>,
    /// Command received on the control channel
    pub control: Option<Command>,
    /// Command received on the data channel
    pub data: Option<Command>,
}

/// The collaborators a [`Tracer`] drives
pub struct Parts<F, S, C, V0, V1> {
    /// FDCAN receive FIFO
    pub fifo: F,
    /// Local serial port
    pub serial: S,
    /// Millisecond tick
    pub clock: C,
    /// Virtual UART used for control and echo
    pub control: V0,
    /// Virtual UART carrying trace lines to the host
    pub data: V1,
}

/// Trace engine, see the [module documentation](self)
pub struct Tracer<F, S, C, V0, V1> {
    parts: Parts<F, S, C, V0, V1>,
    config: Config,
    gate: Gate,
    sequence: u32,
    line: TraceLine,
    message: [u8; MAX_MESSAGE_LEN],
}

impl<F, S, C, V0, V1> Tracer<F, S, C, V0, V1>
where
    F: RxFifo,
    F::Message: Into<CanFrameRecord>,
    S: serial::Write<u8>,
    C: Clock,
    V0: VirtualUart,
    V1: VirtualUart,
{
    /// Creates a tracer. It starts active only if
    /// [`Config::start_active`] is set.
    pub fn new(parts: Parts<F, S, C, V0, V1>, config: Config) -> Self {
        Self {
            parts,
            config,
            gate: Gate::new(config.start_active),
            sequence: 0,
            line: TraceLine::new(),
            message: [0; MAX_MESSAGE_LEN],
        }
    }

    /// Runs one iteration of the main loop
    pub fn poll(&mut self) -> Report {
        let traced = if self.gate.is_active() && self.parts.fifo.fill_level() != 0 {
            self.trace_next()
        } else {
            None
        };

        let control = self.receive_control();
        let data = self.receive_data();

        Report {
            traced,
            control,
            data,
        }
    }

    /// `true` while frames are traced
    pub fn is_active(&self) -> bool {
        self.gate.is_active()
    }

    /// Applies a command as if it was received on a channel
    pub fn apply(&mut self, command: Command) {
        self.gate.apply(command);
    }

    /// Sequence number of the most recently traced frame, 0 before the first
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The most recently sent trace line
    pub fn last_line(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Gives the collaborators back
    pub fn release(self) -> Parts<F, S, C, V0, V1> {
        self.parts
    }

    fn trace_next(&mut self) -> Option<Traced> {
        let mut frame: CanFrameRecord = match self.parts.fifo.receive() {
            Ok(message) => message.into(),
            Err(nb::Error::WouldBlock) => return None,
            Err(nb::Error::Other(_)) => {
                warn!("reading the receive FIFO failed");
                return None;
            }
        };

        // Only frames that were actually read get a number, so the host sees
        // no gaps.
        self.sequence = self.sequence.wrapping_add(1);
        // The line shows when the frame was processed, not the peripheral's
        // reception timestamp.
        frame.rx_timestamp_ms = self.parts.clock.now().ticks();

        let line = self
            .line
            .format(self.sequence, &frame, self.config.line_ending);

        let serial_failed = write_all(&mut self.parts.serial, line).is_err();
        if serial_failed {
            warn!("serial write of line {=u32} failed", self.sequence);
        }
        let remote_failed = self.parts.data.transmit(line).is_err();
        if remote_failed {
            warn!("forwarding line {=u32} to the host failed", self.sequence);
        }

        Some(Traced {
            sequence: self.sequence,
            serial_failed,
            remote_failed,
        })
    }

    fn receive_control(&mut self) -> Option<Command> {
        let len = self.parts.control.read(&mut self.message)?;
        self.handle_message(len)
    }

    fn receive_data(&mut self) -> Option<Command> {
        let len = self.parts.data.read(&mut self.message)?;
        self.handle_message(len)
    }

    fn handle_message(&mut self, len: usize) -> Option<Command> {
        let message = &self.message[..len.min(MAX_MESSAGE_LEN)];
        if self.config.echo && self.parts.control.transmit(message).is_err() {
            warn!("echo on the control channel failed");
        }
        let command = Command::classify(message);
        debug!("received {=usize} bytes: {}", len, command);
        self.gate.apply(command);
        Some(command)
    }
}

/// Writes every byte, blocking until the port accepts it, then flushes
fn write_all<S: serial::Write<u8>>(serial: &mut S, bytes: &[u8]) -> Result<(), S::Error> {
    for &byte in bytes {
        nb::block!(serial.write(byte))?;
    }
    nb::block!(serial.flush())
}
