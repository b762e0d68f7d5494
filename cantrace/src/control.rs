//! Start/stop control of the tracer

/// Command bytes that switch tracing on
pub const START: &[u8] = b"start";
/// Command bytes that switch tracing off
pub const STOP: &[u8] = b"stop";

/// Meaning of a message received on a control channel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Begin tracing
    Start,
    /// Stop tracing
    Stop,
    /// Anything else; ignored
    Unrecognized,
}

impl Command {
    /// Classifies a received message by its leading bytes.
    ///
    /// Only the length of the command word is compared, so `"start now"` and
    /// `"stopping"` are both accepted.
    // TODO: require a delimiter after the command word once the host side
    // tooling terminates its commands consistently.
    pub fn classify(message: &[u8]) -> Self {
        if message.starts_with(START) {
            Self::Start
        } else if message.starts_with(STOP) {
            Self::Stop
        } else {
            Self::Unrecognized
        }
    }
}

/// Whether received frames are traced
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gate {
    active: bool,
}

impl Gate {
    /// Gate in the given state
    pub const fn new(active: bool) -> Self {
        Self { active }
    }

    /// `true` while tracing
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Updates the state. Unrecognized commands leave it unchanged.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.active = true,
            Command::Stop => self.active = false,
            Command::Unrecognized => {}
        }
    }
}
