//! Traits needed to call the bit manipulation and integration methods
pub use crate::bits::{Bits as _, Halves as _, SwapBytes as _};

pub use cantrace_core::{Clock as _, RxFifo as _, VirtualUart as _};
