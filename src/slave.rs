use crate::{ErrorState, Role};

/// Controller state visible to slave-mode code, captured before the handler moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallbackContext {
    pub role: Role,
    pub intent: Role,
    pub error: ErrorState,
    /// Inline buffer contents. After losing arbitration on a write these are the
    /// bytes that never went out.
    pub pending: [u8; 2],
}

impl CallbackContext {
    /// Lost a master write and got addressed as a receiver instead.
    pub fn lost_transmit(&self) -> bool {
        matches!(self.error, ErrorState::ArbitrationLostAndReceiverSelected)
            && matches!(self.intent, Role::MasterTransmitter)
    }
}

/// Application side of slave mode. Runs in interrupt context and must not block.
pub trait SlaveCallback {
    fn transmit(&mut self, ctx: &CallbackContext) -> u8;

    fn receive(&mut self, ctx: &CallbackContext, byte: u8);
}

/// Master-only use: sends zeros when addressed, drops received data.
impl SlaveCallback for () {
    fn transmit(&mut self, _ctx: &CallbackContext) -> u8 {
        0
    }

    fn receive(&mut self, _ctx: &CallbackContext, _byte: u8) {}
}

/// Single-function form: called with `0` when a byte to send is wanted, the return
/// value is ignored for received bytes.
impl<F> SlaveCallback for F
where
    F: FnMut(&CallbackContext, u8) -> u8,
{
    fn transmit(&mut self, ctx: &CallbackContext) -> u8 {
        self(ctx, 0)
    }

    fn receive(&mut self, ctx: &CallbackContext, byte: u8) {
        self(ctx, byte);
    }
}
