#![cfg_attr(not(test), no_std)]

//! Interrupt-driven controller for a two-wire (TWI / I2C) bus.
//!
//! The [`BusController`] holds the whole bus context and reacts to one hardware
//! [`Status`] at a time, returning the [`Action`] to commit to the peripheral.
//! It never touches registers itself; [`Bridge`] wires a controller to a
//! [`TwiHardware`] implementation and shares it between the interrupt handler and
//! foreground code.

#[macro_use]
mod fmt;

mod bridge;
mod buffer;
pub mod command;
mod config;
mod controller;
mod hardware;
mod interrupts;
mod slave;
mod state_holder;
mod status;
mod transaction;

pub use bridge::Bridge;
#[cfg(feature = "dump")]
pub use bridge::StateDump;
pub use buffer::TransferBuffer;
pub use config::{Config, Prescaler, RegisterSetup};
pub use controller::BusController;
pub use hardware::{Action, Control, TwiHardware};
pub use slave::{CallbackContext, SlaveCallback};
pub use status::{Family, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::NoUninit)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Role {
    SeizingBus,
    SlaveTransmitter,
    SlaveReceiver,
    SlaveReceiverWaiting,
    MasterTransmitter,
    MasterReceiver,
    Idle,
    Disconnected,
}

impl Role {
    /// A new transaction may only be armed from these roles.
    pub const fn is_ready(self) -> bool {
        matches!(self, Role::Idle | Role::Disconnected)
    }
}

/// Last unresolved bus fault. Sticky until [`BusController::clear_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorState {
    #[default]
    None,
    TransmitterArbitrationLost,
    ReceiverArbitrationLost,
    ArbitrationLostAndTransmitterSelected,
    ArbitrationLostAndReceiverSelected,
    TransmitterAddressNack,
    TransmitterDataNack,
    ReceiverAddressNack,
    ReceiverDataNack,
    SlaveTransmitterDataNack,
    SlaveReceiverDataNack,
    /// Informational, the master finished or cancelled a slave-receive transfer.
    SlaveReceiverStop,
    BusError,
}

impl ErrorState {
    pub const fn is_none(self) -> bool {
        matches!(self, ErrorState::None)
    }
}

/// Rejected Transaction API call. Nothing was armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Busy(Role),
    InvalidAddress(u8),
    InvalidLength(usize),
}
