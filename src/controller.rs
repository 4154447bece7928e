use crate::{
    buffer::TransferBuffer,
    config::Config,
    hardware::{Action, Control},
    slave::{CallbackContext, SlaveCallback},
    ErrorState, Role,
};

/// State of the one TWI bus this device sits on.
///
/// Mutated only by the Transaction API (while [`Role::is_ready`]) and by
/// [`handle_event`](Self::handle_event); everything else reads it through the
/// accessors below.
pub struct BusController<'b, C> {
    pub(crate) config: Config,
    pub(crate) role: Role,
    pub(crate) intent: Role,
    pub(crate) error: ErrorState,
    pub(crate) buffer: TransferBuffer<'b>,
    pub(crate) remote_address: u8,
    pub(crate) data_ready: bool,
    pub(crate) force_multibyte_small_read: bool,
    pub(crate) retry_count: u8,
    pub(crate) callback: C,
}

impl<'b, C: SlaveCallback> BusController<'b, C> {
    pub const fn setup(config: Config, callback: C) -> Self {
        assert!(
            config.local_address <= 0x7F,
            "Own address is out of range. 10-bit addresses are not supported."
        );

        Self {
            config,
            role: Role::Disconnected,
            intent: Role::Idle,
            error: ErrorState::None,
            buffer: TransferBuffer::new(),
            remote_address: 0,
            data_ready: false,
            force_multibyte_small_read: false,
            retry_count: 0,
            callback,
        }
    }

    pub fn enable(&mut self) -> Action {
        debug!("twi: enabled");
        self.role = Role::Idle;
        Action::control(Control::Listen)
    }

    /// Turns the peripheral off. Whatever was in flight is abandoned.
    pub fn disable(&mut self) -> Action {
        debug!("twi: disabled in role {}", self.role);
        self.role = Role::Disconnected;
        self.intent = Role::Idle;
        self.retry_count = 0;
        Action::control(Control::Disable)
    }

    pub fn clear_error(&mut self) {
        self.error = ErrorState::None;
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn intent(&self) -> Role {
        self.intent
    }

    pub fn error(&self) -> ErrorState {
        self.error
    }

    pub fn data_ready(&self) -> bool {
        self.data_ready
    }

    pub fn remote_address(&self) -> u8 {
        self.remote_address
    }

    pub fn transaction_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer_index(&self) -> usize {
        self.buffer.index()
    }

    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    pub fn force_multibyte_small_read(&self) -> bool {
        self.force_multibyte_small_read
    }

    pub fn small_buffer(&self) -> [u8; 2] {
        self.buffer.small()
    }

    pub fn data(&self) -> &[u8] {
        self.buffer.data()
    }

    pub fn buffer(&self) -> &TransferBuffer<'b> {
        &self.buffer
    }

    /// Returns the buffer lent to [`read_many`](Self::read_many) once the bus is free.
    pub fn take_buffer(&mut self) -> Option<&'b mut [u8]> {
        if self.role.is_ready() {
            self.buffer.take_extended()
        } else {
            None
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn slave_enabled(&self) -> bool {
        self.config.slave_enable
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    pub(crate) fn context(&self) -> CallbackContext {
        CallbackContext {
            role: self.role,
            intent: self.intent,
            error: self.error,
            pending: self.buffer.small(),
        }
    }

    pub(crate) fn go_idle(&mut self) {
        self.role = Role::Idle;
        self.intent = Role::Idle;
    }
}
