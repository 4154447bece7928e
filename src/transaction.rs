//! Master-side entry points. Each call arms one transaction and returns the start
//! condition to commit; the event handler takes it from there.

use crate::{
    controller::BusController,
    hardware::{Action, Control},
    slave::SlaveCallback,
    Error, Role,
};

impl<'b, C: SlaveCallback> BusController<'b, C> {
    pub fn write_one(&mut self, address: u8, byte: u8) -> Result<Action, Error> {
        self.check_ready(address)?;
        self.buffer.arm_small_write(&[byte]);
        Ok(self.arm(address, Role::MasterTransmitter))
    }

    pub fn write_two(&mut self, address: u8, low: u8, high: u8) -> Result<Action, Error> {
        self.check_ready(address)?;
        self.buffer.arm_small_write(&[low, high]);
        Ok(self.arm(address, Role::MasterTransmitter))
    }

    /// Writes `buf`. One- and two-byte slices are copied inline, longer ones are
    /// borrowed until the transaction ends.
    pub fn write_many(&mut self, address: u8, buf: &'b [u8]) -> Result<Action, Error> {
        self.check_ready(address)?;
        if buf.is_empty() {
            return Err(Error::InvalidLength(0));
        }
        self.buffer.arm_write(buf);
        Ok(self.arm(address, Role::MasterTransmitter))
    }

    pub fn read_one(&mut self, address: u8) -> Result<Action, Error> {
        self.check_ready(address)?;
        self.force_multibyte_small_read = false;
        self.buffer.arm_small_read(1);
        Ok(self.arm(address, Role::MasterReceiver))
    }

    pub fn read_two(&mut self, address: u8) -> Result<Action, Error> {
        self.check_ready(address)?;
        self.force_multibyte_small_read = false;
        self.buffer.arm_small_read(2);
        Ok(self.arm(address, Role::MasterReceiver))
    }

    /// Fills `buf` from the remote device. Get it back with
    /// [`take_buffer`](Self::take_buffer) after [`data_ready`](Self::data_ready).
    pub fn read_many(&mut self, address: u8, buf: &'b mut [u8]) -> Result<Action, Error> {
        self.check_ready(address)?;
        if buf.is_empty() {
            return Err(Error::InvalidLength(0));
        }
        self.force_multibyte_small_read = true;
        self.buffer.arm_read(buf);
        Ok(self.arm(address, Role::MasterReceiver))
    }

    fn check_ready(&self, address: u8) -> Result<(), Error> {
        if !self.role.is_ready() {
            return Err(Error::Busy(self.role));
        }
        if address > 0x7F {
            return Err(Error::InvalidAddress(address));
        }
        Ok(())
    }

    fn arm(&mut self, address: u8, intent: Role) -> Action {
        trace!(
            "twi: arming {} to {:02x}, {} bytes",
            intent,
            address,
            self.buffer.len()
        );
        self.data_ready = false;
        self.remote_address = address;
        self.intent = intent;
        self.role = Role::SeizingBus;
        Action::control(Control::Start)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BusController, Config, Control, Error, ErrorState, Role};

    fn controller<'b>() -> BusController<'b, ()> {
        let mut c = BusController::setup(Config::new(0x69), ());
        c.enable();
        c
    }

    #[test]
    fn arming_issues_a_start() {
        let mut c = controller();
        let action = c.write_one(0x6A, 0x42).unwrap();

        assert_eq!(action.control, Control::Start);
        assert_eq!(action.transmit, None);
        assert_eq!(c.role(), Role::SeizingBus);
        assert_eq!(c.intent(), Role::MasterTransmitter);
        assert_eq!(c.remote_address(), 0x6A);
        assert_eq!(c.transaction_len(), 1);
        assert_eq!(c.buffer_index(), 0);
        assert!(!c.data_ready());
    }

    #[test]
    fn busy_controller_refuses_new_work() {
        let mut c = controller();
        c.read_two(0x6A).unwrap();

        assert_eq!(c.write_two(0x10, 1, 2), Err(Error::Busy(Role::SeizingBus)));
        assert_eq!(c.intent(), Role::MasterReceiver);
        assert_eq!(c.remote_address(), 0x6A);
    }

    #[test]
    fn arming_while_disconnected_is_allowed() {
        let mut c = BusController::setup(Config::new(0x69), ());
        assert_eq!(c.role(), Role::Disconnected);
        assert!(c.read_one(0x6A).is_ok());
    }

    #[test]
    fn rejects_bad_arguments() {
        let mut c = controller();
        assert_eq!(c.write_one(0x80, 0), Err(Error::InvalidAddress(0x80)));
        assert_eq!(c.write_many(0x10, &[]), Err(Error::InvalidLength(0)));
        assert_eq!(c.role(), Role::Idle);
    }

    #[test]
    fn short_many_calls_use_inline_buffer() {
        let mut c = controller();
        c.write_many(0x10, &[0xAA, 0xBB]).unwrap();
        assert_eq!(c.small_buffer(), [0xAA, 0xBB]);
        assert_eq!(c.transaction_len(), 2);
    }

    #[test]
    fn read_many_records_multibyte_path() {
        let mut buf = [0; 1];
        let mut c = controller();
        c.read_many(0x10, &mut buf).unwrap();
        assert!(c.force_multibyte_small_read());
        c.disable();
        assert!(c.take_buffer().is_some());
    }

    #[test]
    fn clear_error_only_touches_error() {
        let mut c = controller();
        c.write_two(0x10, 1, 2).unwrap();
        c.error = ErrorState::BusError;

        c.clear_error();
        c.clear_error();
        assert_eq!(c.error(), ErrorState::None);
        assert_eq!(c.role(), Role::SeizingBus);
        assert_eq!(c.small_buffer(), [1, 2]);
    }
}
