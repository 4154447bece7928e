use crate::{
    controller::BusController,
    hardware::{Action, Control},
    slave::SlaveCallback,
    status::Status,
    ErrorState, Role,
};

impl<'b, C: SlaveCallback> BusController<'b, C> {
    /// Reacts to one bus condition. `data` is the data register as read in the same
    /// interrupt; it only matters for conditions that report a received byte.
    ///
    /// The returned action has to be committed before the next condition can be
    /// raised. The handler never fails: faults end up in [`error`](Self::error) and
    /// the transaction is driven back to [`Role::Idle`].
    pub fn handle_event(&mut self, status: Status, data: u8) -> Action {
        trace!("twi: {} in role {}", status, self.role);

        match status {
            Status::Start | Status::RepeatedStart => self.address_phase(),

            Status::MtAddressAck | Status::MtDataAck => {
                self.retry_count = 0;
                match self.buffer.next_outgoing() {
                    Some(byte) => Action::send(byte),
                    None => self.finish(),
                }
            }
            Status::MtAddressNack => {
                self.retry_or_abort(ErrorState::TransmitterAddressNack, |_| {
                    Some(Action::control(Control::RepeatedStart))
                })
            }
            Status::MtDataNack => self.retry_or_abort(ErrorState::TransmitterDataNack, |c| {
                c.buffer.resend().map(Action::send)
            }),

            Status::ArbitrationLost => {
                let error = if matches!(self.role, Role::MasterTransmitter) {
                    ErrorState::TransmitterArbitrationLost
                } else {
                    ErrorState::ReceiverArbitrationLost
                };
                debug!("twi: arbitration lost as {}", self.role);
                self.error = error;
                self.go_idle();
                Action::control(Control::Continue)
            }

            Status::MrAddressAck => {
                self.data_ready = false;
                self.retry_count = 0;
                Action::control(self.read_control())
            }
            Status::MrAddressNack => {
                self.retry_or_abort(ErrorState::ReceiverAddressNack, |_| {
                    Some(Action::control(Control::RepeatedStart))
                })
            }
            Status::MrDataAck => {
                self.buffer.store(data);
                if self.buffer.is_complete() {
                    // The last byte is always NACKed, so this only happens when the
                    // hardware ignored a LastByte request.
                    warn!("twi: final byte was acknowledged");
                    self.complete_read()
                } else {
                    Action::control(self.read_control())
                }
            }
            Status::MrDataNack => {
                self.buffer.store(data);
                self.complete_read()
            }

            Status::StAddressAck => self.slave_transmit(),
            Status::StArbitrationLostAddressAck => {
                self.error = ErrorState::ArbitrationLostAndTransmitterSelected;
                self.slave_transmit()
            }
            Status::StDataAck | Status::StLastData => {
                self.go_idle();
                Action::control(Control::Continue)
            }
            Status::StDataNack => {
                self.error = ErrorState::SlaveTransmitterDataNack;
                self.go_idle();
                Action::control(Control::Continue)
            }

            Status::SrAddressAck | Status::SrGeneralCallAck => self.slave_selected(),
            Status::SrArbitrationLostAddressAck | Status::SrArbitrationLostGeneralCallAck => {
                self.error = ErrorState::ArbitrationLostAndReceiverSelected;
                self.slave_selected()
            }
            Status::SrDataNack | Status::SrGeneralCallDataNack => {
                self.error = ErrorState::SlaveReceiverDataNack;
                self.slave_received(data)
            }
            Status::SrDataAck | Status::SrGeneralCallDataAck => self.slave_received(data),
            Status::SrStop => {
                self.go_idle();
                Action::control(Control::Continue)
            }

            Status::BusError => {
                warn!("twi: bus error in role {}", self.role);
                self.error = ErrorState::BusError;
                self.go_idle();
                Action::control(Control::Stop)
            }
            Status::NoInfo | Status::Unrecognized(_) => {
                warn!("twi: unexpected status {=u8:#x}", status.code());
                self.go_idle();
                Action::control(Control::Stop)
            }
        }
    }

    fn address_phase(&mut self) -> Action {
        let read = match self.intent {
            Role::MasterTransmitter => false,
            Role::MasterReceiver => true,
            _ => {
                warn!("twi: start without a master transaction");
                self.go_idle();
                return Action::control(Control::Stop);
            }
        };

        self.role = self.intent;
        Action::send((self.remote_address << 1) | read as u8)
    }

    /// Retries while the budget lasts, otherwise records `error` and releases the bus.
    fn retry_or_abort(
        &mut self,
        error: ErrorState,
        retry: impl FnOnce(&Self) -> Option<Action>,
    ) -> Action {
        let attempt = self.retry_count;
        self.retry_count = self.retry_count.saturating_add(1);

        if attempt < self.config.retry_max {
            if let Some(action) = retry(self) {
                return action;
            }
        }

        debug!(
            "twi: giving up on {:02x} after {} retries",
            self.remote_address,
            attempt
        );
        self.retry_count = 0;
        self.error = error;
        self.go_idle();
        Action::control(Control::Stop)
    }

    fn finish(&mut self) -> Action {
        self.go_idle();
        Action::control(Control::Stop)
    }

    /// NACK the byte that will land at the last index, ACK everything before it.
    fn read_control(&self) -> Control {
        if self.buffer.remaining() <= 1 {
            Control::LastByte
        } else {
            Control::Continue
        }
    }

    fn complete_read(&mut self) -> Action {
        self.buffer.finish_read();
        self.data_ready = true;
        self.finish()
    }

    fn slave_transmit(&mut self) -> Action {
        self.role = Role::SlaveTransmitter;
        let ctx = self.context();
        let byte = self.callback.transmit(&ctx);
        self.buffer.set_low(byte);
        Action::send(byte)
    }

    fn slave_selected(&mut self) -> Action {
        self.role = Role::SlaveReceiver;
        self.data_ready = false;
        Action::control(Control::Continue)
    }

    fn slave_received(&mut self, byte: u8) -> Action {
        let ctx = self.context();
        self.callback.receive(&ctx, byte);

        self.role = Role::SlaveReceiverWaiting;
        self.intent = Role::SlaveReceiverWaiting;
        self.data_ready = true;
        Action::control(Control::Continue)
    }
}
