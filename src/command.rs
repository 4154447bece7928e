//! Wire format of the dynamic address negotiation protocol.
//!
//! Every message is a command byte, optionally followed by one address byte, sent
//! with [`BusController::write_one`] or [`BusController::write_two`]. The controller
//! attaches no meaning to these bytes; allocation bookkeeping lives with whoever
//! runs the address server.

use num_enum::TryFromPrimitive;

use crate::{hardware::Action, slave::SlaveCallback, BusController, Error};

/// Broadcast address every listening device acknowledges.
pub const GENERAL_CALL_ADDRESS: u8 = 0x00;

/// Fixed address of the device that hands out addresses.
pub const ADDRESS_SERVER_ADDRESS: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    RequestAddress = 0xA0,
    AddressAllocation = 0xA1,
    NoRoomOnBus = 0xA2,
    ReleaseRequest = 0xA9,
    ReleaseAcknowledge = 0xAA,
    ReleaseDisputed = 0xAB,
    ReleaseForce = 0xAC,
    /// The server has no record of the address it was asked to release.
    ReleaseNotAllocated = 0xAD,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    RequestAddress,
    AddressAllocation(u8),
    NoRoomOnBus,
    ReleaseRequest(u8),
    ReleaseAcknowledge(u8),
    ReleaseDisputed(u8),
    ReleaseForce(u8),
    ReleaseNotAllocated(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    Empty,
    UnknownCommand(u8),
    MissingAddress(Command),
    TrailingBytes,
}

impl Message {
    pub const fn command(&self) -> Command {
        match self {
            Message::RequestAddress => Command::RequestAddress,
            Message::AddressAllocation(_) => Command::AddressAllocation,
            Message::NoRoomOnBus => Command::NoRoomOnBus,
            Message::ReleaseRequest(_) => Command::ReleaseRequest,
            Message::ReleaseAcknowledge(_) => Command::ReleaseAcknowledge,
            Message::ReleaseDisputed(_) => Command::ReleaseDisputed,
            Message::ReleaseForce(_) => Command::ReleaseForce,
            Message::ReleaseNotAllocated(_) => Command::ReleaseNotAllocated,
        }
    }

    pub const fn address(&self) -> Option<u8> {
        match *self {
            Message::RequestAddress | Message::NoRoomOnBus => None,
            Message::AddressAllocation(a)
            | Message::ReleaseRequest(a)
            | Message::ReleaseAcknowledge(a)
            | Message::ReleaseDisputed(a)
            | Message::ReleaseForce(a)
            | Message::ReleaseNotAllocated(a) => Some(a),
        }
    }

    /// Where the message normally goes. Release replies may also be sent directly
    /// to the device concerned.
    pub const fn default_destination(&self) -> u8 {
        match self {
            Message::RequestAddress | Message::ReleaseRequest(_) => ADDRESS_SERVER_ADDRESS,
            _ => GENERAL_CALL_ADDRESS,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let (&first, rest) = bytes.split_first().ok_or(ParseError::Empty)?;
        let command =
            Command::try_from(first).map_err(|_| ParseError::UnknownCommand(first))?;

        let (message, used) = match command {
            Command::RequestAddress => (Message::RequestAddress, 0),
            Command::NoRoomOnBus => (Message::NoRoomOnBus, 0),
            _ => {
                let &address = rest.first().ok_or(ParseError::MissingAddress(command))?;
                let message = match command {
                    Command::AddressAllocation => Message::AddressAllocation(address),
                    Command::ReleaseRequest => Message::ReleaseRequest(address),
                    Command::ReleaseAcknowledge => Message::ReleaseAcknowledge(address),
                    Command::ReleaseDisputed => Message::ReleaseDisputed(address),
                    Command::ReleaseForce => Message::ReleaseForce(address),
                    _ => Message::ReleaseNotAllocated(address),
                };
                (message, 1)
            }
        };

        if rest.len() > used {
            return Err(ParseError::TrailingBytes);
        }
        Ok(message)
    }

    pub fn send<C: SlaveCallback>(
        &self,
        controller: &mut BusController<'_, C>,
        destination: u8,
    ) -> Result<Action, Error> {
        let command = self.command() as u8;
        match self.address() {
            None => controller.write_one(destination, command),
            Some(address) => controller.write_two(destination, command, address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Control, Status};

    #[test]
    fn parses_every_command() {
        assert_eq!(Message::parse(&[0xA0]), Ok(Message::RequestAddress));
        assert_eq!(Message::parse(&[0xA1, 0x12]), Ok(Message::AddressAllocation(0x12)));
        assert_eq!(Message::parse(&[0xA2]), Ok(Message::NoRoomOnBus));
        assert_eq!(Message::parse(&[0xA9, 0x30]), Ok(Message::ReleaseRequest(0x30)));
        assert_eq!(Message::parse(&[0xAA, 0x30]), Ok(Message::ReleaseAcknowledge(0x30)));
        assert_eq!(Message::parse(&[0xAB, 0x30]), Ok(Message::ReleaseDisputed(0x30)));
        assert_eq!(Message::parse(&[0xAC, 0x30]), Ok(Message::ReleaseForce(0x30)));
        assert_eq!(Message::parse(&[0xAD, 0x30]), Ok(Message::ReleaseNotAllocated(0x30)));
    }

    #[test]
    fn rejects_malformed_messages() {
        assert_eq!(Message::parse(&[]), Err(ParseError::Empty));
        assert_eq!(Message::parse(&[0x20]), Err(ParseError::UnknownCommand(0x20)));
        assert_eq!(
            Message::parse(&[0xA1]),
            Err(ParseError::MissingAddress(Command::AddressAllocation))
        );
        assert_eq!(Message::parse(&[0xA0, 1]), Err(ParseError::TrailingBytes));
    }

    #[test]
    fn destinations() {
        assert_eq!(Message::RequestAddress.default_destination(), ADDRESS_SERVER_ADDRESS);
        assert_eq!(Message::ReleaseRequest(5).default_destination(), ADDRESS_SERVER_ADDRESS);
        assert_eq!(Message::AddressAllocation(5).default_destination(), GENERAL_CALL_ADDRESS);
        assert_eq!(Message::NoRoomOnBus.default_destination(), GENERAL_CALL_ADDRESS);
    }

    #[test]
    fn allocation_goes_out_as_two_byte_write() {
        let mut c = BusController::setup(Config::new(ADDRESS_SERVER_ADDRESS), ());
        c.enable();

        let message = Message::AddressAllocation(0x22);
        let action = message.send(&mut c, message.default_destination()).unwrap();
        assert_eq!(action.control, Control::Start);

        let sent: Vec<u8> = [
            Status::Start,
            Status::MtAddressAck,
            Status::MtDataAck,
            Status::MtDataAck,
        ]
        .into_iter()
        .filter_map(|s| c.handle_event(s, 0).transmit)
        .collect();
        assert_eq!(sent, [GENERAL_CALL_ADDRESS << 1, 0xA1, 0x22]);
    }

    #[test]
    fn request_is_a_single_byte() {
        let mut c = BusController::setup(Config::new(0x40), ());
        c.enable();
        Message::RequestAddress
            .send(&mut c, ADDRESS_SERVER_ADDRESS)
            .unwrap();
        assert_eq!(c.transaction_len(), 1);
        assert_eq!(c.data(), &[0xA0]);
        assert_eq!(c.remote_address(), ADDRESS_SERVER_ADDRESS);
    }
}
