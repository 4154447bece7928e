use crate::config::RegisterSetup;

const TWINT: u8 = 1 << 7;
const TWEA: u8 = 1 << 6;
const TWSTA: u8 = 1 << 5;
const TWSTO: u8 = 1 << 4;
const TWEN: u8 = 1 << 2;
const TWIE: u8 = 1 << 0;

const ENABLE: u8 = TWEN | TWIE | TWEA;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    Disable,
    Listen,
    Start,
    Continue,
    LastByte,
    RepeatedStart,
    Stop,
}

impl Control {
    pub const fn bits(self) -> u8 {
        match self {
            Control::Disable => 0,
            Control::Listen => ENABLE,
            Control::Start => ENABLE | TWSTA,
            Control::Continue => ENABLE | TWINT,
            Control::LastByte => TWEN | TWIE | TWINT,
            Control::RepeatedStart => ENABLE | TWSTA | TWINT,
            Control::Stop => ENABLE | TWSTO | TWINT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Action {
    /// Byte to load into the data register before `control` is written.
    pub transmit: Option<u8>,
    pub control: Control,
}

impl Action {
    pub const fn control(control: Control) -> Self {
        Self {
            transmit: None,
            control,
        }
    }

    pub const fn send(byte: u8) -> Self {
        Self {
            transmit: Some(byte),
            control: Control::Continue,
        }
    }
}

/// Register access for one TWI peripheral.
pub trait TwiHardware {
    /// Raw status register, prescaler bits included.
    fn status(&mut self) -> u8;

    fn read_data(&mut self) -> u8;

    fn write_data(&mut self, byte: u8);

    fn write_control(&mut self, bits: u8);

    fn configure(&mut self, setup: RegisterSetup);

    fn apply(&mut self, action: Action) {
        if let Some(byte) = action.transmit {
            self.write_data(byte);
        }
        self.write_control(action.control.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_bits_match_register_layout() {
        assert_eq!(Control::Disable.bits(), 0x00);
        assert_eq!(Control::Listen.bits(), 0x45);
        assert_eq!(Control::Start.bits(), 0x65);
        assert_eq!(Control::Continue.bits(), 0xC5);
        assert_eq!(Control::LastByte.bits(), 0x85);
        assert_eq!(Control::RepeatedStart.bits(), 0xE5);
        assert_eq!(Control::Stop.bits(), 0xD5);
    }
}
