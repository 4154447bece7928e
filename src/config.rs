use num_enum::TryFromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    #[default]
    Div1 = 0,
    Div4 = 1,
    Div16 = 2,
    Div64 = 3,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div4 => 4,
            Prescaler::Div16 => 16,
            Prescaler::Div64 => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Own 7-bit address, only used when `slave_enable` is set.
    pub local_address: u8,
    pub slave_enable: bool,
    pub general_call: bool,
    pub bitrate: u8,
    pub prescaler: Prescaler,
    /// Address/data NACKs tolerated before a transfer is abandoned.
    pub retry_max: u8,
}

impl Config {
    pub const fn new(local_address: u8) -> Self {
        Self {
            local_address,
            slave_enable: false,
            general_call: false,
            bitrate: 0,
            prescaler: Prescaler::Div1,
            retry_max: 20,
        }
    }

    pub const fn slave(mut self, general_call: bool) -> Self {
        self.slave_enable = true;
        self.general_call = general_call;
        self
    }

    pub const fn bitrate(mut self, bitrate: u8, prescaler: Prescaler) -> Self {
        self.bitrate = bitrate;
        self.prescaler = prescaler;
        self
    }

    pub const fn retry_max(mut self, retry_max: u8) -> Self {
        self.retry_max = retry_max;
        self
    }

    pub const fn registers(&self) -> RegisterSetup {
        RegisterSetup {
            own_address: if self.slave_enable {
                Some((self.local_address << 1) | self.general_call as u8)
            } else {
                None
            },
            bitrate: self.bitrate,
            prescaler: self.prescaler as u8,
        }
    }

    pub const fn scl_frequency(&self, cpu_hz: u32) -> u32 {
        cpu_hz / (16 + 2 * self.bitrate as u32 * self.prescaler.divisor())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0x01)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterSetup {
    /// Address register value (address and general-call bit), `None` keeps slave mode off.
    pub own_address: Option<u8>,
    pub bitrate: u8,
    pub prescaler: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_only_leaves_address_register_alone() {
        let setup = Config::new(0x69).registers();
        assert_eq!(setup.own_address, None);
        assert_eq!(setup.prescaler, 0);
    }

    #[test]
    fn slave_address_carries_general_call_bit() {
        let setup = Config::new(0x6A)
            .slave(true)
            .bitrate(72, Prescaler::Div4)
            .registers();
        assert_eq!(setup.own_address, Some(0xD5));
        assert_eq!(setup.bitrate, 72);
        assert_eq!(setup.prescaler, 1);
    }

    #[test]
    fn scl_frequency() {
        let config = Config::new(1).bitrate(32, Prescaler::Div1);
        assert_eq!(config.scl_frequency(8_000_000), 100_000);
        assert_eq!(Config::new(1).scl_frequency(8_000_000), 500_000);
    }

    #[test]
    fn prescaler_from_bits() {
        assert_eq!(Prescaler::try_from(2).ok(), Some(Prescaler::Div16));
        assert!(Prescaler::try_from(4).is_err());
    }
}
