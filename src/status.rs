/// Bus condition reported by the peripheral, decoded from the status register.
///
/// Every condition the hardware can raise an interrupt for has its own variant; codes
/// outside that set decode to [`Status::Unrecognized`] so the handler can still bail
/// out instead of waiting forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Start,
    RepeatedStart,

    MtAddressAck,
    MtAddressNack,
    MtDataAck,
    MtDataNack,
    /// Lost arbitration in master mode. The hardware uses one code for both directions.
    ArbitrationLost,

    MrAddressAck,
    MrAddressNack,
    MrDataAck,
    MrDataNack,

    StAddressAck,
    StArbitrationLostAddressAck,
    StDataAck,
    StDataNack,
    StLastData,

    SrAddressAck,
    SrArbitrationLostAddressAck,
    SrGeneralCallAck,
    SrArbitrationLostGeneralCallAck,
    SrDataAck,
    SrDataNack,
    SrGeneralCallDataAck,
    SrGeneralCallDataNack,
    SrStop,

    NoInfo,
    BusError,
    Unrecognized(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    AddressPhase,
    MasterTransmitter,
    MasterReceiver,
    SlaveTransmitter,
    SlaveReceiver,
    Miscellaneous,
}

pub const STATUS_MASK: u8 = 0xF8;

impl Status {
    /// Every recognized condition, in status-code order.
    pub const ALL: [Status; 27] = [
        Status::BusError,
        Status::Start,
        Status::RepeatedStart,
        Status::MtAddressAck,
        Status::MtAddressNack,
        Status::MtDataAck,
        Status::MtDataNack,
        Status::ArbitrationLost,
        Status::MrAddressAck,
        Status::MrAddressNack,
        Status::MrDataAck,
        Status::MrDataNack,
        Status::SrAddressAck,
        Status::SrArbitrationLostAddressAck,
        Status::SrGeneralCallAck,
        Status::SrArbitrationLostGeneralCallAck,
        Status::SrDataAck,
        Status::SrDataNack,
        Status::SrGeneralCallDataAck,
        Status::SrGeneralCallDataNack,
        Status::SrStop,
        Status::StAddressAck,
        Status::StArbitrationLostAddressAck,
        Status::StDataAck,
        Status::StDataNack,
        Status::StLastData,
        Status::NoInfo,
    ];

    pub const fn decode(raw: u8) -> Self {
        match raw & STATUS_MASK {
            0x00 => Status::BusError,
            0x08 => Status::Start,
            0x10 => Status::RepeatedStart,
            0x18 => Status::MtAddressAck,
            0x20 => Status::MtAddressNack,
            0x28 => Status::MtDataAck,
            0x30 => Status::MtDataNack,
            0x38 => Status::ArbitrationLost,
            0x40 => Status::MrAddressAck,
            0x48 => Status::MrAddressNack,
            0x50 => Status::MrDataAck,
            0x58 => Status::MrDataNack,
            0x60 => Status::SrAddressAck,
            0x68 => Status::SrArbitrationLostAddressAck,
            0x70 => Status::SrGeneralCallAck,
            0x78 => Status::SrArbitrationLostGeneralCallAck,
            0x80 => Status::SrDataAck,
            0x88 => Status::SrDataNack,
            0x90 => Status::SrGeneralCallDataAck,
            0x98 => Status::SrGeneralCallDataNack,
            0xA0 => Status::SrStop,
            0xA8 => Status::StAddressAck,
            0xB0 => Status::StArbitrationLostAddressAck,
            0xB8 => Status::StDataAck,
            0xC0 => Status::StDataNack,
            0xC8 => Status::StLastData,
            0xF8 => Status::NoInfo,
            code => Status::Unrecognized(code),
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Status::BusError => 0x00,
            Status::Start => 0x08,
            Status::RepeatedStart => 0x10,
            Status::MtAddressAck => 0x18,
            Status::MtAddressNack => 0x20,
            Status::MtDataAck => 0x28,
            Status::MtDataNack => 0x30,
            Status::ArbitrationLost => 0x38,
            Status::MrAddressAck => 0x40,
            Status::MrAddressNack => 0x48,
            Status::MrDataAck => 0x50,
            Status::MrDataNack => 0x58,
            Status::SrAddressAck => 0x60,
            Status::SrArbitrationLostAddressAck => 0x68,
            Status::SrGeneralCallAck => 0x70,
            Status::SrArbitrationLostGeneralCallAck => 0x78,
            Status::SrDataAck => 0x80,
            Status::SrDataNack => 0x88,
            Status::SrGeneralCallDataAck => 0x90,
            Status::SrGeneralCallDataNack => 0x98,
            Status::SrStop => 0xA0,
            Status::StAddressAck => 0xA8,
            Status::StArbitrationLostAddressAck => 0xB0,
            Status::StDataAck => 0xB8,
            Status::StDataNack => 0xC0,
            Status::StLastData => 0xC8,
            Status::NoInfo => 0xF8,
            Status::Unrecognized(code) => code,
        }
    }

    pub const fn family(self) -> Family {
        match self {
            Status::Start | Status::RepeatedStart => Family::AddressPhase,
            Status::MtAddressAck
            | Status::MtAddressNack
            | Status::MtDataAck
            | Status::MtDataNack => Family::MasterTransmitter,
            Status::ArbitrationLost
            | Status::MrAddressAck
            | Status::MrAddressNack
            | Status::MrDataAck
            | Status::MrDataNack => Family::MasterReceiver,
            Status::StAddressAck
            | Status::StArbitrationLostAddressAck
            | Status::StDataAck
            | Status::StDataNack
            | Status::StLastData => Family::SlaveTransmitter,
            Status::SrAddressAck
            | Status::SrArbitrationLostAddressAck
            | Status::SrGeneralCallAck
            | Status::SrArbitrationLostGeneralCallAck
            | Status::SrDataAck
            | Status::SrDataNack
            | Status::SrGeneralCallDataAck
            | Status::SrGeneralCallDataNack
            | Status::SrStop => Family::SlaveReceiver,
            Status::NoInfo | Status::BusError | Status::Unrecognized(_) => {
                Family::Miscellaneous
            }
        }
    }
}
