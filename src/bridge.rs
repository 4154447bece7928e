use core::cell::RefCell;

#[cfg(feature = "dump")]
use critical_section::Mutex;
use embassy_sync::blocking_mutex::{self, raw::CriticalSectionRawMutex};
#[cfg(feature = "dump")]
use heapless::Deque;

use crate::{
    controller::BusController,
    hardware::{Action, TwiHardware},
    slave::SlaveCallback,
    state_holder::StateHolder,
    status::Status,
    Error, ErrorState, Role,
};

pub const STATES_HISTORY_SIZE: usize = 5;
#[cfg(feature = "dump")]
pub const EVENTS_HISTORY_SIZE: usize = 5;

#[cfg(feature = "dump")]
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDump {
    pub state_history: [Role; STATES_HISTORY_SIZE],
    pub current_state: Role,
    pub event_history: [Status; EVENTS_HISTORY_SIZE],
}

/// Hands one [`BusController`] back and forth between the TWI interrupt and
/// foreground code.
///
/// Every mutation runs inside a critical section. The current role is also
/// published atomically so completion can be polled with interrupts enabled.
///
/// ```ignore
/// static BUS: Bridge<'static, Callback> = Bridge::new(BusController::setup(CONFIG, Callback));
///
/// #[interrupt]
/// fn TWI() {
///     BUS.handle_event_interrupt(&mut Twi::steal());
/// }
/// ```
pub struct Bridge<'b, C> {
    controller: blocking_mutex::Mutex<CriticalSectionRawMutex, RefCell<BusController<'b, C>>>,
    state_holder: StateHolder<STATES_HISTORY_SIZE>,
    #[cfg(feature = "dump")]
    events_history: Mutex<RefCell<Deque<Status, EVENTS_HISTORY_SIZE>>>,
}

#[cfg(feature = "dump")]
fn deque_into_array<T: Copy, const N: usize>(d: &Deque<T, N>, arr: &mut [T; N]) {
    let n = d.len();
    let (a, b) = d.as_slices();
    let s = N - n;

    arr[s..s + a.len()].copy_from_slice(a);
    arr[s + a.len()..].copy_from_slice(b);
}

impl<'b, C: SlaveCallback> Bridge<'b, C> {
    pub const fn new(controller: BusController<'b, C>) -> Self {
        Self {
            controller: blocking_mutex::Mutex::new(RefCell::new(controller)),
            state_holder: StateHolder::new(),
            #[cfg(feature = "dump")]
            events_history: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut BusController<'b, C>) -> R) -> R {
        self.controller.lock(|cell| {
            let mut controller = cell.borrow_mut();
            let res = f(&mut controller);
            self.state_holder.set_state(controller.role());
            res
        })
    }

    pub fn setup<H: TwiHardware>(&self, hw: &mut H) {
        let registers = self.with(|c| c.config().registers());
        hw.configure(registers);
    }

    pub fn enable<H: TwiHardware>(&self, hw: &mut H) {
        let action = self.with(|c| c.enable());
        hw.apply(action);
    }

    pub fn disable<H: TwiHardware>(&self, hw: &mut H) {
        let action = self.with(|c| c.disable());
        hw.apply(action);
    }

    /// Body of the TWI interrupt: decode the condition, run the state machine and
    /// commit its answer.
    pub fn handle_event_interrupt<H: TwiHardware>(&self, hw: &mut H) {
        let status = Status::decode(hw.status());
        let data = hw.read_data();

        #[cfg(feature = "dump")]
        critical_section::with(|cs| {
            let mut h = self.events_history.borrow_ref_mut(cs);
            if h.is_full() {
                h.pop_front();
            }
            let _ = h.push_back(status);
        });

        let action = self.with(|c| c.handle_event(status, data));
        hw.apply(action);
    }

    fn start<H: TwiHardware>(
        &self,
        hw: &mut H,
        arm: impl FnOnce(&mut BusController<'b, C>) -> Result<Action, Error>,
    ) -> Result<(), Error> {
        let action = self.with(arm)?;
        hw.apply(action);
        Ok(())
    }

    pub fn write_one<H: TwiHardware>(
        &self,
        hw: &mut H,
        address: u8,
        byte: u8,
    ) -> Result<(), Error> {
        self.start(hw, |c| c.write_one(address, byte))
    }

    pub fn write_two<H: TwiHardware>(
        &self,
        hw: &mut H,
        address: u8,
        low: u8,
        high: u8,
    ) -> Result<(), Error> {
        self.start(hw, |c| c.write_two(address, low, high))
    }

    pub fn write_many<H: TwiHardware>(
        &self,
        hw: &mut H,
        address: u8,
        buf: &'b [u8],
    ) -> Result<(), Error> {
        self.start(hw, |c| c.write_many(address, buf))
    }

    pub fn read_one<H: TwiHardware>(&self, hw: &mut H, address: u8) -> Result<(), Error> {
        self.start(hw, |c| c.read_one(address))
    }

    pub fn read_two<H: TwiHardware>(&self, hw: &mut H, address: u8) -> Result<(), Error> {
        self.start(hw, |c| c.read_two(address))
    }

    pub fn read_many<H: TwiHardware>(
        &self,
        hw: &mut H,
        address: u8,
        buf: &'b mut [u8],
    ) -> Result<(), Error> {
        self.start(hw, |c| c.read_many(address, buf))
    }

    pub fn clear_error(&self) {
        self.with(|c| c.clear_error())
    }

    pub fn role(&self) -> Role {
        self.state_holder.get_state()
    }

    pub fn error(&self) -> ErrorState {
        self.with(|c| c.error())
    }

    pub fn data_ready(&self) -> bool {
        self.with(|c| c.data_ready())
    }

    /// Spins until the bus is released, then reports the sticky error, if any.
    ///
    /// Busy-waits forever on a hung bus; there is no timeout.
    pub fn wait_idle(&self) -> Result<(), ErrorState> {
        while !self.role().is_ready() {
            core::hint::spin_loop();
        }

        match self.error() {
            ErrorState::None => Ok(()),
            error => Err(error),
        }
    }

    #[cfg(feature = "dump")]
    pub fn dump_state(&self) -> StateDump {
        let mut states = [Role::Disconnected; STATES_HISTORY_SIZE];
        let mut events = [Status::NoInfo; EVENTS_HISTORY_SIZE];

        critical_section::with(|cs| {
            let states_deque = self.state_holder.get_history(cs);
            deque_into_array(&states_deque, &mut states);

            let events_deque = self.events_history.borrow_ref(cs);
            deque_into_array(&events_deque, &mut events);
        });

        StateDump {
            state_history: states,
            current_state: self.role(),
            event_history: events,
        }
    }
}
