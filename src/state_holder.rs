use core::cell::{Ref, RefCell};

use atomic::{Atomic, Ordering};
use critical_section::{CriticalSection, Mutex};
use heapless::Deque;

use crate::Role;

pub struct StateHolder<const HISTORY_SIZE: usize> {
    history: Mutex<RefCell<Deque<Role, HISTORY_SIZE>>>,
    state: Atomic<Role>,
}

impl<const HISTORY_SIZE: usize> StateHolder<HISTORY_SIZE> {
    pub const fn new() -> Self {
        Self {
            history: Mutex::new(RefCell::new(Deque::new())),
            state: Atomic::new(Role::Disconnected),
        }
    }

    pub fn set_state(&self, state: Role) {
        if self.state.swap(state, Ordering::SeqCst) != state {
            self.add_state_in_history(state);
        }
    }

    pub fn get_state(&self) -> Role {
        self.state.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn get_history<'cs>(
        &'cs self,
        cs: CriticalSection<'cs>,
    ) -> Ref<'cs, Deque<Role, HISTORY_SIZE>> {
        self.history.borrow_ref(cs)
    }

    fn add_state_in_history(&self, state: Role) {
        critical_section::with(|cs| {
            let mut h = self.history.borrow_ref_mut(cs);
            if h.is_full() {
                h.pop_front();
            }
            let _ = h.push_back(state);
        });
    }
}
