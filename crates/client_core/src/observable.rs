use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use shared::domain::UpdateType;

pub type Observer<P> = Rc<dyn Fn(UpdateType, &P)>;

/// Synchronous fan-out of `(UpdateType, payload)` notifications.
///
/// Observers run in registration order. A notification raised while another
/// one is being delivered is queued and delivered once the current fan-out
/// has reached every observer, so delivery order always matches commit order.
pub struct Observable<P> {
    observers: RefCell<Vec<Observer<P>>>,
    pending: RefCell<VecDeque<(UpdateType, P)>>,
    delivering: Cell<bool>,
}

impl<P> Default for Observable<P> {
    fn default() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
        }
    }
}

impl<P> Observable<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&self, observer: impl Fn(UpdateType, &P) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn notify(&self, update_type: UpdateType, payload: P) {
        self.pending.borrow_mut().push_back((update_type, payload));
        if self.delivering.replace(true) {
            return;
        }

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some((update_type, payload)) = next else {
                break;
            };
            // Observers added during delivery only see later notifications.
            let observers = self.observers.borrow().clone();
            for observer in observers {
                observer(update_type, &payload);
            }
        }

        self.delivering.set(false);
    }
}
