use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use gpui::SharedString;

pub type ChangeHandler = Rc<dyn Fn(SharedString)>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(pub u64);

/// Observer list for code changes.
///
/// Values are queued and delivered in arrival order. An emit issued while handlers are
/// running is appended to the queue and delivered by the outer drain loop, so handlers are
/// never re-entered and no value is dropped.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, ChangeHandler)>>,
    queue: RefCell<VecDeque<SharedString>>,
    draining: Cell<bool>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(SharedString) + 'static) -> SubscriptionId {
        self.subscribe_rc(Rc::new(handler))
    }

    pub fn subscribe_rc(&self, handler: ChangeHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, handler));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn emit(&self, value: impl Into<SharedString>) {
        self.queue.borrow_mut().push_back(value.into());
        if self.draining.replace(true) {
            return;
        }
        let _drain = DrainGuard(&self.draining);

        loop {
            let Some(next) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let handlers = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, handler)| handler.clone())
                .collect::<Vec<_>>();
            for handler in handlers {
                (handler)(next.clone());
            }
        }
    }
}

/// Clears the draining flag even when a handler unwinds.
struct DrainGuard<'a>(&'a Cell<bool>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
