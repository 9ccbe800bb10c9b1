//! Observable value with change notification, the classifier's outbound interface.

use std::fmt;

type Subscriber<T> = Box<dyn FnMut(&T)>;

pub struct Subject<T> {
    value: T,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Clone + PartialEq> Subject<T> {
    pub fn new(initial: T) -> Self {
        Subject {
            value: initial,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Stores the value and notifies subscribers. Returns false, without notifying, when unchanged.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&self.value);
        }
        true
    }

    pub fn sub(&mut self, subscriber: impl FnMut(&T) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }
}

impl<T: fmt::Debug> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notifies_only_on_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subject = Subject::new(0u32);
        let sink = Rc::clone(&seen);
        subject.sub(move |value| sink.borrow_mut().push(*value));

        assert!(subject.set(1));
        assert!(!subject.set(1));
        assert!(subject.set(2));
        assert_eq!(subject.get(), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
