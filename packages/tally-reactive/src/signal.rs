use std::ops::Deref;

use crate::effect::EFFECTS;
use crate::*;

type WeakEffectCallback<'a> = Weak<RefCell<dyn FnMut() + 'a>>;
type EffectCallbackPtr<'a> = *const RefCell<dyn FnMut() + 'a>;

/// A struct for managing subscriptions to signals.
///
/// This is the notify-on-change callback list behind every state cell.
#[derive(Default)]
pub struct SignalEmitter<'a>(RefCell<IndexMap<EffectCallbackPtr<'a>, WeakEffectCallback<'a>>>);

impl<'a> SignalEmitter<'a> {
    /// Adds a callback to the subscriber list. If the callback is already a subscriber, does
    /// nothing.
    pub(crate) fn subscribe(&self, cb: WeakEffectCallback<'a>) {
        self.0.borrow_mut().insert(cb.as_ptr(), cb);
    }

    /// Removes a callback from the subscriber list. If the callback is not a subscriber, does
    /// nothing.
    pub(crate) fn unsubscribe(&self, cb: EffectCallbackPtr<'a>) {
        self.0.borrow_mut().remove(&cb);
    }

    /// Track the current signal in the effect scope.
    pub fn track(&self) {
        EFFECTS.with(|effects| {
            if let Some(last) = effects.borrow().last() {
                // SAFETY: See guarantee on EffectState within EFFECTS.
                let last = unsafe { &mut **last };
                // SAFETY: EffectState in EFFECTS is only ever accessed while the effect callback
                // is on the stack, which means that 'a is still alive.
                last.add_dependency(unsafe { std::mem::transmute(self) });
            }
        });
    }

    /// Calls all the subscribers without modifying the state.
    pub fn trigger_subscribers(&self) {
        // Clone subscribers to prevent modifying the list when calling callbacks.
        let subscribers = self.0.borrow().clone();
        // Reverse order of subscribers to trigger outer effects before inner effects.
        for subscriber in subscribers.values().rev() {
            // subscriber might have already been destroyed in the case of nested effects
            if let Some(callback) = subscriber.upgrade() {
                // Might already be inside a callback, if infinite loop.
                // Do nothing if infinite loop.
                if let Ok(mut callback) = callback.try_borrow_mut() {
                    (&mut *callback)()
                }
            }
        }
    }
}

/// The read half of a state cell. Obtained from [`Signal::deref`] or from derived cells such as
/// [`Scope::create_memo`].
pub struct ReadSignal<'a, T> {
    value: RefCell<Rc<T>>,
    emitter: SignalEmitter<'a>,
}

impl<'a, T> ReadSignal<'a, T> {
    /// Get the current value of the state cell. When called inside an effect, the effect is
    /// subscribed to future changes of this cell.
    pub fn get(&self) -> Rc<T> {
        self.emitter.track();
        self.value.borrow().clone()
    }

    /// Get the current value of the state cell without subscribing the running effect.
    pub fn get_untracked(&self) -> Rc<T> {
        self.value.borrow().clone()
    }
}

/// A state cell: holds a single value, initialized once, and notifies subscribers whenever the
/// value is replaced.
///
/// # Example
/// ```
/// # use tally_reactive::*;
/// # create_scope_immediate(|ctx| {
/// let state = ctx.create_signal(0);
/// assert_eq!(*state.get(), 0);
///
/// state.set(1);
/// assert_eq!(*state.get(), 1);
/// # });
/// ```
pub struct Signal<'a, T>(ReadSignal<'a, T>);

impl<'a, T> Signal<'a, T> {
    pub(crate) fn new(value: T) -> Self {
        Self(ReadSignal {
            value: RefCell::new(Rc::new(value)),
            emitter: Default::default(),
        })
    }

    /// Replace the current value with a new one and call all subscribers.
    ///
    /// The value is always fully replaced, never mutated in place, so a previously returned
    /// `Rc<T>` keeps the old value.
    pub fn set(&self, value: T) {
        *self.0.value.borrow_mut() = Rc::new(value);
        self.0.emitter.trigger_subscribers();
    }
}

impl<'a, T> Deref for Signal<'a, T> {
    type Target = ReadSignal<'a, T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) trait AnySignal<'a> {}

impl<'a, T> AnySignal<'a> for Signal<'a, T> {}

#[cfg(feature = "serde")]
impl<'a, T: serde::Serialize> serde::Serialize for ReadSignal<'a, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (*self.get_untracked()).serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'a, T: serde::Serialize> serde::Serialize for Signal<'a, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (*self.get_untracked()).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn signal_get_set() {
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(0);
            assert_eq!(*state.get(), 0);

            state.set(1);
            assert_eq!(*state.get(), 1);
        });
    }

    #[test]
    fn set_is_a_full_replacement() {
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(String::from("before"));
            let old = state.get();
            state.set(String::from("after"));
            // The previously observed value is untouched.
            assert_eq!(*old, "before");
            assert_eq!(*state.get(), "after");
        });
    }

    #[cfg(feature = "serde")]
    #[test]
    fn signal_serializes_as_its_value() {
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(vec![1, 2, 3]);
            assert_eq!(serde_json::to_string(state).unwrap(), "[1,2,3]");

            let read: &ReadSignal<_> = state;
            assert_eq!(serde_json::to_string(read).unwrap(), "[1,2,3]");

            state.set(vec![4]);
            assert_eq!(serde_json::to_string(state).unwrap(), "[4]");
        });
    }

    #[test]
    fn signal_of_signal() {
        create_scope_immediate(|ctx| {
            let inner = ctx.create_signal(0);
            let wrapper = ctx.create_signal(inner);
            assert_eq!(*wrapper.get().get(), 0);

            wrapper.get().set(1);
            assert_eq!(*wrapper.get().get(), 1);
        });
    }
}
