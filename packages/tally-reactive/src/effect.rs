use ahash::AHashSet;

use crate::signal::SignalEmitter;
use crate::*;

thread_local! {
    /// While the [`EffectState`] is inside the Vec, it is owned by [`EFFECTS`].
    /// Because this is a global variable, the lifetime is necessarily `'static`. However, that
    /// does not mean that it can last forever. The `EffectState` should only be used the time it
    /// is inside [`EFFECTS`].
    pub(crate) static EFFECTS: RefCell<Vec<*mut EffectState<'static>>> = Default::default();
}

pub(crate) struct EffectState<'a> {
    /// The callback when the effect is re-executed.
    cb: Rc<RefCell<dyn FnMut() + 'a>>,
    dependencies: AHashSet<EffectDependency<'a>>,
}

/// Implements reference equality for [`SignalEmitter`]s.
pub(crate) struct EffectDependency<'a>(&'a SignalEmitter<'a>);

impl<'a> std::cmp::PartialEq for EffectDependency<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<'a> std::cmp::Eq for EffectDependency<'a> {}

impl<'a> std::hash::Hash for EffectDependency<'a> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (self.0 as *const SignalEmitter<'a>).hash(state);
    }
}

impl<'a> EffectState<'a> {
    /// Clears the dependencies (both links and backlinks).
    /// Should be called when re-executing an effect to recreate all dependencies.
    pub fn clear_dependencies(&mut self) {
        for dependency in self.dependencies.iter() {
            dependency.0.unsubscribe(Rc::as_ptr(&self.cb));
        }
        self.dependencies.clear();
    }

    pub fn add_dependency(&mut self, signal: &'a SignalEmitter<'a>) {
        self.dependencies.insert(EffectDependency(signal));
    }
}

/// Runs the effect callback with `state` on top of [`EFFECTS`] so that signals read inside it
/// register themselves as dependencies. Ownership of the state is returned once the callback
/// finishes and the stack entry has been popped.
fn collect_dependencies<'a>(
    state: EffectState<'a>,
    f: &RefCell<dyn FnMut() + 'a>,
) -> EffectState<'a> {
    EFFECTS.with(|effects| {
        // The state goes on the heap so that it has a stable address while signals hold a raw
        // pointer to it through the stack.
        let ptr: *mut EffectState<'a> = Box::into_raw(Box::new(state));
        effects
            .borrow_mut()
            .push(ptr as *mut () as *mut EffectState<'static>);
        (&mut *f.borrow_mut())();
        let popped = effects.borrow_mut().pop().unwrap();
        debug_assert_eq!(popped as *mut (), ptr as *mut ());
        // SAFETY: the pointer was just popped off EFFECTS, so this is the only live reference.
        *unsafe { Box::from_raw(ptr) }
    })
}

impl<'a> Scope<'a> {
    /// Creates an effect on signals used inside the effect closure.
    ///
    /// The closure is called once immediately. Thereafter it is called again every time a signal
    /// it read (tracked) is set. Dependencies are re-collected on every run so conditional reads
    /// work as expected.
    ///
    /// # Example
    /// ```
    /// # use tally_reactive::*;
    /// # create_scope_immediate(|ctx| {
    /// let state = ctx.create_signal(0);
    ///
    /// ctx.create_effect(move || {
    ///     println!("new value = {}", state.get());
    /// });
    ///
    /// state.set(1); // prints "new value = 1"
    /// # });
    /// ```
    pub fn create_effect(&self, f: impl FnMut() + 'a) {
        let f = Rc::new(RefCell::new(f));

        let effect = Rc::new(RefCell::new(None::<EffectState<'a>>));
        let cb: Rc<RefCell<dyn FnMut() + 'a>> = Rc::new(RefCell::new({
            let effect = Rc::downgrade(&effect);
            move || {
                // Upgrade the effect to an Rc now so that it is valid for the rest of the
                // callback.
                let effect_ref = effect.upgrade().unwrap();

                // Dependencies are re-collected from scratch on every run.
                let mut state = effect_ref.take().unwrap();
                state.clear_dependencies();
                let state = collect_dependencies(state, &*f);

                // Add backlinks from every collected signal to the effect, so that setting the
                // signal triggers this callback again.
                for emitter in state.dependencies.iter() {
                    emitter.0.subscribe(Rc::downgrade(&state.cb));
                }

                // Get the effect state back into the Rc.
                *effect_ref.borrow_mut() = Some(state);
            }
        }));

        // Initialize initial effect state.
        *effect.borrow_mut() = Some(EffectState {
            cb: cb.clone(),
            dependencies: AHashSet::new(),
        });

        // Initial callback call to get everything started.
        (&mut *cb.borrow_mut())();

        self.effects.borrow_mut().push(effect);
    }
}

/// Runs the passed closure with dependency tracking suspended: signals read inside it are not
/// added to the running effect's dependencies.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    EFFECTS.with(|effects| {
        let saved = effects.take();
        let ret = f();
        *effects.borrow_mut() = saved;
        ret
    })
}
