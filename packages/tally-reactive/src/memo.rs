use std::cell::Cell;

use crate::*;

impl<'a> Scope<'a> {
    /// Creates a memoized value from some signals. Also known as "derived stores".
    ///
    /// # Example
    /// ```
    /// # use tally_reactive::*;
    /// # create_scope_immediate(|ctx| {
    /// let state = ctx.create_signal(0);
    ///
    /// let double = ctx.create_memo(move || *state.get() * 2);
    /// assert_eq!(*double.get(), 0);
    ///
    /// state.set(1);
    /// assert_eq!(*double.get(), 2);
    /// # });
    /// ```
    pub fn create_memo<U: 'a>(&'a self, f: impl FnMut() -> U + 'a) -> &'a ReadSignal<'a, U> {
        self.create_selector_with(f, |_, _| false)
    }

    /// Creates a memoized value from some signals. Also known as "derived stores".
    /// Unlike [`create_memo`](Self::create_memo), this function will not notify dependents of a
    /// change if the output is the same. That is why the output of the function must implement
    /// [`PartialEq`].
    ///
    /// To specify a custom comparison function, use
    /// [`create_selector_with`](Self::create_selector_with).
    ///
    /// # Example
    /// ```
    /// # use tally_reactive::*;
    /// # create_scope_immediate(|ctx| {
    /// let state = ctx.create_signal(0);
    ///
    /// let double = ctx.create_selector(move || *state.get() * 2);
    /// assert_eq!(*double.get(), 0);
    ///
    /// state.set(1);
    /// assert_eq!(*double.get(), 2);
    /// # });
    /// ```
    pub fn create_selector<U: PartialEq + 'a>(
        &'a self,
        f: impl FnMut() -> U + 'a,
    ) -> &'a ReadSignal<'a, U> {
        self.create_selector_with(f, PartialEq::eq)
    }

    /// Creates a memoized value from some signals. Also known as "derived stores".
    /// Unlike [`create_memo`](Self::create_memo), this function will not notify dependents of a
    /// change if the output is the same.
    ///
    /// It takes a comparison function to compare the old and new value, which returns `true` if
    /// they are the same and `false` otherwise.
    ///
    /// To use the type's [`PartialEq`] implementation instead of a custom function, use
    /// [`create_selector`](Self::create_selector).
    pub fn create_selector_with<U: 'a>(
        &'a self,
        mut f: impl FnMut() -> U + 'a,
        eq_f: impl Fn(&U, &U) -> bool + 'a,
    ) -> &'a ReadSignal<'a, U> {
        let signal: Rc<Cell<Option<&'a Signal<'a, U>>>> = Rc::new(Cell::new(None));

        self.create_effect({
            let signal = Rc::clone(&signal);
            move || {
                if let Some(signal) = signal.get() {
                    let new = f();
                    // Check if new value is different from old value.
                    if !eq_f(&new, &*signal.get_untracked()) {
                        signal.set(new)
                    }
                } else {
                    signal.set(Some(self.create_signal(f())))
                }
            }
        });

        signal.get().unwrap()
    }

    /// An alternative to [`create_signal`](Self::create_signal) that uses a reducer to get the
    /// next value.
    ///
    /// It uses a reducer function that takes the previous value and a message and returns the next
    /// value.
    ///
    /// Returns a [`ReadSignal`] and a dispatch function to send messages to the reducer.
    ///
    /// # Params
    /// * `initial` - The initial value of the state.
    /// * `reduce` - A function that takes the previous value and a message and returns the next
    ///   value.
    ///
    /// # Example
    /// ```
    /// # use tally_reactive::*;
    /// enum Msg {
    ///     Increment,
    ///     Decrement,
    /// }
    ///
    /// # create_scope_immediate(|ctx| {
    /// let (state, dispatch) = ctx.create_reducer(0, |state, msg: Msg| match msg {
    ///     Msg::Increment => *state + 1,
    ///     Msg::Decrement => *state - 1,
    /// });
    ///
    /// assert_eq!(*state.get(), 0);
    /// dispatch(Msg::Increment);
    /// assert_eq!(*state.get(), 1);
    /// dispatch(Msg::Decrement);
    /// assert_eq!(*state.get(), 0);
    /// # });
    /// ```
    pub fn create_reducer<U, Msg>(
        &'a self,
        initial: U,
        reduce: impl Fn(&U, Msg) -> U + 'a,
    ) -> (&'a ReadSignal<'a, U>, Rc<impl Fn(Msg) + 'a>) {
        let memo = self.create_signal(initial);

        let dispatcher = move |msg| {
            memo.set(reduce(&*memo.get_untracked(), msg));
        };

        (&**memo, Rc::new(dispatcher))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::*;

    #[test]
    fn memo_recomputes_on_change() {
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(1);
            let double = ctx.create_memo(move || *state.get() * 2);
            assert_eq!(*double.get(), 2);

            state.set(3);
            assert_eq!(*double.get(), 6);
        });
    }

    #[test]
    fn memo_notifies_even_when_output_is_equal() {
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(0);
            let constant = ctx.create_memo(move || *state.get() / 10);
            let runs = Rc::new(Cell::new(0));

            ctx.create_effect({
                let runs = Rc::clone(&runs);
                move || {
                    runs.set(runs.get() + 1);
                    let _ = constant.get();
                }
            });
            assert_eq!(runs.get(), 1);

            state.set(1); // 1 / 10 == 0 / 10, but a memo always notifies
            assert_eq!(runs.get(), 2);
        });
    }

    #[test]
    fn selector_skips_equal_output() {
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(0);
            let even = ctx.create_selector(move || *state.get() % 2 == 0);
            let runs = Rc::new(Cell::new(0));

            ctx.create_effect({
                let runs = Rc::clone(&runs);
                move || {
                    runs.set(runs.get() + 1);
                    let _ = even.get();
                }
            });
            assert_eq!(runs.get(), 1);

            state.set(2); // still even, dependents are not notified
            assert_eq!(runs.get(), 1);

            state.set(3);
            assert_eq!(runs.get(), 2);
            assert!(!*even.get());
        });
    }

    #[test]
    fn reducer_folds_messages() {
        create_scope_immediate(|ctx| {
            enum Msg {
                Increment,
                Decrement,
            }

            let (state, dispatch) = ctx.create_reducer(0, |state, msg: Msg| match msg {
                Msg::Increment => *state + 1,
                Msg::Decrement => *state - 1,
            });

            assert_eq!(*state.get(), 0);
            dispatch(Msg::Increment);
            assert_eq!(*state.get(), 1);
            dispatch(Msg::Decrement);
            dispatch(Msg::Decrement);
            assert_eq!(*state.get(), -1);
        });
    }
}
