//! Context state management.

use crate::*;

impl<'a> Scope<'a> {
    /// Provides a context value in the current [`Scope`], keyed by its type.
    ///
    /// # Panics
    /// Panics if a context with the same type was already provided in this scope.
    #[track_caller]
    pub fn provide_context<T: 'static>(&'a self, value: T) {
        let type_id = TypeId::of::<T>();
        let boxed: Box<dyn Any> = Box::new(value);
        let ptr = Box::into_raw(boxed);
        if self.contexts.borrow_mut().insert(type_id, ptr).is_some() {
            panic!("existing context with type exists already");
        }
    }

    /// Looks up a context value of the given type, walking up the scope hierarchy, or `None` if
    /// no scope provides one.
    pub fn try_use_context<T: 'static>(&'a self) -> Option<&'a T> {
        let type_id = TypeId::of::<T>();
        let mut this = Some(self);
        while let Some(current) = this {
            if let Some(&ptr) = current.contexts.borrow().get(&type_id) {
                // SAFETY: the value lives at least as long as 'a:
                // - Lifetime of the value is 'a if it is allocated on the current scope.
                // - Lifetime of the value is longer than 'a if it is allocated on a parent scope.
                let value = unsafe { &*ptr };
                return Some(value.downcast_ref::<T>().unwrap());
            }
            this = current.parent;
        }
        None
    }

    /// Same as [`try_use_context`](Self::try_use_context) but panics if the context is missing.
    #[track_caller]
    pub fn use_context<T: 'static>(&'a self) -> &'a T {
        self.try_use_context().expect("context not found for type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context() {
        create_scope_immediate(|ctx| {
            ctx.provide_context(42i32);
            let x = ctx.use_context::<i32>();
            assert_eq!(*x, 42);
        });
    }

    #[test]
    fn context_from_parent_scope() {
        create_scope_immediate(|ctx| {
            ctx.provide_context(String::from("hello"));
            let disposer = ctx.create_child_scope(|ctx| {
                assert_eq!(ctx.use_context::<String>(), "hello");
                assert!(ctx.try_use_context::<u64>().is_none());
            });
            disposer();
        });
    }

    #[test]
    #[should_panic]
    fn duplicate_context_panics() {
        create_scope_immediate(|ctx| {
            ctx.provide_context(1i32);
            ctx.provide_context(2i32);
        });
    }
}
