//! The definition of the [`Component`] trait.

use crate::node::GenericNode;
use crate::reactive::*;
use crate::view::View;

/// Trait that is implemented by components. A component is any function from a scope and a
/// properties value to a [`View`].
pub trait Component<'a, G: GenericNode<'a>, Props> {
    /// Create a new component with an instance of the properties.
    fn create_component(&self, ctx: ScopeRef<'a>, props: Props) -> View<G>;
}

impl<'a, G: GenericNode<'a>, Props, T> Component<'a, G, Props> for T
where
    T: Fn(ScopeRef<'a>, Props) -> View<G>,
{
    fn create_component(&self, ctx: ScopeRef<'a>, props: Props) -> View<G> {
        self(ctx, props)
    }
}

/// Instantiates a component.
///
/// The component body runs untracked: an enclosing effect never subscribes to signals read
/// while building the view, only to signals read inside effects the component creates itself.
#[inline(always)]
pub fn instantiate<'a, G: GenericNode<'a>, Props>(
    f: impl Component<'a, G, Props>,
    ctx: ScopeRef<'a>,
    props: Props,
) -> View<G> {
    untrack(|| f.create_component(ctx, props))
}
