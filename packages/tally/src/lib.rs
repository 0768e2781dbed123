//! A headless fine-grained reactive widget toolkit.
//!
//! Components are plain functions from a reactive scope to a [`view::View`]: a tree description
//! made of nodes. There is no virtual DOM; effects created during component construction update
//! the affected nodes in place whenever a state cell changes.

pub mod component;
pub mod counter;
pub mod node;
pub mod reactive {
    pub use tally_reactive::*;
}
pub mod view;

use node::HeadlessNode;
use reactive::ScopeRef;
use view::View;

/// Appends every root node of `view` under `root`.
pub fn render_to<'a>(
    ctx: ScopeRef<'a>,
    f: impl FnOnce(ScopeRef<'a>) -> View<HeadlessNode<'a>>,
    root: &HeadlessNode<'a>,
) {
    use node::GenericNode;

    for node in f(ctx).nodes() {
        root.append_child(node);
    }
}

/// Renders a view into a fresh `body` element and returns it.
pub fn render<'a>(
    ctx: ScopeRef<'a>,
    f: impl FnOnce(ScopeRef<'a>) -> View<HeadlessNode<'a>>,
) -> HeadlessNode<'a> {
    use node::GenericNode;

    let root = HeadlessNode::element("body");
    render_to(ctx, f, &root);
    root
}

/// The tally prelude.
pub mod prelude {
    pub use crate::component::{instantiate, Component};
    pub use crate::counter::{decrement, increment, Counter};
    pub use crate::node::{GenericNode, HeadlessNode};
    pub use crate::reactive::*;
    pub use crate::view::View;
}
