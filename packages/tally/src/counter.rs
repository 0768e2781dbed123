//! The counter widget: an integer state cell, a text readout and two buttons that adjust the
//! value by exactly one unit.

use crate::node::GenericNode;
use crate::reactive::*;
use crate::view::View;

/// Next value after an increment. No bounds checking; overflow behaves however `i32` does.
pub fn increment(value: i32) -> i32 {
    value + 1
}

/// Next value after a decrement.
pub fn decrement(value: i32) -> i32 {
    value - 1
}

/// The counter component.
///
/// Renders `Counter: <value>` alongside an `Increment` and a `Decrement` button. The state cell
/// is created with value `0` when the component is instantiated and is replaced wholesale on
/// every click; it does not survive the enclosing scope.
#[allow(non_snake_case)]
pub fn Counter<'a, G: GenericNode<'a>>(ctx: ScopeRef<'a>, _props: ()) -> View<G> {
    let state = ctx.create_signal(0i32);

    let root = G::element("div");

    let label = G::element("div");
    let text = G::text_node("");
    ctx.create_effect({
        let text = text.clone();
        move || text.update_text(&format!("Counter: {}", state.get()))
    });
    label.append_child(&text);
    root.append_child(&label);

    let increment_button = G::element("button");
    increment_button.append_child(&G::text_node("Increment"));
    increment_button.event("click", Box::new(move || state.set(increment(*state.get()))));
    root.append_child(&increment_button);

    let decrement_button = G::element("button");
    decrement_button.append_child(&G::text_node("Decrement"));
    decrement_button.event("click", Box::new(move || state.set(decrement(*state.get()))));
    root.append_child(&decrement_button);

    View::new_node(root)
}
