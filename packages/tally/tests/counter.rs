use expect_test::expect;
use tally::component::instantiate;
use tally::prelude::*;

fn mount<'a>(ctx: ScopeRef<'a>) -> HeadlessNode<'a> {
    tally::render(ctx, |ctx| instantiate(Counter, ctx, ()))
}

/// The text shown to the user: content of the readout, the second `div` in document order.
fn display(root: &HeadlessNode) -> String {
    root.query_all("div")[1].text_content()
}

fn buttons<'a>(root: &HeadlessNode<'a>) -> Vec<HeadlessNode<'a>> {
    root.query_all("button")
}

#[test]
fn initial_render() {
    create_scope_immediate(|ctx| {
        let root = mount(ctx);
        assert_eq!(display(&root), "Counter: 0");
        expect![[r#"<div><div>Counter: 0</div><button>Increment</button><button>Decrement</button></div>"#]]
            .assert_eq(&root.inner_html());
    });
}

#[test]
fn one_increment() {
    create_scope_immediate(|ctx| {
        let root = mount(ctx);
        buttons(&root)[0].click();
        assert_eq!(display(&root), "Counter: 1");
    });
}

#[test]
fn increment_then_two_decrements() {
    create_scope_immediate(|ctx| {
        let root = mount(ctx);
        let buttons = buttons(&root);
        buttons[0].click();
        buttons[1].click();
        buttons[1].click();
        assert_eq!(display(&root), "Counter: -1");
    });
}

#[test]
fn thousand_increments() {
    create_scope_immediate(|ctx| {
        let root = mount(ctx);
        let increment = &buttons(&root)[0];
        for _ in 0..1000 {
            increment.click();
        }
        assert_eq!(display(&root), "Counter: 1000");
    });
}

#[test]
fn displayed_value_is_the_running_sum() {
    create_scope_immediate(|ctx| {
        let root = mount(ctx);
        let buttons = buttons(&root);

        let steps = [1, 1, -1, 1, -1, -1, -1, 1, 1, 1, -1, 1];
        let mut expected = 0;
        for step in steps {
            if step > 0 {
                buttons[0].click();
            } else {
                buttons[1].click();
            }
            expected += step;
            assert_eq!(display(&root), format!("Counter: {expected}"));
        }
    });
}

#[test]
fn render_is_idempotent() {
    create_scope_immediate(|ctx| {
        let root = mount(ctx);
        // Rendering is a pure function of the current value.
        assert_eq!(root.inner_html(), root.inner_html());

        // A second instance with the same state renders identically.
        let other = mount(ctx);
        assert_eq!(root.inner_html(), other.inner_html());

        // Instances own their state cells independently.
        buttons(&root)[0].click();
        assert_eq!(display(&root), "Counter: 1");
        assert_eq!(display(&other), "Counter: 0");
    });
}

#[test]
fn state_does_not_survive_remount() {
    create_scope_immediate(|ctx| {
        let first = ctx.create_signal(String::new());
        let disposer = ctx.create_child_scope(|ctx| {
            let root = mount(ctx);
            buttons(&root)[0].click();
            first.set(display(&root));
        });
        disposer();
        assert_eq!(*first.get(), "Counter: 1");

        // Remounting starts over from the initial value.
        let root = mount(ctx);
        assert_eq!(display(&root), "Counter: 0");
    });
}
