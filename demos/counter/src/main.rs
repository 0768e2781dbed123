use tally::component::instantiate;
use tally::prelude::*;

fn main() {
    create_scope_immediate(|ctx| {
        let root = tally::render(ctx, |ctx| instantiate(Counter, ctx, ()));
        println!("{}", root.inner_html());

        let buttons = root.query_all("button");
        let (increment, decrement) = (&buttons[0], &buttons[1]);

        increment.click();
        increment.click();
        println!("{}", root.inner_html());

        decrement.click();
        decrement.click();
        decrement.click();
        println!("{}", root.inner_html());
    });
}
