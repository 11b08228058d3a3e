//! Example: building a list with the insertion API

use microbe::html::outer_html;
use microbe::{Config, Microbe};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG=microbe=debug for per-operation detail)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::default();
    let mut doc = config.parse_document(
        r#"<html><body><ul class="todo"></ul><ul class="done"></ul></body></html>"#,
    )?;

    // One <li> per list: the first list gets the original, the second a clone
    let lists = Microbe::construct(&mut doc, "ul")?;
    let items = lists.append(&mut doc, "<li>")?;
    println!("inserted {} items into {} lists", items.len(), lists.len());

    // Markup strings are concatenated into innerHTML
    lists.prepend(&mut doc, "<li>first</li>")?;

    let todo = Microbe::construct(&mut doc, ".todo")?;
    todo.insert_after(&mut doc, "<hr>")?;

    let done = Microbe::construct(&mut doc, ".done")?;
    done.remove(&mut doc)?;

    println!("{}", outer_html(doc.tree(), doc.body()));
    println!("microbe v{}", microbe::VERSION);
    Ok(())
}
