//! Comprehensive tests for microbe
//!
//! Replication, ordering, placement, markup and removal behaviour of the
//! insertion engine.

use std::cell::Cell;
use std::rc::Rc;

use microbe::dom::{Document, NodeId, NodeOperations, ReadyState};
use microbe::html::{inner_html, outer_html};
use microbe::Microbe;

/// Document whose body holds `count` empty divs
fn body_with_divs(count: usize) -> (Document, Vec<NodeId>) {
    let mut doc = Document::default();
    let body = doc.body();
    let mut divs = Vec::new();
    for _ in 0..count {
        let div = doc.tree.create_element("div");
        doc.tree.append_child(body, div).unwrap();
        divs.push(div);
    }
    (doc, divs)
}

#[test]
fn test_scenario_two_divs_one_span() {
    let (mut doc, divs) = body_with_divs(2);
    let span = doc.tree.create_element("span");

    let out = Microbe::wrap(divs.clone()).append(&mut doc, span).unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(doc.tree.child_ids(divs[0]), vec![span]);

    let second = doc.tree.child_ids(divs[1]);
    assert_eq!(second.len(), 1);
    assert_ne!(second[0], span);
    assert_eq!(doc.tree.tag_name(second[0]), Some("span"));
    assert_eq!(out.nodes(), &[span, second[0]]);
}

#[test]
fn test_replication_count_and_order() {
    let (mut doc, divs) = body_with_divs(3);
    let content = Microbe::construct(&mut doc, "<a></a><b></b>").unwrap();
    assert_eq!(content.len(), 2);

    let out = Microbe::wrap(divs.clone()).append(&mut doc, &content).unwrap();

    assert_eq!(out.len(), 3 * 2);
    // target-major, content-minor
    for (t, &div) in divs.iter().enumerate() {
        assert_eq!(doc.tree.child_ids(div), out.nodes()[t * 2..t * 2 + 2].to_vec());
        assert_eq!(doc.tree.tag_name(out[t * 2]), Some("a"));
        assert_eq!(doc.tree.tag_name(out[t * 2 + 1]), Some("b"));
    }
}

#[test]
fn test_first_target_identity_and_clone_structure() {
    let (mut doc, divs) = body_with_divs(3);
    let card = Microbe::construct(&mut doc, r#"<section class="card" data-id="7"><h1>Title</h1><p>Body</p></section>"#)
        .unwrap()[0];
    let original_markup = outer_html(&doc.tree, card);

    let out = Microbe::wrap(divs).append(&mut doc, card).unwrap();

    assert_eq!(out[0], card);
    for &copy in &out.nodes()[1..] {
        assert_ne!(copy, card);
        assert_eq!(outer_html(&doc.tree, copy), original_markup);
    }
    let distinct: std::collections::HashSet<_> = out.iter().collect();
    assert_eq!(distinct.len(), 3);
}

#[test]
fn test_prepend_and_append_ordering() {
    let (mut doc, divs) = body_with_divs(2);
    let mut existing = Vec::new();
    for &div in &divs {
        let a = doc.tree.create_element("a");
        let b = doc.tree.create_element("b");
        doc.tree.append_child(div, a).unwrap();
        doc.tree.append_child(div, b).unwrap();
        existing.push((a, b));
    }
    let x = doc.tree.create_element("x");
    let y = doc.tree.create_element("y");

    let prepended = Microbe::wrap(vec![divs[0]]).prepend(&mut doc, vec![x, y]).unwrap();
    assert_eq!(prepended.nodes(), &[x, y]);
    let (a, b) = existing[0];
    assert_eq!(doc.tree.child_ids(divs[0]), vec![x, y, a, b]);

    let x2 = doc.tree.create_element("x");
    let y2 = doc.tree.create_element("y");
    Microbe::wrap(vec![divs[1]]).append(&mut doc, vec![x2, y2]).unwrap();
    let (a, b) = existing[1];
    assert_eq!(doc.tree.child_ids(divs[1]), vec![a, b, x2, y2]);
}

#[test]
fn test_insert_after_between_siblings() {
    let (mut doc, divs) = body_with_divs(2);
    let (t, s) = (divs[0], divs[1]);
    let x = doc.tree.create_element("x");

    let out = Microbe::wrap(vec![t]).insert_after(&mut doc, x).unwrap();

    assert_eq!(out.nodes(), &[x]);
    assert_eq!(doc.tree.element_children(doc.body()), vec![t, x, s]);
}

#[test]
fn test_insert_after_last_child() {
    let (mut doc, divs) = body_with_divs(2);
    let (p, t) = (divs[0], divs[1]);
    let x = doc.tree.create_element("x");

    Microbe::wrap(vec![t]).insert_after(&mut doc, x).unwrap();

    assert_eq!(doc.tree.element_children(doc.body()), vec![p, t, x]);
}

#[test]
fn test_insert_after_multiple_targets_clones() {
    let (mut doc, divs) = body_with_divs(2);
    let content = Microbe::construct(&mut doc, "<i></i><u></u>").unwrap();

    let out = Microbe::wrap(divs.clone()).insert_after(&mut doc, &content).unwrap();

    assert_eq!(out.len(), 4);
    assert_eq!(&out.nodes()[..2], content.nodes());
    assert_eq!(
        doc.tree.element_children(doc.body()),
        vec![divs[0], out[0], out[1], divs[1], out[2], out[3]]
    );
}

#[test]
fn test_markup_append_concatenates_inner_html() {
    let (mut doc, divs) = body_with_divs(2);
    let targets = Microbe::wrap(divs.clone());
    let kept = doc.tree.create_element("i");
    doc.tree.append_child(divs[0], kept).unwrap();

    let out = targets.append(&mut doc, "<b>new</b>").unwrap();

    assert_eq!(out, targets);
    assert_eq!(inner_html(&doc.tree, divs[0]), "<i></i><b>new</b>");
    assert_eq!(inner_html(&doc.tree, divs[1]), "<b>new</b>");
    // Existing children are re-created by the parser
    assert_eq!(doc.tree.parent(kept), None);
    // Targets themselves are untouched
    assert_eq!(doc.tree.element_children(doc.body()), divs);
}

#[test]
fn test_markup_prepend() {
    let (mut doc, divs) = body_with_divs(1);
    let targets = Microbe::wrap(divs.clone());
    targets.append(&mut doc, "<p>tail</p>").unwrap();

    targets.prepend(&mut doc, "<h2>head</h2>").unwrap();

    assert_eq!(inner_html(&doc.tree, divs[0]), "<h2>head</h2><p>tail</p>");
}

#[test]
fn test_markup_append_keeps_target_listeners() {
    let (mut doc, divs) = body_with_divs(1);
    let targets = Microbe::wrap(divs.clone());
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);
    targets.on(&mut doc, "click", move |_| seen.set(seen.get() + 1));

    targets.append(&mut doc, "<b>new</b>").unwrap();

    assert_eq!(doc.tree.parent(divs[0]), Some(doc.body()));
    assert_eq!(doc.listeners.dispatch(divs[0], "click"), 1);
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_remove_detaches_and_silences_listeners() {
    let (mut doc, divs) = body_with_divs(3);
    let targets = Microbe::wrap(divs.clone());
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);
    targets.on(&mut doc, "click", move |_| seen.set(seen.get() + 1));

    let removed = targets.remove(&mut doc).unwrap();

    assert_eq!(removed, &targets);
    for &div in &divs {
        assert_eq!(doc.tree.parent(div), None);
        assert_eq!(doc.listeners.dispatch(div, "click"), 0);
    }
    assert_eq!(hits.get(), 0);
    assert!(doc.tree.element_children(doc.body()).is_empty());
}

#[test]
fn test_ready_defers_until_complete() {
    let mut doc = Document::default();
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);

    Microbe::ready(&mut doc, move |doc| {
        let body = Microbe::construct(doc, "body").unwrap();
        body.append(doc, "<p>loaded</p>").unwrap();
        flag.set(true);
    });
    assert!(!fired.get());

    doc.set_ready_state(ReadyState::Complete);
    assert!(fired.get());
    assert_eq!(inner_html(&doc.tree, doc.body()), "<p>loaded</p>");
}
