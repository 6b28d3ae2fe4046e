use weft_common::{
    find_children_by_type, remove_node_at_pos, remove_node_before, remove_parent_node_of_type,
    remove_selected_node, replace_parent_node_of_type, replace_selected_node, safe_insert,
    select_parent_node_of_type, set_parent_node_markup, CommonError,
};
use weft_model::builders::*;
use weft_model::{attrs, AttrValue, NodeType, Selection, Transaction};

fn node_type(name: &str) -> &'static NodeType {
    schema().node_type(name).unwrap()
}

fn quote_tr() -> Transaction {
    let doc = doc(vec![p("intro"), blockquote(vec![p("quoted")])]);
    let cursor = pos_of(&doc, "quoted");
    Transaction::new(doc).with_selection(Selection::cursor(cursor))
}

#[test]
fn test_remove_parent_node_of_type() {
    let tr = quote_tr();

    let next = remove_parent_node_of_type(&tr, &[node_type("blockquote")]).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("intro")]));
    assert_eq!(next.time(), tr.time() + 1);
    assert_eq!(&next.replay().unwrap(), next.doc());
}

#[test]
fn test_remove_parent_without_match_returns_input() {
    let tr = quote_tr();

    let next = remove_parent_node_of_type(&tr, &[node_type("table")]).unwrap();

    assert_eq!(next, tr);
}

#[test]
fn test_replace_parent_node_of_type() {
    let tr = quote_tr();

    let next = replace_parent_node_of_type(&tr, &[node_type("table"), node_type("blockquote")], p("new"))
        .unwrap();

    assert_eq!(next.doc(), &doc(vec![p("intro"), p("new")]));
    assert_eq!(next.selection(), &Selection::cursor(11));
}

#[test]
fn test_replace_parent_rejects_content_the_parent_cannot_hold() {
    let tr = quote_tr();

    let next = replace_parent_node_of_type(&tr, &[node_type("blockquote")], text("loose")).unwrap();

    assert_eq!(next, tr);
}

#[test]
fn test_safe_insert_inline_into_empty_paragraph() {
    let tr = Transaction::new(doc(vec![p("a"), p("")])).with_selection(Selection::cursor(4));

    let next = safe_insert(&tr, image("i.png"), None, false).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("a"), p_with(vec![image("i.png")])]));
    assert_eq!(next.selection(), &Selection::node(4));
}

#[test]
fn test_safe_insert_block_replaces_empty_paragraph() {
    let tr = Transaction::new(doc(vec![p("a"), p("")])).with_selection(Selection::cursor(4));

    let next = safe_insert(&tr, blockquote(vec![p("q")]), None, false).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("a"), blockquote(vec![p("q")])]));
}

#[test]
fn test_safe_insert_block_goes_after_the_textblock() {
    let tr = Transaction::new(doc(vec![p("ab"), p("c")])).with_selection(Selection::cursor(2));

    let next = safe_insert(&tr, p("x"), None, false).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("ab"), p("x"), p("c")]));
}

#[test]
fn test_safe_insert_at_explicit_position() {
    let tr = Transaction::new(doc(vec![p("ab"), p("c")]));

    let next = safe_insert(&tr, p("x"), Some(4), false).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("ab"), p("x"), p("c")]));
}

#[test]
fn test_safe_insert_replaces_selected_node() {
    let doc = doc(vec![p_with(vec![text("a"), image("old.png")])]);
    let tr = Transaction::new(doc).with_selection(Selection::node(2));

    let next = safe_insert(&tr, image("new.png"), None, true).unwrap();

    assert_eq!(
        next.doc(),
        &weft_model::builders::doc(vec![p_with(vec![text("a"), image("new.png")])])
    );
    assert_eq!(next.selection(), &Selection::node(2));
}

#[test]
fn test_set_parent_node_markup() {
    let tr = Transaction::new(doc(vec![heading(1, "title")])).with_selection(Selection::cursor(2));

    let next =
        set_parent_node_markup(&tr, &[node_type("heading")], None, attrs([("level", 2)]), None)
            .unwrap();
    assert_eq!(next.doc(), &doc(vec![heading(2, "title")]));
    assert_eq!(next.selection(), tr.selection());
}

#[test]
fn test_set_parent_node_markup_changes_type() {
    let tr = Transaction::new(doc(vec![p("body")])).with_selection(Selection::cursor(2));

    let next = set_parent_node_markup(
        &tr,
        &[node_type("paragraph")],
        Some(node_type("heading")),
        attrs([("level", 3)]),
        None,
    )
    .unwrap();

    let headings = find_children_by_type(next.doc(), node_type("heading"), false);
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].node.attr("level"), Some(&AttrValue::Int(3)));
    assert_eq!(next.selection(), &Selection::cursor(2));
}

#[test]
fn test_select_parent_node_of_type() {
    let tr = quote_tr();

    let next = select_parent_node_of_type(&tr, &[node_type("blockquote")]);
    assert_eq!(next.selection(), &Selection::node(7));
    assert_eq!(next.doc(), tr.doc());

    let again = select_parent_node_of_type(&next, &[node_type("blockquote")]);
    assert_eq!(again, next);
}

#[test]
fn test_remove_selected_node() {
    let tr = Transaction::new(doc(vec![p("a"), p("b")])).with_selection(Selection::node(0));

    let next = remove_selected_node(&tr).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("b")]));
    assert_eq!(next.selection(), &Selection::cursor(1));
}

#[test]
fn test_replace_selected_node() {
    let tr = Transaction::new(doc(vec![p("a"), p("b")])).with_selection(Selection::node(3));

    let next = replace_selected_node(&tr, heading(1, "h")).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("a"), heading(1, "h")]));
    assert_eq!(next.selection(), &Selection::node(3));
}

#[test]
fn test_remove_node_before() {
    let tr = Transaction::new(doc(vec![p("a"), p("b")])).with_selection(Selection::cursor(3));

    let next = remove_node_before(&tr).unwrap();

    assert_eq!(next.doc(), &doc(vec![p("b")]));
}

#[test]
fn test_removing_required_content_is_an_error() {
    let tr = Transaction::new(doc(vec![p("only")]));

    let result = remove_node_at_pos(&tr, 0);

    assert!(matches!(result, Err(CommonError::Transform(_))));
}
