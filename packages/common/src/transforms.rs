//! # Transaction Helpers
//!
//! Structural edits expressed over a [`Transaction`]. Each helper takes the
//! current transaction and returns the next one:
//!
//! - when nothing matches, the result is an exact copy of the input
//! - when the document or selection changes, the result comes from
//!   [`clone_tr`] and carries an advanced `time`
//!
//! Errors are only returned when a matched edit is rejected by the model,
//! e.g. removing the last child of a node whose content requires one.

use crate::parent::{find_parent_node_of_type, find_position_of_node_before, FoundNode};
use crate::result::CommonResult;
use tracing::debug;
use weft_model::{Attrs, Mark, Node, NodeType, ResolvedPos, Selection, Transaction};

/// Copy of `tr` marked as a new revision
pub fn clone_tr(tr: &Transaction) -> Transaction {
    let mut next = tr.clone();
    let time = tr.time() + 1;
    next.set_time(time);
    next
}

pub fn is_node_selection(selection: &Selection) -> bool {
    matches!(selection, Selection::Node { .. })
}

/// Whether `content` may be inserted at `pos` without breaking its parent
pub fn can_insert(pos: &ResolvedPos, content: &Node) -> bool {
    let parent = pos.parent();
    let index = pos.index(pos.depth()).min(parent.child_count());
    let mut children = parent.children().to_vec();
    children.insert(index, content.clone());
    parent.node_type().check_content(&children).is_ok()
}

/// Whether the child at `index` of the parent around `pos` may become `content`
fn can_replace_child(pos: &ResolvedPos, index: usize, content: &Node) -> bool {
    let parent = pos.parent();
    if index >= parent.child_count() {
        return false;
    }
    let mut children = parent.children().to_vec();
    children[index] = content.clone();
    parent.node_type().check_content(&children).is_ok()
}

/// Delete the node starting at `pos`
pub fn remove_node_at_pos(tr: &Transaction, pos: usize) -> CommonResult<Transaction> {
    let Some(size) = tr.doc().node_at(pos).map(Node::node_size) else {
        return Ok(tr.clone());
    };
    let mut next = clone_tr(tr);
    next.delete(pos, pos + size)?;
    debug!(pos, size, "removed node");
    Ok(next)
}

fn try_replace_node_at_pos(
    tr: &Transaction,
    pos: usize,
    content: &Node,
) -> CommonResult<Option<Transaction>> {
    let Some(node) = tr.doc().node_at(pos) else {
        return Ok(None);
    };
    let resolved = tr.doc().resolve(pos)?;
    if resolved.text_offset() > 0 {
        return Ok(None);
    }
    if !can_replace_child(&resolved, resolved.index(resolved.depth()), content) {
        return Ok(None);
    }

    let size = node.node_size();
    let mut next = clone_tr(tr);
    next.replace_with(pos, pos + size, vec![content.clone()])?;
    let start = next.selection().from().saturating_sub(1);
    let selection = Selection::near(next.doc(), start);
    next.set_selection(selection);
    debug!(pos, node_type = %content.type_name(), "replaced node");
    Ok(Some(next))
}

/// Replace the node starting at `pos` with `content`, when its parent accepts it
pub fn replace_node_at_pos(tr: &Transaction, pos: usize, content: Node) -> CommonResult<Transaction> {
    Ok(try_replace_node_at_pos(tr, pos, &content)?.unwrap_or_else(|| tr.clone()))
}

fn find_parent(tr: &Transaction, types: &[&NodeType]) -> Option<FoundNode> {
    find_parent_node_of_type(tr.doc(), tr.selection(), types)
}

/// Remove the closest selection ancestor with one of `types`
pub fn remove_parent_node_of_type(tr: &Transaction, types: &[&NodeType]) -> CommonResult<Transaction> {
    match find_parent(tr, types) {
        Some(parent) => remove_node_at_pos(tr, parent.pos),
        None => Ok(tr.clone()),
    }
}

/// Replace the closest selection ancestor of the first type in `types` that
/// both exists and accepts `content` in its place
pub fn replace_parent_node_of_type(
    tr: &Transaction,
    types: &[&NodeType],
    content: Node,
) -> CommonResult<Transaction> {
    for node_type in types {
        if let Some(parent) = find_parent(tr, &[*node_type]) {
            if let Some(next) = try_replace_node_at_pos(tr, parent.pos, &content)? {
                return Ok(next);
            }
        }
    }
    Ok(tr.clone())
}

pub fn remove_selected_node(tr: &Transaction) -> CommonResult<Transaction> {
    let Selection::Node { pos } = *tr.selection() else {
        return Ok(tr.clone());
    };
    let to = tr.selection().to(tr.doc());
    let mut next = clone_tr(tr);
    next.delete(pos, to)?;
    let selection = Selection::near(next.doc(), pos);
    next.set_selection(selection);
    debug!(pos, to, "removed selected node");
    Ok(next)
}

/// Replace the node under a node selection and select the replacement
pub fn replace_selected_node(tr: &Transaction, content: Node) -> CommonResult<Transaction> {
    Ok(try_replace_selected_node(tr, &content)?.unwrap_or_else(|| tr.clone()))
}

fn try_replace_selected_node(tr: &Transaction, content: &Node) -> CommonResult<Option<Transaction>> {
    let Selection::Node { pos } = *tr.selection() else {
        return Ok(None);
    };
    let resolved = tr.doc().resolve(pos)?;
    if !can_replace_child(&resolved, resolved.index(resolved.depth()), content) {
        return Ok(None);
    }
    let to = tr.selection().to(tr.doc());
    let mut next = clone_tr(tr);
    next.replace_with(pos, to, vec![content.clone()])?;
    next.set_selection(Selection::node(pos));
    debug!(pos, node_type = %content.type_name(), "replaced selected node");
    Ok(Some(next))
}

/// Leaves are selected as nodes after insertion, anything else gets a cursor
fn select_inserted(tr: &mut Transaction, content: &Node, pos: usize) {
    let selection = if content.is_leaf() && !content.is_text() {
        Selection::node(pos)
    } else {
        Selection::near(tr.doc(), pos)
    };
    tr.set_selection(selection);
}

/// Insert `content` at `position` (or at the selection) in the closest place
/// that accepts it.
///
/// Lookup order:
/// 1. with `try_to_replace`, replace the node under a node selection
/// 2. replace an empty textblock around the insertion point
/// 3. insert right at the insertion point
/// 4. insert after each ancestor of the insertion point, innermost first
pub fn safe_insert(
    tr: &Transaction,
    content: Node,
    position: Option<usize>,
    try_to_replace: bool,
) -> CommonResult<Transaction> {
    let insert_at = match (position, tr.selection()) {
        (Some(pos), _) => pos,
        (None, Selection::Node { pos }) => pos + 1,
        (None, selection) => selection.from(),
    };
    let insert_pos = tr.doc().resolve(insert_at)?;

    if try_to_replace && is_node_selection(tr.selection()) {
        if let Some(next) = try_replace_selected_node(tr, &content)? {
            return Ok(next);
        }
    }

    let parent = insert_pos.parent();
    let depth = insert_pos.depth();
    if depth > 0 && parent.is_textblock() && parent.content_size() == 0 {
        let before = insert_pos.before(depth);
        if let Some(mut next) = try_replace_node_at_pos(tr, before, &content)? {
            select_inserted(&mut next, &content, before);
            return Ok(next);
        }
    }

    if can_insert(&insert_pos, &content) {
        let mut next = clone_tr(tr);
        next.insert(insert_at, vec![content.clone()])?;
        select_inserted(&mut next, &content, insert_at);
        debug!(pos = insert_at, node_type = %content.type_name(), "inserted node");
        return Ok(next);
    }

    for d in (1..=depth).rev() {
        let after = insert_pos.after(d);
        let candidate = tr.doc().resolve(after)?;
        if can_insert(&candidate, &content) {
            let mut next = clone_tr(tr);
            next.insert(after, vec![content.clone()])?;
            select_inserted(&mut next, &content, after);
            debug!(pos = after, node_type = %content.type_name(), "inserted node after ancestor");
            return Ok(next);
        }
    }

    Ok(tr.clone())
}

/// Change type, attributes or marks of the closest selection ancestor with
/// one of `types`. `attrs` are merged over the existing attributes.
pub fn set_parent_node_markup(
    tr: &Transaction,
    types: &[&NodeType],
    new_type: Option<&NodeType>,
    attrs: Attrs,
    marks: Option<Vec<Mark>>,
) -> CommonResult<Transaction> {
    let Some(parent) = find_parent(tr, types) else {
        return Ok(tr.clone());
    };
    let node_type = new_type.unwrap_or_else(|| parent.node.node_type());
    let mut merged = parent.node.attrs().clone();
    merged.extend(attrs);
    let marks = marks.unwrap_or_else(|| parent.node.marks().to_vec());
    let updated = parent.node.with_markup(node_type, merged, marks)?;

    let mut next = clone_tr(tr);
    next.replace_with(parent.pos, parent.pos + parent.node.node_size(), vec![updated])?;
    debug!(pos = parent.pos, node_type = %node_type.name(), "updated node markup");
    Ok(next)
}

/// Select the closest ancestor with one of `types`, unless a node is already
/// selected
pub fn select_parent_node_of_type(tr: &Transaction, types: &[&NodeType]) -> Transaction {
    if is_node_selection(tr.selection()) {
        return tr.clone();
    }
    match find_parent(tr, types) {
        Some(parent) => {
            let mut next = clone_tr(tr);
            next.set_selection(Selection::node(parent.pos));
            next
        }
        None => tr.clone(),
    }
}

/// Delete the node directly before the selection start
pub fn remove_node_before(tr: &Transaction) -> CommonResult<Transaction> {
    match find_position_of_node_before(tr.doc(), tr.selection()) {
        Some(pos) => remove_node_at_pos(tr, pos),
        None => Ok(tr.clone()),
    }
}
