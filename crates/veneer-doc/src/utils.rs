//! Generic operations over [`Doc`] trees.
//!
//! Read-only traversal and search work on `&Doc`; structural rewrites
//! consume their input and return a new tree, so shared documents are never
//! mutated behind a reader's back. Break propagation is the one pass the
//! printer requires: it runs once per document, before rendering.

use crate::doc::{Doc, LineKind};

/// Depth-first walk over `doc`.
///
/// `on_enter` runs before a node's children and may return `false` to skip
/// them; `on_exit` runs after. A [`Doc::ConditionalGroup`] descends into all
/// of its states only when `into_conditional_groups` is set; otherwise only
/// the first (most compact) state is visited, matching what a plain render
/// of the group would reach.
pub fn traverse_doc(
    doc: &Doc,
    on_enter: &mut dyn FnMut(&Doc) -> bool,
    on_exit: &mut dyn FnMut(&Doc),
    into_conditional_groups: bool,
) {
    if on_enter(doc) {
        match doc {
            Doc::Concat(parts) | Doc::Fill(parts) => {
                for part in parts {
                    traverse_doc(part, on_enter, on_exit, into_conditional_groups);
                }
            }
            Doc::IfBreak {
                break_contents,
                flat_contents,
                ..
            } => {
                traverse_doc(break_contents, on_enter, on_exit, into_conditional_groups);
                traverse_doc(flat_contents, on_enter, on_exit, into_conditional_groups);
            }
            Doc::ConditionalGroup { states, .. } => {
                if into_conditional_groups {
                    for state in states {
                        traverse_doc(state, on_enter, on_exit, into_conditional_groups);
                    }
                } else if let Some(first) = states.first() {
                    traverse_doc(first, on_enter, on_exit, into_conditional_groups);
                }
            }
            Doc::Group { contents, .. } => {
                traverse_doc(contents, on_enter, on_exit, into_conditional_groups);
            }
            Doc::Indent(contents) | Doc::LineSuffix(contents) => {
                traverse_doc(contents, on_enter, on_exit, into_conditional_groups);
            }
            Doc::Align { contents, .. } => {
                traverse_doc(contents, on_enter, on_exit, into_conditional_groups);
            }
            Doc::Text(_)
            | Doc::Line(_)
            | Doc::LineSuffixBoundary
            | Doc::BreakParent
            | Doc::Cursor => {}
        }
    }
    on_exit(doc);
}

/// Walk `doc` until `probe` yields a value; return it, or `default` if the
/// walk completes without one.
pub fn search_doc<T>(doc: &Doc, mut probe: impl FnMut(&Doc) -> Option<T>, default: T) -> T {
    let mut found = None;
    traverse_doc(
        doc,
        &mut |node| {
            if found.is_some() {
                return false;
            }
            match probe(node) {
                Some(value) => {
                    found = Some(value);
                    false
                }
                None => true,
            }
        },
        &mut |_| {},
        false,
    );
    found.unwrap_or(default)
}

/// Whether `doc` contains any breakable point.
pub fn contains_line(doc: &Doc) -> bool {
    search_doc(
        doc,
        |node| match node {
            Doc::Line(_) => Some(true),
            _ => None,
        },
        false,
    )
}

/// Whether `doc` is certain to render with at least one line break: a group
/// already marked broken, a hard line, or an explicit break marker.
pub fn will_break(doc: &Doc) -> bool {
    search_doc(
        doc,
        |node| match node {
            Doc::Group { broken: true, .. } | Doc::ConditionalGroup { broken: true, .. } => {
                Some(true)
            }
            Doc::Line(kind) if kind.is_hard() => Some(true),
            Doc::BreakParent => Some(true),
            _ => None,
        },
        false,
    )
}

/// Bottom-up structural rewrite: children are rebuilt first, then the
/// rebuilt node is passed through `f`, whose return value replaces it.
pub fn map_doc(doc: Doc, f: &mut dyn FnMut(Doc) -> Doc) -> Doc {
    let rebuilt = match doc {
        Doc::Concat(parts) => Doc::Concat(parts.into_iter().map(|p| map_doc(p, f)).collect()),
        Doc::Fill(parts) => Doc::Fill(parts.into_iter().map(|p| map_doc(p, f)).collect()),
        Doc::Indent(contents) => Doc::Indent(Box::new(map_doc(*contents, f))),
        Doc::Align { amount, contents } => Doc::Align {
            amount,
            contents: Box::new(map_doc(*contents, f)),
        },
        Doc::Group {
            contents,
            broken,
            id,
        } => Doc::Group {
            contents: Box::new(map_doc(*contents, f)),
            broken,
            id,
        },
        Doc::ConditionalGroup { states, broken, id } => Doc::ConditionalGroup {
            states: states.into_iter().map(|s| map_doc(s, f)).collect(),
            broken,
            id,
        },
        Doc::IfBreak {
            break_contents,
            flat_contents,
            group_id,
        } => Doc::IfBreak {
            break_contents: Box::new(map_doc(*break_contents, f)),
            flat_contents: Box::new(map_doc(*flat_contents, f)),
            group_id,
        },
        Doc::LineSuffix(contents) => Doc::LineSuffix(Box::new(map_doc(*contents, f))),
        leaf @ (Doc::Text(_)
        | Doc::Line(_)
        | Doc::LineSuffixBoundary
        | Doc::BreakParent
        | Doc::Cursor) => leaf,
    };
    f(rebuilt)
}

/// Resolve which groups must break before printing.
///
/// A [`Doc::BreakParent`] (every hard line carries one) forces the innermost
/// enclosing group to break, and a broken group forces its own enclosing
/// group in turn. Conditional groups are a barrier: breaks inside their
/// states never escape, because the author is expected to pick the right
/// alternative explicitly. The pass is idempotent.
pub fn propagate_breaks(doc: Doc) -> Doc {
    propagate(doc).0
}

/// Returns the rewritten doc plus whether it forces its enclosing group to
/// break.
fn propagate(doc: Doc) -> (Doc, bool) {
    match doc {
        Doc::BreakParent => (Doc::BreakParent, true),
        Doc::Concat(parts) => {
            let (parts, forces) = propagate_parts(parts);
            (Doc::Concat(parts), forces)
        }
        Doc::Fill(parts) => {
            let (parts, forces) = propagate_parts(parts);
            (Doc::Fill(parts), forces)
        }
        Doc::Indent(contents) => {
            let (contents, forces) = propagate(*contents);
            (Doc::Indent(Box::new(contents)), forces)
        }
        Doc::Align { amount, contents } => {
            let (contents, forces) = propagate(*contents);
            (
                Doc::Align {
                    amount,
                    contents: Box::new(contents),
                },
                forces,
            )
        }
        Doc::LineSuffix(contents) => {
            let (contents, forces) = propagate(*contents);
            (Doc::LineSuffix(Box::new(contents)), forces)
        }
        Doc::IfBreak {
            break_contents,
            flat_contents,
            group_id,
        } => {
            let (break_contents, forces_break) = propagate(*break_contents);
            let (flat_contents, forces_flat) = propagate(*flat_contents);
            (
                Doc::IfBreak {
                    break_contents: Box::new(break_contents),
                    flat_contents: Box::new(flat_contents),
                    group_id,
                },
                forces_break || forces_flat,
            )
        }
        Doc::Group {
            contents,
            broken,
            id,
        } => {
            let (contents, forces) = propagate(*contents);
            let broken = broken || forces;
            (
                Doc::Group {
                    contents: Box::new(contents),
                    broken,
                    id,
                },
                broken,
            )
        }
        Doc::ConditionalGroup { states, broken, id } => {
            // Breaks are resolved within each state but do not escape.
            let states = states.into_iter().map(|s| propagate(s).0).collect();
            (Doc::ConditionalGroup { states, broken, id }, broken)
        }
        leaf @ (Doc::Text(_)
        | Doc::Line(_)
        | Doc::LineSuffixBoundary
        | Doc::Cursor) => (leaf, false),
    }
}

fn propagate_parts(parts: Vec<Doc>) -> (Vec<Doc>, bool) {
    let mut forces = false;
    let parts = parts
        .into_iter()
        .map(|part| {
            let (part, f) = propagate(part);
            forces |= f;
            part
        })
        .collect();
    (parts, forces)
}

/// Force `doc` into its single-line shape: every soft line becomes nothing,
/// every other non-hard line a space, and every `IfBreak` its flat branch.
/// Hard lines are kept; a document that truly cannot flatten stays multi-
/// line rather than silently losing its breaks.
pub fn flatten_lines(doc: Doc) -> Doc {
    map_doc(doc, &mut |node| match node {
        Doc::Line(LineKind::Normal) => Doc::Text(" ".to_string()),
        Doc::Line(LineKind::Soft) => Doc::Text(String::new()),
        Doc::IfBreak { flat_contents, .. } => *flat_contents,
        other => other,
    })
}

/// Remove a trailing hard break from `doc`.
///
/// Recognizes exactly the shape the [`hardline`](crate::doc::hardline)
/// builder produces at the tail of a two-element concat,
/// `concat([x, concat([hard line, break-parent])])`, and returns `x`.
/// Anything else is returned unchanged, so the operation is idempotent.
pub fn strip_trailing_hard_break(doc: Doc) -> Doc {
    let matches_shape = if let Doc::Concat(parts) = &doc {
        matches!(
            parts.as_slice(),
            [_, Doc::Concat(tail)]
                if matches!(
                    tail.as_slice(),
                    [Doc::Line(kind), Doc::BreakParent] if kind.is_hard()
                )
        )
    } else {
        false
    };
    if matches_shape {
        if let Doc::Concat(mut parts) = doc {
            return parts.swap_remove(0);
        }
        unreachable!("shape checked above");
    }
    doc
}
