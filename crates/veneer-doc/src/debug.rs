//! Debug rendering of [`Doc`] trees as nested builder calls.
//!
//! The output mirrors the builder API, so a dumped document can be read (or
//! pasted back) as the code that would construct it. Intended for snapshot
//! tests and for inspecting what a printer produced before layout.

use std::fmt::Write;

use crate::doc::{AlignAmount, Doc, LineKind};

/// Render `doc` as nested builder-call syntax.
pub fn dump_doc(doc: &Doc) -> String {
    let mut out = String::new();
    write_doc(doc, &mut out);
    out
}

fn write_doc(doc: &Doc, out: &mut String) {
    match doc {
        // The hardline and literalline builders pair the line with a
        // break-parent; render those shapes back as the builder call.
        Doc::Concat(parts)
            if matches!(
                parts.as_slice(),
                [Doc::Line(LineKind::Hard), Doc::BreakParent]
            ) =>
        {
            out.push_str("hardline");
        }
        Doc::Concat(parts)
            if matches!(
                parts.as_slice(),
                [Doc::Line(LineKind::Literal), Doc::BreakParent]
            ) =>
        {
            out.push_str("literalline");
        }

        Doc::Text(s) => {
            let _ = write!(out, "text({s:?})");
        }

        Doc::Concat(parts) => {
            out.push_str("concat([");
            write_list(parts, out);
            out.push_str("])");
        }

        Doc::Indent(contents) => {
            out.push_str("indent(");
            write_doc(contents, out);
            out.push(')');
        }

        Doc::Align { amount, contents } => match amount {
            AlignAmount::Spaces(n) => {
                let _ = write!(out, "align({n}, ");
                write_doc(contents, out);
                out.push(')');
            }
            AlignAmount::DedentToRoot => {
                out.push_str("dedent_to_root(");
                write_doc(contents, out);
                out.push(')');
            }
        },

        Doc::Group {
            contents,
            broken,
            id,
        } => {
            out.push_str("group(");
            write_doc(contents, out);
            if *broken {
                out.push_str(", broken");
            }
            if let Some(id) = id {
                let _ = write!(out, ", id = {id}");
            }
            out.push(')');
        }

        Doc::ConditionalGroup { states, broken, id } => {
            out.push_str("conditional_group([");
            write_list(states, out);
            out.push_str("]");
            if *broken {
                out.push_str(", broken");
            }
            if let Some(id) = id {
                let _ = write!(out, ", id = {id}");
            }
            out.push(')');
        }

        Doc::Fill(parts) => {
            out.push_str("fill([");
            write_list(parts, out);
            out.push_str("])");
        }

        Doc::IfBreak {
            break_contents,
            flat_contents,
            group_id,
        } => {
            out.push_str("if_break(");
            write_doc(break_contents, out);
            out.push_str(", ");
            write_doc(flat_contents, out);
            if let Some(id) = group_id {
                let _ = write!(out, ", id = {id}");
            }
            out.push(')');
        }

        Doc::Line(LineKind::Normal) => out.push_str("line"),
        Doc::Line(LineKind::Soft) => out.push_str("softline"),
        Doc::Line(LineKind::Hard) => out.push_str("hardline"),
        Doc::Line(LineKind::Literal) => out.push_str("literalline"),

        Doc::LineSuffix(contents) => {
            out.push_str("line_suffix(");
            write_doc(contents, out);
            out.push(')');
        }

        Doc::LineSuffixBoundary => out.push_str("line_suffix_boundary"),
        Doc::BreakParent => out.push_str("break_parent"),
        Doc::Cursor => out.push_str("cursor"),
    }
}

fn write_list(parts: &[Doc], out: &mut String) {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_doc(part, out);
    }
}
