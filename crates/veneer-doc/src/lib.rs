//! Wadler-Lindig document IR and width-constrained printer.
//!
//! This crate is the layout engine a code formatter builds on. A formatter
//! walks its syntax tree and produces a [`Doc`]: an intermediate
//! representation that records every place the output *could* break, how
//! breaks group together, and how indentation nests. The printer then
//! renders the document against a width limit, flattening each group onto
//! one line when it fits and breaking it when it does not:
//!
//! 1. Build a [`Doc`] with the builders in [`doc`]
//! 2. Render it with [`format_doc`], which propagates forced breaks and
//!    prints the result
//!
//! The IR is language-agnostic: it knows nothing about any syntax, only
//! about text, lines, groups and indentation. [`utils`] holds structural
//! queries and rewrites over documents, and [`debug`] renders a document
//! back as the builder calls that would construct it.

pub mod debug;
pub mod doc;
pub mod error;
pub mod printer;
pub mod utils;

pub use doc::{AlignAmount, Doc, GroupId, GroupOptions, LineKind};
pub use error::PrintError;
pub use printer::{format_doc, print_doc, Newline, PrintOptions, Printed};
pub use utils::propagate_breaks;

#[cfg(test)]
mod layout_tests {
    use crate::doc::{
        concat, group, if_break, indent, join, line, line_suffix, softline, text, Doc,
    };
    use crate::printer::{format_doc, PrintOptions};

    /// A call expression with a trailing comma when broken, the shape most
    /// formatters build for argument lists.
    fn call(name: &str, args: Vec<Doc>) -> Doc {
        group(concat(vec![
            text(name),
            text("("),
            indent(concat(vec![
                softline(),
                join(concat(vec![text(","), line()]), args),
                if_break(text(","), text("")),
            ])),
            softline(),
            text(")"),
        ]))
    }

    fn fmt(doc: Doc, print_width: usize) -> String {
        let options = PrintOptions {
            print_width,
            ..PrintOptions::default()
        };
        format_doc(doc, &options)
            .expect("layout should succeed")
            .formatted
    }

    fn args() -> Vec<Doc> {
        vec![text("alpha"), text("beta"), text("gamma")]
    }

    #[test]
    fn call_stays_flat_when_it_fits() {
        let result = fmt(call("frobnicate", args()), 80);
        insta::assert_snapshot!(result, @"frobnicate(alpha, beta, gamma)");
    }

    #[test]
    fn call_breaks_with_trailing_comma() {
        let result = fmt(call("frobnicate", args()), 20);
        insta::assert_snapshot!(result, @r"
        frobnicate(
          alpha,
          beta,
          gamma,
        )
        ");
    }

    #[test]
    fn inner_call_stays_flat_when_the_outer_breaks() {
        let doc = call(
            "outer",
            vec![call("inner", vec![text("x"), text("y")]), text("z")],
        );
        let result = fmt(doc, 16);
        insta::assert_snapshot!(result, @r"
        outer(
          inner(x, y),
          z,
        )
        ");
    }

    #[test]
    fn deferred_comment_lands_at_end_of_line() {
        let doc = concat(vec![
            text("let x = 1;"),
            line_suffix(text(" // unit")),
            crate::doc::hardline(),
            text("let y = 2;"),
        ]);
        let result = fmt(doc, 80);
        insta::assert_snapshot!(result, @r"
        let x = 1; // unit
        let y = 2;
        ");
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = call("frobnicate", args());
        assert_eq!(fmt(doc.clone(), 20), fmt(doc, 20));
    }
}


#[cfg(test)]
mod debug_tests {
    use crate::debug::dump_doc;
    use crate::doc::{concat, fill, group, indent, line, softline, text};

    #[test]
    fn dump_round_trips_builder_shapes() {
        let doc = group(concat(vec![
            text("when"),
            indent(concat(vec![line(), fill(vec![text("a"), line(), text("b")])])),
            softline(),
        ]));
        insta::assert_snapshot!(
            dump_doc(&doc),
            @r#"group(concat([text("when"), indent(concat([line, fill([text("a"), line, text("b")])])), softline]))"#
        );
    }
}
