//! Document IR and builder functions.
//!
//! A [`Doc`] describes formatted output without committing to a layout: line
//! breaks, indentation and grouping are recorded as intent, and the printer
//! decides the final arrangement against a maximum line width. Docs are
//! immutable once built; every transformation in this crate returns a new
//! structure.
//!
//! Builders are plain functions (`text`, `group`, `indent`, ...) so printer
//! code reads close to the document it produces.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::Serialize;

/// A process-unique identifier for a [`Doc::Group`] or
/// [`Doc::ConditionalGroup`], used by [`Doc::IfBreak`] to branch on the mode
/// chosen for a group elsewhere in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GroupId(u32);

impl GroupId {
    /// Mint a fresh id, distinct from every id minted before it.
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group #{}", self.0)
    }
}

/// The flavor of a [`Doc::Line`] breakable point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A space when flat, a newline when broken.
    Normal,
    /// Nothing when flat, a newline when broken.
    Soft,
    /// Always a newline; forces every enclosing non-conditional group to
    /// break (the [`hardline`] builder pairs it with a [`Doc::BreakParent`]).
    Hard,
    /// Like `Hard`, but emits a bare newline with no re-indentation, for
    /// content whose own whitespace is significant (template literals,
    /// heredocs).
    Literal,
}

impl LineKind {
    /// Whether this line always produces a newline, regardless of mode.
    pub fn is_hard(self) -> bool {
        matches!(self, LineKind::Hard | LineKind::Literal)
    }
}

/// How an [`Doc::Align`] adjusts the indentation register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignAmount {
    /// Add this many spaces on top of the current indentation.
    Spaces(usize),
    /// Reset indentation to column zero, ignoring all enclosing `Indent` and
    /// `Align` wrappers. Ancestors keep their own register untouched.
    DedentToRoot,
}

/// The document algebra.
///
/// Variants correspond one-to-one to the builder functions in this module;
/// see each builder for layout semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    /// Verbatim text. Must not contain newlines.
    Text(String),
    /// Sequential composition.
    Concat(Vec<Doc>),
    /// One extra indentation step for the inner doc.
    Indent(Box<Doc>),
    /// Explicit indentation adjustment for the inner doc.
    Align {
        amount: AlignAmount,
        contents: Box<Doc>,
    },
    /// A unit laid out either entirely flat or entirely broken.
    Group {
        contents: Box<Doc>,
        /// Forced to break, either by the author or by break propagation.
        broken: bool,
        id: Option<GroupId>,
    },
    /// Ordered layout alternatives, most compact first. The printer picks
    /// the first state that fits; if none fit, the last state renders
    /// broken.
    ConditionalGroup {
        states: Vec<Doc>,
        broken: bool,
        id: Option<GroupId>,
    },
    /// Alternating content (even indices) and separators (odd indices);
    /// each separator breaks independently, producing word-wrap layout.
    Fill(Vec<Doc>),
    /// Branch on the resolved mode of a group: the enclosing one, or the
    /// group named by `group_id`.
    IfBreak {
        break_contents: Box<Doc>,
        flat_contents: Box<Doc>,
        group_id: Option<GroupId>,
    },
    /// A breakable point.
    Line(LineKind),
    /// Output deferred until just before the next newline (or end of
    /// document), e.g. trailing comments.
    LineSuffix(Box<Doc>),
    /// Forces pending deferred output to flush here, inserting a newline if
    /// any is pending.
    LineSuffixBoundary,
    /// Forces every enclosing non-conditional group to break. Consumed by
    /// break propagation; produces no output itself.
    BreakParent,
    /// Marks the position whose final output offset is reported by the
    /// printer. At most one per document.
    Cursor,
}

/// Options for [`group_with`] and [`conditional_group`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupOptions {
    /// Start the group in the broken state.
    pub broken: bool,
    /// Register the group's resolved mode under this id for `IfBreak`.
    pub id: Option<GroupId>,
}

/// Verbatim text.
pub fn text(s: impl Into<String>) -> Doc {
    let s = s.into();
    debug_assert!(
        !s.contains('\n'),
        "text must not contain newlines: {s:?}"
    );
    Doc::Text(s)
}

/// Sequential composition of `parts`.
pub fn concat(parts: Vec<Doc>) -> Doc {
    Doc::Concat(parts)
}

/// `docs` interleaved with clones of `sep`.
pub fn join(sep: Doc, docs: Vec<Doc>) -> Doc {
    let mut parts = Vec::with_capacity(docs.len().saturating_mul(2));
    for (i, doc) in docs.into_iter().enumerate() {
        if i != 0 {
            parts.push(sep.clone());
        }
        parts.push(doc);
    }
    Doc::Concat(parts)
}

/// A space when flat, a newline when broken.
pub fn line() -> Doc {
    Doc::Line(LineKind::Normal)
}

/// Nothing when flat, a newline when broken.
pub fn softline() -> Doc {
    Doc::Line(LineKind::Soft)
}

/// An unconditional newline. Breaks every enclosing non-conditional group.
pub fn hardline() -> Doc {
    Doc::Concat(vec![Doc::Line(LineKind::Hard), Doc::BreakParent])
}

/// An unconditional newline with no re-indentation after it.
pub fn literalline() -> Doc {
    Doc::Concat(vec![Doc::Line(LineKind::Literal), Doc::BreakParent])
}

/// One extra indentation step for `contents`.
pub fn indent(contents: Doc) -> Doc {
    Doc::Indent(Box::new(contents))
}

/// `n` extra spaces of indentation for `contents`, on top of the ambient
/// level.
pub fn align(n: usize, contents: Doc) -> Doc {
    Doc::Align {
        amount: AlignAmount::Spaces(n),
        contents: Box::new(contents),
    }
}

/// Reset indentation to column zero for `contents`.
pub fn dedent_to_root(contents: Doc) -> Doc {
    Doc::Align {
        amount: AlignAmount::DedentToRoot,
        contents: Box::new(contents),
    }
}

/// A layout unit rendered either entirely flat or entirely broken.
pub fn group(contents: Doc) -> Doc {
    group_with(contents, GroupOptions::default())
}

/// [`group`] with explicit options.
pub fn group_with(contents: Doc, opts: GroupOptions) -> Doc {
    Doc::Group {
        contents: Box::new(contents),
        broken: opts.broken,
        id: opts.id,
    }
}

/// Ordered layout alternatives, most compact first.
///
/// The first state doubles as the group's flat rendering, mirroring a plain
/// group whose contents equal the first alternative.
pub fn conditional_group(states: Vec<Doc>, opts: GroupOptions) -> Doc {
    debug_assert!(
        !states.is_empty(),
        "conditional group requires at least one state"
    );
    Doc::ConditionalGroup {
        states,
        broken: opts.broken,
        id: opts.id,
    }
}

/// Content/separator pairs wrapped independently, like word-wrap.
///
/// `parts` alternates content (even indices) and separators (odd indices).
pub fn fill(parts: Vec<Doc>) -> Doc {
    Doc::Fill(parts)
}

/// `break_contents` when the enclosing group breaks, `flat_contents`
/// otherwise.
pub fn if_break(break_contents: Doc, flat_contents: Doc) -> Doc {
    Doc::IfBreak {
        break_contents: Box::new(break_contents),
        flat_contents: Box::new(flat_contents),
        group_id: None,
    }
}

/// [`if_break`] keyed to the resolved mode of the group registered under
/// `id`, wherever that group sits in the document.
pub fn if_break_with_id(break_contents: Doc, flat_contents: Doc, id: GroupId) -> Doc {
    Doc::IfBreak {
        break_contents: Box::new(break_contents),
        flat_contents: Box::new(flat_contents),
        group_id: Some(id),
    }
}

/// Defer `contents` until just before the next newline.
pub fn line_suffix(contents: Doc) -> Doc {
    Doc::LineSuffix(Box::new(contents))
}

/// Flush pending deferred output here.
pub fn line_suffix_boundary() -> Doc {
    Doc::LineSuffixBoundary
}

/// Force every enclosing non-conditional group to break.
pub fn break_parent() -> Doc {
    Doc::BreakParent
}

/// Cursor placeholder; the printer reports its rendered offset.
pub fn cursor() -> Doc {
    Doc::Cursor
}

/// Anchor `doc` at absolute column `size`, regardless of ambient
/// indentation.
///
/// The column is decomposed into whole indentation steps plus a space
/// remainder, then pinned to the root so the ambient level cannot shift it.
/// Used to line content up under an arbitrary column, e.g. an operator
/// position in the source.
pub fn add_alignment_to_doc(doc: Doc, size: usize, tab_width: usize) -> Doc {
    if size == 0 {
        return doc;
    }
    let mut aligned = doc;
    for _ in 0..size / tab_width {
        aligned = indent(aligned);
    }
    aligned = align(size % tab_width, aligned);
    dedent_to_root(aligned)
}
