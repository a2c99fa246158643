//! Width-constrained renderer for [`Doc`] trees.
//!
//! The printer walks a document with an explicit command stack, so deeply
//! nested input cannot overflow the call stack. At every group boundary it
//! runs a non-committing fits probe over the group's flat rendering plus the
//! commands still pending on the same line; the probe's verdict decides
//! whether the group lays out flat or broken. Fill sections make the same
//! decision per content/separator pair instead of all at once.
//!
//! [`print_doc`] expects its input to have gone through
//! [`propagate_breaks`](crate::utils::propagate_breaks) already; a document
//! meant to be rendered concurrently should be propagated once and then
//! shared read-only. [`format_doc`] bundles the two steps for owned input.

use rustc_hash::FxHashMap;

use crate::doc::{AlignAmount, Doc, GroupId, LineKind};
use crate::error::PrintError;
use crate::utils::propagate_breaks;

/// Layout parameters for a render.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Maximum line width the printer aims for. Default: 80.
    pub print_width: usize,
    /// Columns per indentation step. Default: 2.
    pub tab_width: usize,
    /// Materialize indentation steps as tabs instead of spaces.
    pub use_tabs: bool,
    /// Newline sequence to emit.
    pub newline: Newline,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            tab_width: 2,
            use_tabs: false,
            newline: Newline::Lf,
        }
    }
}

/// Newline flavor for rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Newline {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
    /// `\r`
    Cr,
}

impl Newline {
    /// The literal byte sequence for this flavor.
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::Crlf => "\r\n",
            Newline::Cr => "\r",
        }
    }
}

/// A finished render: the text plus the offset where a [`Doc::Cursor`]
/// placeholder landed, if one was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printed {
    pub formatted: String,
    /// Byte offset into `formatted`, not a character count; it indexes the
    /// string directly even when earlier output is multi-byte.
    pub cursor: Option<usize>,
}

/// Whether a command renders on one line or with breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

/// The indentation register: whole steps plus alignment spaces, with the
/// materialized whitespace cached. Adjustments build a new register; the
/// registers held by enclosing commands are never touched.
#[derive(Debug, Clone)]
struct Indentation {
    tabs: usize,
    spaces: usize,
    text: String,
}

impl Indentation {
    fn root() -> Self {
        Self {
            tabs: 0,
            spaces: 0,
            text: String::new(),
        }
    }

    fn indented(&self, options: &PrintOptions) -> Self {
        Self::make(self.tabs + 1, self.spaces, options)
    }

    fn aligned(&self, amount: AlignAmount, options: &PrintOptions) -> Self {
        match amount {
            AlignAmount::Spaces(n) => Self::make(self.tabs, self.spaces + n, options),
            AlignAmount::DedentToRoot => Self::root(),
        }
    }

    fn make(tabs: usize, spaces: usize, options: &PrintOptions) -> Self {
        let text = if options.use_tabs {
            let mut text = "\t".repeat(tabs);
            text.push_str(&" ".repeat(spaces));
            text
        } else {
            " ".repeat(tabs * options.tab_width + spaces)
        };
        Self { tabs, spaces, text }
    }

    /// Column width of this register, independent of tab materialization.
    fn width(&self, options: &PrintOptions) -> usize {
        self.tabs * options.tab_width + self.spaces
    }
}

/// What a print command points at: a document node, or the not-yet-consumed
/// tail of a fill section. The latter lets the printer advance through fill
/// pairs without rebuilding (or mutating) the immutable document.
#[derive(Debug, Clone)]
enum DocRef<'a> {
    Node(&'a Doc),
    FillRest(&'a [Doc]),
}

/// One unit of work on the print stack.
#[derive(Debug, Clone)]
struct PrintCmd<'a> {
    indent: Indentation,
    mode: Mode,
    doc: DocRef<'a>,
}

impl<'a> PrintCmd<'a> {
    fn new(indent: Indentation, mode: Mode, doc: &'a Doc) -> Self {
        Self {
            indent,
            mode,
            doc: DocRef::Node(doc),
        }
    }
}

/// Synthetic line pushed by a suffix boundary to force a flush.
static FLUSH_LINE: Doc = Doc::Line(LineKind::Hard);

/// Propagate breaks, then render. Convenience wrapper over [`print_doc`]
/// for documents built and rendered in one place.
pub fn format_doc(doc: Doc, options: &PrintOptions) -> Result<Printed, PrintError> {
    let doc = propagate_breaks(doc);
    print_doc(&doc, options)
}

/// Render a propagated document against `options`.
///
/// The render is a pure function of its inputs: it owns its work stack,
/// suffix buffer and group-mode registry, so any number of renders of the
/// same (read-only) document may run concurrently.
pub fn print_doc(doc: &Doc, options: &PrintOptions) -> Result<Printed, PrintError> {
    let newline = options.newline.as_str();
    let mut registry: FxHashMap<GroupId, Mode> = FxHashMap::default();
    let mut out = String::new();
    let mut pos = 0usize;
    let mut cursor: Option<usize> = None;
    // Set when a hard line was emitted in flat mode; the next flat group
    // must re-run its fits probe because the line it sits on restarted.
    let mut should_remeasure = false;
    let mut suffixes: Vec<PrintCmd> = Vec::new();
    let mut cmds = vec![PrintCmd::new(Indentation::root(), Mode::Break, doc)];

    loop {
        let Some(cmd) = cmds.pop() else {
            if suffixes.is_empty() {
                break;
            }
            // Suffixes still pending at end of document flush in enqueue
            // order.
            cmds.extend(suffixes.drain(..).rev());
            continue;
        };
        let PrintCmd { indent, mode, doc } = cmd;

        let node = match doc {
            DocRef::FillRest(parts) => {
                print_fill(parts, indent, mode, pos, &registry, options, &mut cmds);
                continue;
            }
            DocRef::Node(node) => node,
        };

        match node {
            Doc::Text(s) => {
                out.push_str(s);
                pos += s.chars().count();
            }

            Doc::Concat(parts) => {
                for part in parts.iter().rev() {
                    cmds.push(PrintCmd::new(indent.clone(), mode, part));
                }
            }

            Doc::Indent(contents) => {
                cmds.push(PrintCmd::new(indent.indented(options), mode, contents));
            }

            Doc::Align { amount, contents } => {
                cmds.push(PrintCmd::new(indent.aligned(*amount, options), mode, contents));
            }

            Doc::Group {
                contents,
                broken,
                id,
            } => {
                let chosen = if mode == Mode::Flat && !should_remeasure {
                    let chosen = if *broken { Mode::Break } else { Mode::Flat };
                    cmds.push(PrintCmd::new(indent, chosen, contents));
                    chosen
                } else {
                    should_remeasure = false;
                    let remaining = options.print_width as isize - pos as isize;
                    let flat = PrintCmd::new(indent.clone(), Mode::Flat, contents);
                    if !*broken
                        && fits(&[flat.clone()], &cmds, remaining, &registry, options, false)
                    {
                        cmds.push(flat);
                        Mode::Flat
                    } else {
                        cmds.push(PrintCmd::new(indent, Mode::Break, contents));
                        Mode::Break
                    }
                };
                if let Some(id) = id {
                    registry.insert(*id, chosen);
                }
            }

            Doc::ConditionalGroup { states, broken, id } => {
                let Some((first, rest)) = states.split_first() else {
                    continue;
                };
                let Some(last) = states.last() else {
                    continue;
                };
                let chosen = if mode == Mode::Flat && !should_remeasure {
                    let chosen = if *broken { Mode::Break } else { Mode::Flat };
                    cmds.push(PrintCmd::new(indent, chosen, first));
                    chosen
                } else {
                    should_remeasure = false;
                    let remaining = options.print_width as isize - pos as isize;
                    if *broken {
                        cmds.push(PrintCmd::new(indent, Mode::Break, last));
                        Mode::Break
                    } else {
                        // Try each state, most compact first; fall back to
                        // the most expanded state, broken.
                        let mut chosen = None;
                        let flat_first = PrintCmd::new(indent.clone(), Mode::Flat, first);
                        if fits(&[flat_first.clone()], &cmds, remaining, &registry, options, false)
                        {
                            cmds.push(flat_first);
                            chosen = Some(Mode::Flat);
                        } else {
                            for state in rest {
                                let candidate =
                                    PrintCmd::new(indent.clone(), Mode::Flat, state);
                                if fits(
                                    &[candidate.clone()],
                                    &cmds,
                                    remaining,
                                    &registry,
                                    options,
                                    false,
                                ) {
                                    cmds.push(candidate);
                                    chosen = Some(Mode::Flat);
                                    break;
                                }
                            }
                        }
                        match chosen {
                            Some(mode) => mode,
                            None => {
                                cmds.push(PrintCmd::new(indent, Mode::Break, last));
                                Mode::Break
                            }
                        }
                    }
                };
                if let Some(id) = id {
                    registry.insert(*id, chosen);
                }
            }

            Doc::Fill(parts) => {
                cmds.push(PrintCmd {
                    indent,
                    mode,
                    doc: DocRef::FillRest(parts),
                });
            }

            Doc::IfBreak {
                break_contents,
                flat_contents,
                group_id,
            } => {
                let group_mode = match group_id {
                    Some(id) => *registry
                        .get(id)
                        .ok_or(PrintError::UnresolvedGroupReference(*id))?,
                    None => mode,
                };
                let contents = if group_mode == Mode::Break {
                    break_contents
                } else {
                    flat_contents
                };
                cmds.push(PrintCmd::new(indent, mode, contents));
            }

            Doc::Line(kind) => {
                let mut mode = mode;
                if mode == Mode::Flat {
                    if !kind.is_hard() {
                        if *kind == LineKind::Normal {
                            out.push(' ');
                            pos += 1;
                        }
                        continue;
                    }
                    // A hard line that survived propagation means some
                    // conditional state chose to keep it; it breaks even
                    // under a flat ancestor, and the next group on this
                    // fresh line must re-measure.
                    should_remeasure = true;
                    mode = Mode::Break;
                }
                if !suffixes.is_empty() {
                    // Emit deferred content first, then revisit this line.
                    cmds.push(PrintCmd::new(indent, mode, node));
                    cmds.extend(suffixes.drain(..).rev());
                    continue;
                }
                if *kind == LineKind::Literal {
                    out.push_str(newline);
                    pos = 0;
                } else {
                    trim_line_end(&mut out, &mut cursor);
                    out.push_str(newline);
                    out.push_str(&indent.text);
                    pos = indent.width(options);
                }
            }

            Doc::LineSuffix(contents) => {
                suffixes.push(PrintCmd::new(indent, mode, contents));
            }

            Doc::LineSuffixBoundary => {
                if !suffixes.is_empty() {
                    cmds.push(PrintCmd::new(indent, mode, &FLUSH_LINE));
                }
            }

            // Fully consumed by break propagation.
            Doc::BreakParent => {}

            Doc::Cursor => {
                cursor = Some(out.len());
            }
        }
    }

    Ok(Printed {
        formatted: out,
        cursor,
    })
}

/// Decide the leftmost content/separator pair of a fill section and queue
/// the rest for the same treatment.
fn print_fill<'a>(
    parts: &'a [Doc],
    indent: Indentation,
    mode: Mode,
    pos: usize,
    registry: &FxHashMap<GroupId, Mode>,
    options: &PrintOptions,
    cmds: &mut Vec<PrintCmd<'a>>,
) {
    let Some(content) = parts.first() else {
        return;
    };
    let remaining = options.print_width as isize - pos as isize;
    let content_flat = PrintCmd::new(indent.clone(), Mode::Flat, content);
    let content_fits = fits(&[content_flat.clone()], &[], remaining, registry, options, true);

    if parts.len() == 1 {
        if content_fits {
            cmds.push(content_flat);
        } else {
            cmds.push(PrintCmd::new(indent, Mode::Break, content));
        }
        return;
    }

    let separator = &parts[1];
    let separator_flat = PrintCmd::new(indent.clone(), Mode::Flat, separator);
    let separator_break = PrintCmd::new(indent.clone(), Mode::Break, separator);

    if parts.len() == 2 {
        if content_fits {
            cmds.push(separator_flat);
            cmds.push(content_flat);
        } else {
            cmds.push(separator_break);
            cmds.push(PrintCmd::new(indent, Mode::Break, content));
        }
        return;
    }

    // The separator stays flat only if the current content, the separator
    // and the next content all fit on the line together.
    let next_content = &parts[2];
    let pair = [
        PrintCmd::new(indent.clone(), Mode::Flat, next_content),
        separator_flat.clone(),
        content_flat.clone(),
    ];
    let pair_fits = fits(&pair, &[], remaining, registry, options, true);

    let rest = PrintCmd {
        indent: indent.clone(),
        mode,
        doc: DocRef::FillRest(&parts[2..]),
    };
    if pair_fits {
        cmds.push(rest);
        cmds.push(separator_flat);
        cmds.push(content_flat);
    } else if content_fits {
        cmds.push(rest);
        cmds.push(separator_break);
        cmds.push(content_flat);
    } else {
        cmds.push(rest);
        cmds.push(separator_break);
        cmds.push(PrintCmd::new(indent, Mode::Break, content));
    }
}

/// Non-committing forward probe: would `next` (bottom-of-stack first), then
/// the pending `rest` commands, render within `remaining` columns before the
/// line ends?
///
/// A line in break mode ends the line and the probe succeeds; line suffixes
/// are deferred past the line and cost nothing. With `must_be_flat`, any
/// group already forced to break fails the probe outright — fill pairs and
/// conditional states use this to reject content that cannot stay flat.
fn fits<'a>(
    next: &[PrintCmd<'a>],
    rest: &[PrintCmd<'a>],
    mut remaining: isize,
    registry: &FxHashMap<GroupId, Mode>,
    options: &PrintOptions,
    must_be_flat: bool,
) -> bool {
    let mut rest_idx = rest.len();
    let mut stack: Vec<PrintCmd<'a>> = next.to_vec();

    while remaining >= 0 {
        let Some(PrintCmd { indent, mode, doc }) = stack.pop() else {
            if rest_idx == 0 {
                return true;
            }
            rest_idx -= 1;
            stack.push(rest[rest_idx].clone());
            continue;
        };

        let node = match doc {
            DocRef::FillRest(parts) => {
                for part in parts.iter().rev() {
                    stack.push(PrintCmd::new(indent.clone(), mode, part));
                }
                continue;
            }
            DocRef::Node(node) => node,
        };

        match node {
            Doc::Text(s) => remaining -= s.chars().count() as isize,

            Doc::Concat(parts) | Doc::Fill(parts) => {
                for part in parts.iter().rev() {
                    stack.push(PrintCmd::new(indent.clone(), mode, part));
                }
            }

            Doc::Indent(contents) => {
                stack.push(PrintCmd::new(indent.indented(options), mode, contents));
            }

            Doc::Align { amount, contents } => {
                stack.push(PrintCmd::new(
                    indent.aligned(*amount, options),
                    mode,
                    contents,
                ));
            }

            Doc::Group {
                contents, broken, ..
            } => {
                if must_be_flat && *broken {
                    return false;
                }
                let mode = if *broken { Mode::Break } else { mode };
                stack.push(PrintCmd::new(indent, mode, contents));
            }

            Doc::ConditionalGroup { states, broken, .. } => {
                if must_be_flat && *broken {
                    return false;
                }
                if let Some(first) = states.first() {
                    let mode = if *broken { Mode::Break } else { mode };
                    stack.push(PrintCmd::new(indent, mode, first));
                }
            }

            Doc::IfBreak {
                break_contents,
                flat_contents,
                group_id,
            } => {
                // The probe is non-committing; a group not yet resolved
                // reads as flat here and the real render reports it.
                let group_mode = match group_id {
                    Some(id) => registry.get(id).copied().unwrap_or(Mode::Flat),
                    None => mode,
                };
                let contents = if group_mode == Mode::Break {
                    break_contents
                } else {
                    flat_contents
                };
                stack.push(PrintCmd::new(indent, mode, contents));
            }

            Doc::Line(kind) => match mode {
                Mode::Flat => {
                    if kind.is_hard() {
                        return true;
                    }
                    if *kind == LineKind::Normal {
                        remaining -= 1;
                    }
                }
                Mode::Break => return true,
            },

            Doc::LineSuffix(_) | Doc::LineSuffixBoundary | Doc::BreakParent | Doc::Cursor => {}
        }
    }

    false
}

/// Drop trailing spaces and tabs from the current line, pulling the cursor
/// offset back if the trim passed over it.
fn trim_line_end(out: &mut String, cursor: &mut Option<usize>) {
    let trimmed = out.trim_end_matches([' ', '\t']).len();
    out.truncate(trimmed);
    if let Some(offset) = cursor {
        if *offset > trimmed {
            *offset = trimmed;
        }
    }
}
