//! End-to-end test: walk a small data tree with a cursor and lay it out
//! with the document printer, the way a language formatter would.

use veneer_doc::doc::{
    concat, group_with, if_break, indent, join, line, softline, text, Doc, GroupOptions,
};
use veneer_doc::printer::{format_doc, PrintOptions};
use veneer_path::{TreeNode, TreePath};

/// A JSON-like value tree standing in for a syntax tree.
enum Value {
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<Value>),
    Entry { name: String, value: Box<Value> },
    Record(Vec<Value>),
}

impl TreeNode for Value {
    fn child_count(&self) -> usize {
        match self {
            Value::List(items) | Value::Record(items) => items.len(),
            _ => 0,
        }
    }

    fn child_at(&self, index: usize) -> Option<&Self> {
        match self {
            Value::List(items) | Value::Record(items) => items.get(index),
            _ => None,
        }
    }

    fn field_at(&self, name: &str) -> Option<&Self> {
        match (self, name) {
            (Value::Entry { value, .. }, "value") => Some(value),
            _ => None,
        }
    }
}

/// Bracketed, comma-separated container with a trailing comma when broken.
/// Top-level containers always break, nested ones break only when needed.
fn container(open: &str, close: &str, items: Vec<Doc>, at_root: bool) -> Doc {
    if items.is_empty() {
        return concat(vec![text(open), text(close)]);
    }
    let contents = concat(vec![
        text(open),
        indent(concat(vec![
            softline(),
            join(concat(vec![text(","), line()]), items),
            if_break(text(","), text("")),
        ])),
        softline(),
        text(close),
    ]);
    group_with(
        contents,
        GroupOptions {
            broken: at_root,
            ..GroupOptions::default()
        },
    )
}

fn print_value(path: &mut TreePath<'_, Value>) -> Doc {
    let at_root = path.depth() == 0;
    match path.node() {
        Value::Null => text("null"),
        Value::Bool(b) => text(if *b { "true" } else { "false" }),
        Value::Number(n) => text(n.to_string()),
        Value::Text(s) => text(format!("{s:?}")),
        Value::List(_) => {
            let items = path
                .map_children(&[], |path, _| print_value(path))
                .unwrap_or_default();
            container("[", "]", items, at_root)
        }
        Value::Record(_) => {
            let entries = path
                .map_children(&[], |path, _| print_value(path))
                .unwrap_or_default();
            container("{", "}", entries, at_root)
        }
        Value::Entry { name, .. } => {
            let value = path
                .with_field("value", |path| print_value(path))
                .unwrap_or_else(|| text("null"));
            concat(vec![text(format!("{name:?}")), text(": "), value])
        }
    }
}

fn fmt(value: &Value, print_width: usize) -> String {
    let mut path = TreePath::new(value);
    let doc = print_value(&mut path);
    let options = PrintOptions {
        print_width,
        ..PrintOptions::default()
    };
    format_doc(doc, &options)
        .expect("layout should succeed")
        .formatted
}

fn entry(name: &str, value: Value) -> Value {
    Value::Entry {
        name: name.to_string(),
        value: Box::new(value),
    }
}

fn sample() -> Value {
    Value::Record(vec![
        entry("name", Value::Text("veneer".to_string())),
        entry(
            "tags",
            Value::List(vec![
                Value::Text("doc".to_string()),
                Value::Text("printer".to_string()),
            ]),
        ),
        entry("width", Value::Number(80)),
        entry("stable", Value::Bool(true)),
    ])
}

#[test]
fn nested_containers_stay_flat_when_wide() {
    insta::assert_snapshot!(fmt(&sample(), 80), @r#"
    {
      "name": "veneer",
      "tags": ["doc", "printer"],
      "width": 80,
      "stable": true,
    }
    "#);
}

#[test]
fn nested_containers_break_when_narrow() {
    insta::assert_snapshot!(fmt(&sample(), 20), @r#"
    {
      "name": "veneer",
      "tags": [
        "doc",
        "printer",
      ],
      "width": 80,
      "stable": true,
    }
    "#);
}

#[test]
fn empty_containers_render_closed() {
    assert_eq!(fmt(&Value::Record(vec![]), 80), "{}");
    assert_eq!(fmt(&Value::List(vec![]), 80), "[]");
}

#[test]
fn scalar_values_render_bare() {
    assert_eq!(fmt(&Value::Null, 80), "null");
    assert_eq!(fmt(&Value::Number(-3), 80), "-3");
    assert_eq!(fmt(&Value::Text("a\"b".to_string()), 80), "\"a\\\"b\"");
}
