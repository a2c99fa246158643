//! Generic tree-traversal cursor for Veneer printers.
//!
//! A per-language printer walks its syntax tree top-down while emitting
//! document fragments. At every node it needs cheap access to the node
//! itself, its ancestors, and its position within the parent, without
//! building a parent-pointer tree first. [`TreePath`] provides that as a
//! single growable stack of `(key, node)` entries: the top of the stack is
//! the node currently being printed, and every scoped descent restores the
//! stack on the way out, even when the callback panics.

/// Capability interface a syntax tree node exposes to the cursor.
///
/// Positional children cover list-shaped content (block items, call
/// arguments); named fields cover fixed substructure (a condition, a body).
/// A node with neither simply returns zero children and `None` fields.
pub trait TreeNode {
    /// Number of positional children.
    fn child_count(&self) -> usize;

    /// Positional child by index, or `None` when out of range.
    fn child_at(&self, index: usize) -> Option<&Self>;

    /// Named child field, or `None` when this node has no such field.
    fn field_at(&self, name: &str) -> Option<&Self>;
}

/// One step of a descent path: a named field or a positional index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey {
    /// A named substructure field, e.g. `Field("body")`.
    Field(&'static str),
    /// A positional child, e.g. the i-th element of a list.
    Index(usize),
}

/// A cursor into a borrowed tree.
///
/// The cursor starts at the root and moves via the scoped operations
/// [`with_keys`](TreePath::with_keys), [`each_child`](TreePath::each_child)
/// and [`map_children`](TreePath::map_children). Each of them pushes entries
/// for the duration of a callback and truncates the stack back afterwards,
/// so the stack length observed before and after any scoped call is
/// identical. The truncation runs from a drop guard and therefore also
/// covers unwinding out of the callback.
pub struct TreePath<'a, N> {
    stack: Vec<(Option<PathKey>, &'a N)>,
}

impl<'a, N: TreeNode> TreePath<'a, N> {
    /// Create a cursor positioned at `root`.
    pub fn new(root: &'a N) -> Self {
        Self {
            stack: vec![(None, root)],
        }
    }

    /// The node the cursor currently points at.
    pub fn node(&self) -> &'a N {
        // The stack always holds at least the root entry.
        self.stack[self.stack.len() - 1].1
    }

    /// The key through which the current node was reached, or `None` at the
    /// root.
    pub fn key(&self) -> Option<PathKey> {
        self.stack[self.stack.len() - 1].0
    }

    /// The n-th node along the path, counting up from the current node
    /// (`ancestor(0)` is the current node itself).
    pub fn ancestor(&self, n: usize) -> Option<&'a N> {
        let len = self.stack.len();
        if n < len {
            Some(self.stack[len - 1 - n].1)
        } else {
            None
        }
    }

    /// The n-th ancestor above the current node (`parent(0)` is the
    /// immediate parent).
    pub fn parent(&self, n: usize) -> Option<&'a N> {
        self.ancestor(n + 1)
    }

    /// Depth of the cursor below the root (0 at the root).
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Descend through `keys`, run `f` with the cursor at the reached node,
    /// and restore the cursor afterwards.
    ///
    /// Returns `None` without calling `f` if any key fails to resolve.
    pub fn with_keys<R>(&mut self, keys: &[PathKey], f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        let mut node = self.node();
        let mut guard = StackGuard::new(self);
        for &key in keys {
            let next = resolve(node, key)?;
            guard.path.stack.push((Some(key), next));
            node = next;
        }
        Some(f(&mut *guard.path))
    }

    /// Descend into a single named field. Shorthand for
    /// [`with_keys`](TreePath::with_keys) with one `Field` key.
    pub fn with_field<R>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> R,
    ) -> Option<R> {
        self.with_keys(&[PathKey::Field(name)], f)
    }

    /// Descend into a single positional child. Shorthand for
    /// [`with_keys`](TreePath::with_keys) with one `Index` key.
    pub fn with_child<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        self.with_keys(&[PathKey::Index(index)], f)
    }

    /// Descend through `keys`, then invoke `f` once per positional child of
    /// the reached node, with the cursor positioned at that child. The stack
    /// is restored between elements and after the call.
    ///
    /// Returns `false` without calling `f` if any key fails to resolve.
    pub fn each_child(&mut self, keys: &[PathKey], mut f: impl FnMut(&mut Self, usize)) -> bool {
        self.with_keys(keys, |path| {
            let parent = path.node();
            for i in 0..parent.child_count() {
                let Some(child) = parent.child_at(i) else {
                    continue;
                };
                let mut guard = StackGuard::new(path);
                guard.path.stack.push((Some(PathKey::Index(i)), child));
                f(&mut *guard.path, i);
            }
        })
        .is_some()
    }

    /// Like [`each_child`](TreePath::each_child), collecting the callback's
    /// return values in order.
    pub fn map_children<R>(
        &mut self,
        keys: &[PathKey],
        mut f: impl FnMut(&mut Self, usize) -> R,
    ) -> Option<Vec<R>> {
        self.with_keys(keys, |path| {
            let parent = path.node();
            let mut results = Vec::with_capacity(parent.child_count());
            for i in 0..parent.child_count() {
                let Some(child) = parent.child_at(i) else {
                    continue;
                };
                let mut guard = StackGuard::new(path);
                guard.path.stack.push((Some(PathKey::Index(i)), child));
                results.push(f(&mut *guard.path, i));
            }
            results
        })
    }

    #[cfg(test)]
    fn stack_len(&self) -> usize {
        self.stack.len()
    }
}

fn resolve<'a, N: TreeNode>(node: &'a N, key: PathKey) -> Option<&'a N> {
    match key {
        PathKey::Field(name) => node.field_at(name),
        PathKey::Index(index) => node.child_at(index),
    }
}

/// Restores the cursor stack to its recorded length on drop, so scoped
/// operations stay balanced across early returns and unwinding.
struct StackGuard<'g, 'a, N> {
    path: &'g mut TreePath<'a, N>,
    len: usize,
}

impl<'g, 'a, N> StackGuard<'g, 'a, N> {
    fn new(path: &'g mut TreePath<'a, N>) -> Self {
        let len = path.stack.len();
        Self { path, len }
    }
}

impl<N> Drop for StackGuard<'_, '_, N> {
    fn drop(&mut self) {
        self.path.stack.truncate(self.len);
    }
}
