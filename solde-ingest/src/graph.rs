//! Object graph access and traversal.
//!
//! The container format itself is handled elsewhere (see `document` for the
//! lopdf backed implementation); extraction only needs to walk a page's
//! objects and read stream bytes.

use std::collections::HashSet;
use std::hash::Hash;
use std::io::Read;

use solde_core::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Dictionary,
    Array,
    Stream,
    Scalar,
}

/// A node of a document object graph.
pub trait GraphNode: Sized {
    /// Identity of the object behind a node, stable for the document lifetime
    type Id: Copy + Eq + Hash;

    fn kind(&self) -> NodeKind;

    /// Dictionary values or array items, in a stable order, each paired with
    /// the identity of the object it points to. Empty for other kinds.
    fn entries(&self) -> Vec<(Self::Id, Self)>;

    /// Named entry of a dictionary, or of a stream's dictionary.
    fn get(&self, key: &str) -> Option<Self>;

    /// Value of a name scalar.
    fn name(&self) -> Option<String>;

    /// Declared filter names of a stream, in application order.
    fn filters(&self) -> Vec<String>;

    /// Undecoded bytes of a stream.
    fn raw_bytes(&self) -> Option<Box<dyn Read + '_>>;
}

/// Page access of a loaded document
pub trait PageSource {
    type Node<'a>: GraphNode
    where
        Self: 'a;

    fn page_count(&self) -> usize;

    /// Root node of the page at `index` (zero based).
    fn page(&self, index: usize) -> Result<Self::Node<'_>>;
}

/// Pre-order depth-first traversal calling `visit` on every reachable node.
///
/// Only the objects on the current path are remembered: a child already on
/// the path is skipped, but an object shared by two branches is visited once
/// per branch. The first error returned by `visit` stops the walk.
pub fn walk<N, E, F>(root: &N, mut visit: F) -> Result<(), E>
where
    N: GraphNode,
    F: FnMut(&N) -> Result<(), E>,
{
    let mut path = HashSet::new();
    walk_node(root, &mut path, &mut visit)
}

fn walk_node<N, E, F>(node: &N, path: &mut HashSet<N::Id>, visit: &mut F) -> Result<(), E>
where
    N: GraphNode,
    F: FnMut(&N) -> Result<(), E>,
{
    visit(node)?;
    if !matches!(node.kind(), NodeKind::Dictionary | NodeKind::Array) {
        return Ok(());
    }
    for (id, child) in node.entries() {
        if !path.insert(id) {
            continue;
        }
        let res = walk_node(&child, path, visit);
        path.remove(&id);
        res?;
    }
    Ok(())
}
