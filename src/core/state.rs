//! The static state tree.
//!
//! States are stored in one flat vector in pre-order, so a state's global
//! index is its position in that vector and the root is always index 0.
//! Children are owned by position; the parent link is a plain index used
//! for lookups only.

use crate::builder::definition::StateDef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Global index of a state, unique across the whole tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of a state among its siblings.
pub type LocalIndex = usize;

/// Local index of the child entered when no explicit descendant is requested.
pub const DEFAULT_CHILD: LocalIndex = 0;

/// Structural kind of a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    /// Leaf state with no children.
    Basic,
    /// OR state: exactly one child is active while the state is active.
    Composite,
}

/// One node of the tree.
#[derive(Clone, Debug)]
pub struct StateNode {
    name: String,
    kind: StateKind,
    parent: Option<StateId>,
    local_index: Option<LocalIndex>,
    depth: usize,
    children: Vec<StateId>,
}

impl StateNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// `None` only for the root.
    pub fn local_index(&self) -> Option<LocalIndex> {
        self.local_index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[StateId] {
        &self.children
    }
}

/// Rooted tree of basic and composite states.
///
/// Accessors taking a `StateId` index straight into the tree and panic on an
/// id from another tree. [`StateTree::get`] is the checked lookup.
///
/// # Example
///
/// ```rust
/// use statechart::builder::StateDef;
/// use statechart::core::{StateKind, StateTree};
///
/// let root = StateDef::new("root")
///     .child(StateDef::new("A"))
///     .child(StateDef::new("Sub0").child(StateDef::new("A__Sub0")));
/// let tree = StateTree::from_definition(&root);
///
/// let sub0 = tree.id_of("Sub0").unwrap();
/// assert_eq!(tree.kind(sub0), StateKind::Composite);
/// assert_eq!(tree.local_index(sub0), Some(1));
/// assert_eq!(tree.parent(sub0), Some(StateTree::ROOT));
/// ```
#[derive(Clone, Debug)]
pub struct StateTree {
    nodes: Vec<StateNode>,
    by_name: HashMap<String, StateId>,
}

impl StateTree {
    pub const ROOT: StateId = StateId(0);

    /// Build the tree for a root definition.
    ///
    /// A state with children is composite, a state without is basic.
    /// Sibling order gives local indices, so the first child is the default.
    /// Duplicate names resolve to their first occurrence; validation reports them.
    pub fn from_definition(root: &StateDef) -> Self {
        let mut tree = StateTree {
            nodes: Vec::new(),
            by_name: HashMap::new(),
        };
        tree.insert(root, None, None, 0);
        tree
    }

    fn insert(
        &mut self,
        def: &StateDef,
        parent: Option<StateId>,
        local_index: Option<LocalIndex>,
        depth: usize,
    ) -> StateId {
        let id = StateId(self.nodes.len());
        let kind = if def.children.is_empty() {
            StateKind::Basic
        } else {
            StateKind::Composite
        };
        self.nodes.push(StateNode {
            name: def.name.clone(),
            kind,
            parent,
            local_index,
            depth,
            children: Vec::with_capacity(def.children.len()),
        });
        self.by_name.entry(def.name.clone()).or_insert(id);

        for (local, child) in def.children.iter().enumerate() {
            let child_id = self.insert(child, Some(id), Some(local), depth + 1);
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// Number of states, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node for `id`, or `None` if `id` is not from this tree.
    pub fn get(&self, id: StateId) -> Option<&StateNode> {
        self.nodes.get(id.0)
    }

    /// Node for an id minted by this tree.
    ///
    /// # Panics
    ///
    /// If `id` was not minted by this tree. Use [`StateTree::get`] for ids
    /// of unknown origin.
    pub fn node(&self, id: StateId) -> &StateNode {
        &self.nodes[id.0]
    }

    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.by_name.get(name).copied()
    }

    /// Name of `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not minted by this tree. Use [`StateTree::get`] for ids
    /// of unknown origin.
    pub fn name(&self, id: StateId) -> &str {
        &self.node(id).name
    }

    /// Kind of `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not minted by this tree. Use [`StateTree::get`] for ids
    /// of unknown origin.
    pub fn kind(&self, id: StateId) -> StateKind {
        self.node(id).kind
    }

    /// # Panics
    ///
    /// If `id` was not minted by this tree.
    pub fn is_composite(&self, id: StateId) -> bool {
        self.kind(id) == StateKind::Composite
    }

    /// Parent of `id`, `None` for the root.
    ///
    /// # Panics
    ///
    /// If `id` was not minted by this tree. Use [`StateTree::get`] for ids
    /// of unknown origin.
    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.node(id).parent
    }

    /// Slot of `id` within its parent, `None` for the root.
    ///
    /// # Panics
    ///
    /// If `id` was not minted by this tree. Use [`StateTree::get`] for ids
    /// of unknown origin.
    pub fn local_index(&self, id: StateId) -> Option<LocalIndex> {
        self.node(id).local_index
    }

    /// # Panics
    ///
    /// If `id` was not minted by this tree.
    pub fn children(&self, id: StateId) -> &[StateId] {
        &self.node(id).children
    }

    /// Child of `id` occupying slot `local`. Panics like [`StateTree::node`].
    pub fn child_at(&self, id: StateId, local: LocalIndex) -> Option<StateId> {
        self.node(id).children.get(local).copied()
    }

    /// `id` followed by each of its ancestors up to the root. Panics like
    /// [`StateTree::node`] once iterated.
    pub fn ancestors(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        std::iter::successors(Some(id), move |&state| self.parent(state))
    }

    pub fn is_ancestor_or_self(&self, ancestor: StateId, id: StateId) -> bool {
        self.ancestors(id).any(|state| state == ancestor)
    }

    /// States strictly below `ancestor` down to and including `descendant`,
    /// outermost first. `None` unless `descendant` is a proper descendant.
    pub fn lineage(&self, ancestor: StateId, descendant: StateId) -> Option<Vec<StateId>> {
        let mut chain = Vec::new();
        for state in self.ancestors(descendant) {
            if state == ancestor {
                chain.reverse();
                return if chain.is_empty() { None } else { Some(chain) };
            }
            chain.push(state);
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &StateNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (StateId(index), node))
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.nodes.len()).map(StateId)
    }
}
