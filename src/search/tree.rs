//! Search tree stored in an arena.
//!
//! The tree owns every attached node in a single vector and nodes refer to each
//! other through indices. Parent links are plain indices, so walking towards
//! the root never conflicts with the ownership of children.

use crate::environment::Player;

/// Position of an attached node inside the [`Tree`] arena.
pub type NodeIndex = usize;

/// Statistics and links of a single position in the search tree.
#[derive(Clone, Debug)]
pub struct Node<M> {
    /// The move that led to this node from its parent, `None` only for the root.
    pub(super) last_move: Option<M>,
    /// The player who owned the turn when `last_move` was chosen.
    pub(super) player: Player,
    /// Number of playouts through this node that were won by the root player.
    pub(super) wins: u64,
    /// Number of playouts that went through this node.
    pub(super) visits: u64,
    pub(super) parent: Option<NodeIndex>,
    /// Expanded children in the order they were attached.
    pub(super) children: Vec<NodeIndex>,
    /// Children that were not expanded yet: `None` until the node is reached for
    /// the first time, then one entry per legal move, drained by expansion.
    pub(super) unvisited: Option<Vec<Node<M>>>,
}

impl<M> Node<M> {
    /// Creates a detached node that has not been visited yet.
    #[must_use]
    pub const fn new(last_move: Option<M>, player: Player) -> Self {
        Self {
            last_move,
            player,
            wins: 0,
            visits: 0,
            parent: None,
            children: Vec::new(),
            unvisited: None,
        }
    }

    /// The move that led to this node, `None` for the root.
    #[must_use]
    pub const fn last_move(&self) -> Option<&M> {
        self.last_move.as_ref()
    }

    /// The player who chose the move leading to this node.
    #[must_use]
    pub const fn player(&self) -> Player {
        self.player
    }

    /// Playouts through this node won by the root player.
    #[must_use]
    pub const fn wins(&self) -> u64 {
        self.wins
    }

    /// Playouts that went through this node. Always zero for the root.
    #[must_use]
    pub const fn visits(&self) -> u64 {
        self.visits
    }

    /// Index of the parent node, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Expanded children in the order they were attached.
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Children waiting for expansion or `None` if the node was never reached.
    #[must_use]
    pub fn unvisited(&self) -> Option<&[Self]> {
        self.unvisited.as_deref()
    }

    /// Returns `true` once every legal move from this node has been expanded.
    #[must_use]
    pub fn fully_expanded(&self) -> bool {
        self.unvisited.as_ref().is_some_and(Vec::is_empty)
    }
}

/// Arena holding the search tree. The root always lives at [`Tree::ROOT`].
#[derive(Debug)]
pub struct Tree<M> {
    nodes: Vec<Node<M>>,
}

impl<M> Tree<M> {
    /// Index of the root node.
    pub const ROOT: NodeIndex = 0;

    /// Creates a tree consisting of the root only, `player` being the side to
    /// move in the root position.
    #[must_use]
    pub fn new(player: Player) -> Self {
        Self {
            nodes: vec![Node::new(None, player)],
        }
    }

    /// The node of the position the search started from.
    #[must_use]
    pub fn root(&self) -> &Node<M> {
        &self.nodes[Self::ROOT]
    }

    /// Returns the attached node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> &Node<M> {
        &self.nodes[index]
    }

    pub(super) fn get_mut(&mut self, index: NodeIndex) -> &mut Node<M> {
        &mut self.nodes[index]
    }

    /// Number of attached nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The root is never removed, so the tree is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Moves `child` into the arena and makes it the last child of `parent`.
    pub(super) fn attach(&mut self, parent: NodeIndex, mut child: Node<M>) -> NodeIndex {
        debug_assert!(parent < self.nodes.len());
        child.parent = Some(parent);
        let index = self.nodes.len();
        self.nodes.push(child);
        self.nodes[parent].children.push(index);
        index
    }

    /// Distance from the root in plies.
    #[must_use]
    pub fn depth(&self, index: NodeIndex) -> usize {
        std::iter::successors(self.nodes[index].parent, |&parent| {
            self.nodes[parent].parent
        })
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tree() {
        let tree = Tree::<u8>::new(Player::Black);
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());

        let root = tree.root();
        assert_eq!(root.last_move(), None);
        assert_eq!(root.parent(), None);
        assert_eq!(root.player(), Player::Black);
        assert_eq!(root.visits(), 0);
        assert_eq!(root.wins(), 0);
        assert!(root.children().is_empty());
        assert!(root.unvisited().is_none());
        assert!(!root.fully_expanded());
    }

    #[test]
    fn attach_links_both_ways() {
        let mut tree = Tree::new(Player::White);
        let first = tree.attach(Tree::<u8>::ROOT, Node::new(Some(1), Player::White));
        let second = tree.attach(Tree::<u8>::ROOT, Node::new(Some(2), Player::White));
        let grandchild = tree.attach(first, Node::new(Some(3), Player::Black));

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().children(), &[first, second]);
        assert_eq!(tree.get(first).children(), &[grandchild]);
        assert_eq!(tree.get(grandchild).parent(), Some(first));
        assert_eq!(tree.get(second).parent(), Some(Tree::<u8>::ROOT));
        assert_eq!(tree.get(grandchild).last_move(), Some(&3));
    }

    #[test]
    fn depth() {
        let mut tree = Tree::new(Player::White);
        let mut index = Tree::<u8>::ROOT;
        assert_eq!(tree.depth(index), 0);
        for ply in 1..=5u8 {
            index = tree.attach(index, Node::new(Some(ply), Player::White));
            assert_eq!(tree.depth(index), usize::from(ply));
        }
    }

    #[test]
    fn expansion_state() {
        let mut node = Node::new(None, Player::White);
        assert!(!node.fully_expanded());
        node.unvisited = Some(vec![Node::new(Some(1), Player::White)]);
        assert!(!node.fully_expanded());
        assert_eq!(node.unvisited().map(<[_]>::len), Some(1));
        node.unvisited = Some(Vec::new());
        assert!(node.fully_expanded());
    }
}
