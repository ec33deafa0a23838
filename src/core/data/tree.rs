/// Handle to a node of a `Tree`.
///
/// Handles are positional: a node keeps its id for the lifetime of the tree, and a
/// duplicated tree assigns every copied node the id of its original.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct Node<V> {
    value: V,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An ordered, labelled tree stored in an arena.
///
/// Children are owned by their parent through the arena; the parent link is a plain
/// handle used for navigating back towards the root.
#[derive(Clone, Debug)]
pub struct Tree<V> {
    nodes: Vec<Node<V>>,
}

impl<V: Clone> Tree<V> {
    pub fn new(value: V) -> Self {
        Tree {
            nodes: vec![Node {
                value,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn value(&self, node: NodeId) -> &V {
        &self.node(node).value
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Iterates from `node` up to the root, `node` included.
    pub fn lineage(&self, node: NodeId) -> Lineage<V> {
        Lineage {
            tree: self,
            next: Some(node),
        }
    }

    /// Appends a new last child under `parent`.
    pub fn add(&mut self, parent: NodeId, value: V) -> NodeId {
        let child = self.push(parent, value);
        self.node_mut(parent).children.push(child);
        child
    }

    /// Inserts a new first child under `parent`.
    pub fn prepend(&mut self, parent: NodeId, value: V) -> NodeId {
        let child = self.push(parent, value);
        self.node_mut(parent).children.insert(0, child);
        child
    }

    /// Number of leaves below (or at) `node`.
    pub fn width(&self, node: NodeId) -> usize {
        let children = self.children(node);
        if children.is_empty() {
            1
        } else {
            children.iter().map(|child| self.width(*child)).sum()
        }
    }

    /// Deep-copies the tree, returning the copy together with the image of `target`.
    ///
    /// Mutating the copy never affects `self`, so a branch of the copy can be extended
    /// while the original stays recorded elsewhere.
    pub fn dup(&self, target: NodeId) -> (Tree<V>, NodeId) {
        if target.0 >= self.nodes.len() {
            panic!("Node {} does not belong to the duplicated tree", target.0);
        }

        let copy = Tree {
            nodes: self.nodes.clone(),
        };
        (copy, target)
    }

    /// Renders the tree one node per line, with box-drawing branches.
    pub fn render(&self, label: &dyn Fn(&V) -> String) -> String {
        let mut out = String::new();
        self.render_internal(self.root(), label, String::new(), true, &mut out);
        out
    }

    fn render_internal(
        &self,
        node: NodeId,
        label: &dyn Fn(&V) -> String,
        prefix: String,
        is_tail: bool,
        out: &mut String,
    ) {
        out.push_str(&format!(
            "{}{}{}\n",
            prefix,
            if is_tail { "└── " } else { "├── " },
            label(self.value(node))
        ));

        let children = self.children(node);
        for (i, child) in children.iter().enumerate() {
            let child_prefix = format!("{}{}", prefix, if is_tail { "    " } else { "│   " });
            self.render_internal(*child, label, child_prefix, i == children.len() - 1, out);
        }
    }

    fn push(&mut self, parent: NodeId, value: V) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }

    fn node(&self, node: NodeId) -> &Node<V> {
        &self.nodes[node.0]
    }

    fn node_mut(&mut self, node: NodeId) -> &mut Node<V> {
        &mut self.nodes[node.0]
    }
}

pub struct Lineage<'tree, V> {
    tree: &'tree Tree<V>,
    next: Option<NodeId>,
}

impl<'tree, V: Clone> Iterator for Lineage<'tree, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tree: &Tree<&'static str>, node: NodeId) -> Vec<&'static str> {
        tree.children(node)
            .iter()
            .map(|child| *tree.value(*child))
            .collect()
    }

    #[test]
    fn add_and_prepend_order() {
        //setup
        let mut tree = Tree::new("root");
        let root = tree.root();

        //exercise
        tree.add(root, "b");
        tree.prepend(root, "a");
        tree.add(root, "c");

        //verify
        assert_eq!(values(&tree, root), vec!["a", "b", "c"]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn lineage_walks_to_root() {
        //setup
        let mut tree = Tree::new("root");
        let root = tree.root();
        let a = tree.add(root, "a");
        let b = tree.add(a, "b");
        tree.add(root, "c");

        //exercise
        let lineage: Vec<&str> = tree.lineage(b).map(|node| *tree.value(node)).collect();

        //verify
        assert_eq!(lineage, vec!["b", "a", "root"]);
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn width_counts_leaves() {
        //setup
        let mut tree = Tree::new("root");
        let root = tree.root();
        let a = tree.add(root, "a");
        tree.add(a, "a1");
        tree.add(a, "a2");
        tree.add(root, "b");

        //exercise
        let width = tree.width(root);

        //verify
        assert_eq!(width, 3);
        assert_eq!(tree.width(a), 2);
    }

    #[test]
    fn dup_is_independent() {
        //setup
        let mut tree = Tree::new("root");
        let root = tree.root();
        let a = tree.add(root, "a");
        tree.add(root, "b");

        //exercise
        let (mut copy, image) = tree.dup(a);
        copy.add(image, "a1");
        copy.prepend(copy.root(), "z");

        //verify
        assert_eq!(*copy.value(image), "a");
        assert_eq!(values(&copy, image), vec!["a1"]);
        assert_eq!(values(&copy, copy.root()), vec!["z", "a", "b"]);
        assert!(tree.children(a).is_empty());
        assert_eq!(values(&tree, root), vec!["a", "b"]);
    }

    #[test]
    #[should_panic]
    fn dup_foreign_node() {
        //setup
        let tree = Tree::new("root");
        let mut other = Tree::new("other");
        let root = other.root();
        let foreign = other.add(root, "x");

        //exercise
        tree.dup(foreign);
    }

    #[test]
    fn render_branches() {
        //setup
        let mut tree = Tree::new("root");
        let root = tree.root();
        let a = tree.add(root, "a");
        tree.add(a, "a1");
        tree.add(root, "b");

        //exercise
        let rendered = tree.render(&|value| value.to_string());

        //verify
        assert_eq!(
            rendered,
            "└── root
    ├── a
    │   └── a1
    └── b
"
        );
    }
}
