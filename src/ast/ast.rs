use crate::Position;

/// Factory Trait
///
/// Builds AST nodes for the engine. Node contents are opaque to the engine:
/// it only hands over the node kind and the position the match started at.
pub trait AstFactory: Send + Sync {
    type Node;

    /// Creates a node of `kind` anchored at `position`.
    fn make(&self, kind: &str, position: &Position) -> Self::Node;
}

/// General purpose node
///
/// A kind, an anchor position, an optional text value and child nodes.
/// Grammars that do not need a typed AST can build trees from these.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: String,
    pub position: Position,
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: impl Into<String>, position: Position) -> Self {
        Node {
            kind: kind.into(),
            position,
            value: None,
            children: vec![],
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn offset(&self) -> usize {
        self.position.offset
    }

    /// Finds the first direct child of `kind`.
    pub fn child(&self, kind: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.kind == kind)
    }
}

/// Factory producing [`Node`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFactory;

impl AstFactory for NodeFactory {
    type Node = Node;

    fn make(&self, kind: &str, position: &Position) -> Node {
        Node::new(kind, position.clone())
    }
}
