//! The compiled search-space tree.
//!
//! Four node kinds make up the tree: [`Leaf`] (one parameter), [`Literal`]
//! (a fixed value), [`Group`] (an ordered sequence of children) and
//! [`Choice`] (mutually exclusive alternatives). Nodes are built once and
//! never mutated afterwards; rendering state such as the accumulated prefix
//! is threaded through the [renderer](crate::render) instead of stored here.

use crate::parameter::Parameter;

/// Token rendered in place of a slot-open marker literal.
pub const SLOT_OPEN_TOKEN: &str = "QUOTE_START";
/// Token rendered in place of a slot-close marker literal.
pub const SLOT_CLOSE_TOKEN: &str = "QUOTE_END";

/// A node of the compiled search space.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    /// A terminal bound to one parameter.
    Leaf(Leaf),
    /// A fixed key/value pair.
    Literal(Literal),
    /// An ordered sequence of children.
    Group(Group),
    /// Mutually exclusive alternatives.
    Choice(Choice),
}

impl TreeNode {
    /// Visits this node and all descendants in render order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode)) {
        visit(self);
        match self {
            TreeNode::Group(group) => group.children.iter().for_each(|c| c.walk(visit)),
            TreeNode::Choice(choice) => choice.alternatives.iter().for_each(|a| a.walk(visit)),
            TreeNode::Leaf(_) | TreeNode::Literal(_) => {}
        }
    }

    /// Number of leaves in this subtree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if matches!(node, TreeNode::Leaf(_)) {
                n += 1;
            }
        });
        n
    }

    /// Number of choices in this subtree.
    #[must_use]
    pub fn choice_count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if matches!(node, TreeNode::Choice(_)) {
                n += 1;
            }
        });
        n
    }
}

/// A terminal rendering one of the five parameter distributions.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    /// The parameter this leaf searches over.
    pub param: Parameter,
}

/// What a [`Literal`] stands for when rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LiteralRole {
    /// An ordinary string value, escaped on output.
    #[default]
    PlainValue,
    /// Opens an ensemble slot's classifier specification.
    SlotOpenMarker,
    /// Closes an ensemble slot's classifier specification.
    SlotCloseMarker,
}

/// A fixed key/value pair injected into the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    /// The key under which the value is written in a dictionary.
    pub name: String,
    /// The value.
    pub value: String,
    /// How the renderer treats the value.
    pub role: LiteralRole,
    /// Keeps `name` verbatim instead of applying the accumulated prefix.
    pub fixed_name: bool,
}

impl Literal {
    /// A plain literal whose key receives the accumulated prefix.
    #[must_use]
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            role: LiteralRole::PlainValue,
            fixed_name: false,
        }
    }

    /// A plain literal addressable by a fixed, unprefixed key.
    #[must_use]
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            fixed_name: true,
            ..Self::plain(name, value)
        }
    }

    /// Marker opening an ensemble slot.
    #[must_use]
    pub fn slot_open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SLOT_OPEN_TOKEN.to_owned(),
            role: LiteralRole::SlotOpenMarker,
            fixed_name: false,
        }
    }

    /// Marker closing an ensemble slot.
    #[must_use]
    pub fn slot_close(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SLOT_CLOSE_TOKEN.to_owned(),
            role: LiteralRole::SlotCloseMarker,
            fixed_name: false,
        }
    }
}

/// An ordered sequence of children.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// Key used when the group sits inside a dictionary.
    pub name: String,
    /// Children in render order.
    pub children: Vec<TreeNode>,
    /// Render as `{key: value}` entries rather than a positional tuple.
    pub dict_framed: bool,
    /// Local prefix segment applied to every descendant label. Empty for none.
    pub prefix: String,
}

impl Group {
    /// A dictionary-framed group without a prefix segment.
    #[must_use]
    pub fn dict(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
            dict_framed: true,
            prefix: String::new(),
        }
    }

    /// A tuple-framed group without a prefix segment.
    #[must_use]
    pub fn tuple(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            dict_framed: false,
            ..Self::dict(name, children)
        }
    }

    /// Sets the local prefix segment.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Mutually exclusive alternatives; exactly one is active.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    /// Stable name addressing this choice in the output.
    pub name: String,
    /// Alternatives in catalogue order.
    pub alternatives: Vec<TreeNode>,
}

impl Choice {
    /// Creates a choice over `alternatives`.
    #[must_use]
    pub fn new(name: impl Into<String>, alternatives: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            alternatives,
        }
    }
}

impl From<Leaf> for TreeNode {
    fn from(leaf: Leaf) -> Self {
        TreeNode::Leaf(leaf)
    }
}

impl From<Literal> for TreeNode {
    fn from(literal: Literal) -> Self {
        TreeNode::Literal(literal)
    }
}

impl From<Group> for TreeNode {
    fn from(group: Group) -> Self {
        TreeNode::Group(group)
    }
}

impl From<Choice> for TreeNode {
    fn from(choice: Choice) -> Self {
        TreeNode::Choice(choice)
    }
}

impl From<Parameter> for TreeNode {
    fn from(param: Parameter) -> Self {
        TreeNode::Leaf(Leaf { param })
    }
}

/// Hands out synthetic names for anonymous groups.
///
/// Scoped to one compilation: two allocators starting from the same state
/// hand out the same sequence, which keeps output deterministic.
///
/// ```
/// use space_compiler::tree::NameAllocator;
///
/// let mut names = NameAllocator::new();
/// assert_eq!(names.next_name(), "auto_param_0");
/// assert_eq!(names.next_name(), "auto_param_1");
///
/// names.reset();
/// assert_eq!(names.next_name(), "auto_param_0");
/// ```
#[derive(Clone, Debug, Default)]
pub struct NameAllocator {
    next: u64,
}

impl NameAllocator {
    /// Creates an allocator starting at `auto_param_0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator starting at `auto_param_<start>`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Returns the next unused synthetic name.
    pub fn next_name(&mut self) -> String {
        let name = format!("auto_param_{}", self.next);
        self.next += 1;
        name
    }

    /// Number of names handed out since the last reset.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next
    }

    /// Restarts the sequence at `auto_param_0`.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}
