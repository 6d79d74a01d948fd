//! Command tree nodes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

use super::handler::HandlerDescriptor;

/// Handle of a node inside a [`CommandTree`](super::CommandTree).
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in its tree's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declaration of the root node.
#[derive(Debug, Clone)]
pub struct RootSpec {
    pub(crate) prefix: String,
    pub(crate) delimiters: Vec<String>,
    pub(crate) case_insensitive: bool,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
}

impl RootSpec {
    /// Declares a root answering to `prefix`, with `delimiters` in priority
    /// order. The first delimiter is used when rendering usage strings.
    pub fn new<S: Into<String>>(
        prefix: impl Into<String>,
        delimiters: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            delimiters: delimiters.into_iter().map(Into::into).collect(),
            case_insensitive: true,
            name: None,
            description: None,
        }
    }

    /// Whether child codes match regardless of case (default: `true`).
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declaration of a child node.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub(crate) codes: Vec<String>,
    pub(crate) order: i32,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) brief_description: Option<String>,
    pub(crate) case_insensitive: Option<bool>,
}

impl NodeSpec {
    /// Declares a node answering to `codes`; the first one is the primary code,
    /// the others are aliases.
    pub fn new<S: Into<String>>(codes: impl IntoIterator<Item = S>) -> Self {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            order: 0,
            name: None,
            description: None,
            brief_description: None,
            case_insensitive: None,
        }
    }

    /// Sort key among siblings in help listings.
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a short description; defaults to the full one.
    pub fn brief_description(mut self, brief: impl Into<String>) -> Self {
        self.brief_description = Some(brief.into());
        self
    }

    /// Whether the codes of this node's children match regardless of case.
    /// Inherited from the parent when unset.
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = Some(enabled);
        self
    }
}

/// Settings only the root carries.
#[derive(Debug)]
pub(crate) struct RootSettings {
    pub(crate) prefix: String,
    pub(crate) delimiters: Vec<String>,
}

/// One point in the command tree.
pub struct CommandNode {
    pub(crate) id: NodeId,
    pub(crate) codes: Vec<String>,
    pub(crate) parent: Option<NodeId>,
    /// Children keyed by (folded) code; a child with aliases appears once per code.
    pub(crate) children: HashMap<String, NodeId>,
    pub(crate) handlers: BTreeMap<usize, HandlerDescriptor>,
    pub(crate) order: i32,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) brief_description: Option<String>,
    pub(crate) case_insensitive: bool,
    pub(crate) root: Option<RootSettings>,
    pub(crate) usage: OnceLock<String>,
    pub(crate) all_usages: OnceLock<Vec<String>>,
}

impl CommandNode {
    pub(crate) fn root(spec: RootSpec) -> Self {
        Self {
            id: NodeId::ROOT,
            codes: Vec::new(),
            parent: None,
            children: HashMap::new(),
            handlers: BTreeMap::new(),
            order: 0,
            brief_description: spec.description.clone(),
            name: spec.name,
            description: spec.description,
            case_insensitive: spec.case_insensitive,
            root: Some(RootSettings {
                prefix: spec.prefix,
                delimiters: spec.delimiters,
            }),
            usage: OnceLock::new(),
            all_usages: OnceLock::new(),
        }
    }

    pub(crate) fn child(id: NodeId, parent: NodeId, inherited_case: bool, spec: NodeSpec) -> Self {
        Self {
            id,
            codes: spec.codes,
            parent: Some(parent),
            children: HashMap::new(),
            handlers: BTreeMap::new(),
            order: spec.order,
            brief_description: spec.brief_description.or_else(|| spec.description.clone()),
            name: spec.name,
            description: spec.description,
            case_insensitive: spec.case_insensitive.unwrap_or(inherited_case),
            root: None,
            usage: OnceLock::new(),
            all_usages: OnceLock::new(),
        }
    }

    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns `true` for the root.
    pub fn is_root(&self) -> bool {
        self.root.is_some()
    }

    /// All codes; empty for the root.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// The primary code; `None` for the root.
    pub fn primary_code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }

    /// Codes other than the primary one.
    pub fn aliases(&self) -> &[String] {
        self.codes.get(1..).unwrap_or_default()
    }

    /// The parent node; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Sort key among siblings.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Full description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Short description.
    pub fn brief_description(&self) -> Option<&str> {
        self.brief_description.as_deref()
    }

    /// Whether child codes are matched regardless of case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// The highest registered arity; `None` when no handler is registered,
    /// which leaves tokenization unbounded.
    pub fn max_arity(&self) -> Option<usize> {
        self.handlers.keys().next_back().copied()
    }

    /// The handler registered for exactly `arity` arguments.
    pub fn handler(&self, arity: usize) -> Option<&HandlerDescriptor> {
        self.handlers.get(&arity)
    }

    /// Handlers ordered by arity.
    pub fn handlers(&self) -> impl Iterator<Item = &HandlerDescriptor> {
        self.handlers.values()
    }

    /// Looks up a child by code, folding case if this node is case-insensitive.
    pub fn child_id(&self, code: &str) -> Option<NodeId> {
        self.children.get(&self.fold(code)).copied()
    }

    pub(crate) fn fold(&self, code: &str) -> String {
        if self.case_insensitive {
            code.to_lowercase()
        } else {
            code.to_string()
        }
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("id", &self.id)
            .field("root", &self.is_root())
            .field("code", &self.primary_code().unwrap_or("N/A"))
            .field("children", &self.children.len())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
