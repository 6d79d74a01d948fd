//! The command tree arena and its registration API.
//!
//! Nodes live in a flat arena owned by [`CommandTree`]; parents and children
//! refer to each other through [`NodeId`] handles. The tree is assembled once
//! at startup and is read-only afterwards, apart from the memoized usage
//! strings which are computed at most once per node and handler.

use std::sync::Arc;

use tracing::{debug, warn};

use super::handler::{CommandHandler, HandlerDescriptor, HandlerSpec};
use super::node::{CommandNode, NodeId, NodeSpec, RootSpec};
use crate::error::{TreeError, TreeResult};

/// A prefix tree of command nodes rooted at a single root.
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Creates a tree from its root declaration.
    ///
    /// Fails with [`TreeError::MalformedRoot`] if the prefix is empty, no
    /// delimiter is given, or a delimiter is empty.
    pub fn new(root: RootSpec) -> TreeResult<Self> {
        if root.prefix.is_empty() {
            return Err(TreeError::malformed_root("the root requires a prefix"));
        }
        if root.delimiters.is_empty() {
            return Err(TreeError::malformed_root(
                "the root requires at least one delimiter",
            ));
        }
        if root.delimiters.iter().any(String::is_empty) {
            return Err(TreeError::malformed_root("delimiters must not be empty"));
        }

        debug!(
            prefix = %root.prefix,
            delimiters = ?root.delimiters,
            "Command tree created"
        );

        Ok(Self {
            nodes: vec![CommandNode::root(root)],
        })
    }

    /// The root node.
    pub fn root(&self) -> &CommandNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// The command prefix.
    pub fn prefix(&self) -> &str {
        self.root()
            .root
            .as_ref()
            .map(|r| r.prefix.as_str())
            .unwrap_or_default()
    }

    /// The delimiters in priority order.
    pub fn delimiters(&self) -> &[String] {
        self.root()
            .root
            .as_ref()
            .map(|r| r.delimiters.as_slice())
            .unwrap_or_default()
    }

    /// The delimiter used to render usage strings.
    pub fn main_delimiter(&self) -> &str {
        self.delimiters()
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Returns the node behind `id`.
    pub fn node(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_or_err(&self, id: NodeId) -> TreeResult<&CommandNode> {
        self.node(id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so this is never `true`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &CommandNode> {
        self.nodes.iter()
    }

    /// Children of `id`, each once, ordered by their order index and then by
    /// creation.
    pub fn children(&self, id: NodeId) -> Vec<&CommandNode> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };

        let mut ids: Vec<NodeId> = node.children.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();

        let mut children: Vec<&CommandNode> = ids.into_iter().map(|c| &self.nodes[c.0]).collect();
        children.sort_by_key(|c| (c.order, c.id));
        children
    }

    /// Finds a node by walking codes from the root, e.g. `["ar", "add"]`.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        path.iter().try_fold(NodeId::ROOT, |current, code| {
            self.nodes[current.0].child_id(code.as_ref())
        })
    }

    /// Creates a child of `parent`.
    ///
    /// Codes are folded to lower case for lookup if `parent` is
    /// case-insensitive. A code already taken by a sibling is reassigned to the
    /// new node with a warning.
    pub fn add_child(&mut self, parent: NodeId, spec: NodeSpec) -> TreeResult<NodeId> {
        if spec.codes.is_empty() {
            return Err(TreeError::EmptyCodes);
        }
        if spec.codes.iter().any(|c| c.trim().is_empty()) {
            return Err(TreeError::BlankCode);
        }

        let parent_node = self.node_or_err(parent)?;
        let inherited_case = parent_node.case_insensitive;
        let keys: Vec<String> = spec.codes.iter().map(|c| parent_node.fold(c)).collect();

        for code in &spec.codes {
            if let Some(delimiter) = self.delimiters().iter().find(|d| code.contains(d.as_str())) {
                warn!(
                    code = %code,
                    delimiter = ?delimiter,
                    "Command code contains a delimiter and can never be matched"
                );
            }
        }

        let id = NodeId(self.nodes.len());
        let node = CommandNode::child(id, parent, inherited_case, spec);

        let parent_node = &mut self.nodes[parent.0];
        for key in keys {
            if let Some(previous) = parent_node.children.insert(key.clone(), id)
                && previous != id
            {
                warn!(
                    code = %key,
                    parent = %parent,
                    replaced = %previous,
                    replacement = %id,
                    "Command code already registered under this node, replacing it"
                );
            }
        }

        debug!(node = %id, parent = %parent, codes = ?node.codes, "Command node added");
        self.nodes.push(node);
        Ok(id)
    }

    /// Registers `handler` on `node` for the arity declared by `spec`.
    ///
    /// An existing handler with the same arity is replaced with a warning.
    pub fn register<H>(&mut self, node: NodeId, spec: HandlerSpec, handler: H) -> TreeResult<()>
    where
        H: CommandHandler,
    {
        let target = self
            .nodes
            .get_mut(node.0)
            .ok_or(TreeError::NodeNotFound(node))?;

        let arity = spec.arity();
        let descriptor = HandlerDescriptor::new(node, spec, Arc::new(handler));

        if target.handlers.insert(arity, descriptor).is_some() {
            warn!(
                node = %node,
                code = target.primary_code().unwrap_or("<root>"),
                arity,
                "A handler is already registered for this arity, replacing it"
            );
        } else {
            debug!(node = %node, arity, "Command handler registered");
        }

        Ok(())
    }

    /// Returns the handler of `node` registered for exactly `arity` arguments.
    pub fn handler(&self, node: NodeId, arity: usize) -> Option<&HandlerDescriptor> {
        self.node(node)?.handler(arity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jelly_core::{Args, Param};

    use crate::command::CommandContext;

    async fn noop(_ctx: CommandContext, _args: Args) {}

    fn tree() -> CommandTree {
        CommandTree::new(RootSpec::new("!", ["/"])).unwrap()
    }

    #[test]
    fn test_root_requires_prefix_and_delimiters() {
        assert!(matches!(
            CommandTree::new(RootSpec::new("", ["/"])),
            Err(TreeError::MalformedRoot { .. })
        ));
        assert!(matches!(
            CommandTree::new(RootSpec::new("!", Vec::<String>::new())),
            Err(TreeError::MalformedRoot { .. })
        ));
        assert!(matches!(
            CommandTree::new(RootSpec::new("!", ["/", ""])),
            Err(TreeError::MalformedRoot { .. })
        ));
    }

    #[test]
    fn test_root_accessors() {
        let tree = CommandTree::new(RootSpec::new("JC", ["\n", " "])).unwrap();
        assert_eq!(tree.prefix(), "JC");
        assert_eq!(tree.delimiters(), ["\n", " "]);
        assert_eq!(tree.main_delimiter(), "\n");
        assert!(tree.root().is_root());
        assert_eq!(tree.root().max_arity(), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_child_requires_codes() {
        let mut tree = tree();
        assert_eq!(
            tree.add_child(NodeId::ROOT, NodeSpec::new(Vec::<String>::new())),
            Err(TreeError::EmptyCodes)
        );
        assert_eq!(
            tree.add_child(NodeId::ROOT, NodeSpec::new(["  "])),
            Err(TreeError::BlankCode)
        );
        assert_eq!(
            tree.add_child(NodeId(42), NodeSpec::new(["x"])),
            Err(TreeError::NodeNotFound(NodeId(42)))
        );
    }

    #[test]
    fn test_child_lookup_folds_case() {
        let mut tree = tree();
        let echo = tree
            .add_child(NodeId::ROOT, NodeSpec::new(["Echo", "E"]))
            .unwrap();

        assert_eq!(tree.root().child_id("echo"), Some(echo));
        assert_eq!(tree.root().child_id("ECHO"), Some(echo));
        assert_eq!(tree.root().child_id("e"), Some(echo));
        // Displayed codes keep their declared case.
        assert_eq!(tree.node(echo).unwrap().codes(), ["Echo", "E"]);
        assert_eq!(tree.node(echo).unwrap().aliases(), ["E"]);
    }

    #[test]
    fn test_case_sensitive_root() {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"]).case_insensitive(false)).unwrap();
        let echo = tree.add_child(NodeId::ROOT, NodeSpec::new(["Echo"])).unwrap();

        assert_eq!(tree.root().child_id("Echo"), Some(echo));
        assert_eq!(tree.root().child_id("echo"), None);
        // Children inherit case sensitivity unless they override it.
        assert!(!tree.node(echo).unwrap().is_case_insensitive());
    }

    #[test]
    fn test_code_collision_replaces_sibling() {
        let mut tree = tree();
        let first = tree.add_child(NodeId::ROOT, NodeSpec::new(["a", "b"])).unwrap();
        let second = tree.add_child(NodeId::ROOT, NodeSpec::new(["B"])).unwrap();

        assert_eq!(tree.root().child_id("a"), Some(first));
        assert_eq!(tree.root().child_id("b"), Some(second));
        assert_eq!(tree.children(NodeId::ROOT).len(), 2);
    }

    #[test]
    fn test_children_sorted_by_order() {
        let mut tree = tree();
        let late = tree
            .add_child(NodeId::ROOT, NodeSpec::new(["late"]).order(10))
            .unwrap();
        let early = tree
            .add_child(NodeId::ROOT, NodeSpec::new(["early", "e"]).order(-1))
            .unwrap();
        let mid = tree.add_child(NodeId::ROOT, NodeSpec::new(["mid"])).unwrap();

        let ids: Vec<NodeId> = tree.children(NodeId::ROOT).iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![early, mid, late]);
    }

    #[test]
    fn test_find_walks_codes() {
        let mut tree = tree();
        let ar = tree.add_child(NodeId::ROOT, NodeSpec::new(["ar"])).unwrap();
        let add = tree.add_child(ar, NodeSpec::new(["add", "a"])).unwrap();

        assert_eq!(tree.find(&["AR", "a"]), Some(add));
        assert_eq!(tree.find::<&str>(&[]), Some(NodeId::ROOT));
        assert_eq!(tree.find(&["ar", "missing"]), None);
    }

    #[test]
    fn test_register_overwrites_same_arity() {
        let mut tree = tree();
        let echo = tree.add_child(NodeId::ROOT, NodeSpec::new(["echo"])).unwrap();

        tree.register(echo, HandlerSpec::new().param(Param::text("a")).description("first"), noop)
            .unwrap();
        tree.register(echo, HandlerSpec::new().param(Param::text("b")).description("second"), noop)
            .unwrap();
        tree.register(echo, HandlerSpec::new(), noop).unwrap();

        let node = tree.node(echo).unwrap();
        assert_eq!(node.handlers().count(), 2);
        assert_eq!(node.max_arity(), Some(1));
        assert_eq!(tree.handler(echo, 1).unwrap().description(), "second");
        assert!(tree.register(NodeId(9), HandlerSpec::new(), noop).is_err());
    }
}
