//! Usage strings rebuilt from the tree structure.
//!
//! A usage string is the full invocation path of a node, e.g. `!/ar/add`, and
//! for a handler the same path followed by its parameter placeholders, e.g.
//! `!/ar/add/(keyword)/(response)`. Both are pure functions of the assembled
//! tree, so they are computed on first request and cached in a [`OnceLock`]
//! on the node or handler.
//!
//! [`OnceLock`]: std::sync::OnceLock

use super::handler::HandlerDescriptor;
use super::node::CommandNode;
use super::tree::CommandTree;

impl CommandTree {
    /// Usage string of `node` through primary codes only.
    pub fn node_usage<'a>(&'a self, node: &'a CommandNode) -> &'a str {
        node.usage.get_or_init(|| self.build_usage(node))
    }

    /// Usage strings of `node` for every combination of codes and aliases
    /// along its path.
    pub fn node_all_usages<'a>(&'a self, node: &'a CommandNode) -> &'a [String] {
        node.all_usages.get_or_init(|| {
            let mut out = Vec::new();
            self.collect_all_usages(node, String::new(), &mut out);
            out
        })
    }

    /// Usage string of `handler`, parameters included.
    pub fn handler_usage<'a>(&'a self, handler: &'a HandlerDescriptor) -> &'a str {
        handler.usage.get_or_init(|| match self.node(handler.node) {
            Some(node) => self.with_params(self.node_usage(node), handler),
            None => String::new(),
        })
    }

    /// Usage strings of `handler` for every combination of codes and aliases.
    pub fn handler_all_usages<'a>(&'a self, handler: &'a HandlerDescriptor) -> &'a [String] {
        handler.all_usages.get_or_init(|| match self.node(handler.node) {
            Some(node) => self
                .node_all_usages(node)
                .iter()
                .map(|base| self.with_params(base, handler))
                .collect(),
            None => Vec::new(),
        })
    }

    /// Computes every usage string up front.
    ///
    /// Call once after assembly to keep the first dispatches from paying for
    /// it; lazily computed strings are identical.
    pub fn warm_usage(&self) {
        for node in self.nodes() {
            self.node_usage(node);
            self.node_all_usages(node);
            for handler in node.handlers() {
                self.handler_usage(handler);
                self.handler_all_usages(handler);
            }
        }
    }

    fn build_usage(&self, node: &CommandNode) -> String {
        let delimiter = self.main_delimiter();
        let mut segments: Vec<&str> = Vec::new();

        let mut current = Some(node);
        while let Some(n) = current {
            match n.primary_code() {
                Some(code) => segments.push(code),
                None => segments.push(self.prefix()),
            }
            current = n.parent.and_then(|p| self.node(p));
        }

        segments.reverse();
        segments.join(delimiter)
    }

    fn collect_all_usages(&self, node: &CommandNode, suffix: String, out: &mut Vec<String>) {
        let delimiter = self.main_delimiter();

        match node.parent.and_then(|p| self.node(p)) {
            Some(parent) if !node.is_root() => {
                for code in &node.codes {
                    let next = if suffix.is_empty() {
                        code.clone()
                    } else {
                        format!("{code}{delimiter}{suffix}")
                    };
                    self.collect_all_usages(parent, next, out);
                }
            }
            _ => {
                if suffix.is_empty() {
                    out.push(self.prefix().to_string());
                } else {
                    out.push(format!("{}{delimiter}{suffix}", self.prefix()));
                }
            }
        }
    }

    fn with_params(&self, base: &str, handler: &HandlerDescriptor) -> String {
        let delimiter = self.main_delimiter();
        let mut usage = base.to_string();
        for param in handler.params() {
            usage.push_str(delimiter);
            usage.push('(');
            usage.push_str(&param.name);
            usage.push(')');
        }
        usage.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use jelly_core::{Args, Param};

    use crate::command::{CommandContext, HandlerSpec, NodeId, NodeSpec, RootSpec};

    use super::*;

    async fn noop(_ctx: CommandContext, _args: Args) {}

    #[test]
    fn test_handler_usage_includes_path_and_params() {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"])).unwrap();
        let foo = tree.add_child(NodeId::ROOT, NodeSpec::new(["foo"])).unwrap();
        let bar = tree.add_child(foo, NodeSpec::new(["bar"])).unwrap();
        tree.register(
            bar,
            HandlerSpec::new().params([Param::text("arg1"), Param::text("arg2")]),
            noop,
        )
        .unwrap();

        let handler = tree.handler(bar, 2).unwrap();
        assert_eq!(tree.handler_usage(handler), "!/foo/bar/(arg1)/(arg2)");
        assert_eq!(tree.node_usage(tree.node(foo).unwrap()), "!/foo");
        assert_eq!(tree.node_usage(tree.root()), "!");
    }

    #[test]
    fn test_all_usages_cross_aliases() {
        let mut tree = CommandTree::new(RootSpec::new("JC", [" ", "\n"])).unwrap();
        let ar = tree
            .add_child(NodeId::ROOT, NodeSpec::new(["ar", "autoreply"]))
            .unwrap();
        let add = tree.add_child(ar, NodeSpec::new(["add", "a"])).unwrap();
        tree.register(add, HandlerSpec::new().param(Param::text("kw")), noop)
            .unwrap();

        let node = tree.node(add).unwrap();
        let mut all = tree.node_all_usages(node).to_vec();
        all.sort();
        assert_eq!(
            all,
            vec!["JC ar a", "JC ar add", "JC autoreply a", "JC autoreply add"]
        );
        assert!(
            tree.node_all_usages(node)
                .iter()
                .any(|u| u == tree.node_usage(node))
        );

        let handler = tree.handler(add, 1).unwrap();
        assert_eq!(tree.handler_all_usages(handler).len(), 4);
        assert!(
            tree.handler_all_usages(handler)
                .iter()
                .all(|u| u.ends_with(" (kw)"))
        );
    }

    #[test]
    fn test_usage_is_memoized() {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"])).unwrap();
        let foo = tree.add_child(NodeId::ROOT, NodeSpec::new(["foo"])).unwrap();

        tree.warm_usage();
        let node = tree.node(foo).unwrap();
        let first = tree.node_usage(node);
        let second = tree.node_usage(node);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_usage_from_many_threads() {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"])).unwrap();
        let foo = tree.add_child(NodeId::ROOT, NodeSpec::new(["foo", "f"])).unwrap();
        tree.register(foo, HandlerSpec::new().param(Param::integer("n")), noop)
            .unwrap();

        let tree = std::sync::Arc::new(tree);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tree = std::sync::Arc::clone(&tree);
                std::thread::spawn(move || {
                    let handler = tree.handler(foo, 1).unwrap();
                    (
                        tree.handler_usage(handler).to_string(),
                        tree.handler_all_usages(handler).to_vec(),
                    )
                })
            })
            .collect();

        for handle in handles {
            let (usage, all) = handle.join().unwrap();
            assert_eq!(usage, "!/foo/(n)");
            assert_eq!(all, vec!["!/foo/(n)", "!/f/(n)"]);
        }
    }
}
