//! Walking the tree to find the handler for a piece of text.
//!
//! Resolution is synchronous and never touches the handler itself; it only
//! decides which handler would run and with which raw tokens. The
//! [`Dispatcher`](crate::Dispatcher) takes it from there.

use jelly_core::{ChannelKind, CommandScope, Response, ScopeChecker};
use tracing::{debug, trace};

use super::node::NodeId;
use super::split::{split_args, split_first};
use super::tree::CommandTree;

/// Outcome of resolving text against a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing under the node answers to this text.
    NoMatch,
    /// A handler matched but may not run in the caller's channel kind.
    OutOfScope {
        /// Node of the matched handler.
        node: NodeId,
        /// Arity of the matched handler.
        arity: usize,
        /// The rejection to send back instead.
        response: Response,
    },
    /// A handler matched and may run.
    Matched {
        /// Node of the matched handler.
        node: NodeId,
        /// Raw argument tokens; exactly as many as the handler's arity.
        tokens: Vec<String>,
    },
}

impl Resolution {
    /// Returns `true` if no handler answered.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

/// Builds the message sent when a handler is used outside its scope.
///
/// Lists the permitted kinds in order, never including `current`.
pub fn out_of_scope_message(current: ChannelKind, scope: &CommandScope) -> String {
    let allowed: Vec<&str> = scope
        .available_kinds()
        .into_iter()
        .filter(|kind| *kind != current)
        .map(|kind| kind.key())
        .collect();

    format!(
        "Command not allowed to use under this channel type: {}\n\
         Please use the command under either one of these channel types: {}",
        current.key(),
        allowed.join(" / ")
    )
}

impl CommandTree {
    /// Resolves `text` against `node`.
    ///
    /// The text is tokenized on `delimiter` up to the node's highest arity. If
    /// the token count is exactly a registered arity, that handler is the
    /// answer, subject to `checker`. Otherwise the first token names a child
    /// and resolution continues there with the rest of the text.
    pub fn resolve(
        &self,
        node: NodeId,
        text: &str,
        delimiter: &str,
        channel_kind: ChannelKind,
        checker: &dyn ScopeChecker,
    ) -> Resolution {
        let Some(current) = self.node(node) else {
            return Resolution::NoMatch;
        };

        let tokens = split_args(text, delimiter, current.max_arity());
        trace!(node = %node, tokens = ?tokens, "Tokenized command text");

        if let Some(handler) = current.handler(tokens.len()) {
            let arity = handler.arity();

            if !checker.is_allowed(handler.scope(), channel_kind) {
                debug!(
                    node = %node,
                    arity,
                    channel_kind = %channel_kind,
                    "Handler matched outside its scope"
                );
                return Resolution::OutOfScope {
                    node,
                    arity,
                    response: Response::text(out_of_scope_message(channel_kind, handler.scope())),
                };
            }

            debug!(node = %node, arity, "Handler matched");
            return Resolution::Matched { node, tokens };
        }

        if text.is_empty() {
            return Resolution::NoMatch;
        }

        let (code, rest) = split_first(text, delimiter);
        match current.child_id(&code) {
            Some(child) => {
                trace!(code = %code, child = %child, "Descending into child node");
                self.resolve(child, rest, delimiter, channel_kind, checker)
            }
            None => {
                trace!(code = %code, node = %node, "No child answers to this code");
                Resolution::NoMatch
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jelly_core::{Args, Param, ScopeMembership};

    use crate::command::{CommandContext, HandlerSpec, NodeSpec, RootSpec};

    use super::*;

    async fn noop(_ctx: CommandContext, _args: Args) {}

    fn resolve(tree: &CommandTree, text: &str) -> Resolution {
        tree.resolve(NodeId::ROOT, text, "/", ChannelKind::GroupPublicText, &ScopeMembership)
    }

    fn two_overloads() -> (CommandTree, NodeId, NodeId) {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"])).unwrap();
        let calc = tree.add_child(NodeId::ROOT, NodeSpec::new(["calc"])).unwrap();
        tree.register(calc, HandlerSpec::new().param(Param::text("a")), noop)
            .unwrap();
        tree.register(
            calc,
            HandlerSpec::new().params([Param::text("a"), Param::text("b")]),
            noop,
        )
        .unwrap();
        let sub = tree.add_child(calc, NodeSpec::new(["sub"])).unwrap();
        tree.register(sub, HandlerSpec::new(), noop).unwrap();
        (tree, calc, sub)
    }

    #[test]
    fn test_exact_arity() {
        let (tree, calc, _) = two_overloads();

        assert_eq!(
            resolve(&tree, "calc/1/2"),
            Resolution::Matched {
                node: calc,
                tokens: vec!["1".into(), "2".into()]
            }
        );
        assert_eq!(
            resolve(&tree, "calc/1"),
            Resolution::Matched {
                node: calc,
                tokens: vec!["1".into()]
            }
        );
    }

    #[test]
    fn test_tokens_past_max_arity_are_discarded() {
        let (tree, calc, _) = two_overloads();

        assert_eq!(
            resolve(&tree, "calc/1/2/3"),
            Resolution::Matched {
                node: calc,
                tokens: vec!["1".into(), "2".into()]
            }
        );
    }

    #[test]
    fn test_zero_tokens_fall_through_to_no_match() {
        let (tree, _, _) = two_overloads();

        // Neither arity 1 nor 2 matches zero tokens, and there is no text left
        // to name a child.
        assert!(resolve(&tree, "calc").is_no_match());
        assert!(resolve(&tree, "calc/").is_no_match());
    }

    #[test]
    fn test_child_and_bare_handler() {
        let (tree, _, sub) = two_overloads();
        let root = tree.root();
        assert!(root.handlers().next().is_none());

        // "sub" is consumed as a child code only because no arity-1 handler on
        // `calc` claimed it first.
        let mut tree = tree;
        let bare = tree.add_child(NodeId::ROOT, NodeSpec::new(["help"])).unwrap();
        tree.register(bare, HandlerSpec::new(), noop).unwrap();
        let topic = tree.add_child(bare, NodeSpec::new(["topic"])).unwrap();
        tree.register(topic, HandlerSpec::new(), noop).unwrap();

        assert_eq!(
            resolve(&tree, "help"),
            Resolution::Matched {
                node: bare,
                tokens: vec![]
            }
        );
        assert_eq!(
            resolve(&tree, "help/topic"),
            Resolution::Matched {
                node: topic,
                tokens: vec![]
            }
        );
        assert_eq!(
            resolve(&tree, "calc/sub"),
            Resolution::Matched {
                node: tree.find(&["calc"]).unwrap(),
                tokens: vec!["sub".into()]
            }
        );
        assert_ne!(sub, bare);
    }

    #[test]
    fn test_doubled_delimiter_before_child_text() {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"])).unwrap();
        let echo = tree.add_child(NodeId::ROOT, NodeSpec::new(["echo"])).unwrap();
        tree.register(echo, HandlerSpec::new().param(Param::text("t")), noop)
            .unwrap();

        assert_eq!(
            resolve(&tree, "echo/hi"),
            Resolution::Matched {
                node: echo,
                tokens: vec!["hi".into()]
            }
        );

        // The child re-tokenizes its own remainder, so the empty token between
        // two delimiters uses up its single slot and "hi" is discarded.
        assert!(resolve(&tree, "echo//hi").is_no_match());
        // A leading delimiter leaves an empty code that no child answers to.
        assert!(resolve(&tree, "/echo/hi").is_no_match());
    }

    #[test]
    fn test_unknown_code() {
        let (tree, _, _) = two_overloads();
        assert!(resolve(&tree, "bogus/x").is_no_match());
        assert!(resolve(&tree, "").is_no_match());
    }

    #[test]
    fn test_case_folding() {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"])).unwrap();
        let echo = tree.add_child(NodeId::ROOT, NodeSpec::new(["Echo"])).unwrap();
        tree.register(echo, HandlerSpec::new().param(Param::text("t")), noop)
            .unwrap();

        for text in ["echo/x", "ECHO/x", "Echo/x"] {
            assert!(matches!(resolve(&tree, text), Resolution::Matched { node, .. } if node == echo));
        }

        let mut strict = CommandTree::new(RootSpec::new("!", ["/"]).case_insensitive(false)).unwrap();
        let echo = strict.add_child(NodeId::ROOT, NodeSpec::new(["Echo"])).unwrap();
        strict
            .register(echo, HandlerSpec::new().param(Param::text("t")), noop)
            .unwrap();

        assert!(matches!(resolve(&strict, "Echo/x"), Resolution::Matched { .. }));
        assert!(resolve(&strict, "echo/x").is_no_match());
        assert!(resolve(&strict, "ECHO/x").is_no_match());
    }

    #[test]
    fn test_out_of_scope() {
        let mut tree = CommandTree::new(RootSpec::new("!", ["/"])).unwrap();
        let grp = tree.add_child(NodeId::ROOT, NodeSpec::new(["grp"])).unwrap();
        tree.register(
            grp,
            HandlerSpec::new().scope(CommandScope::group_only()),
            noop,
        )
        .unwrap();

        let resolution = tree.resolve(
            NodeId::ROOT,
            "grp",
            "/",
            ChannelKind::PrivateText,
            &ScopeMembership,
        );
        match resolution {
            Resolution::OutOfScope { response, arity, .. } => {
                assert_eq!(arity, 0);
                assert_eq!(
                    response.content,
                    "Command not allowed to use under this channel type: private_text\n\
                     Please use the command under either one of these channel types: \
                     group_private_text / group_public_text"
                );
            }
            other => panic!("expected an out of scope rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_scope_message_excludes_current_kind() {
        let scope = CommandScope::only([ChannelKind::PrivateText, ChannelKind::GroupPublicText]);
        let message = out_of_scope_message(ChannelKind::PrivateText, &scope);
        assert!(message.ends_with("channel types: group_public_text"));

        let message = out_of_scope_message(ChannelKind::Unknown, &CommandScope::private_only());
        assert!(message.contains("channel type: unknown\n"));
        assert!(message.ends_with("channel types: private_text"));
    }

    #[test]
    fn test_quoted_code_and_arguments() {
        let mut tree = CommandTree::new(RootSpec::new("!", [" "])).unwrap();
        let ar = tree.add_child(NodeId::ROOT, NodeSpec::new(["ar"])).unwrap();
        let add = tree.add_child(ar, NodeSpec::new(["add"])).unwrap();
        tree.register(
            add,
            HandlerSpec::new().params([Param::text("kw"), Param::text("resp")]),
            noop,
        )
        .unwrap();

        let resolution = tree.resolve(
            NodeId::ROOT,
            "ar add \"A B\" C",
            " ",
            ChannelKind::PrivateText,
            &ScopeMembership,
        );
        assert_eq!(
            resolution,
            Resolution::Matched {
                node: add,
                tokens: vec!["A B".into(), "C".into()]
            }
        );
    }
}
