//! Handler listings for help pages.

use jelly_core::{CommandScope, FeatureTag};
use serde::Serialize;

use super::handler::HandlerDescriptor;
use super::node::NodeId;
use super::tree::CommandTree;
use crate::error::TreeResult;

/// One handler as shown on a help page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerListing {
    /// Node the handler is registered on.
    #[serde(skip)]
    pub node: NodeId,
    /// Number of arguments.
    pub arity: usize,
    /// Usage through primary codes.
    pub usage: String,
    /// Usage through every code and alias combination.
    pub all_usages: Vec<String>,
    /// Handler description.
    pub description: String,
    /// Where the handler may run.
    pub scope: CommandScope,
    /// Feature tag, if any.
    pub feature: Option<FeatureTag>,
}

impl CommandTree {
    /// Lists the handlers under `node`.
    ///
    /// Without `recursive`, the node's own handlers are followed by those of
    /// its direct children. With it, the whole subtree is walked depth-first.
    /// Children are visited in their listing order and handlers by arity.
    pub fn list_handlers(&self, node: NodeId, recursive: bool) -> TreeResult<Vec<HandlerListing>> {
        let start = self.node_or_err(node)?;
        let mut out: Vec<HandlerListing> = start.handlers().map(|h| self.listing(h)).collect();

        if recursive {
            for child in self.children(node) {
                out.extend(self.list_handlers(child.id(), true)?);
            }
        } else {
            for child in self.children(node) {
                out.extend(child.handlers().map(|h| self.listing(h)));
            }
        }

        Ok(out)
    }

    fn listing(&self, handler: &HandlerDescriptor) -> HandlerListing {
        HandlerListing {
            node: handler.node(),
            arity: handler.arity(),
            usage: self.handler_usage(handler).to_string(),
            all_usages: self.handler_all_usages(handler).to_vec(),
            description: handler.description().to_string(),
            scope: handler.scope().clone(),
            feature: handler.feature(),
        }
    }
}
