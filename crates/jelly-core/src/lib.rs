//! # Jelly Core
//!
//! Foundation types for the Jelly command dispatch engine.
//!
//! This crate holds everything the dispatch engine and its collaborators need
//! to agree on, without pulling in the engine itself:
//!
//! - **Events and responses**: [`TextEvent`] in, [`Response`] out, with
//!   [`IntoResponses`] normalizing whatever a handler returns
//! - **Scopes**: [`ChannelKind`], [`CommandScope`] and the [`ScopeChecker`] seam
//! - **Arguments**: [`ParamKind`], [`Value`], [`Args`] and the
//!   [`ArgumentCoercion`] seam
//! - **Usage reporting**: [`FeatureTag`], [`UsageRecord`] and the
//!   [`UsageRecorder`] seam
//! - **Errors**: the per-message [`DispatchError`] taxonomy

pub mod channel;
pub mod error;
pub mod event;
pub mod feature;
pub mod response;
pub mod scope;
pub mod usage;
pub mod value;

pub use channel::ChannelKind;
pub use error::{ArgumentError, CoercionError, DispatchError, DispatchResult};
pub use event::TextEvent;
pub use feature::FeatureTag;
pub use response::{IntoResponses, Response};
pub use scope::{CommandScope, ScopeChecker, ScopeMembership};
pub use usage::{NoopUsageRecorder, UsageRecord, UsageRecorder};
pub use value::{ArgumentCoercion, Args, IDENTIFIER_LEN, Param, ParamKind, StandardCoercion, Value};
