// Selector-indexed event delegation
pub mod config;
pub mod context;
pub mod dom;
pub mod events;
pub mod selector_set;

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::{Events, Target};
    pub use crate::dom::{
        Document, Dom, EventHost, Listener, ListenerOptions, ListenerTarget, NodeId, NodeType,
    };
    pub use crate::events::{
        Bindable, DelegatedEvent, DomEvent, EventBus, Handler, Method, Subscriber,
    };
    pub use crate::selector_set::{EntryId, SelectorSet};
    pub use crate::Error;
}

/// Announce the library. Installing a logger is left to the application.
pub fn init() -> Result<(), Error> {
    log::debug!("selector-delegate {VERSION}");
    Ok(())
}

/// Errors that can occur in the delegation engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Selector error in `{selector}`: {source}")]
    Selector {
        selector: String,
        #[source]
        source: dom::SelectorError,
    },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Unknown node")]
    UnknownNode,

    #[error("Unknown method: {0}")]
    UnknownMethod(String),
}
