//! JSON-LD reading and writing on top of [`serde_json`].
//!
//! Writing groups triples into flat node objects and shapes them by profile: expanded, compacted against a
//! context generated from the namespace prefixes, flattened, or compacted against a custom remote context.
//! Reading goes through the `oxjsonld` parser of `oxrdfio`, with remote contexts served by a [`ContextLoader`].
mod compact;
pub mod context;
pub mod loader;
mod node_map;
mod reader;
mod writer;

pub use context::Context;
pub use reader::read_jsonld;
pub use loader::{ContextLoader, NoLoader, StaticLoader};
#[cfg(feature = "http")]
pub use loader::HttpLoader;
pub use writer::JsonLdWriter;

use crate::config::JsonLdConfig;
use crate::vocab::{JSONLD_COMPACTED, JSONLD_FLATTENED, JSONLD_NAMESPACE};
use log::debug;
use oxrdf::NamedNodeRef;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to load context {iri}")]
    LoadingContext {
        iri: String,
        #[source]
        e: Box<dyn std::error::Error + Send + Sync>,
    },
    #[cfg(feature = "http")]
    #[error("cannot build the HTTP client")]
    HttpClient(#[source] reqwest::Error),
    #[error("recursive inclusion of context {0}")]
    RecursiveContext(String),
    #[error("invalid local context: {0}")]
    InvalidContext(String),
    #[error("invalid IRI {iri}")]
    InvalidIri {
        iri: String,
        #[source]
        e: oxiri::IriParseError,
    },
    #[error("cyclic IRI mapping involving term {0:?}")]
    CyclicIriMapping(String),
    #[error("invalid term definition for {0:?}")]
    InvalidTermDefinition(String),
    #[error("invalid IRI mapping for term {0:?}")]
    InvalidIriMapping(String),
}

/// Shape of written JSON-LD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonLdProfile {
    Expanded,
    Compacted,
    Flattened,
    /// Compacted against the context document at this IRI.
    Custom(String),
}

/// Picks the output shape for the requested profile IRIs.
///
/// The first profile outside the JSON-LD namespace is used as a custom context if `config` allows it.
/// Otherwise flattened wins over compacted, which wins over the expanded default.
pub fn select_profile(profiles: &[NamedNodeRef<'_>], config: &JsonLdConfig) -> JsonLdProfile {
    if let Some(custom) = profiles.iter().find(|p| !p.as_str().starts_with(JSONLD_NAMESPACE)) {
        if config.allows(custom.as_str()) {
            return JsonLdProfile::Custom(custom.as_str().to_owned());
        }
        debug!("context {custom} is not in the allowed contexts or domains");
    }
    if profiles.contains(&JSONLD_FLATTENED) {
        JsonLdProfile::Flattened
    } else if profiles.contains(&JSONLD_COMPACTED) {
        JsonLdProfile::Compacted
    } else {
        JsonLdProfile::Expanded
    }
}
