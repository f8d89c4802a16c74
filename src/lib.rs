#![cfg_attr(docsrs, feature(doc_cfg))]
//! Read, write and update RDF graphs.
//!
//! [`RdfIoService`] parses Turtle, N-Triples, RDF/XML and JSON-LD into [`oxrdf`] triples and serializes them
//! again in those syntaxes or as an HTML page with RDFa attributes. JSON-LD output takes the expanded,
//! compacted or flattened form, or is compacted against a custom remote context, depending on the requested
//! profiles. Graphs are modified with SPARQL 1.1 Update.
//!
//! ```
//! use rdfio::{NamespaceMap, RdfIoService, RdfSyntax};
//! use std::sync::Arc;
//!
//! let service = RdfIoService::new(Arc::new(NamespaceMap::with_defaults())).unwrap();
//! let ttl = r#"<http://example.org/book> <http://purl.org/dc/terms/title> "A title" ."#;
//! let triples = service.read(ttl.as_bytes(), None, RdfSyntax::Turtle).unwrap();
//! let mut out = Vec::new();
//! service.write(triples.iter().map(|t| t.as_ref()), &mut out, RdfSyntax::Turtle, &[]).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("dcterms:title"));
//! ```
// # Optional features
// sophia: pretty printed Turtle using the Sophia serializer
// http: fetch remote JSON-LD contexts
// cli: the rdfio binary

pub mod config;
pub mod error;
pub mod html;
pub mod jsonld;
pub mod namespaces;
pub mod rdf_reader;
pub mod rdf_writer;
pub mod service;
#[cfg(feature = "sophia")]
pub mod sophia_term;
pub mod sparql;
pub mod syntax;
pub mod vocab;

pub use config::{HtmlConfig, IoConfig, JsonLdConfig};
pub use error::{Error, Result};
pub use html::HtmlSerializer;
pub use jsonld::{ContextLoader, JsonLdProfile, NoLoader, StaticLoader};
pub use namespaces::{NamespaceMap, NamespaceService};
pub use service::RdfIoService;
pub use syntax::RdfSyntax;
