use crate::config::IoConfig;
use crate::error::{Error, Result};
use crate::html::HtmlSerializer;
use crate::jsonld::{ContextLoader, JsonLdWriter, NoLoader, read_jsonld};
use crate::namespaces::NamespaceService;
use crate::rdf_reader::read_triples;
use crate::rdf_writer::write_triples;
use crate::sparql;
use crate::syntax::RdfSyntax;
use log::debug;
use oxrdf::{Graph, NamedNodeRef, Triple, TripleRef};
use std::io::{Read, Write};
use std::sync::Arc;

/// Reads, writes and updates RDF in every supported syntax, sharing one set of namespace prefixes.
#[derive(Debug)]
pub struct RdfIoService {
    namespaces: Arc<dyn NamespaceService>,
    jsonld: JsonLdWriter,
    html: HtmlSerializer,
}

fn default_loader(config: &IoConfig) -> Arc<dyn ContextLoader> {
    #[cfg(feature = "http")]
    {
        let timeout = std::time::Duration::from_secs(config.jsonld.fetch_timeout_secs);
        match crate::jsonld::HttpLoader::new(timeout) {
            Ok(loader) => return Arc::new(loader),
            Err(e) => log::warn!("{e}, remote JSON-LD contexts are disabled"),
        }
    }
    #[cfg(not(feature = "http"))]
    let _ = config;
    Arc::new(NoLoader)
}

impl RdfIoService {
    /// Service with the default configuration.
    pub fn new(namespaces: Arc<dyn NamespaceService>) -> Result<Self> {
        Self::with_config(namespaces, IoConfig::default())
    }

    /// Fails if the configured HTML template cannot be read or compiled.
    pub fn with_config(namespaces: Arc<dyn NamespaceService>, config: IoConfig) -> Result<Self> {
        let loader = default_loader(&config);
        let html = HtmlSerializer::new(&config.html, namespaces.clone())?;
        let jsonld = JsonLdWriter::new(config.jsonld, loader);
        Ok(RdfIoService { namespaces, jsonld, html })
    }

    /// Replaces how remote JSON-LD contexts are fetched, for reading and for custom profiles.
    #[must_use]
    pub fn with_context_loader(self, loader: Arc<dyn ContextLoader>) -> Self {
        let jsonld = JsonLdWriter::new(self.jsonld.config().clone(), loader);
        RdfIoService { jsonld, ..self }
    }

    pub fn namespaces(&self) -> &dyn NamespaceService {
        self.namespaces.as_ref()
    }

    /// Parses `input`, resolving relative IRIs against `base`.
    pub fn read(&self, input: impl Read, base: Option<&str>, syntax: RdfSyntax) -> Result<Vec<Triple>> {
        match syntax {
            RdfSyntax::JsonLd => read_jsonld(input, base, self.jsonld.loader()),
            RdfSyntax::RdfaHtml => Err(Error::UnsupportedSyntax(syntax)),
            _ => read_triples(input, base, syntax),
        }
    }

    /// Serializes `triples`.
    /// For JSON-LD the profiles select the document form, for HTML the first profile is the page subject.
    pub fn write<'a>(
        &self, triples: impl IntoIterator<Item = TripleRef<'a>>, out: impl Write, syntax: RdfSyntax,
        profiles: &[NamedNodeRef<'_>],
    ) -> Result<()> {
        debug!("writing {syntax} with profiles {profiles:?}");
        match syntax {
            RdfSyntax::JsonLd => self.jsonld.write(triples, out, profiles, &self.namespaces.namespaces()),
            RdfSyntax::RdfaHtml => self.html.write(triples, out, profiles.first().map(|p| p.as_str())),
            _ => write_triples(triples, out, syntax, &self.namespaces.namespaces()),
        }
    }

    /// Applies a SPARQL 1.1 Update to `graph`.
    pub fn update(&self, graph: &mut Graph, update: &str, base: Option<&str>) -> Result<()> {
        sparql::update(graph, update, base)
    }

    pub fn readable_syntaxes(&self) -> Vec<RdfSyntax> {
        RdfSyntax::ALL.into_iter().filter(|s| s.is_readable()).collect()
    }

    pub fn writable_syntaxes(&self) -> Vec<RdfSyntax> {
        RdfSyntax::ALL.to_vec()
    }
}
