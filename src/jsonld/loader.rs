//! Retrieval of remote `@context` documents.
use super::{Error, Result};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// Loads remote JSON-LD documents, usually contexts, by IRI.
pub trait ContextLoader: Send + Sync {
    /// The parsed JSON document at `iri`.
    fn load(&self, iri: &str) -> Result<Value>;
}

/// Refuses every request, used when remote contexts must not be fetched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLoader;

impl ContextLoader for NoLoader {
    fn load(&self, iri: &str) -> Result<Value> {
        Err(Error::LoadingContext { iri: iri.to_owned(), e: "remote contexts are disabled".into() })
    }
}

/// Serves documents registered in advance, for offline use and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticLoader {
    documents: HashMap<String, Value>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `document` under `iri`, replacing any previous one.
    pub fn with_document(mut self, iri: impl Into<String>, document: Value) -> Self {
        self.documents.insert(iri.into(), document);
        self
    }

    /// Parses and registers a JSON document.
    pub fn with_json(self, iri: impl Into<String>, json: &str) -> Result<Self> {
        Ok(self.with_document(iri, serde_json::from_str(json)?))
    }
}

impl ContextLoader for StaticLoader {
    fn load(&self, iri: &str) -> Result<Value> {
        debug!("looking up static context {iri}");
        self.documents
            .get(iri)
            .cloned()
            .ok_or_else(|| Error::LoadingContext { iri: iri.to_owned(), e: "no such document".into() })
    }
}

/// Fetches contexts over HTTP(S) with a blocking client.
/// *This type is available only if rdfio is built with the `"http"` feature.*
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rdfio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::HttpClient)?;
        Ok(HttpLoader { client })
    }
}

#[cfg(feature = "http")]
impl ContextLoader for HttpLoader {
    fn load(&self, iri: &str) -> Result<Value> {
        let failed = |e: reqwest::Error| Error::LoadingContext { iri: iri.to_owned(), e: Box::new(e) };
        debug!("fetching context {iri}");
        let response = self
            .client
            .get(iri)
            .header(reqwest::header::ACCEPT, "application/ld+json, application/json;q=0.9")
            .send()
            .map_err(failed)?
            .error_for_status()
            .map_err(failed)?;
        let body = response.text().map_err(failed)?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn static_documents() -> color_eyre::Result<()> {
        let loader = StaticLoader::new().with_json("http://example.org/ctx", r#"{"@context": {"ex": "http://example.org/"}}"#)?;
        assert_eq!(json!({"@context": {"ex": "http://example.org/"}}), loader.load("http://example.org/ctx")?);
        assert!(matches!(loader.load("http://example.org/other"), Err(Error::LoadingContext { .. })));
        Ok(())
    }

    #[test]
    fn no_loader() {
        let e = NoLoader.load("http://example.org/ctx").unwrap_err();
        assert_eq!("failed to load context http://example.org/ctx", e.to_string());
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(StaticLoader::new().with_json("http://example.org/ctx", "{"), Err(Error::Json(_))));
    }
}
