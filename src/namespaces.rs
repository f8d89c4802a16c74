//! Prefix to namespace bindings used to shorten IRIs in Turtle, RDF/XML, JSON-LD and HTML output.
use crate::error::{Error, Result};
use crate::vocab::DEFAULT_NAMESPACES;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Lookup and registration of namespace prefixes.
pub trait NamespaceService: Send + Sync {
    /// All bindings, keyed by prefix.
    fn namespaces(&self) -> BTreeMap<String, String>;

    /// The prefix bound to the given namespace, if any.
    fn prefix(&self, namespace: &str) -> Option<String>;

    /// Binds `prefix` to `namespace` unless either one is already bound.
    /// Returns whether the binding was added.
    fn set_prefix(&self, prefix: &str, namespace: &str) -> Result<bool>;
}

impl std::fmt::Debug for dyn NamespaceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.namespaces()).finish()
    }
}

#[derive(Debug, Default)]
struct Bindings {
    by_prefix: BTreeMap<String, String>,
    by_namespace: BTreeMap<String, String>,
}

impl Bindings {
    fn is_bound(&self, prefix: &str, namespace: &str) -> bool {
        self.by_prefix.contains_key(prefix) || self.by_namespace.contains_key(namespace)
    }

    fn bind(&mut self, prefix: &str, namespace: &str) -> bool {
        if self.is_bound(prefix, namespace) {
            return false;
        }
        self.by_prefix.insert(prefix.to_owned(), namespace.to_owned());
        self.by_namespace.insert(namespace.to_owned(), prefix.to_owned());
        true
    }
}

/// In-memory namespace service, optionally persisted as a JSON object of prefix to namespace.
#[derive(Debug, Default)]
pub struct NamespaceMap {
    bindings: RwLock<Bindings>,
    path: Option<PathBuf>,
}

impl NamespaceMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Common vocabularies such as `rdf`, `dcterms` and `skos`.
    pub fn with_defaults() -> Self {
        DEFAULT_NAMESPACES.into_iter().collect()
    }

    /// Loads the bindings from a JSON file.
    /// A missing file starts from the defaults and is created by the first successful [`NamespaceService::set_prefix`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut map = if path.exists() {
            let json = fs_err::read_to_string(path)?;
            let entries: BTreeMap<String, String> = serde_json::from_str(&json)
                .map_err(|e| Error::Config(format!("invalid namespace file {}: {e}", path.display())))?;
            debug!("loaded {} namespaces from {}", entries.len(), path.display());
            entries.iter().map(|(p, n)| (p.as_str(), n.as_str())).collect()
        } else {
            debug!("namespace file {} not found, using defaults", path.display());
            Self::with_defaults()
        };
        map.path = Some(path.to_owned());
        Ok(map)
    }

    fn persist(&self, by_prefix: &BTreeMap<String, String>) -> Result<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(by_prefix)
                .map_err(|e| Error::Config(format!("cannot encode namespaces: {e}")))?;
            fs_err::write(path, json)?;
        }
        Ok(())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for NamespaceMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut bindings = Bindings::default();
        for (prefix, namespace) in iter {
            if !bindings.bind(prefix, namespace) {
                warn!("ignoring duplicate namespace binding {prefix}: <{namespace}>");
            }
        }
        NamespaceMap { bindings: RwLock::new(bindings), path: None }
    }
}

impl NamespaceService for NamespaceMap {
    fn namespaces(&self) -> BTreeMap<String, String> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner).by_prefix.clone()
    }

    fn prefix(&self, namespace: &str) -> Option<String> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner).by_namespace.get(namespace).cloned()
    }

    /// The binding is only kept in memory once it has been written to the file, if there is one.
    fn set_prefix(&self, prefix: &str, namespace: &str) -> Result<bool> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        if bindings.is_bound(prefix, namespace) {
            return Ok(false);
        }
        let mut by_prefix = bindings.by_prefix.clone();
        by_prefix.insert(prefix.to_owned(), namespace.to_owned());
        self.persist(&by_prefix)?;
        bindings.bind(prefix, namespace);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::init;
    use color_eyre::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn bind_once() -> Result<()> {
        init();
        let map = NamespaceMap::new();
        assert!(map.set_prefix("ex", "http://example.org/")?);
        assert!(!map.set_prefix("ex", "http://example.com/")?, "prefix already bound");
        assert!(!map.set_prefix("other", "http://example.org/")?, "namespace already bound");
        assert_eq!(Some("ex".to_owned()), map.prefix("http://example.org/"));
        assert_eq!(None, map.prefix("http://example.com/"));
        assert_eq!(1, map.namespaces().len());
        Ok(())
    }

    #[test]
    fn defaults() {
        let map = NamespaceMap::with_defaults();
        assert_eq!(Some("dcterms".to_owned()), map.prefix("http://purl.org/dc/terms/"));
        assert_eq!(Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#"), map.namespaces().get("rdf").map(String::as_str));
    }

    #[test]
    fn file_roundtrip() -> Result<()> {
        init();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("namespaces.json");
        let map = NamespaceMap::from_file(&path)?;
        assert!(!path.exists());
        assert!(map.set_prefix("ex", "http://example.org/")?);
        assert!(path.exists());

        let reloaded = NamespaceMap::from_file(&path)?;
        assert_eq!(map.namespaces(), reloaded.namespaces());
        assert_eq!(Some("ex".to_owned()), reloaded.prefix("http://example.org/"));
        Ok(())
    }

    #[test]
    fn failed_persist_keeps_nothing() -> Result<()> {
        init();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing").join("namespaces.json");
        let map = NamespaceMap::from_file(&path)?;
        assert!(matches!(map.set_prefix("ex", "http://example.org/"), Err(Error::Io(_))));
        assert_eq!(None, map.prefix("http://example.org/"));
        assert!(!map.namespaces().contains_key("ex"));

        fs_err::create_dir(dir.path().join("missing"))?;
        assert!(map.set_prefix("ex", "http://example.org/")?);
        assert!(path.exists());
        assert_eq!(Some("ex".to_owned()), NamespaceMap::from_file(&path)?.prefix("http://example.org/"));
        Ok(())
    }

    #[test]
    fn poisoned_lock_keeps_bindings() {
        let map = std::sync::Arc::new(NamespaceMap::with_defaults());
        let poisoner = map.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.bindings.write();
            panic!("poison the lock");
        })
        .join();
        assert!(map.bindings.is_poisoned());
        assert_eq!(Some("dcterms".to_owned()), map.prefix("http://purl.org/dc/terms/"));
        assert_eq!(DEFAULT_NAMESPACES.len(), map.namespaces().len());
        assert!(matches!(map.set_prefix("ex", "http://example.org/"), Ok(true)));
    }

    #[test]
    fn invalid_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("namespaces.json");
        fs_err::write(&path, "[1, 2]")?;
        assert!(matches!(NamespaceMap::from_file(&path), Err(Error::Config(_))));
        Ok(())
    }
}
