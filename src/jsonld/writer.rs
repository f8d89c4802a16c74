use super::compact::compact_document;
use super::context::{Context, is_keyword};
use super::loader::{ContextLoader, NoLoader};
use super::node_map::node_map;
use super::{JsonLdProfile, select_profile};
use crate::config::JsonLdConfig;
use log::{debug, warn};
use lru::LruCache;
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{NamedNodeRef, NamedOrBlankNodeRef, TermRef, TripleRef};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// Writes JSON-LD in the shape selected by the requested profiles.
/// Custom contexts are loaded once and kept in an LRU cache.
pub struct JsonLdWriter {
    config: JsonLdConfig,
    loader: Arc<dyn ContextLoader>,
    // None when caching is disabled
    cache: Option<Mutex<LruCache<String, Arc<Context>>>>,
}

impl std::fmt::Debug for JsonLdWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLdWriter").field("config", &self.config).finish_non_exhaustive()
    }
}

impl JsonLdWriter {
    pub fn new(config: JsonLdConfig, loader: Arc<dyn ContextLoader>) -> Self {
        let cache = NonZeroUsize::new(config.cache_size).map(|size| Mutex::new(LruCache::new(size)));
        JsonLdWriter { config, loader, cache }
    }

    pub fn config(&self) -> &JsonLdConfig {
        &self.config
    }

    pub fn loader(&self) -> Arc<dyn ContextLoader> {
        self.loader.clone()
    }

    /// Serializes `triples` as compact JSON.
    /// `namespaces` feeds the context generated for the compacted and flattened profiles.
    pub fn write<'a>(
        &self, triples: impl IntoIterator<Item = TripleRef<'a>>, mut out: impl Write, profiles: &[NamedNodeRef<'_>],
        namespaces: &BTreeMap<String, String>,
    ) -> crate::Result<()> {
        let triples: Vec<TripleRef<'a>> = triples.into_iter().collect();
        let nodes = node_map(&triples);
        let profile = select_profile(profiles, &self.config);
        debug!("writing {} JSON-LD nodes as {profile:?}", nodes.len());
        let document = match profile {
            JsonLdProfile::Expanded => Value::Array(nodes.into_iter().map(Value::Object).collect()),
            JsonLdProfile::Compacted => generated(&triples, &nodes, namespaces, false)?,
            JsonLdProfile::Flattened => generated(&triples, &nodes, namespaces, true)?,
            JsonLdProfile::Custom(iri) => match self.custom_context(&iri) {
                Ok(context) => compact_document(&context, &nodes, Value::String(iri), false),
                Err(e) => {
                    let cause = std::error::Error::source(&e).map(ToString::to_string).unwrap_or_default();
                    warn!("{e} ({cause}), falling back to a generated context");
                    generated(&triples, &nodes, namespaces, false)?
                }
            },
        };
        let json = serde_json::to_vec(&document).map_err(super::Error::from)?;
        out.write_all(&json)?;
        out.flush()?;
        Ok(())
    }

    // failures are not cached so that a context becoming reachable is picked up
    fn custom_context(&self, iri: &str) -> super::Result<Arc<Context>> {
        if let Some(cache) = &self.cache
            && let Some(context) = cache.lock().unwrap_or_else(PoisonError::into_inner).get(iri)
        {
            debug!("context cache hit for {iri}");
            return Ok(context.clone());
        }
        let context = Arc::new(Context::default().process(&Value::String(iri.to_owned()), self.loader.as_ref())?);
        if let Some(cache) = &self.cache {
            cache.lock().unwrap_or_else(PoisonError::into_inner).put(iri.to_owned(), context.clone());
        }
        Ok(context)
    }
}

fn generated(
    triples: &[TripleRef<'_>], nodes: &[Map<String, Value>], namespaces: &BTreeMap<String, String>, flatten: bool,
) -> crate::Result<Value> {
    let local = generate_context(triples, namespaces);
    let context = Context::default().process(&local, &NoLoader)?;
    Ok(compact_document(&context, nodes, local, flatten))
}

fn local_name(iri: &str) -> Option<&str> {
    let (_, local) = iri.rsplit_once(['#', '/'])?;
    (!local.is_empty()).then_some(local)
}

fn schemes<'a>(triples: &[TripleRef<'a>]) -> BTreeSet<&'a str> {
    let mut schemes = BTreeSet::new();
    for t in triples {
        let subject = match t.subject {
            NamedOrBlankNodeRef::NamedNode(n) => Some(n.as_str()),
            NamedOrBlankNodeRef::BlankNode(_) => None,
        };
        let object = match t.object {
            TermRef::NamedNode(n) => Some(n.as_str()),
            TermRef::Literal(l) => Some(l.datatype().as_str()),
            _ => None,
        };
        for iri in [subject, Some(t.predicate.as_str()), object].into_iter().flatten() {
            if let Some((scheme, _)) = iri.split_once(':') {
                schemes.insert(scheme);
            }
        }
    }
    schemes
}

#[derive(Default)]
struct Usage {
    resource: bool,
    plain: bool,
    datatypes: BTreeSet<String>,
}

/// Context with every namespace as a prefix and one term per predicate local name, coerced to `@id` or to
/// the shared datatype of the predicate's literals.
pub(crate) fn generate_context(triples: &[TripleRef<'_>], namespaces: &BTreeMap<String, String>) -> Value {
    let schemes = schemes(triples);
    let mut context = Map::new();
    for (prefix, namespace) in namespaces {
        if prefix.is_empty() || prefix.starts_with('@') || prefix.contains(':') {
            continue;
        }
        // a prefix named like the scheme of an IRI would capture that IRI when reading
        if schemes.contains(prefix.as_str()) {
            debug!("no prefix {prefix}, it is an IRI scheme in the data");
            continue;
        }
        context.insert(prefix.clone(), Value::String(namespace.clone()));
    }

    let mut order = Vec::new();
    let mut usage: BTreeMap<NamedNodeRef<'_>, Usage> = BTreeMap::new();
    for t in triples.iter().filter(|t| t.predicate != rdf::TYPE) {
        let entry = usage.entry(t.predicate).or_insert_with(|| {
            order.push(t.predicate);
            Usage::default()
        });
        match t.object {
            TermRef::Literal(l) if l.language().is_some() || l.datatype() == xsd::STRING => entry.plain = true,
            TermRef::Literal(l) => {
                entry.datatypes.insert(l.datatype().as_str().to_owned());
            }
            _ => entry.resource = true,
        }
    }

    for predicate in order {
        let Some(term) = local_name(predicate.as_str()) else { continue };
        if is_keyword(term) || term.starts_with('@') || term.contains(':') || context.contains_key(term) {
            debug!("no term for {predicate}");
            continue;
        }
        let Some(usage) = usage.get(&predicate) else { continue };
        let definition = if usage.resource {
            json!({"@id": predicate.as_str(), "@type": "@id"})
        } else if let (false, [datatype]) = (usage.plain, usage.datatypes.iter().collect::<Vec<_>>().as_slice()) {
            json!({"@id": predicate.as_str(), "@type": datatype})
        } else {
            Value::String(predicate.as_str().to_owned())
        };
        context.insert(term.to_owned(), definition);
    }
    Value::Object(context)
}
