//! Active contexts: term definitions, `@vocab`, `@base` and default language, and IRI expansion against them.
use super::loader::ContextLoader;
use super::{Error, Result};
use log::debug;
use oxiri::Iri;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

const KEYWORDS: [&str; 23] = [
    "@base",
    "@container",
    "@context",
    "@direction",
    "@graph",
    "@id",
    "@import",
    "@included",
    "@index",
    "@json",
    "@language",
    "@list",
    "@nest",
    "@none",
    "@prefix",
    "@propagate",
    "@protected",
    "@reverse",
    "@set",
    "@type",
    "@value",
    "@version",
    "@vocab",
];

// context entries that are not term definitions
const CONTEXT_KEYWORDS: [&str; 8] =
    ["@base", "@direction", "@import", "@language", "@propagate", "@protected", "@version", "@vocab"];

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

// "@" followed by ALPHA only, reserved for future keywords and ignored
fn has_keyword_form(s: &str) -> bool {
    s.len() > 1 && s.starts_with('@') && s[1..].bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_absolute(s: &str) -> bool {
    Iri::parse(s).is_ok()
}

fn ends_with_gen_delim(iri: &str) -> bool {
    iri.ends_with(['/', '#', ':', '?', '[', ']', '@'])
}

/// Resolves `iri` against an optional base, failing if the result is not absolute.
pub(crate) fn resolve(base: Option<&str>, iri: &str) -> Result<String> {
    let resolved = match base {
        Some(base) => Iri::parse(base).and_then(|base| base.resolve(iri)).map(Iri::into_inner),
        None => Iri::parse(iri.to_owned()).map(Iri::into_inner),
    };
    resolved.map_err(|e| Error::InvalidIri { iri: iri.to_owned(), e })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Set,
    List,
    Language,
    Index,
    /// `@graph`, `@id` and `@type` maps, values are treated as if uncontained.
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermDefinition {
    /// Absolute IRI, blank node identifier or keyword. `None` if the term is mapped to null.
    pub iri: Option<String>,
    /// `@id`, `@vocab` or a datatype IRI.
    pub type_mapping: Option<String>,
    /// `Some(None)` for an explicit `"@language": null`.
    pub language: Option<Option<String>>,
    pub container: Vec<Container>,
    /// Whether the term may be used as the prefix of compact IRIs.
    pub prefix: bool,
}

impl TermDefinition {
    pub fn has_container(&self, container: Container) -> bool {
        self.container.contains(&container)
    }
}

/// An active context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub base: Option<String>,
    pub vocab: Option<String>,
    pub language: Option<String>,
    pub terms: BTreeMap<String, TermDefinition>,
}

impl Context {
    /// An empty context resolving relative IRIs against `base`.
    pub fn with_base(base: Option<&str>) -> Self {
        Context { base: base.map(str::to_owned), ..Default::default() }
    }

    /// Applies a local context, which may be an object, an IRI, `null` or an array of those, and returns the
    /// resulting active context. Remote contexts are retrieved through `loader`.
    pub fn process(&self, local: &Value, loader: &dyn ContextLoader) -> Result<Context> {
        self.process_with(local, loader, &mut Vec::new())
    }

    fn process_with(&self, local: &Value, loader: &dyn ContextLoader, remote: &mut Vec<String>) -> Result<Context> {
        let mut result = self.clone();
        let items = match local {
            Value::Array(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };
        for item in items {
            match item {
                Value::Null => result = Context::with_base(self.base.as_deref()),
                Value::String(iri) => {
                    let iri = resolve(result.base.as_deref(), iri)?;
                    if remote.contains(&iri) {
                        return Err(Error::RecursiveContext(iri));
                    }
                    let document = loader.load(&iri)?;
                    let Some(context) = document.get("@context") else {
                        return Err(Error::InvalidContext(format!("{iri} has no @context entry")));
                    };
                    debug!("processing remote context {iri}");
                    // nested references resolve against the remote document, whose @base is ignored
                    let base = result.base.replace(iri.clone());
                    remote.push(iri);
                    result = result.process_with(context, loader, remote)?;
                    result.base = base;
                    remote.pop();
                }
                Value::Object(map) => result.define(map)?,
                other => return Err(Error::InvalidContext(format!("unexpected context entry {other}"))),
            }
        }
        Ok(result)
    }

    fn define(&mut self, local: &Map<String, Value>) -> Result<()> {
        match local.get("@base") {
            None => {}
            Some(Value::Null) => self.base = None,
            Some(Value::String(base)) => self.base = Some(resolve(self.base.as_deref(), base)?),
            Some(_) => return Err(Error::InvalidContext("@base must be a string or null".to_owned())),
        }
        match local.get("@vocab") {
            None => {}
            Some(Value::Null) => self.vocab = None,
            Some(Value::String(vocab)) => self.vocab = self.expand_iri(vocab, true, true),
            Some(_) => return Err(Error::InvalidContext("@vocab must be a string or null".to_owned())),
        }
        match local.get("@language") {
            None => {}
            Some(Value::Null) => self.language = None,
            Some(Value::String(language)) => self.language = Some(language.to_ascii_lowercase()),
            Some(_) => return Err(Error::InvalidContext("@language must be a string or null".to_owned())),
        }
        let mut defined = HashMap::new();
        for term in local.keys().filter(|k| !CONTEXT_KEYWORDS.contains(&k.as_str())) {
            self.create_term_definition(local, term, &mut defined)?;
        }
        Ok(())
    }

    // `defined` maps terms of `local` to whether their definition is complete, so that terms can depend on
    // each other in any order and cycles are detected
    fn create_term_definition(
        &mut self, local: &Map<String, Value>, term: &str, defined: &mut HashMap<String, bool>,
    ) -> Result<()> {
        match defined.get(term) {
            Some(true) => return Ok(()),
            Some(false) => return Err(Error::CyclicIriMapping(term.to_owned())),
            None => {}
        }
        if term.is_empty() {
            return Err(Error::InvalidTermDefinition(term.to_owned()));
        }
        defined.insert(term.to_owned(), false);
        if term.starts_with('@') {
            // such as {"@type": {"@container": "@set"}}
            debug!("ignoring definition of {term}");
            defined.insert(term.to_owned(), true);
            return Ok(());
        }
        self.terms.remove(term);

        let empty = Map::new();
        let value = local.get(term).unwrap_or(&Value::Null);
        let (id, map, simple) = match value {
            Value::Null => (Some(value), &empty, false),
            Value::String(_) => (Some(value), &empty, true),
            Value::Object(map) => (map.get("@id"), map, false),
            _ => return Err(Error::InvalidTermDefinition(term.to_owned())),
        };

        let mut definition = TermDefinition::default();
        definition.iri = match id {
            Some(Value::Null) => None,
            Some(Value::String(id)) if id == term => Some(self.implicit_iri(local, term, defined)?),
            Some(Value::String(id)) => match self.expand_iri_defining(id, false, true, local, defined)? {
                Some(iri) if is_keyword(&iri) || iri.starts_with("_:") || is_absolute(&iri) => Some(iri),
                _ => return Err(Error::InvalidIriMapping(term.to_owned())),
            },
            Some(_) => return Err(Error::InvalidIriMapping(term.to_owned())),
            None => Some(self.implicit_iri(local, term, defined)?),
        };

        match map.get("@type") {
            None => {}
            Some(Value::String(t)) if matches!(t.as_str(), "@id" | "@vocab" | "@json" | "@none") => {
                definition.type_mapping = Some(t.clone());
            }
            Some(Value::String(t)) => match self.expand_iri_defining(t, false, true, local, defined)? {
                Some(iri) if is_absolute(&iri) => definition.type_mapping = Some(iri),
                _ => return Err(Error::InvalidTermDefinition(term.to_owned())),
            },
            Some(_) => return Err(Error::InvalidTermDefinition(term.to_owned())),
        }

        if let Some(container) = map.get("@container") {
            let values = match container {
                Value::Null => &[][..],
                Value::Array(values) => values.as_slice(),
                single => std::slice::from_ref(single),
            };
            for value in values {
                definition.container.push(match value.as_str() {
                    Some("@set") => Container::Set,
                    Some("@list") => Container::List,
                    Some("@language") => Container::Language,
                    Some("@index") => Container::Index,
                    Some(other) => {
                        debug!("treating {other} container of {term} as a plain value");
                        Container::Other
                    }
                    None => return Err(Error::InvalidTermDefinition(term.to_owned())),
                });
            }
        }

        match map.get("@language") {
            None => {}
            Some(Value::Null) => definition.language = Some(None),
            Some(Value::String(language)) => definition.language = Some(Some(language.to_ascii_lowercase())),
            Some(_) => return Err(Error::InvalidTermDefinition(term.to_owned())),
        }

        definition.prefix = match map.get("@prefix") {
            Some(Value::Bool(prefix)) => *prefix,
            Some(_) => return Err(Error::InvalidTermDefinition(term.to_owned())),
            None => simple && !term.contains(':') && definition.iri.as_deref().is_some_and(ends_with_gen_delim),
        };

        if map.contains_key("@reverse") {
            debug!("reverse property {term} is not supported and will be dropped");
            definition.iri = None;
        }

        self.terms.insert(term.to_owned(), definition);
        defined.insert(term.to_owned(), true);
        Ok(())
    }

    // IRI of a term definition without @id: a compact IRI, an absolute IRI or a @vocab relative one
    fn implicit_iri(&mut self, local: &Map<String, Value>, term: &str, defined: &mut HashMap<String, bool>) -> Result<String> {
        if let Some((prefix, suffix)) = term.split_once(':') {
            if prefix != "_" && !suffix.starts_with("//") {
                if local.contains_key(prefix) {
                    self.create_term_definition(local, prefix, defined)?;
                }
                if let Some(Some(iri)) = self.terms.get(prefix).map(|d| d.iri.as_deref()) {
                    return Ok(format!("{iri}{suffix}"));
                }
            }
            Ok(term.to_owned())
        } else if let Some(vocab) = &self.vocab {
            Ok(format!("{vocab}{term}"))
        } else {
            Err(Error::InvalidIriMapping(term.to_owned()))
        }
    }

    // IRI expansion while the local context is still being defined
    fn expand_iri_defining(
        &mut self, value: &str, document_relative: bool, vocab: bool, local: &Map<String, Value>,
        defined: &mut HashMap<String, bool>,
    ) -> Result<Option<String>> {
        if is_keyword(value) {
            return Ok(Some(value.to_owned()));
        }
        if local.contains_key(value) && defined.get(value) != Some(&true) {
            self.create_term_definition(local, value, defined)?;
        }
        if let Some((prefix, suffix)) = value.split_once(':')
            && prefix != "_"
            && !suffix.starts_with("//")
            && local.contains_key(prefix)
            && defined.get(prefix) != Some(&true)
        {
            self.create_term_definition(local, prefix, defined)?;
        }
        Ok(self.expand_iri(value, document_relative, vocab))
    }

    /// Expands a term, compact IRI, keyword alias or relative IRI.
    /// With `vocab`, terms and `@vocab` apply; with `document_relative`, relative IRIs resolve against `@base`.
    /// Returns `None` for values that expand to nothing, such as terms mapped to null.
    pub fn expand_iri(&self, value: &str, document_relative: bool, vocab: bool) -> Option<String> {
        if is_keyword(value) {
            return Some(value.to_owned());
        }
        if has_keyword_form(value) {
            return None;
        }
        if vocab && let Some(definition) = self.terms.get(value) {
            return definition.iri.clone();
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_owned());
            }
            if let Some(definition) = self.terms.get(prefix)
                && definition.prefix
                && let Some(iri) = &definition.iri
            {
                return Some(format!("{iri}{suffix}"));
            }
            if is_absolute(value) {
                return Some(value.to_owned());
            }
        }
        if vocab && let Some(v) = &self.vocab {
            return Some(format!("{v}{value}"));
        }
        if document_relative && let Some(base) = &self.base {
            return Some(resolve(Some(base), value).unwrap_or_else(|_| value.to_owned()));
        }
        Some(value.to_owned())
    }
}
