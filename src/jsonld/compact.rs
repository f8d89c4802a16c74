//! Compaction of flat expanded node objects against an active context.
use super::context::{Container, Context, TermDefinition};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Fit {
    /// The value compacts to a scalar under this term.
    Exact,
    /// The term fits, but the value keeps its object form.
    Generic,
}

impl Context {
    /// The shortest term aliasing `keyword`, or the keyword itself.
    fn alias<'a>(&'a self, keyword: &'a str) -> &'a str {
        self.terms
            .iter()
            .filter(|(_, d)| d.iri.as_deref() == Some(keyword))
            .map(|(term, _)| term.as_str())
            .min_by_key(|term| (term.len(), *term))
            .unwrap_or(keyword)
    }

    fn effective_language<'a>(&'a self, definition: &'a TermDefinition) -> Option<&'a str> {
        match &definition.language {
            Some(language) => language.as_deref(),
            None => self.language.as_deref(),
        }
    }

    fn fit(&self, definition: &TermDefinition, value: &Map<String, Value>) -> Option<Fit> {
        let type_mapping = definition.type_mapping.as_deref();
        let generic = (type_mapping.is_none() && definition.language.is_none()).then_some(Fit::Generic);
        if value.contains_key("@id") {
            return if matches!(type_mapping, Some("@id" | "@vocab")) { Some(Fit::Exact) } else { generic };
        }
        if let Some(datatype) = value.get("@type").and_then(Value::as_str) {
            return if type_mapping == Some(datatype) { Some(Fit::Exact) } else { generic };
        }
        let language = value.get("@language").and_then(Value::as_str);
        let same_language = match (language, self.effective_language(definition)) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a.is_none() && b.is_none(),
        };
        if type_mapping.is_none() && same_language { Some(Fit::Exact) } else { generic }
    }

    /// Term for `property` best suited to `value`: exact fits first, then shorter, then lexically smaller terms.
    /// Terms with list, language or index containers are never chosen.
    fn select_term(&self, property: &str, value: &Map<String, Value>) -> Option<(&str, &TermDefinition)> {
        self.terms
            .iter()
            .filter(|(_, d)| d.iri.as_deref() == Some(property) && d.container.iter().all(|c| *c == Container::Set))
            .filter_map(|(term, d)| self.fit(d, value).map(|fit| (fit, term.as_str(), d)))
            .min_by_key(|(fit, term, _)| (*fit, term.len(), *term))
            .map(|(_, term, d)| (term, d))
    }

    /// Shortens an IRI: to a term (`vocab` only), to a `@vocab` relative name (`vocab` only) or to a compact IRI.
    pub(crate) fn compact_iri(&self, iri: &str, vocab: bool) -> String {
        if iri.starts_with("_:") {
            return iri.to_owned();
        }
        if vocab {
            let term = self
                .terms
                .iter()
                .filter(|(_, d)| d.iri.as_deref() == Some(iri))
                .map(|(term, _)| term.as_str())
                .min_by_key(|term| (term.len(), *term));
            if let Some(term) = term {
                return term.to_owned();
            }
        }
        self.compact_iri_without_terms(iri, vocab)
    }

    /// Like [`Context::compact_iri`] but never returns a term, whose coercion may not suit the value.
    fn compact_iri_without_terms(&self, iri: &str, vocab: bool) -> String {
        if vocab
            && let Some(suffix) = self.vocab.as_deref().and_then(|v| iri.strip_prefix(v))
            && !suffix.is_empty()
            && !suffix.contains(':')
            && !self.terms.contains_key(suffix)
        {
            return suffix.to_owned();
        }
        self.terms
            .iter()
            .filter(|(_, d)| d.prefix)
            .filter_map(|(term, d)| {
                let suffix = iri.strip_prefix(d.iri.as_deref()?)?;
                let compact = format!("{term}:{suffix}");
                // a term of the same name would shadow the compact IRI
                (!suffix.is_empty() && !self.terms.contains_key(&compact)).then_some(compact)
            })
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .unwrap_or_else(|| iri.to_owned())
    }

    fn compact_value(&self, definition: Option<&TermDefinition>, value: &Map<String, Value>) -> Value {
        let type_mapping = definition.and_then(|d| d.type_mapping.as_deref());
        if let Some(id) = value.get("@id").and_then(Value::as_str) {
            return match type_mapping {
                Some("@id") => Value::String(self.compact_iri(id, false)),
                Some("@vocab") => Value::String(self.compact_iri(id, true)),
                _ => {
                    let mut reference = Map::new();
                    reference.insert(self.alias("@id").to_owned(), Value::String(self.compact_iri(id, false)));
                    Value::Object(reference)
                }
            };
        }
        let literal = value.get("@value").cloned().unwrap_or(Value::Null);
        let mut object = Map::new();
        if let Some(datatype) = value.get("@type").and_then(Value::as_str) {
            if type_mapping == Some(datatype) {
                return literal;
            }
            object.insert(self.alias("@type").to_owned(), Value::String(self.compact_iri(datatype, true)));
        } else {
            let language = value.get("@language").and_then(Value::as_str);
            let effective = match definition {
                Some(d) => self.effective_language(d),
                None => self.language.as_deref(),
            };
            let same_language = match (language, effective) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (a, b) => a.is_none() && b.is_none(),
            };
            if type_mapping.is_none() && same_language {
                return literal;
            }
            if let Some(language) = language {
                object.insert(self.alias("@language").to_owned(), Value::String(language.to_owned()));
            }
        }
        object.insert(self.alias("@value").to_owned(), literal);
        Value::Object(object)
    }

    /// Compacts one node object as produced by the node map.
    pub(crate) fn compact_node(&self, node: &Map<String, Value>) -> Map<String, Value> {
        let mut compacted = Map::new();
        let mut properties: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        let mut sets = BTreeSet::new();
        for (key, values) in node {
            match key.as_str() {
                "@id" => {
                    if let Some(id) = values.as_str() {
                        compacted.insert(self.alias("@id").to_owned(), Value::String(self.compact_iri(id, false)));
                    }
                }
                "@type" => {
                    let mut types: Vec<Value> = values
                        .as_array()
                        .into_iter()
                        .flatten()
                        .filter_map(Value::as_str)
                        .map(|t| Value::String(self.compact_iri(t, true)))
                        .collect();
                    let types = if types.len() == 1 { types.remove(0) } else { Value::Array(types) };
                    compacted.insert(self.alias("@type").to_owned(), types);
                }
                property => {
                    for value in values.as_array().into_iter().flatten().filter_map(Value::as_object) {
                        let (name, definition) = match self.select_term(property, value) {
                            Some((term, definition)) => (term.to_owned(), Some(definition)),
                            None => (self.compact_iri_without_terms(property, true), None),
                        };
                        if definition.is_some_and(|d| d.has_container(Container::Set)) {
                            sets.insert(name.clone());
                        }
                        properties.entry(name).or_default().push(self.compact_value(definition, value));
                    }
                }
            }
        }
        for (name, mut values) in properties {
            let value = if values.len() == 1 && !sets.contains(&name) { values.remove(0) } else { Value::Array(values) };
            compacted.insert(name, value);
        }
        compacted
    }
}

/// Wraps compacted nodes into a document carrying `context` as its `@context`.
/// A single node is merged into the top-level object unless `flatten` asks for a `@graph`.
pub(crate) fn compact_document(
    context: &Context, nodes: &[Map<String, Value>], context_entry: Value, flatten: bool,
) -> Value {
    let mut compacted: Vec<Map<String, Value>> = nodes.iter().map(|n| context.compact_node(n)).collect();
    let mut document = Map::new();
    document.insert("@context".to_owned(), context_entry);
    if compacted.len() == 1 && !flatten {
        document.extend(compacted.remove(0));
    } else {
        let graph = compacted.into_iter().map(Value::Object).collect();
        document.insert(context.alias("@graph").to_owned(), Value::Array(graph));
    }
    Value::Object(document)
}
