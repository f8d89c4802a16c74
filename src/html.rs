//! HTML pages with RDFa attributes, rendered with [`handlebars`].
use crate::config::HtmlConfig;
use crate::error::Result;
use crate::namespaces::NamespaceService;
use crate::vocab::TITLE_CANDIDATES;
use handlebars::Handlebars;
use log::debug;
use oxrdf::vocab::xsd;
use oxrdf::{NamedOrBlankNodeRef, TermRef, TripleRef};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

const TEMPLATE: &str = "resource";
const DEFAULT_TEMPLATE: &str = include_str!("resource.hbs");

/// Renders triples as a human readable page.
pub struct HtmlSerializer {
    registry: Handlebars<'static>,
    namespaces: Arc<dyn NamespaceService>,
    css: Vec<String>,
    js: Vec<String>,
    icon: Option<String>,
}

impl std::fmt::Debug for HtmlSerializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlSerializer").field("css", &self.css).field("js", &self.js).field("icon", &self.icon).finish()
    }
}

#[derive(Serialize)]
struct Page<'a> {
    title: String,
    subject: Option<&'a str>,
    css: &'a [String],
    js: &'a [String],
    icon: Option<&'a str>,
    triples: Vec<Row<'a>>,
}

#[derive(Serialize)]
struct Row<'a> {
    subject: &'a str,
    subject_label: String,
    subject_is_iri: bool,
    predicate: &'a str,
    predicate_label: String,
    object: &'a str,
    object_label: String,
    object_is_iri: bool,
    object_is_literal: bool,
    object_language: Option<&'a str>,
    object_datatype: Option<&'a str>,
}

impl HtmlSerializer {
    /// Uses the template file from `config` if there is one, else the built-in page.
    pub fn new(config: &HtmlConfig, namespaces: Arc<dyn NamespaceService>) -> Result<Self> {
        let mut registry = Handlebars::new();
        match &config.template {
            Some(path) => {
                debug!("loading HTML template {}", path.display());
                let template = fs_err::read_to_string(path)?;
                registry.register_template_string(TEMPLATE, template)?;
            }
            None => registry.register_template_string(TEMPLATE, DEFAULT_TEMPLATE)?,
        }
        Ok(HtmlSerializer {
            registry,
            namespaces,
            css: config.css.clone(),
            js: config.js.clone(),
            icon: config.icon.clone(),
        })
    }

    /// Renders `triples` as one page about `subject`.
    pub fn write<'a>(
        &self, triples: impl IntoIterator<Item = TripleRef<'a>>, mut out: impl Write, subject: Option<&str>,
    ) -> Result<()> {
        let triples: Vec<TripleRef<'a>> = triples.into_iter().collect();
        let page = Page {
            title: title(&triples, subject),
            subject,
            css: &self.css,
            js: &self.js,
            icon: self.icon.as_deref(),
            triples: triples.iter().map(|t| self.row(*t)).collect(),
        };
        debug!("rendering {} triples as HTML", page.triples.len());
        self.registry.render_to_write(TEMPLATE, &page, &mut out)?;
        out.flush()?;
        Ok(())
    }

    fn row<'a>(&self, triple: TripleRef<'a>) -> Row<'a> {
        let (subject, subject_label, subject_is_iri) = match triple.subject {
            NamedOrBlankNodeRef::NamedNode(n) => (n.as_str(), self.label(n.as_str()), true),
            NamedOrBlankNodeRef::BlankNode(b) => (b.as_str(), format!("_:{}", b.as_str()), false),
        };
        let predicate = triple.predicate.as_str();
        let mut row = Row {
            subject,
            subject_label,
            subject_is_iri,
            predicate,
            predicate_label: self.label(predicate),
            object: "",
            object_label: String::new(),
            object_is_iri: false,
            object_is_literal: false,
            object_language: None,
            object_datatype: None,
        };
        match triple.object {
            TermRef::NamedNode(n) => {
                row.object = n.as_str();
                row.object_label = self.label(n.as_str());
                row.object_is_iri = true;
            }
            TermRef::BlankNode(b) => {
                row.object = b.as_str();
                row.object_label = format!("_:{}", b.as_str());
            }
            TermRef::Literal(l) => {
                row.object = l.value();
                row.object_label = l.value().to_owned();
                row.object_is_literal = true;
                row.object_language = l.language();
                if l.language().is_none() && l.datatype() != xsd::STRING {
                    row.object_datatype = Some(l.datatype().as_str());
                }
            }
            #[allow(unreachable_patterns)]
            _ => row.object_label = triple.object.to_string(),
        }
        row
    }

    /// `prefix:local` when the namespace has a prefix and the local part is not empty, else the IRI itself.
    fn label(&self, iri: &str) -> String {
        if let Some(split) = iri.rfind(['#', '/']) {
            let (namespace, local) = iri.split_at(split + 1);
            if !local.is_empty()
                && let Some(prefix) = self.namespaces.prefix(namespace)
            {
                return format!("{prefix}:{local}");
            }
        }
        iri.to_owned()
    }
}

/// First literal of the most preferred title predicate, triples about `subject` first.
fn title(triples: &[TripleRef<'_>], subject: Option<&str>) -> String {
    let about = |t: &TripleRef<'_>| match (subject, t.subject) {
        (Some(s), NamedOrBlankNodeRef::NamedNode(n)) => n.as_str() == s,
        _ => false,
    };
    let find = |filter: &dyn Fn(&TripleRef<'_>) -> bool| {
        TITLE_CANDIDATES.iter().find_map(|candidate| {
            triples.iter().filter(|&t| filter(t) && t.predicate == *candidate).find_map(|t| match t.object {
                TermRef::Literal(l) => Some(l.value().to_owned()),
                _ => None,
            })
        })
    };
    find(&about).or_else(|| find(&|_| true)).or_else(|| subject.map(str::to_owned)).unwrap_or_default()
}
