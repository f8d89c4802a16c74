//! JSON-LD to triples through the `oxjsonld` parser shipped with `oxrdfio`.
use super::loader::ContextLoader;
use crate::rdf_reader::{collect_triples, parser};
use crate::syntax::RdfSyntax;
use log::debug;
use oxrdf::Triple;
use oxrdfio::{LoadedDocument, RdfFormat};
use std::io::{BufReader, Read};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn load_document(loader: &dyn ContextLoader, iri: &str) -> Result<LoadedDocument, BoxError> {
    debug!("loading remote JSON-LD document {iri}");
    let document = loader.load(iri)?;
    Ok(LoadedDocument {
        url: iri.to_owned(),
        content: serde_json::to_vec(&document)?,
        format: RdfFormat::JsonLd { profile: oxrdfio::JsonLdProfile::Context.into() },
    })
}

/// Parses a JSON-LD document into triples.
/// Relative IRIs resolve against `base`, remote contexts are fetched through `loader`.
/// Named graphs are merged into the default graph.
pub fn read_jsonld(input: impl Read, base: Option<&str>, loader: Arc<dyn ContextLoader>) -> crate::Result<Vec<Triple>> {
    let loader = AssertUnwindSafe(loader);
    let quads = parser(base, RdfSyntax::JsonLd)?
        .for_reader(BufReader::new(input))
        .with_document_loader(move |iri| load_document(&**loader, iri));
    collect_triples(quads, RdfSyntax::JsonLd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::jsonld::loader::{NoLoader, StaticLoader};
    use crate::tests::{FailingReader, init};
    use color_eyre::Result;
    use oxrdf::vocab::{rdf, xsd};
    use oxrdf::{Literal, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    const TITLE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");

    fn read(document: Value, base: Option<&str>) -> crate::Result<Vec<Triple>> {
        read_jsonld(document.to_string().as_bytes(), base, Arc::new(NoLoader))
    }

    fn objects<'a>(triples: &'a [Triple], predicate: &str) -> Vec<TermRef<'a>> {
        triples.iter().filter(|t| t.predicate.as_str() == predicate).map(|t| t.object.as_ref()).collect()
    }

    #[test]
    fn compacted_with_base() -> Result<()> {
        init();
        let triples = read(
            json!({
                "@context": {
                    "dcterms": "http://purl.org/dc/terms/",
                    "title": "dcterms:title",
                    "spatial": {"@id": "dcterms:spatial", "@type": "@id"},
                    "id": "@id",
                    "type": "@type",
                },
                "id": "resource",
                "type": "http://purl.org/dc/dcmitype/Text",
                "title": "A title",
                "spatial": "http://sws.geonames.org/4929022/",
                "unmapped": "dropped",
            }),
            Some("http://example.org/repository/"),
        )?;
        assert_eq!(3, triples.len());
        let subject = NamedNode::new("http://example.org/repository/resource")?;
        assert!(triples.contains(&Triple::new(subject.clone(), TITLE, Literal::new_simple_literal("A title"))));
        assert!(triples.contains(&Triple::new(
            subject.clone(),
            NamedNode::new("http://purl.org/dc/terms/spatial")?,
            NamedNode::new("http://sws.geonames.org/4929022/")?,
        )));
        assert!(triples.contains(&Triple::new(subject, rdf::TYPE, NamedNode::new("http://purl.org/dc/dcmitype/Text")?)));
        Ok(())
    }

    #[test]
    fn expanded_values() -> Result<()> {
        let triples = read(
            json!([{
                "@id": "http://example.org/s",
                "http://example.org/p": [
                    {"@value": "Titel", "@language": "de"},
                    {"@value": "5", "@type": "http://www.w3.org/2001/XMLSchema#integer"},
                    {"@value": true},
                    7,
                    {"@id": "_:b"},
                ],
            }]),
            None,
        )?;
        let objects = objects(&triples, "http://example.org/p");
        assert_eq!(5, objects.len());
        assert!(objects.contains(&TermRef::from(LiteralRef::new_language_tagged_literal_unchecked("Titel", "de"))));
        assert!(objects.contains(&TermRef::from(LiteralRef::new_typed_literal("5", xsd::INTEGER))));
        assert!(objects.contains(&TermRef::from(LiteralRef::new_typed_literal("true", xsd::BOOLEAN))));
        assert!(objects.contains(&TermRef::from(LiteralRef::new_typed_literal("7", xsd::INTEGER))));
        assert_eq!(1, objects.iter().filter(|o| o.is_blank_node()).count());
        Ok(())
    }

    #[test]
    fn blank_node_labels() -> Result<()> {
        let triples = read(
            json!({"@graph": [
                {"@id": "_:a", "http://example.org/knows": {"@id": "_:b"}},
                {"@id": "_:b", "http://example.org/knows": {"@id": "_:a"}},
            ]}),
            None,
        )?;
        assert_eq!(2, triples.len());
        assert_eq!(Term::from(triples[0].subject.clone()), triples[1].object);
        assert_eq!(Term::from(triples[1].subject.clone()), triples[0].object);
        assert_ne!(triples[0].subject, triples[1].subject);
        Ok(())
    }

    #[test]
    fn nested_nodes_and_lists() -> Result<()> {
        let triples = read(
            json!({
                "@context": {
                    "@vocab": "http://schema.org/",
                    "steps": {"@container": "@list"},
                    "tags": {"@container": "@set"},
                },
                "@id": "http://example.org/recipe",
                "author": {"name": "Alice"},
                "steps": ["mix", "bake"],
                "tags": ["easy"],
                "empty": {"@list": []},
            }),
            None,
        )?;
        let author = objects(&triples, "http://schema.org/author");
        assert_eq!(1, author.len());
        assert!(author[0].is_blank_node());
        assert_eq!(vec![TermRef::from(LiteralRef::new_simple_literal("Alice"))], objects(&triples, "http://schema.org/name"));
        assert_eq!(vec![TermRef::from(LiteralRef::new_simple_literal("easy"))], objects(&triples, "http://schema.org/tags"));
        assert_eq!(vec![TermRef::from(rdf::NIL)], objects(&triples, "http://schema.org/empty"));
        let firsts = objects(&triples, rdf::FIRST.as_str());
        assert_eq!(2, firsts.len());
        assert!(firsts.contains(&TermRef::from(LiteralRef::new_simple_literal("mix"))));
        assert!(firsts.contains(&TermRef::from(LiteralRef::new_simple_literal("bake"))));
        assert_eq!(2, objects(&triples, rdf::REST.as_str()).len());
        Ok(())
    }

    #[test]
    fn languages() -> Result<()> {
        let triples = read(
            json!({
                "@context": {
                    "@language": "en",
                    "label": "http://www.w3.org/2000/01/rdf-schema#label",
                    "code": {"@id": "http://example.org/code", "@language": null},
                    "names": {"@id": "http://example.org/name", "@container": "@language"},
                },
                "@id": "http://example.org/s",
                "label": "colour",
                "code": "x1",
                "names": {"de": "Farbe", "fr": ["couleur"]},
            }),
            None,
        )?;
        assert_eq!(
            vec![TermRef::from(LiteralRef::new_language_tagged_literal_unchecked("colour", "en"))],
            objects(&triples, "http://www.w3.org/2000/01/rdf-schema#label")
        );
        assert_eq!(vec![TermRef::from(LiteralRef::new_simple_literal("x1"))], objects(&triples, "http://example.org/code"));
        assert_eq!(2, objects(&triples, "http://example.org/name").len());
        Ok(())
    }

    #[test]
    fn remote_context() -> Result<()> {
        let loader = StaticLoader::new()
            .with_document("http://example.org/ctx.jsonld", json!({"@context": {"title": "http://purl.org/dc/terms/title"}}));
        let json = r#"{"@context": "http://example.org/ctx.jsonld", "@id": "http://example.org/s", "title": "A title"}"#;
        let triples = read_jsonld(json.as_bytes(), None, Arc::new(loader))?;
        assert_eq!(vec![TermRef::from(LiteralRef::new_simple_literal("A title"))], objects(&triples, TITLE.as_str()));
        Ok(())
    }

    #[test]
    fn errors() {
        let parse_error = |r: crate::Result<Vec<Triple>>| matches!(r, Err(Error::Parse { syntax: RdfSyntax::JsonLd, .. }));
        assert!(parse_error(read_jsonld("{".as_bytes(), None, Arc::new(NoLoader))));
        assert!(matches!(read_jsonld(FailingReader, None, Arc::new(NoLoader)), Err(Error::Io(_))));
        let relative = read_jsonld("{}".as_bytes(), Some("relative"), Arc::new(NoLoader));
        assert!(matches!(relative, Err(Error::InvalidIri { .. })));
        assert!(parse_error(read(json!({"@context": "http://example.org/ctx", "@id": "http://example.org/s"}), None)));
        assert!(parse_error(read(json!({"@context": {"a": "b:x", "b": "a:y"}}), None)));
    }
}
