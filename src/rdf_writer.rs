use crate::error::{Error, Result};
use crate::syntax::RdfSyntax;
use log::debug;
use oxrdf::TripleRef;
use oxrdfio::{RdfFormat, RdfSerializer};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};

/// Writes triples as N-Triples, Turtle or RDF/XML.
/// Turtle and RDF/XML declare every valid `namespaces` entry as a prefix.
pub fn write_triples<'a>(
    triples: impl IntoIterator<Item = TripleRef<'a>>, out: impl Write, syntax: RdfSyntax,
    namespaces: &BTreeMap<String, String>,
) -> Result<()> {
    match syntax {
        RdfSyntax::NTriples => stream(triples, out, RdfFormat::NTriples, &BTreeMap::new()),
        #[cfg(feature = "sophia")]
        RdfSyntax::Turtle => pretty_turtle(triples, out, namespaces),
        #[cfg(not(feature = "sophia"))]
        RdfSyntax::Turtle => stream(triples, out, RdfFormat::Turtle, namespaces),
        RdfSyntax::RdfXml => stream(triples, out, RdfFormat::RdfXml, namespaces),
        RdfSyntax::JsonLd | RdfSyntax::RdfaHtml => Err(Error::UnsupportedSyntax(syntax)),
    }
}

/// Turtle `PN_PREFIX`, restricted to ASCII.
pub(crate) fn is_valid_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !prefix.ends_with('.')
}

fn usable_prefixes(namespaces: &BTreeMap<String, String>) -> impl Iterator<Item = (&String, &String)> {
    namespaces.iter().filter(|(prefix, namespace)| {
        let valid = is_valid_prefix(prefix);
        if !valid {
            debug!("skipping prefix {prefix:?} for <{namespace}>");
        }
        valid
    })
}

fn stream<'a>(
    triples: impl IntoIterator<Item = TripleRef<'a>>, out: impl Write, format: RdfFormat,
    namespaces: &BTreeMap<String, String>,
) -> Result<()> {
    debug!("writing {format} as a stream");
    let mut serializer = RdfSerializer::from_format(format);
    for (prefix, namespace) in usable_prefixes(namespaces) {
        serializer = serializer
            .with_prefix(prefix.as_str(), namespace.as_str())
            .map_err(|e| Error::InvalidIri { iri: namespace.clone(), e })?;
    }
    let mut writer = serializer.for_writer(BufWriter::new(out));
    for triple in triples {
        writer.serialize_triple(triple)?;
    }
    writer.finish()?.flush()?;
    Ok(())
}

/// Buffers the whole graph to group triples by subject.
#[cfg(feature = "sophia")]
fn pretty_turtle<'a>(
    triples: impl IntoIterator<Item = TripleRef<'a>>, mut out: impl Write, namespaces: &BTreeMap<String, String>,
) -> Result<()> {
    use crate::sophia_term::OxTerm;
    use sophia::api::prefix::Prefix;
    use sophia::api::prelude::{Stringifier, TripleSerializer};
    use sophia::iri::Iri;
    use sophia::turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};
    use std::convert::Infallible;

    debug!("writing pretty Turtle");
    let prefixes = usable_prefixes(namespaces)
        .map(|(prefix, namespace)| {
            (Prefix::new_unchecked(prefix.clone().into_boxed_str()), Iri::new_unchecked(namespace.clone().into_boxed_str()))
        })
        .collect();
    let config = TurtleConfig::new().with_pretty(true).with_own_prefix_map(prefixes);
    let source = triples.into_iter().map(|t| {
        Ok::<_, Infallible>([OxTerm(t.subject.into()), OxTerm(t.predicate.into()), OxTerm(t.object)])
    });
    let turtle = TurtleSerializer::new_stringifier_with_config(config)
        .serialize_triples(source)
        .map_err(|e| Error::Serialize { syntax: RdfSyntax::Turtle, msg: e.to_string() })?
        .to_string();
    out.write_all(turtle.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf_reader::read_triples;
    use crate::tests::{FailingWriter, init};
    use color_eyre::Result;
    use oxrdf::{BlankNode, Literal, NamedNode, Triple};
    use pretty_assertions::assert_eq;

    fn triples() -> Vec<Triple> {
        let s = NamedNode::new_unchecked("http://example.org/repository/resource");
        let bnode = BlankNode::new_unchecked("b0");
        let title = NamedNode::new_unchecked("http://purl.org/dc/terms/title");
        vec![
            Triple::new(s.clone(), title.clone(), Literal::new_simple_literal("A title")),
            Triple::new(s.clone(), NamedNode::new_unchecked("http://purl.org/dc/terms/subject"), bnode.clone()),
            Triple::new(bnode, title, Literal::new_language_tagged_literal_unchecked("Titel", "de")),
            Triple::new(
                s,
                NamedNode::new_unchecked("http://purl.org/dc/terms/spatial"),
                NamedNode::new_unchecked("http://sws.geonames.org/4929022/"),
            ),
        ]
    }

    // the graphs only contain a single blank node, so its label can be dropped
    fn comparable(triples: &[Triple]) -> Vec<String> {
        let mut v: Vec<String> = triples
            .iter()
            .map(|t| {
                let [s, o] = [t.subject.to_string(), t.object.to_string()]
                    .map(|x| if x.starts_with("_:") { "_:x".to_owned() } else { x });
                format!("{s} {} {o}", t.predicate)
            })
            .collect();
        v.sort();
        v
    }

    fn namespaces() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("dcterms".to_owned(), "http://purl.org/dc/terms/".to_owned()),
            ("not a prefix".to_owned(), "http://example.org/ns#".to_owned()),
        ])
    }

    fn roundtrip(syntax: RdfSyntax) -> Result<String> {
        init();
        let triples = triples();
        let mut out = Vec::new();
        write_triples(triples.iter().map(Triple::as_ref), &mut out, syntax, &namespaces())?;
        let written = read_triples(out.as_slice(), None, syntax)?;
        assert_eq!(comparable(&triples), comparable(&written), "{syntax} output does not match the input");
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn ntriples() -> Result<()> {
        let nt = roundtrip(RdfSyntax::NTriples)?;
        assert!(!nt.contains("@prefix"));
        assert_eq!(4, nt.lines().filter(|l| !l.trim().is_empty()).count());
        Ok(())
    }

    #[test]
    fn turtle() -> Result<()> {
        let ttl = roundtrip(RdfSyntax::Turtle)?;
        assert!(ttl.contains("dcterms:title"), "{ttl}");
        assert!(!ttl.contains("not a prefix"));
        Ok(())
    }

    #[test]
    fn rdf_xml() -> Result<()> {
        let xml = roundtrip(RdfSyntax::RdfXml)?;
        assert!(xml.contains("xmlns:dcterms=\"http://purl.org/dc/terms/\""), "{xml}");
        Ok(())
    }

    #[test]
    fn prefix_names() {
        assert!(is_valid_prefix("dcterms"));
        assert!(is_valid_prefix("ex-1.a"));
        assert!(!is_valid_prefix(""));
        assert!(!is_valid_prefix("1ex"));
        assert!(!is_valid_prefix("ex."));
        assert!(!is_valid_prefix("not a prefix"));
    }

    #[test]
    fn write_error() {
        let triples = triples();
        for syntax in [RdfSyntax::NTriples, RdfSyntax::Turtle, RdfSyntax::RdfXml] {
            let result = write_triples(triples.iter().map(Triple::as_ref), FailingWriter, syntax, &namespaces());
            assert!(matches!(result, Err(Error::Io(_))), "{syntax} write error not reported");
        }
    }
}
