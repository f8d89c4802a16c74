use crate::error::{Error, Result};
use crate::syntax::RdfSyntax;
use log::{debug, warn};
use oxrdf::{GraphName, Quad, Triple};
use oxrdfio::{RdfParseError, RdfParser};
use std::io::{BufReader, Read};

/// Parses Turtle, N-Triples, RDF/XML or JSON-LD into triples.
/// Relative IRIs resolve against `base`. Named graphs are merged into the default graph.
/// JSON-LD read this way cannot load remote contexts, see [`crate::jsonld::read_jsonld`].
pub fn read_triples(input: impl Read, base: Option<&str>, syntax: RdfSyntax) -> Result<Vec<Triple>> {
    let parser = parser(base, syntax)?;
    collect_triples(parser.for_reader(BufReader::new(input)), syntax)
}

pub(crate) fn parser(base: Option<&str>, syntax: RdfSyntax) -> Result<RdfParser> {
    let Some(format) = syntax.oxrdfio_format() else {
        return Err(Error::UnsupportedSyntax(syntax));
    };
    let mut parser = RdfParser::from_format(format);
    if let Some(base) = base {
        parser = parser.with_base_iri(base).map_err(|e| Error::InvalidIri { iri: base.to_owned(), e })?;
    }
    Ok(parser)
}

pub(crate) fn collect_triples(
    quads: impl Iterator<Item = core::result::Result<Quad, RdfParseError>>, syntax: RdfSyntax,
) -> Result<Vec<Triple>> {
    let timer = std::time::Instant::now();
    let mut triples = Vec::new();
    let mut warned = false;
    for q in quads {
        let q = match q {
            Ok(q) => q,
            Err(RdfParseError::Io(e)) => return Err(Error::Io(e)),
            Err(e) => return Err(Error::Parse { syntax, e }),
        };
        if !warned && q.graph_name != GraphName::DefaultGraph {
            warned = true;
            warn!("named graphs are not supported, merging {} into the default graph", q.graph_name);
        }
        triples.push(Triple::from(q));
    }
    debug!("read {} {syntax} triples in {:?}", triples.len(), timer.elapsed());
    Ok(triples)
}
