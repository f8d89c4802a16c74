use crate::jsonld;
use crate::syntax::RdfSyntax;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Any failure while reading, writing or updating RDF.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error while exchanging RDF")]
    Io(#[from] std::io::Error),
    #[error("failed to parse {syntax} input")]
    Parse {
        syntax: RdfSyntax,
        #[source]
        e: oxrdfio::RdfParseError,
    },
    #[error("invalid IRI {iri}")]
    InvalidIri {
        iri: String,
        #[source]
        e: oxiri::IriParseError,
    },
    #[error("failed to serialize {syntax}: {msg}")]
    Serialize { syntax: RdfSyntax, msg: String },
    #[error("JSON-LD processing failed")]
    JsonLd(#[from] jsonld::Error),
    #[error("invalid HTML template")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("failed to render HTML")]
    Render(#[from] Box<handlebars::RenderError>),
    #[error("invalid SPARQL update")]
    UpdateSyntax(#[from] spargebra::SparqlSyntaxError),
    #[error("SPARQL update evaluation failed")]
    UpdateEvaluation(#[from] spareval::QueryEvaluationError),
    #[error("unsupported SPARQL update operation: {0}")]
    UnsupportedUpdate(String),
    #[error("{0} is not supported here")]
    UnsupportedSyntax(RdfSyntax),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<handlebars::TemplateError> for Error {
    fn from(e: handlebars::TemplateError) -> Self {
        Error::Template(Box::new(e))
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(e: handlebars::RenderError) -> Self {
        Error::Render(Box::new(e))
    }
}
