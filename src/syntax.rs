use std::fmt;

/// Serialization syntaxes understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfSyntax {
    /// Terse RDF Triple Language, prefixes applied.
    Turtle,
    /// Line based, no prefixes.
    NTriples,
    /// RDF/XML
    RdfXml,
    /// JSON-LD, shaped by the requested profile.
    JsonLd,
    /// Human readable HTML page with RDFa attributes, write only.
    RdfaHtml,
}

impl RdfSyntax {
    pub const ALL: [RdfSyntax; 5] =
        [RdfSyntax::Turtle, RdfSyntax::NTriples, RdfSyntax::RdfXml, RdfSyntax::JsonLd, RdfSyntax::RdfaHtml];

    pub const fn media_type(self) -> &'static str {
        match self {
            RdfSyntax::Turtle => "text/turtle",
            RdfSyntax::NTriples => "application/n-triples",
            RdfSyntax::RdfXml => "application/rdf+xml",
            RdfSyntax::JsonLd => "application/ld+json",
            RdfSyntax::RdfaHtml => "text/html",
        }
    }

    pub const fn file_extension(self) -> &'static str {
        match self {
            RdfSyntax::Turtle => "ttl",
            RdfSyntax::NTriples => "nt",
            RdfSyntax::RdfXml => "rdf",
            RdfSyntax::JsonLd => "jsonld",
            RdfSyntax::RdfaHtml => "html",
        }
    }

    /// Looks up a syntax by media type, ignoring case and parameters such as `;charset=utf-8`.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/x-turtle" => Some(RdfSyntax::Turtle),
            "text/plain" => Some(RdfSyntax::NTriples),
            "application/xml" => Some(RdfSyntax::RdfXml),
            "application/xhtml+xml" => Some(RdfSyntax::RdfaHtml),
            _ => Self::ALL.into_iter().find(|s| s.media_type() == essence),
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" => Some(RdfSyntax::Turtle),
            "nt" => Some(RdfSyntax::NTriples),
            "rdf" | "owl" | "xml" => Some(RdfSyntax::RdfXml),
            "jsonld" | "json" => Some(RdfSyntax::JsonLd),
            "html" | "htm" => Some(RdfSyntax::RdfaHtml),
            _ => None,
        }
    }

    /// HTML can only be written.
    pub const fn is_readable(self) -> bool {
        !matches!(self, RdfSyntax::RdfaHtml)
    }

    pub(crate) fn oxrdfio_format(self) -> Option<oxrdfio::RdfFormat> {
        match self {
            RdfSyntax::Turtle => Some(oxrdfio::RdfFormat::Turtle),
            RdfSyntax::NTriples => Some(oxrdfio::RdfFormat::NTriples),
            RdfSyntax::RdfXml => Some(oxrdfio::RdfFormat::RdfXml),
            RdfSyntax::JsonLd => Some(oxrdfio::RdfFormat::JsonLd { profile: oxrdfio::JsonLdProfileSet::empty() }),
            RdfSyntax::RdfaHtml => None,
        }
    }
}

impl fmt::Display for RdfSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RdfSyntax::Turtle => "Turtle",
            RdfSyntax::NTriples => "N-Triples",
            RdfSyntax::RdfXml => "RDF/XML",
            RdfSyntax::JsonLd => "JSON-LD",
            RdfSyntax::RdfaHtml => "HTML+RDFa",
        })
    }
}
