use oxrdf::NamedNodeRef;

pub const JSONLD_NAMESPACE: &str = "http://www.w3.org/ns/json-ld#";
pub const JSONLD_EXPANDED: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/json-ld#expanded");
pub const JSONLD_COMPACTED: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/json-ld#compacted");
pub const JSONLD_FLATTENED: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/json-ld#flattened");

pub const SKOS_PREF_LABEL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#prefLabel");
pub const RDFS_LABEL: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label");
pub const DC_TERMS_TITLE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
pub const DC_TITLE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/title");
pub const SCHEMA_NAME: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://schema.org/name");
pub const FOAF_NAME: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/name");

/// Predicates whose literal objects can title an HTML page, most preferred first.
pub const TITLE_CANDIDATES: [NamedNodeRef<'_>; 6] =
    [SKOS_PREF_LABEL, RDFS_LABEL, DC_TERMS_TITLE, DC_TITLE, SCHEMA_NAME, FOAF_NAME];

pub const DEFAULT_NAMESPACES: [(&str, &str); 12] = [
    ("acl", "http://www.w3.org/ns/auth/acl#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("dcmitype", "http://purl.org/dc/dcmitype/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("ldp", "http://www.w3.org/ns/ldp#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];
