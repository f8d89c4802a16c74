//! Grouping of triples into flat, expanded node objects.
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{NamedOrBlankNodeRef, TermRef, TripleRef};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

fn node_id(node: NamedOrBlankNodeRef<'_>) -> String {
    match node {
        NamedOrBlankNodeRef::NamedNode(n) => n.as_str().to_owned(),
        NamedOrBlankNodeRef::BlankNode(b) => format!("_:{}", b.as_str()),
    }
}

/// Expanded form of an object: a node reference or a value object.
#[allow(unreachable_patterns)]
pub(crate) fn expanded_object(object: TermRef<'_>) -> Value {
    match object {
        TermRef::NamedNode(n) => json!({"@id": n.as_str()}),
        TermRef::BlankNode(b) => json!({"@id": format!("_:{}", b.as_str())}),
        TermRef::Literal(l) => match l.language() {
            Some(language) => json!({"@value": l.value(), "@language": language}),
            None if l.datatype() == xsd::STRING => json!({"@value": l.value()}),
            None => json!({"@value": l.value(), "@type": l.datatype().as_str()}),
        },
        other => json!({"@value": other.to_string()}),
    }
}

#[derive(Default)]
struct Node {
    types: Vec<String>,
    properties: BTreeMap<String, Vec<Value>>,
}

/// One node object per subject, sorted by `@id`. `rdf:type` IRIs become `@type`, other values keep their
/// first appearance order and duplicates are dropped.
pub(crate) fn node_map(triples: &[TripleRef<'_>]) -> Vec<Map<String, Value>> {
    let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
    for t in triples {
        let node = nodes.entry(node_id(t.subject)).or_default();
        if t.predicate == rdf::TYPE
            && let TermRef::NamedNode(class) = t.object
        {
            if !node.types.iter().any(|c| c == class.as_str()) {
                node.types.push(class.as_str().to_owned());
            }
            continue;
        }
        let value = expanded_object(t.object);
        let values = node.properties.entry(t.predicate.as_str().to_owned()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }
    nodes
        .into_iter()
        .map(|(id, node)| {
            let mut object = Map::new();
            object.insert("@id".to_owned(), Value::String(id));
            if !node.types.is_empty() {
                object.insert("@type".to_owned(), node.types.into_iter().map(Value::String).collect());
            }
            for (property, values) in node.properties {
                object.insert(property, Value::Array(values));
            }
            object
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode, Triple};
    use pretty_assertions::assert_eq;

    #[test]
    fn grouped_by_subject() {
        let s = NamedNode::new_unchecked("http://example.org/s");
        let b = BlankNode::new_unchecked("b1");
        let title = NamedNode::new_unchecked("http://purl.org/dc/terms/title");
        let triples = [
            Triple::new(s.clone(), title.clone(), Literal::new_simple_literal("A title")),
            Triple::new(s.clone(), title.clone(), Literal::new_simple_literal("A title")),
            Triple::new(s.clone(), rdf::TYPE, NamedNode::new_unchecked("http://purl.org/dc/dcmitype/Text")),
            Triple::new(s.clone(), NamedNode::new_unchecked("http://purl.org/dc/terms/subject"), b.clone()),
            Triple::new(b, title, Literal::new_typed_literal("5", xsd::INTEGER)),
        ];
        let refs: Vec<_> = triples.iter().map(Triple::as_ref).collect();
        let nodes: Vec<Value> = node_map(&refs).into_iter().map(Value::Object).collect();
        assert_eq!(
            json!([
                {
                    "@id": "_:b1",
                    "http://purl.org/dc/terms/title": [
                        {"@value": "5", "@type": "http://www.w3.org/2001/XMLSchema#integer"}
                    ]
                },
                {
                    "@id": "http://example.org/s",
                    "@type": ["http://purl.org/dc/dcmitype/Text"],
                    "http://purl.org/dc/terms/subject": [{"@id": "_:b1"}],
                    "http://purl.org/dc/terms/title": [{"@value": "A title"}]
                }
            ]),
            Value::Array(nodes)
        );
    }

    #[test]
    fn language_tags() {
        let literal = Literal::new_language_tagged_literal_unchecked("Titel", "de");
        assert_eq!(json!({"@value": "Titel", "@language": "de"}), expanded_object(literal.as_ref().into()));
    }
}
