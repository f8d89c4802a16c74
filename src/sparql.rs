//! SPARQL 1.1 Update on a single in-memory graph.
use crate::error::{Error, Result};
use log::debug;
use oxiri::Iri;
use oxrdf::{Graph, Term, TermRef, Triple};
use spareval::{DeleteInsertQuad, InternalQuad, QueryEvaluator, QueryableDataset};
use spargebra::algebra::{GraphPattern, GraphTarget};
use spargebra::term::{GraphName, GraphNamePattern, GroundQuad, GroundQuadPattern, GroundTerm, QuadPattern};
use spargebra::{GraphUpdateOperation, Update};
use std::convert::Infallible;

/// Read-only view of a graph as the default graph of a dataset without named graphs.
#[derive(Clone, Copy)]
pub struct GraphDataset<'a> {
    graph: &'a Graph,
}

impl<'a> GraphDataset<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        GraphDataset { graph }
    }
}

fn fits(pattern: Option<&Term>, term: TermRef<'_>) -> bool {
    pattern.is_none_or(|p| p.as_ref() == term)
}

impl<'a> QueryableDataset<'a> for GraphDataset<'a> {
    type InternalTerm = Term;
    type Error = Infallible;

    fn internal_quads_for_pattern(
        &self, subject: Option<&Term>, predicate: Option<&Term>, object: Option<&Term>,
        graph_name: Option<Option<&Term>>,
    ) -> impl Iterator<Item = std::result::Result<InternalQuad<Term>, Infallible>> + use<'a> {
        // only the default graph has triples
        let default_graph = matches!(graph_name, Some(None));
        let (subject, predicate, object) = (subject.cloned(), predicate.cloned(), object.cloned());
        let graph = self.graph;
        graph
            .iter()
            .filter(move |t| {
                default_graph
                    && fits(subject.as_ref(), t.subject.into())
                    && fits(predicate.as_ref(), t.predicate.into())
                    && fits(object.as_ref(), t.object)
            })
            .map(|t| {
                Ok(InternalQuad {
                    subject: t.subject.into_owned().into(),
                    predicate: t.predicate.into_owned().into(),
                    object: t.object.into_owned(),
                    graph_name: None,
                })
            })
    }

    fn internalize_term(&self, term: Term) -> std::result::Result<Term, Infallible> {
        Ok(term)
    }

    fn externalize_term(&self, term: Term) -> std::result::Result<Term, Infallible> {
        Ok(term)
    }
}

/// Applies a SPARQL 1.1 Update to `graph`, resolving relative IRIs such as `<>` against `base`.
///
/// Operations run in order. Each one is computed completely before the graph changes,
/// so a failing operation leaves the graph as the previous operations left it.
pub fn update(graph: &mut Graph, update: &str, base: Option<&str>) -> Result<()> {
    let update = Update::parse(update, base)?;
    for operation in &update.operations {
        debug!("applying {operation}");
        apply(graph, operation, update.base_iri.as_ref())?;
    }
    Ok(())
}

fn unsupported(silent: bool, what: String) -> Result<()> {
    if silent {
        debug!("silently skipping {what}");
        Ok(())
    } else {
        Err(Error::UnsupportedUpdate(what))
    }
}

fn default_graph(graph_name: &GraphName) -> Result<()> {
    match graph_name {
        GraphName::DefaultGraph => Ok(()),
        other => Err(Error::UnsupportedUpdate(format!("named graph {other}"))),
    }
}

fn default_graph_pattern(graph_name: &GraphNamePattern) -> Result<()> {
    match graph_name {
        GraphNamePattern::DefaultGraph => Ok(()),
        other => Err(Error::UnsupportedUpdate(format!("graph {other}"))),
    }
}

fn apply(graph: &mut Graph, operation: &GraphUpdateOperation, base: Option<&Iri<String>>) -> Result<()> {
    match operation {
        GraphUpdateOperation::InsertData { data } => {
            let triples = data
                .iter()
                .map(|q| {
                    default_graph(&q.graph_name)?;
                    Ok(Triple::new(q.subject.clone(), q.predicate.clone(), q.object.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            for triple in &triples {
                graph.insert(triple);
            }
        }
        GraphUpdateOperation::DeleteData { data } => {
            let triples = data.iter().map(ground_triple).collect::<Result<Vec<_>>>()?;
            for triple in triples.iter().flatten() {
                graph.remove(triple);
            }
        }
        GraphUpdateOperation::DeleteInsert { delete, insert, using, pattern } => {
            if using.is_some() {
                return Err(Error::UnsupportedUpdate("USING".to_owned()));
            }
            for q in delete {
                default_graph_pattern(&q.graph_name)?;
            }
            for q in insert {
                default_graph_pattern(&q.graph_name)?;
            }
            let (deletes, inserts) = instantiate(graph, delete, insert, pattern, base)?;
            debug!("deleting {} and inserting {} triples", deletes.len(), inserts.len());
            for triple in &deletes {
                graph.remove(triple);
            }
            for triple in &inserts {
                graph.insert(triple);
            }
        }
        GraphUpdateOperation::Clear { silent, graph: target } | GraphUpdateOperation::Drop { silent, graph: target } => {
            match target {
                GraphTarget::DefaultGraph | GraphTarget::AllGraphs => graph.clear(),
                GraphTarget::NamedGraphs => {}
                GraphTarget::NamedNode(name) => return unsupported(*silent, format!("named graph {name}")),
            }
        }
        GraphUpdateOperation::Load { silent, source, .. } => return unsupported(*silent, format!("LOAD {source}")),
        GraphUpdateOperation::Create { silent, graph: name } => {
            return unsupported(*silent, format!("CREATE GRAPH {name}"));
        }
    }
    Ok(())
}

#[allow(unreachable_patterns)]
fn ground_triple(q: &GroundQuad) -> Result<Option<Triple>> {
    default_graph(&q.graph_name)?;
    let object: Term = match &q.object {
        GroundTerm::NamedNode(n) => n.clone().into(),
        GroundTerm::Literal(l) => l.clone().into(),
        _ => return Ok(None),
    };
    Ok(Some(Triple::new(q.subject.clone(), q.predicate.clone(), object)))
}
/// Evaluates `pattern` on `graph` and fills the delete then insert templates with every solution.
fn instantiate(
    graph: &Graph, delete: &[GroundQuadPattern], insert: &[QuadPattern], pattern: &GraphPattern,
    base: Option<&Iri<String>>,
) -> Result<(Vec<Triple>, Vec<Triple>)> {
    let evaluator = QueryEvaluator::new();
    let prepared = evaluator.prepare_delete_insert(delete.to_vec(), insert.to_vec(), base.cloned(), None, pattern);
    let mut deletes = Vec::new();
    let mut inserts = Vec::new();
    for quad in prepared.execute(GraphDataset::new(graph))? {
        match quad? {
            DeleteInsertQuad::Delete(quad) => deletes.push(Triple::from(quad)),
            DeleteInsertQuad::Insert(quad) => inserts.push(Triple::from(quad)),
        }
    }
    Ok((deletes, inserts))
}
