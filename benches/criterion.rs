use color_eyre::Result;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Literal, NamedNode, Triple};
use rdfio::vocab::JSONLD_COMPACTED;
use rdfio::{NamespaceMap, NoLoader, RdfIoService, RdfSyntax};
use std::hint::black_box;
use std::sync::Arc;

const DCTERMS: &str = "http://purl.org/dc/terms/";

/// `n` resources with a title, a type, a number and a blank node.
fn graph(n: usize) -> Vec<Triple> {
    let dc = |local: &str| NamedNode::new_unchecked(format!("{DCTERMS}{local}"));
    let text = NamedNode::new_unchecked("http://purl.org/dc/dcmitype/Text");
    let mut triples = Vec::with_capacity(n * 6);
    for i in 0..n {
        let s = NamedNode::new_unchecked(format!("http://example.org/repository/resource{i}"));
        let b = BlankNode::default();
        triples.push(Triple::new(s.clone(), dc("title"), Literal::new_simple_literal(format!("Title {i}"))));
        triples.push(Triple::new(s.clone(), rdf::TYPE, text.clone()));
        triples.push(Triple::new(s.clone(), dc("extent"), Literal::new_typed_literal(i.to_string(), xsd::INTEGER)));
        triples.push(Triple::new(s.clone(), dc("subject"), b.clone()));
        triples.push(Triple::new(b.clone(), dc("title"), Literal::new_language_tagged_literal_unchecked("Thema", "de")));
        triples.push(Triple::new(b, dc("spatial"), NamedNode::new_unchecked("http://sws.geonames.org/4929022/")));
    }
    triples
}

fn service() -> Result<RdfIoService> {
    Ok(RdfIoService::new(Arc::new(NamespaceMap::with_defaults()))?.with_context_loader(Arc::new(NoLoader)))
}

fn write(c: &mut Criterion) {
    color_eyre::install().ok();
    let service = service().unwrap();
    let triples = graph(1000);
    let mut group = c.benchmark_group(format!("write {} triples", triples.len()));
    group.sample_size(20);
    for syntax in service.writable_syntaxes() {
        group.bench_with_input(BenchmarkId::from_parameter(syntax), &syntax, |b, syntax| {
            b.iter(|| {
                let mut out = Vec::new();
                service.write(triples.iter().map(Triple::as_ref), &mut out, *syntax, &[]).unwrap();
                black_box(out)
            })
        });
    }
    group.bench_function("JSON-LD compacted", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            service.write(triples.iter().map(Triple::as_ref), &mut out, RdfSyntax::JsonLd, &[JSONLD_COMPACTED]).unwrap();
            black_box(out)
        })
    });
    group.finish();
}

fn read(c: &mut Criterion) {
    let service = service().unwrap();
    let triples = graph(1000);
    let mut group = c.benchmark_group(format!("read {} triples", triples.len()));
    group.sample_size(20);
    for syntax in service.readable_syntaxes() {
        let mut input = Vec::new();
        service.write(triples.iter().map(Triple::as_ref), &mut input, syntax, &[]).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(syntax), &input, |b, input| {
            b.iter(|| black_box(service.read(input.as_slice(), None, syntax).unwrap()))
        });
    }
    group.finish();
}

fn update(c: &mut Criterion) {
    let service = service().unwrap();
    let graph: oxrdf::Graph = graph(1000).iter().collect();
    let sparql = "PREFIX dcterms: <http://purl.org/dc/terms/>
        DELETE { ?s dcterms:title ?t } INSERT { ?s dcterms:alternative ?t } WHERE { ?s dcterms:title ?t }";
    c.bench_function("update rename title", |b| {
        b.iter(|| {
            let mut g = graph.clone();
            service.update(&mut g, sparql, None).unwrap();
            black_box(g)
        })
    });
}

criterion_group!(benches, write, read, update);
criterion_main!(benches);
