//! *This binary is available only if rdfio is built with the `"cli"` feature.*
use clap::{Args, Parser, Subcommand};
use color_eyre::config::HookBuilder;
use color_eyre::eyre::{OptionExt, Report, WrapErr};
use fs_err::File;
use log::info;
use oxrdf::{Graph, NamedNode, Triple};
use rdfio::{IoConfig, NamespaceMap, NamespaceService, RdfIoService, RdfSyntax};
use std::io::{BufReader, BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// convert RDF between syntaxes and apply SPARQL updates
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    common: Common,
}

#[derive(Args, Debug)]
struct Common {
    /// JSON file of prefix to namespace bindings, created on first use
    #[arg(long, global = true)]
    namespaces: Option<PathBuf>,
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// base IRI for relative IRIs in the input
    #[arg(long, global = true)]
    base: Option<String>,
    /// output syntax as file extension or media type, default from the output file name or the input syntax
    #[arg(long, global = true, value_parser = parse_syntax)]
    to: Option<RdfSyntax>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// read an RDF file and write it in another syntax
    Convert {
        /// the RDF file to read
        input: PathBuf,
        /// the file to create, if not given the output is written to stdout
        output: Option<PathBuf>,
        /// input syntax as file extension or media type, default from the input file name
        #[arg(long, value_parser = parse_syntax)]
        from: Option<RdfSyntax>,
        /// JSON-LD profile or HTML page subject, may be repeated
        #[arg(long)]
        profile: Vec<String>,
    },
    /// apply a SPARQL 1.1 Update to an RDF file
    Update {
        /// the RDF file to update
        input: PathBuf,
        /// the file containing the update request
        sparql: PathBuf,
        /// the file to create, if not given the output is written to stdout
        output: Option<PathBuf>,
    },
}

fn parse_syntax(s: &str) -> Result<RdfSyntax, String> {
    RdfSyntax::from_extension(s)
        .or_else(|| RdfSyntax::from_media_type(s))
        .ok_or_else(|| format!("unknown RDF syntax {s}, use a file extension such as ttl or a media type"))
}

fn syntax_of(path: &Path) -> Result<RdfSyntax, Report> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(RdfSyntax::from_extension)
        .ok_or_eyre(format!("cannot infer the RDF syntax of {}, specify it explicitly", path.display()))
}

fn read(service: &RdfIoService, path: &Path, syntax: RdfSyntax, base: Option<&str>) -> Result<Vec<Triple>, Report> {
    let file = File::open(path)?;
    let triples = service
        .read(BufReader::new(file), base, syntax)
        .wrap_err_with(|| format!("error reading {syntax} from {}", path.display()))?;
    info!("read {} triples from {}", triples.len(), path.display());
    Ok(triples)
}

fn write(
    service: &RdfIoService, triples: &[Triple], output: Option<&Path>, syntax: RdfSyntax, profiles: &[NamedNode],
) -> Result<(), Report> {
    let profiles: Vec<_> = profiles.iter().map(NamedNode::as_ref).collect();
    let triples = triples.iter().map(Triple::as_ref);
    let out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(stdout().lock()),
    };
    service.write(triples, out, syntax, &profiles).wrap_err_with(|| format!("error writing {syntax}"))
}

fn main() -> Result<(), Report> {
    HookBuilder::default().display_env_section(false).install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let common = cli.common;

    let namespaces: Arc<dyn NamespaceService> = match &common.namespaces {
        Some(path) => Arc::new(NamespaceMap::from_file(path)?),
        None => Arc::new(NamespaceMap::with_defaults()),
    };
    let config = match &common.config {
        Some(path) => IoConfig::from_file(path)?,
        None => IoConfig::default(),
    };
    let service = RdfIoService::with_config(namespaces, config)?;
    let base = common.base.as_deref();

    match cli.command {
        Command::Convert { input, output, from, profile } => {
            let from = from.map_or_else(|| syntax_of(&input), Ok)?;
            let to = common.to.or_else(|| output.as_deref().and_then(|p| syntax_of(p).ok())).unwrap_or(from);
            let profiles = profile
                .into_iter()
                .map(|p| NamedNode::new(&p).wrap_err_with(|| format!("invalid profile IRI {p}")))
                .collect::<Result<Vec<_>, _>>()?;
            let triples = read(&service, &input, from, base)?;
            write(&service, &triples, output.as_deref(), to, &profiles)
        }
        Command::Update { input, sparql, output } => {
            let from = syntax_of(&input)?;
            let to = common.to.or_else(|| output.as_deref().and_then(|p| syntax_of(p).ok())).unwrap_or(from);
            let mut graph: Graph = read(&service, &input, from, base)?.iter().collect();
            let update = fs_err::read_to_string(&sparql)?;
            let before = graph.len();
            service.update(&mut graph, &update, base).wrap_err_with(|| format!("error applying {}", sparql.display()))?;
            info!("update changed the graph from {before} to {} triples", graph.len());
            let triples: Vec<Triple> = graph.iter().map(|t| t.into_owned()).collect();
            write(&service, &triples, output.as_deref(), to, &[])
        }
    }
}
