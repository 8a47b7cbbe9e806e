//! `sccpath analyze`: run the full pipeline on a graph document and report it.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use sccpath_core::config::ProjectConfig;
use sccpath_core::dagsp::{CriticalPath, Distance};
use sccpath_core::error::GraphError;
use sccpath_core::graph::{EdgeWeight, Graph};
use sccpath_core::input::GraphDocument;
use sccpath_core::metrics::Metrics;
use sccpath_core::pipeline::Analysis;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Dataset analyzed when neither a path nor `[analysis] default_input` is given.
const BUILTIN_DATASET: &str = include_str!("../../data/tasks.json");

const TIMER_TOTAL: &str = "TotalTime";
const TIMER_LOAD: &str = "LoadData";

/// Arguments for `sccpath analyze`.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Graph document to analyze (JSON).
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Source vertex; overrides the document's `source`.
    #[arg(long, value_name = "N")]
    pub source: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSource {
    File(PathBuf),
    Builtin,
}

impl InputSource {
    fn choose(args: &AnalyzeArgs, config: &ProjectConfig) -> Self {
        args.path
            .clone()
            .or_else(|| config.analysis.default_input.clone())
            .map_or(Self::Builtin, Self::File)
    }

    fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Builtin => "<built-in tasks.json>".to_string(),
        }
    }

    fn load(&self) -> Result<GraphDocument, GraphError> {
        match self {
            Self::File(path) => GraphDocument::load(path),
            Self::Builtin => GraphDocument::from_json_str(BUILTIN_DATASET),
        }
    }
}

#[derive(Debug, Serialize)]
struct ComponentView {
    id: usize,
    members: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct CondensationEdgeView {
    from: usize,
    to: usize,
    weight: EdgeWeight,
}

#[derive(Debug, Serialize)]
struct ExamplePath {
    target: usize,
    path: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    input: String,
    content_hash: String,
    vertices: usize,
    edges: usize,
    source: usize,
    weight_model: String,
    components: Vec<ComponentView>,
    condensation_edges: Vec<CondensationEdgeView>,
    topological_order: Vec<usize>,
    source_component: usize,
    shortest: Vec<Distance>,
    longest: Vec<Distance>,
    critical_path: CriticalPath,
    example_shortest_path: Option<ExamplePath>,
    metrics: serde_json::Value,
    #[serde(skip)]
    metrics_report: String,
}

impl AnalyzeReport {
    fn new(
        input: &InputSource,
        doc: &GraphDocument,
        content_hash: String,
        analysis: &Analysis,
        metrics: &Metrics,
    ) -> Self {
        let components = analysis
            .scc
            .components()
            .iter()
            .enumerate()
            .map(|(id, members)| ComponentView {
                id,
                members: members.clone(),
            })
            .collect();

        let condensation_edges = analysis
            .scc
            .condensation()
            .iter_edges()
            .map(|(from, edge)| CondensationEdgeView {
                from,
                to: edge.to,
                weight: edge.weight,
            })
            .collect();

        Self {
            input: input.label(),
            content_hash,
            vertices: doc.n,
            edges: doc.edges.len(),
            source: analysis.source,
            weight_model: doc.weight_model.clone(),
            components,
            condensation_edges,
            topological_order: analysis.order.clone(),
            source_component: analysis.source_component,
            shortest: analysis.shortest.distances().to_vec(),
            longest: analysis.longest.distances().to_vec(),
            critical_path: analysis.critical_path(),
            example_shortest_path: analysis
                .example_shortest_path()
                .map(|(target, path)| ExamplePath { target, path }),
            metrics: metrics.to_json(),
            metrics_report: metrics.report(),
        }
    }
}

/// Execute `sccpath analyze`.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, fails validation, or the
/// pipeline fails. The error is rendered to stderr before returning.
#[instrument(skip_all)]
pub fn run_analyze(
    args: &AnalyzeArgs,
    output: OutputMode,
    config: &ProjectConfig,
) -> anyhow::Result<()> {
    let input = InputSource::choose(args, config);
    let mut metrics = Metrics::new();
    metrics.start(TIMER_TOTAL);

    let (doc, graph) = match metrics.timed(TIMER_LOAD, |_| load_graph(&input, args.source)) {
        Ok(loaded) => loaded,
        Err(err) => return fail(output, &err),
    };
    info!(
        input = %input.label(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    let analysis = match Analysis::run(&graph, doc.source, &mut metrics) {
        Ok(analysis) => analysis,
        Err(err) => return fail(output, &err),
    };
    metrics.stop(TIMER_TOTAL);
    debug!(report = %metrics.report(), "instrumentation");

    let report = AnalyzeReport::new(&input, &doc, graph.content_hash(), &analysis, &metrics);
    render_mode(
        output,
        &report,
        |r, w| write_report(r, w, OutputMode::Text),
        |r, w| write_report(r, w, OutputMode::Pretty),
    )
}

fn load_graph(
    input: &InputSource,
    source_override: Option<usize>,
) -> Result<(GraphDocument, Graph), GraphError> {
    let mut doc = input.load()?;
    if let Some(source) = source_override {
        doc.source = source;
    }
    let graph = doc.to_graph()?;
    Ok((doc, graph))
}

fn fail(output: OutputMode, err: &GraphError) -> anyhow::Result<()> {
    render_error(output, &CliError::from(err))?;
    anyhow::bail!("analysis failed ({})", err.error_code())
}

fn heading(w: &mut dyn Write, mode: OutputMode, title: &str) -> io::Result<()> {
    if mode.is_pretty() {
        writeln!(w)?;
        pretty_section(w, title)
    } else {
        writeln!(w, "---")?;
        writeln!(w, "### {title} ###")
    }
}

fn join(ids: &[usize]) -> String {
    let parts: Vec<String> = ids.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn write_report(r: &AnalyzeReport, w: &mut dyn Write, mode: OutputMode) -> io::Result<()> {
    if mode.is_pretty() {
        pretty_section(w, "Graph")?;
        pretty_kv(w, "Input", &r.input)?;
        pretty_kv(w, "Vertices", r.vertices.to_string())?;
        pretty_kv(w, "Edges", r.edges.to_string())?;
        pretty_kv(w, "Source", r.source.to_string())?;
        pretty_kv(w, "Weight model", &r.weight_model)?;
        pretty_kv(w, "Content hash", &r.content_hash)?;
    } else {
        writeln!(
            w,
            "Loaded graph with {} nodes and {} edges.",
            r.vertices, r.edges
        )?;
        writeln!(w, "Original Source Node: {}", r.source)?;
        writeln!(w, "Weight Model: {}", r.weight_model)?;
        writeln!(w, "Content Hash: {}", r.content_hash)?;
    }

    heading(w, mode, "Strongly Connected Components")?;
    writeln!(w, "Found {} SCCs:", r.components.len())?;
    for c in &r.components {
        writeln!(
            w,
            "  SCC {} (Size {}): {}",
            c.id,
            c.members.len(),
            join(&c.members)
        )?;
    }

    writeln!(w)?;
    writeln!(
        w,
        "Condensation graph has {} nodes (one per SCC). Edges:",
        r.components.len()
    )?;
    write_condensation_edges(r, w)?;

    heading(w, mode, "Topological Sort of Condensation DAG")?;
    writeln!(w, "Topological Order of SCCs: {}", join(&r.topological_order))?;

    heading(w, mode, "Shortest & Longest Paths on DAG")?;
    writeln!(
        w,
        "Original source node {} is in SCC {}.",
        r.source, r.source_component
    )?;

    writeln!(w)?;
    writeln!(w, "Single-Source Shortest Paths (from SCC {}):", r.source_component)?;
    write_distances(&r.shortest, w)?;

    writeln!(w)?;
    writeln!(w, "Single-Source Longest Paths (from SCC {}):", r.source_component)?;
    write_distances(&r.longest, w)?;

    writeln!(w)?;
    writeln!(w, "Critical (Longest) Path from source:")?;
    writeln!(w, "  Path (of SCCs): {}", join(&r.critical_path.path))?;
    match r.critical_path.distance {
        Distance::Reachable(d) => writeln!(w, "  Length: {d}")?,
        Distance::Unreachable => writeln!(w, "  Length: N/A")?,
    }

    if let Some(example) = &r.example_shortest_path {
        writeln!(w)?;
        writeln!(w, "Example Shortest Path (to SCC {}):", example.target)?;
        writeln!(w, "  Path (of SCCs): {}", join(&example.path))?;
    }

    heading(w, mode, "Instrumentation Report")?;
    write!(w, "{}", r.metrics_report)
}

fn write_condensation_edges(r: &AnalyzeReport, w: &mut dyn Write) -> io::Result<()> {
    let mut current: Option<usize> = None;
    for edge in &r.condensation_edges {
        let label = match edge.weight {
            EdgeWeight::Simple { weight } => format!("{} (w: {weight})", edge.to),
            EdgeWeight::Range { min, max } => format!("{} (minW: {min}, maxW: {max})", edge.to),
        };
        if current == Some(edge.from) {
            write!(w, ", {label}")?;
        } else {
            if current.is_some() {
                writeln!(w)?;
            }
            write!(w, "  Node {} -> {label}", edge.from)?;
            current = Some(edge.from);
        }
    }
    if current.is_some() {
        writeln!(w)?;
    }
    Ok(())
}

fn write_distances(distances: &[Distance], w: &mut dyn Write) -> io::Result<()> {
    for (c, d) in distances.iter().enumerate() {
        writeln!(w, "  SCC {c}: {d}")?;
    }
    Ok(())
}
