//! `lowlink analyze`: SCCs, bridges, and condensation order for an edge list.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use lowlink_core::{Analysis, AnalysisOptions, AnalysisStats, BridgeView};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::input::{SkippedLine, parse_edge_list};
use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode,
};

/// Arguments for `lowlink analyze`.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Edge list file. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// How bridges treat edge direction: `underlying` or `directed`.
    #[arg(long)]
    pub bridge_view: Option<BridgeView>,

    /// Collapse parallel edges before analysing.
    #[arg(long)]
    pub dedup_edges: bool,

    /// Keep SCC groups in closing order instead of topological order.
    #[arg(long)]
    pub no_topological: bool,

    /// Include `elapsed_ns` in the report.
    #[arg(long)]
    pub timing: bool,
}

impl AnalyzeArgs {
    /// Overlay command-line flags on the configured analysis options.
    fn options(&self, config: &Config) -> AnalysisOptions {
        let mut options = config.analysis.options();
        if let Some(view) = self.bridge_view {
            options.bridge_view = view;
        }
        if self.dedup_edges {
            options.dedup_edges = true;
        }
        if self.no_topological {
            options.topological = false;
        }
        options
    }

    fn reads_stdin(&self) -> bool {
        self.file.as_deref().is_none_or(|p| p == Path::new("-"))
    }
}

/// Report shape shared by all output modes.
#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    /// Input edges as `[from, to]` label pairs.
    pub graph: Vec<[String; 2]>,
    /// SCC groups as labels.
    pub scc: Vec<Vec<String>>,
    /// Bridges as `[from, to]` label pairs.
    pub bridge: Vec<[String; 2]>,
    pub stats: AnalysisStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ns: Option<u64>,
}

/// Analyse `text` and build the report.
///
/// # Errors
///
/// Propagates [`lowlink_core::GraphError`] from graph construction or the
/// condensation sort.
pub fn analyze_text(
    text: &str,
    comment_prefix: &str,
    options: &AnalysisOptions,
    timed: bool,
) -> Result<AnalyzeReport, lowlink_core::GraphError> {
    let started = Instant::now();
    let list = parse_edge_list(text, comment_prefix);
    let graph = list.to_graph()?;
    let analysis = Analysis::run(&graph, options)?;
    let elapsed = started.elapsed();

    let input_edges: Vec<_> = graph.edges().collect();
    Ok(AnalyzeReport {
        graph: list.labels.translate_edges(&input_edges),
        scc: list.labels.translate_groups(&analysis.components),
        bridge: list.labels.translate_edges(&analysis.bridges),
        stats: analysis.stats,
        skipped: list.skipped,
        elapsed_ns: timed.then(|| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)),
    })
}

/// Execute `lowlink analyze`.
pub fn run_analyze(args: &AnalyzeArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let text = match read_input(args) {
        Ok(text) => text,
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    "pass a readable edge list file, or pipe one on stdin",
                    "input_unreadable",
                ),
            )?;
            return Err(err);
        }
    };

    let options = args.options(config);
    debug!(?options, "resolved analysis options");

    let timed = args.timing || config.output.include_timing;
    let report = match analyze_text(&text, &config.input.comment_prefix, &options, timed) {
        Ok(report) => report,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("analysis failed: {err}");
        }
    };

    info!(
        vertices = report.stats.vertex_count,
        components = report.stats.component_count,
        bridges = report.stats.bridge_count,
        "analysis complete"
    );

    render_mode(output, &report, render_analyze_text, render_analyze_pretty)
}

fn read_input(args: &AnalyzeArgs) -> anyhow::Result<String> {
    if args.reads_stdin() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read edge list from stdin")?;
        return Ok(text);
    }

    let path = args.file.as_deref().unwrap_or_else(|| Path::new("-"));
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn render_analyze_text(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    for group in &report.scc {
        writeln!(w, "scc\t{}", group.join(" "))?;
    }
    for [from, to] in &report.bridge {
        writeln!(w, "bridge\t{from}\t{to}")?;
    }
    Ok(())
}

fn render_analyze_pretty(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    let stats = &report.stats;

    pretty_section(w, "Graph")?;
    pretty_kv(w, "Vertices", stats.vertex_count.to_string())?;
    pretty_kv(w, "Edges", stats.edge_count.to_string())?;
    if stats.parallel_edges_removed > 0 {
        pretty_kv(w, "Deduplicated", stats.parallel_edges_removed.to_string())?;
    }
    if !report.skipped.is_empty() {
        let lines: Vec<String> = report.skipped.iter().map(|s| s.line.to_string()).collect();
        pretty_kv(w, "Skipped lines", lines.join(", "))?;
    }
    pretty_kv(w, "Hash", &stats.content_hash)?;
    if let Some(ns) = report.elapsed_ns {
        pretty_kv(w, "Elapsed", format!("{ns} ns"))?;
    }

    writeln!(w)?;
    pretty_section(
        w,
        &format!(
            "Strongly connected components ({}, {} cyclic)",
            stats.component_count, stats.cyclic_component_count
        ),
    )?;
    for (idx, group) in report.scc.iter().enumerate() {
        writeln!(w, "  {:>3}. {}", idx + 1, group.join(", "))?;
    }

    writeln!(w)?;
    pretty_section(w, &format!("Bridges ({})", stats.bridge_count))?;
    if report.bridge.is_empty() {
        writeln!(w, "  none")?;
    }
    for [from, to] in &report.bridge {
        writeln!(w, "  {from} -> {to}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: AnalyzeArgs,
    }

    fn report(text: &str) -> AnalyzeReport {
        analyze_text(text, "#", &AnalysisOptions::default(), false).expect("analysis")
    }

    #[test]
    fn args_default_to_stdin() {
        let parsed = Wrapper::parse_from(["test"]);
        assert!(parsed.args.reads_stdin());
        let dash = Wrapper::parse_from(["test", "-"]);
        assert!(dash.args.reads_stdin());
        let file = Wrapper::parse_from(["test", "edges.txt"]);
        assert!(!file.args.reads_stdin());
    }

    #[test]
    fn args_parse_bridge_view() {
        let parsed = Wrapper::parse_from(["test", "--bridge-view", "directed"]);
        assert_eq!(parsed.args.bridge_view, Some(BridgeView::Directed));
        assert!(Wrapper::try_parse_from(["test", "--bridge-view", "sideways"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.analysis.bridge_view = BridgeView::Directed;
        let args = AnalyzeArgs {
            bridge_view: Some(BridgeView::Underlying),
            dedup_edges: true,
            no_topological: true,
            ..AnalyzeArgs::default()
        };
        let options = args.options(&config);
        assert_eq!(options.bridge_view, BridgeView::Underlying);
        assert!(options.dedup_edges);
        assert!(!options.topological);
    }

    #[test]
    fn config_applies_when_flags_absent() {
        let mut config = Config::default();
        config.analysis.bridge_view = BridgeView::Directed;
        config.analysis.topological = false;
        let options = AnalyzeArgs::default().options(&config);
        assert_eq!(options.bridge_view, BridgeView::Directed);
        assert!(!options.topological);
    }

    #[test]
    fn report_uses_labels() {
        let r = report("A B\nB A\nB C\n");
        assert_eq!(
            r.graph,
            vec![
                ["A".to_string(), "B".to_string()],
                ["B".to_string(), "A".to_string()],
                ["B".to_string(), "C".to_string()],
            ]
        );
        assert_eq!(r.scc.len(), 2);
        assert_eq!(r.scc[1], vec!["C".to_string()], "sink comes last");
        assert_eq!(r.bridge, vec![["B".to_string(), "C".to_string()]]);
        assert!(r.elapsed_ns.is_none());
    }

    #[test]
    fn timing_is_opt_in() {
        let r = analyze_text("A B\n", "#", &AnalysisOptions::default(), true).expect("analysis");
        assert!(r.elapsed_ns.is_some());
    }

    #[test]
    fn empty_input_is_an_empty_report() {
        let r = report("# nothing here\n");
        assert!(r.graph.is_empty());
        assert!(r.scc.is_empty());
        assert!(r.bridge.is_empty());
        assert_eq!(r.stats.vertex_count, 0);
    }

    #[test]
    fn json_keys_match_response_shape() {
        let r = report("A B\nbad line here\n");
        let value = serde_json::to_value(&r).expect("json");
        for key in ["graph", "scc", "bridge", "stats", "skipped"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("elapsed_ns").is_none());
        assert_eq!(value["skipped"][0]["line"], 2);
    }

    #[test]
    fn text_renderer_prints_one_line_per_record() {
        let r = report("A B\nB A\nB C\n");
        let mut out = Vec::new();
        render_analyze_text(&r, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "bridge\tB\tC");
    }

    #[test]
    fn pretty_renderer_has_sections() {
        let r = report("A B\n");
        let mut out = Vec::new();
        render_analyze_pretty(&r, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Strongly connected components (2, 0 cyclic)"));
        assert!(text.contains("Bridges (1)"));
        assert!(text.contains("A -> B"));
    }
}
