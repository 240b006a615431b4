//! Subcommand implementations.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use flowdesk_config::{EditorConfig, ExportFormat};
use flowdesk_core::Point;
use flowdesk_editor::EditorSession;
use flowdesk_export::{BackgroundFill, CanvasSize, ImageEncoding, ImageFormat, ImagePlacement, parse_color};
use flowdesk_flow::{EdgeKind, FlowTopology, Graph, NodeKind, NodeRole, edge_default, node_default, snapshot};
use flowdesk_storage::MemoryStore;
use serde_json::json;

use crate::cli::{FormatArg, RenderArgs};

/// Margin added around the nodes by `--fit`.
const FIT_MARGIN: u32 = 40;

async fn read_graph(path: &Path) -> anyhow::Result<Graph> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    snapshot::from_json(&text).with_context(|| format!("{} is not a flow snapshot", path.display()))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn validate(file: &Path, as_json: bool) -> anyhow::Result<ExitCode> {
    let graph = read_graph(file).await?;
    let issues = flowdesk_flow::validate(&graph);
    if as_json {
        print_json(&json!({ "ok": issues.is_empty(), "issues": issues }))?;
    } else if issues.is_empty() {
        println!("ok: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    } else {
        for issue in &issues {
            println!("{issue}");
        }
    }
    tracing::debug!(file = %file.display(), issues = issues.len(), "validated");
    Ok(if issues.is_empty() { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

pub async fn inspect(file: &Path, as_json: bool) -> anyhow::Result<ExitCode> {
    let graph = read_graph(file).await?;
    let topology = FlowTopology::from_graph(&graph);
    let with_role = |role: NodeRole| {
        graph
            .nodes()
            .filter(|n| n.role == role)
            .map(|n| n.id.to_string())
            .collect::<Vec<_>>()
    };
    let (starts, ends) = (with_role(NodeRole::Start), with_role(NodeRole::End));
    let order = topology.topological_order();

    if as_json {
        return print_json(&json!({
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
            "starts": starts,
            "ends": ends,
            "entries": topology.entry_nodes(),
            "exits": topology.exit_nodes(),
            "has_cycle": topology.has_cycle(),
            "order": order,
        }))
        .map(|()| ExitCode::SUCCESS);
    }

    let list = |ids: &[String]| if ids.is_empty() { "-".to_string() } else { ids.join(", ") };
    println!("nodes: {}", graph.node_count());
    println!("edges: {}", graph.edge_count());
    println!("starts: {}", list(&starts));
    println!("ends: {}", list(&ends));
    match order {
        Some(order) => {
            let ids: Vec<String> = order.iter().map(ToString::to_string).collect();
            println!("order: {}", ids.join(" -> "));
        }
        None => println!("order: none (cycle)"),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn shapes(as_json: bool) -> anyhow::Result<ExitCode> {
    if as_json {
        let nodes: Vec<_> = NodeKind::ALL
            .iter()
            .map(|&kind| {
                let d = node_default(kind);
                json!({
                    "tag": kind.tag(),
                    "label": d.label.text,
                    "width": d.size.width,
                    "height": d.size.height,
                    "fill": d.style.fill,
                })
            })
            .collect();
        let edges: Vec<_> = EdgeKind::ALL
            .iter()
            .map(|&kind| {
                let d = edge_default(kind);
                json!({
                    "tag": kind.tag(),
                    "router": d.router.name(),
                    "connector": d.connector.name(),
                    "dasharray": d.line.dasharray,
                })
            })
            .collect();
        print_json(&json!({ "nodes": nodes, "edges": edges }))?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("nodes:");
    for kind in NodeKind::ALL {
        let d = node_default(kind);
        println!(
            "  {:<10} {:<8} {:>3}x{:<3} {}",
            kind.tag(),
            d.label.text,
            d.size.width,
            d.size.height,
            d.style.fill
        );
    }
    println!("edges:");
    for kind in EdgeKind::ALL {
        let d = edge_default(kind);
        println!(
            "  {:<10} router={:<10} connector={:<7} dash={}",
            kind.tag(),
            d.router.name(),
            d.connector.name(),
            d.line.dasharray.as_deref().unwrap_or("-")
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn new_sample(file: &Path, force: bool) -> anyhow::Result<ExitCode> {
    if !force && tokio::fs::try_exists(file).await.unwrap_or(false) {
        bail!("{} already exists (use --force to overwrite)", file.display());
    }
    let mut graph = Graph::new();
    let start = graph.add_node(NodeKind::Start, Point::new(90.0, 40.0));
    let task = graph.add_node(NodeKind::Task, Point::new(80.0, 180.0));
    let end = graph.add_node(NodeKind::End, Point::new(90.0, 340.0));
    graph.add_edge(&start, &task, EdgeKind::Default)?;
    graph.add_edge(&task, &end, EdgeKind::Default)?;

    let json = snapshot::to_json(&graph)?;
    tokio::fs::write(file, json)
        .await
        .with_context(|| format!("failed to write {}", file.display()))?;
    println!("wrote {}", file.display());
    Ok(ExitCode::SUCCESS)
}

pub async fn render(args: &RenderArgs, config: &EditorConfig, as_json: bool) -> anyhow::Result<ExitCode> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut session_config = config.clone();
    session_config.autosave.enabled = false;
    let mut session = EditorSession::new(session_config, Arc::new(MemoryStore::new()))?;
    session
        .import_json(&text)
        .with_context(|| format!("{} is not a flow snapshot", args.file.display()))?;

    if let Some(path) = &args.image {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .map_or("application/octet-stream", ImageFormat::mime);
        session
            .set_background(bytes, mime)
            .with_context(|| format!("cannot use {} as background", path.display()))?;
        session.set_background_placement(ImagePlacement {
            opacity: args.image_opacity,
            scale: args.image_scale,
            ..ImagePlacement::default()
        });
    }

    let fill = background_fill(args)?;
    let size = canvas_size(args, config, session.graph())?;
    let encoding = encoding(args, config);
    let spec = session.background_spec(fill);
    let bytes = session.export_with(size, &spec, encoding).await?;
    tokio::fs::write(&args.output, &bytes)
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if as_json {
        print_json(&json!({
            "output": args.output.display().to_string(),
            "width": size.width,
            "height": size.height,
            "format": encoding,
            "bytes": bytes.len(),
        }))?;
    } else {
        println!(
            "wrote {} ({}x{} {})",
            args.output.display(),
            size.width,
            size.height,
            encoding.extension()
        );
    }
    session.close().await;
    Ok(ExitCode::SUCCESS)
}

fn checked_color(color: &str) -> anyhow::Result<String> {
    if parse_color(color).is_none() {
        bail!("`{color}` is not a color");
    }
    Ok(color.to_string())
}

fn background_fill(args: &RenderArgs) -> anyhow::Result<Option<BackgroundFill>> {
    if let Some([from, to]) = args.gradient.as_deref() {
        return Ok(Some(BackgroundFill::LinearGradient {
            from: checked_color(from)?,
            to: checked_color(to)?,
            angle: args.angle,
        }));
    }
    args.background
        .as_deref()
        .map(|color| checked_color(color).map(|color| BackgroundFill::Solid { color }))
        .transpose()
}

fn canvas_size(args: &RenderArgs, config: &EditorConfig, graph: &Graph) -> anyhow::Result<CanvasSize> {
    let base = CanvasSize::new(
        args.width.unwrap_or(config.canvas.width),
        args.height.unwrap_or(config.canvas.height),
    )?;
    Ok(if args.fit {
        CanvasSize::fit(graph, FIT_MARGIN, base)
    } else {
        base
    })
}

/// `--format`, then the output extension, then the configuration.
fn encoding(args: &RenderArgs, config: &EditorConfig) -> ImageEncoding {
    let quality = args.quality.unwrap_or(config.export.quality);
    let from_config = || match config.export.format {
        ExportFormat::Png => ImageEncoding::Png,
        ExportFormat::Jpeg => ImageEncoding::Jpeg { quality },
    };
    let chosen = match args.format {
        Some(FormatArg::Png) => ImageEncoding::Png,
        Some(FormatArg::Jpeg) => ImageEncoding::Jpeg { quality },
        None => args
            .output
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageEncoding::from_extension)
            .unwrap_or_else(from_config),
    };
    match chosen {
        ImageEncoding::Jpeg { .. } => ImageEncoding::Jpeg { quality },
        ImageEncoding::Png => ImageEncoding::Png,
    }
}
