use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use vtstyle::Symbolizer as _;

#[derive(Parser, Debug)]
#[command(name = "vtstyle", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a markers scene into a PNG tile.
    Tile(TileArgs),
    /// Write the bitmap a set of marker parameters resolves to.
    Glyph(GlyphArgs),
}

#[derive(Parser, Debug)]
struct TileArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Directory marker files resolve against (defaults to the scene's directory).
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GlyphArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Marker parameter as `name=value`; may be repeated.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Settings JSON file.
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Tile(args) => cmd_tile(args),
        Command::Glyph(args) => cmd_glyph(args),
    }
}

fn write_png(path: &Path, bitmap: &vtstyle::Bitmap) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = vtstyle::encode_png(bitmap)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_tile(args: TileArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("open scene '{}'", args.in_path.display()))?;
    let scene = vtstyle::Scene::from_json_str(&json)?;

    let assets_root = match &args.assets {
        Some(dir) => dir.clone(),
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let rendered = scene.render(&assets_root)?;
    if rendered.summary.status == vtstyle::BuildStatus::GlyphUnavailable {
        anyhow::bail!("marker bitmap could not be resolved");
    }

    write_png(&args.out, &rendered.tile)?;
    eprintln!(
        "wrote {} ({} placements, {} drawn, {} suppressed)",
        args.out.display(),
        rendered.summary.placements,
        rendered.stats.drawn,
        rendered.stats.suppressed
    );
    Ok(())
}

fn cmd_glyph(args: GlyphArgs) -> anyhow::Result<()> {
    let settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("open settings '{}'", path.display()))?;
            vtstyle::SymbolizerSettings::from_json_str(&json)?
        }
        None => vtstyle::SymbolizerSettings::default(),
    };

    let mut sym = vtstyle::MarkersSymbolizer::new();
    for (name, value) in &args.params {
        sym.bind_parameter(name, value)
            .with_context(|| format!("bind parameter '{name}'"))?;
    }

    let root = std::env::current_dir().context("resolve current directory")?;
    let ctx = vtstyle::SymbolizerContext::new(
        settings,
        std::sync::Arc::new(vtstyle::FileBitmapManager::new(root)),
    );
    let features: vtstyle::FeatureCollection = std::iter::once(vtstyle::Feature::new(
        1,
        0,
        vtstyle::Geometry::Point(vtstyle::PointGeometry {
            vertices: vec![vtstyle::Point::new(0.5, 0.5)],
        }),
    ))
    .collect();

    let mut recorder = vtstyle::RecordingLayerBuilder::new();
    let summary = sym.build(
        &features,
        &vtstyle::FeatureExpressionContext::default(),
        &ctx,
        &mut recorder,
    )?;
    let bitmap = match recorder.batches.first() {
        Some(vtstyle::RecordedBatch::Points { style, .. }) => style.bitmap.clone(),
        Some(vtstyle::RecordedBatch::BitmapLabels { style, .. }) => style.bitmap.clone(),
        None => anyhow::bail!("marker bitmap could not be resolved"),
    };

    write_png(&args.out, &bitmap)?;
    eprintln!(
        "wrote {} ({}x{}, key {})",
        args.out.display(),
        bitmap.width,
        bitmap.height,
        summary.glyph_key.unwrap_or_default()
    );
    Ok(())
}
