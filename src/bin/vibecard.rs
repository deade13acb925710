use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use vibecard::{
    ArtifactStore as _, CardBody, CardMarkup, CardOpts, CardRenderer, CardRequest, CardService,
    FsArtifactStore, MemoryPostCatalog, PostEntry, PostId, SlotGrid,
};

#[derive(Parser, Debug)]
#[command(name = "vibecard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a card from a request and export it as PNG.
    Card(CardArgs),
    /// Generate a card for a post and persist it in a store directory.
    Create(CreateArgs),
    /// Serve a post's card the way the read endpoint does.
    Show(ShowArgs),
    /// Rasterize an existing card document.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct CardArgs {
    /// Input card request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path (PNG, or SVG if rasterization fails).
    #[arg(long)]
    out: PathBuf,

    /// Also write the vector document here.
    #[arg(long)]
    svg_out: Option<PathBuf>,

    /// Card options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CreateArgs {
    /// Post id (`[A-Za-z0-9_-]`).
    #[arg(long)]
    post_id: String,

    /// Input card request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Artifact store directory.
    #[arg(long)]
    store: PathBuf,

    /// Card options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Post id. Omit to see the missing-id placeholder.
    #[arg(long)]
    post_id: Option<String>,

    /// Artifact store directory.
    #[arg(long)]
    store: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Card request describing the post, used to regenerate a missing artifact.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Card options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input SVG document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Card options JSON (font source).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Card(args) => cmd_card(args).await,
        Command::Create(args) => cmd_create(args).await,
        Command::Show(args) => cmd_show(args).await,
        Command::Export(args) => cmd_export(args).await,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<CardOpts> {
    match path {
        Some(p) => Ok(CardOpts::from_path(p)?),
        None => Ok(CardOpts::default()),
    }
}

async fn cmd_card(args: CardArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;
    let req = CardRequest::from_path(&args.in_path)?;
    let grid = SlotGrid::from_slots(&req.albums)?;

    let renderer = CardRenderer::with_http(opts)?;
    let card = renderer.generate(&grid).await;
    eprintln!(
        "generated card ({:?}, {} of {} covers embedded)",
        card.stage,
        card.images_embedded,
        grid.album_count()
    );

    if let Some(svg_out) = &args.svg_out {
        write_file(svg_out, card.markup.as_str().as_bytes())?;
    }
    let img = renderer.export(&card.markup).await;
    write_file(&args.out, img.bytes())?;
    eprintln!("wrote {} ({})", args.out.display(), img.content_type());
    Ok(())
}

async fn cmd_create(args: CreateArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;
    let post = PostId::parse(&args.post_id)?;
    let req = CardRequest::from_path(&args.in_path)?;
    let store = FsArtifactStore::open(&args.store)?;
    let path = store.artifact_path(&post);

    let service = CardService::new(CardRenderer::with_http(opts)?, store);
    let created = service.create_card(&post, &req.albums).await?;
    match created.placeholder {
        Some(reason) => eprintln!("stored placeholder card: {}", reason.message()),
        None => eprintln!(
            "stored card ({} covers embedded)",
            created.images_embedded
        ),
    }
    eprintln!("wrote {}", path.display());
    Ok(())
}

async fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;
    let store = FsArtifactStore::open(&args.store)?;

    // The store directory doubles as the post catalogue: a post exists if a request describes it
    // or an artifact has been stored for it.
    let mut catalog = MemoryPostCatalog::new();
    if let Some(post) = args.post_id.as_deref().and_then(|id| PostId::parse(id).ok()) {
        if let Some(in_path) = &args.in_path {
            let req = CardRequest::from_path(in_path)?;
            catalog.insert(
                post,
                PostEntry {
                    title: req.title,
                    albums: req.albums,
                },
            );
        } else if store.get(&post)?.is_some() {
            catalog.insert(post, PostEntry::default());
        }
    }

    let service = CardService::new(CardRenderer::with_http(opts)?, store);
    let img = service.read_card(args.post_id.as_deref(), &catalog).await;
    write_file(&args.out, img.bytes())?;
    println!("{}", img.content_type());
    for (name, value) in img.headers() {
        eprintln!("{name}: {value}");
    }
    Ok(())
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;
    let markup = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read svg '{}'", args.in_path.display()))?;

    let renderer = CardRenderer::with_http(opts)?;
    let img = renderer.export(&CardMarkup::new(markup)).await;
    if let CardBody::Svg(_) = img.body {
        eprintln!("rasterization failed; writing the vector document unchanged");
    }
    write_file(&args.out, img.bytes())?;
    eprintln!("wrote {} ({})", args.out.display(), img.content_type());
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
