use clap::{Args, Parser, Subcommand, ValueEnum};
use peel::{
    ComposeReport, Composer, ContentListExtractor, DeckPipeline, DocumentBuilder, EditableImage,
    LopdfBuilder, PageSize, PipelineBuilder, PipelineConfig, PipelineError, RecordingBuilder,
    compose_flat, compose_pages,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Rebuild flat slide images into editable documents
#[derive(Parser, Debug)]
#[command(name = "peel")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze slide images and compose an editable document
    Convert {
        #[command(flatten)]
        analysis: AnalysisArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analyze slide images and save the element trees as JSON
    Analyze {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Compose a document from a saved analysis
    Compose {
        /// JSON file written by `peel analyze`
        analysis: PathBuf,

        /// Pipeline configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Put each image on its own page without analysis
    Flat {
        /// Slide images, one per page
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct AnalysisArgs {
    /// Slide images, one per page
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Directory holding layout sidecars (`<image stem>.json`)
    #[arg(long)]
    layout_dir: Option<PathBuf>,

    /// Directory for crops and reconstructed backgrounds
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Levels of sub-region analysis
    #[arg(long)]
    max_depth: Option<usize>,

    /// Pages analyzed concurrently
    #[arg(long)]
    workers: Option<usize>,

    /// Background reconstruction strategy
    #[arg(long, value_enum, default_value = "none")]
    inpaint: InpaintMode,

    /// Pipeline configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    page: PageArgs,
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Output page width in pixels
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Output page height in pixels
    #[arg(long, requires = "width")]
    height: Option<u32>,
}

impl PageArgs {
    fn size(&self) -> Option<PageSize> {
        Some(PageSize::new(self.width?, self.height?))
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "pdf")]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InpaintMode {
    /// Keep elements visible in the background
    None,
    /// Fill element regions with the surrounding colour
    Fill,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Pdf,
    /// Placement operation log
    Json,
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, PipelineError> {
    match path {
        Some(path) => PipelineConfig::from_file(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn build_pipeline(args: &AnalysisArgs) -> Result<DeckPipeline, PipelineError> {
    let extractor = match &args.layout_dir {
        Some(dir) => ContentListExtractor::with_layout_dir(dir),
        None => ContentListExtractor::new(),
    };
    let mut builder = PipelineBuilder::new()
        .with_config(load_config(args.config.as_deref())?)
        .with_extractor(extractor);
    if let Some(dir) = &args.work_dir {
        builder = builder.with_work_dir(dir);
    }
    if let Some(depth) = args.max_depth {
        builder = builder.with_max_depth(depth);
    }
    if let Some(workers) = args.workers {
        builder = builder.with_worker_count(workers);
    }
    if let Some(size) = args.page.size() {
        builder = builder.with_page_size(size);
    }
    if args.inpaint == InpaintMode::Fill {
        builder = builder.with_fill_inpainting();
    }
    builder.build()
}

fn emit<B: DocumentBuilder>(builder: B, output: &Path) -> Result<(), PipelineError> {
    builder.serialize_to(output)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

fn log_report(report: &ComposeReport) {
    let total = report.total();
    if total.failed > 0 || total.placeholders > 0 {
        log::warn!(
            "{} element(s) failed and {} were replaced by placeholders",
            total.failed,
            total.placeholders
        );
    }
}

fn compose_to(
    composer: &Composer,
    page: PageSize,
    pages: &[EditableImage],
    output: &OutputArgs,
) -> Result<(), PipelineError> {
    match output.format {
        Format::Pdf => {
            let (builder, report) = compose_pages(composer, page, pages, LopdfBuilder::new())?;
            log_report(&report);
            emit(builder, &output.output)
        }
        Format::Json => {
            let (builder, report) = compose_pages(composer, page, pages, RecordingBuilder::new())?;
            log_report(&report);
            emit(builder, &output.output)
        }
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    match cli.command {
        Command::Convert { analysis, output } => {
            let pipeline = build_pipeline(&analysis)?;
            let pages = pipeline.analyze(&analysis.images)?;
            let config = pipeline.config();
            compose_to(&Composer::new(config.composition), config.page, &pages, &output)
        }
        Command::Analyze { analysis, output } => {
            let pipeline = build_pipeline(&analysis)?;
            let pages = pipeline.analyze(&analysis.images)?;
            fs::write(&output, serde_json::to_vec_pretty(&pages)?)?;
            log::info!("Wrote analysis of {} page(s) to {}", pages.len(), output.display());
            Ok(())
        }
        Command::Compose { analysis, config, output } => {
            let config = load_config(config.as_deref())?;
            let pages: Vec<EditableImage> = serde_json::from_slice(&fs::read(&analysis)?)?;
            compose_to(&Composer::new(config.composition), config.page, &pages, &output)
        }
        Command::Flat { images, page, output } => {
            let size = page.size().unwrap_or_default();
            match output.format {
                Format::Pdf => {
                    let mut builder = LopdfBuilder::new();
                    compose_flat(&mut builder, &images, size)?;
                    emit(builder, &output.output)
                }
                Format::Json => {
                    let mut builder = RecordingBuilder::new();
                    compose_flat(&mut builder, &images, size)?;
                    emit(builder, &output.output)
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
