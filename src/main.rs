use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bingo_cards::config::{self, Config};
use bingo_cards::pdf::Rasterizer;
use bingo_cards::pipeline::{self, Job, Task};
use bingo_cards::render::StyleOptions;
use bingo_cards::{BingoError, CardGenerator, Colour, DauberShape, colour};

/// Generate 75-ball bingo sheets, six cards each, as clickable HTML with
/// optional PDFs and an Excel call sheet.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Number of sheets to generate (or to read back with --excel)
    count: usize,

    /// Also print each sheet to PDF with wkhtmltopdf
    #[arg(short, long)]
    pdf: bool,

    /// Directory the sheets are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Card colour: a CSS colour name or #rrggbb
    #[arg(short, long = "card-colour")]
    card_colour: Option<Colour>,

    /// Colour of the circle, square, heart and maple-leaf daubers
    #[arg(short, long = "dauber-colour")]
    dauber_colour: Option<Colour>,

    /// Dauber used when the player has not picked one
    #[arg(short = 's', long = "dauber-shape", value_enum)]
    dauber_shape: Option<DauberShape>,

    /// Image for the logo dauber
    #[arg(short, long)]
    logo: Option<PathBuf>,

    /// Let the player choose a dauber on the sheet
    #[arg(short, long = "allow-select")]
    allow_select: bool,

    /// Title shown above the cards
    #[arg(short, long)]
    title: Option<String>,

    /// Daubing a number marks it on every card of the sheet
    #[arg(short = 'z', long)]
    easy: bool,

    /// Build a call sheet workbook with this name
    #[arg(short = 'x', long)]
    excel: Option<String>,

    /// Card colour of the existing sheets to read with --excel
    #[arg(short, long = "base-colour")]
    base_colour: Option<String>,

    /// Generate sheets, PDFs and the call sheet workbook in one pass
    #[arg(short, long)]
    everything: bool,

    /// Config file (default: <config dir>/bingo-cards/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible cards
    #[arg(long, hide = true)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(e.downcast_ref::<BingoError>().map_or(1, BingoError::exit_status))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let config = Config::load(cli.config.as_deref())?;
    let task = Task::from_flags(cli.excel, cli.base_colour.as_deref(), cli.everything)?;

    let dauber_shape = cli.dauber_shape.or(config.dauber_shape).unwrap_or_default();
    let logo_uri = if pipeline::needs_logo(&task, dauber_shape, cli.allow_select) {
        pipeline::resolve_logo(cli.logo.or(config.logo).as_deref())?
    } else {
        String::new()
    };
    let style = StyleOptions {
        card_colour: cli.card_colour.or(config.card_colour).unwrap_or_else(colour::blue),
        dauber_colour: cli.dauber_colour.or(config.dauber_colour).unwrap_or_else(colour::red),
        dauber_shape,
        title: cli.title.or(config.title),
        allow_select: cli.allow_select,
        easy: cli.easy,
        logo_uri,
    };
    let job = Job {
        count: cli.count,
        output_dir: cli.output.or(config.output).unwrap_or_else(config::default_output_dir),
        pdf: cli.pdf,
        task,
        style,
    };

    let rasterizer = if job.needs_rasterizer() {
        Some(Rasterizer::locate(config.wkhtmltopdf.as_deref())?)
    } else {
        None
    };
    let mut generator = match cli.seed {
        Some(seed) => CardGenerator::seeded(seed),
        None => CardGenerator::from_os_rng(),
    };

    let summary = pipeline::run(&job, &mut generator, rasterizer.as_ref())
        .with_context(|| format!("failed to produce sheets in {}", job.output_dir.display()))?;

    Ok(pipeline::summary_message(&job.task, &summary))
}
