//! CLI frontend for the Spotlight level editor core.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sl",
    about = "Spotlight: inspect zone documents and duplicate linked objects",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log duplication and link decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Editor config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rail point defaults (JSON map of class name to properties)
    #[arg(long, global = true)]
    defaults: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a zone and check that every link resolves
    Check {
        /// Zone document
        zone: PathBuf,
    },

    /// List the objects of a zone
    List {
        /// Zone document
        zone: PathBuf,

        /// Only list objects of this class
        #[arg(short, long)]
        class: Option<String>,
    },

    /// Show one object in detail
    Show {
        /// Zone document
        zone: PathBuf,

        /// Object ID
        id: String,
    },

    /// Duplicate objects within a zone
    Duplicate {
        /// Zone document
        zone: PathBuf,

        /// IDs of the objects to duplicate
        ids: Vec<String>,

        /// Rail points to duplicate, as RAIL:I,J,... (repeatable)
        #[arg(short, long)]
        points: Vec<String>,

        /// Let copies keep links to objects that were not duplicated
        #[arg(long)]
        keep_links_to_originals: bool,

        /// Output file (default: overwrite the zone document)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Duplicate objects from one zone into another
    Paste {
        /// Zone document to copy from
        source: PathBuf,

        /// Zone document to paste into
        dest: PathBuf,

        /// IDs of the objects to copy
        ids: Vec<String>,

        /// Rail points to copy, as RAIL:I,J,... (repeatable)
        #[arg(short, long)]
        points: Vec<String>,

        /// Source zone offset inside the destination, as X,Y,Z
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,

        /// Source zone rotation inside the destination, as X,Y,Z degrees
        #[arg(long, allow_hyphen_values = true)]
        rotate: Option<String>,

        /// Output file (default: overwrite the destination document)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    use env_logger::{Builder, Env};

    let level = if verbose { "debug" } else { "warn" };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = commands::Context::load(cli.config.as_deref(), cli.defaults.as_deref())
        .and_then(|ctx| match cli.command {
            Commands::Check { zone } => commands::check::run(&ctx, &zone),
            Commands::List { zone, class } => commands::list::run(&ctx, &zone, class.as_deref()),
            Commands::Show { zone, id } => commands::show::run(&ctx, &zone, &id),
            Commands::Duplicate {
                zone,
                ids,
                points,
                keep_links_to_originals,
                output,
            } => commands::duplicate::run(
                &ctx,
                &zone,
                &ids,
                &points,
                keep_links_to_originals,
                output.as_deref(),
            ),
            Commands::Paste {
                source,
                dest,
                ids,
                points,
                offset,
                rotate,
                output,
            } => commands::paste::run(
                &ctx,
                &source,
                &dest,
                &ids,
                &points,
                offset.as_deref(),
                rotate.as_deref(),
                output.as_deref(),
            ),
        });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
