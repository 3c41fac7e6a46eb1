#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minivite")]
#[command(author, version, about = "An unbundled dev server for Vue apps", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Start the dev server
    Dev {
        /// Port to listen on [default: 3000]
        #[arg(long, short = 'p', env = "MINIVITE_PORT")]
        port: Option<u16>,

        /// Host to bind to [default: localhost]
        #[arg(long)]
        host: Option<String>,

        /// Project root (defaults to the working directory)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Path to config file (overrides auto-discovery)
        #[arg(long, short = 'c', value_name = "FILE")]
        config: Option<PathBuf>,

        /// Also rewrite bare imports in compiled .vue output
        #[arg(long)]
        rewrite_component_imports: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    logging::init(cli.verbose, cli.json);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Dev {
            port,
            host,
            root,
            config,
            rewrite_component_imports,
        }) => {
            let action = commands::dev::DevAction {
                cwd: cwd.clone(),
                root: root.map(|r| cwd.join(r)),
                port,
                host,
                config: config.map(|c| cwd.join(c)),
                rewrite_component_imports,
            };

            let span = tracing::info_span!("dev", cmd = "dev", cwd = %cwd.display());
            let _guard = span.enter();

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .into_diagnostic()?;
            rt.block_on(commands::dev::run(action))
        }
    }
}
