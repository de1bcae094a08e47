//! glstri command-line interface.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use glstri::{validate_target, EmbedError, EmbedOptions, Reporter, DEFAULT_DECL_TYPE};

/// Exit status for malformed flags.
const USAGE_EXIT_CODE: i32 = 4;

/// Embed a shader (or any text file) into a C or header file as a string literal.
///
/// If the target already declares the variable, only the lines that changed are
/// rewritten; the rest of the file is left alone.
#[derive(Parser, Debug)]
#[command(name = "glstri", version, about)]
struct Cli {
    /// Silence all output except warnings, if they are enabled
    #[arg(short, long, short_alias = 'S')]
    silence: bool,

    /// Enable warnings
    #[arg(short, long, short_alias = 'W')]
    warnings: bool,

    /// Name of the variable holding the file's contents [default: source file name]
    #[arg(short = 'v', long, value_name = "NAME")]
    variable: Option<String>,

    /// Type used when a new declaration is written
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = DEFAULT_DECL_TYPE)]
    decl_type: String,

    /// File to embed
    source: PathBuf,

    /// C or header file receiving the declaration
    target: PathBuf,
}

impl Cli {
    fn options(&self) -> EmbedOptions {
        EmbedOptions {
            variable: self.variable.clone(),
            decl_type: self.decl_type.clone(),
            warnings: self.warnings,
            silence: self.silence,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("glstri=warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { USAGE_EXIT_CODE } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let options = cli.options();
    if let Err(e) = run(&cli, &options) {
        eprintln!("error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli, options: &EmbedOptions) -> glstri::Result<()> {
    let mut reporter = Reporter::new(options, io::stdout().lock());
    reporter
        .mapping(&cli.source, &cli.target)
        .map_err(EmbedError::Report)?;

    validate_target(&cli.target)?;
    let name = options.variable_name(&cli.source)?;
    let outcome = glstri::embed_file_as(&cli.source, &cli.target, &name, options)?;
    tracing::debug!("{:?}", outcome);

    reporter
        .outcome(&outcome, &name, &cli.source, &cli.target)
        .map_err(EmbedError::Report)
}
