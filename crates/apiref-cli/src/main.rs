use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use apiref_core::config::{self, CONFIG_FILE_NAME, ParserConfig};
use apiref_core::model::{Endpoint, NavigationNode, ParsedSpec};
use apiref_core::parse::{self, RawDocument};
use apiref_core::SpecParser;

#[derive(Parser)]
#[command(
    name = "apiref",
    about = "Parse OpenAPI 3.x and Swagger 2.0 documents into API reference navigation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed model of a spec
    Inspect {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Print the navigation tree of a spec
    Nav {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Parse a spec and report diagnostics
    Validate {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Find one endpoint by navigable path or operationId
    Lookup {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        target: LookupTarget,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Write a default .apiref.yaml configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct LookupTarget {
    /// Navigable path, e.g. /api_reference/users/getuser
    #[arg(long)]
    path: Option<String>,

    /// operationId of the endpoint
    #[arg(long)]
    operation_id: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Nav { input } => cmd_nav(&input),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Lookup {
            input,
            target,
            format,
        } => cmd_lookup(&input, target, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apiref", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load `.apiref.yaml` from the current directory, falling back to defaults.
fn load_parser_config() -> Result<ParserConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let cfg = config::load_config(&config_path)?;
    if cfg.is_some() {
        log::debug!("using {}", config_path.display());
    }
    Ok(cfg.unwrap_or_default())
}

fn read_document(path: &Path) -> Result<RawDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let raw = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(raw)
}

fn load_spec(path: &Path) -> Result<ParsedSpec> {
    let parser = SpecParser::new(load_parser_config()?);
    let raw = read_document(path)?;
    parser
        .parse(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn print_value<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn cmd_inspect(input: &Path, format: OutputFormat) -> Result<()> {
    let spec = load_spec(input)?;
    print_value(&spec, format)
}

fn cmd_nav(input: &Path) -> Result<()> {
    let spec = load_spec(input)?;
    for group in &spec.navigation {
        println!("{}", group.title());
        for page in group.children() {
            if let NavigationNode::Page {
                title,
                path,
                method,
            } = page
            {
                let method = method.map(|m| m.as_str()).unwrap_or("");
                println!("  {method:<7} {title}  {path}");
            }
        }
    }
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let spec = load_spec(input)?;

    eprintln!("Valid {} spec: {}", spec.dialect, spec.info.title);
    eprintln!("  Version: {}", spec.info.version);
    if !spec.base_url.is_empty() {
        eprintln!("  Base URL: {}", spec.base_url);
    }
    eprintln!("  Endpoints: {}", spec.endpoints.len());
    eprintln!("  Groups: {}", spec.navigation.len());
    eprintln!("  Security schemes: {}", spec.security_schemas.len());

    if spec.diagnostics.is_empty() {
        eprintln!("Validation successful.");
    } else {
        eprintln!("Validation finished with {} warning(s):", spec.diagnostics.len());
        for diagnostic in &spec.diagnostics {
            eprintln!("  - {diagnostic}");
        }
    }
    Ok(())
}

fn cmd_lookup(input: &Path, target: LookupTarget, format: OutputFormat) -> Result<()> {
    let spec = load_spec(input)?;

    let found: Option<&Endpoint> = match (&target.path, &target.operation_id) {
        (Some(path), _) => spec.endpoint_by_path(path),
        (None, Some(id)) => spec.endpoint_by_operation_id(id),
        (None, None) => None,
    };

    match found {
        Some(endpoint) => print_value(endpoint, format),
        None => {
            let wanted = target
                .path
                .or(target.operation_id)
                .unwrap_or_default();
            anyhow::bail!("no endpoint found for {wanted}")
        }
    }
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
