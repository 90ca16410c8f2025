use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use swagfmt_core::model::{self, Definition};
use swagfmt_core::{FormatOptions, SwaggerFormatter};

#[derive(Parser)]
#[command(name = "swagfmt", about = "Swagger 2.0 formatter for type-model definitions", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a definition file into a swagger 2.0 document
    Format {
        /// Path to the definition file (YAML or JSON)
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Formatter options file (YAML)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Flatten inheritance instead of emitting allOf
        #[arg(long)]
        expand_inline: bool,

        /// Allow $refs to defined types outside the document
        #[arg(long)]
        allow_type_references: bool,

        /// Only emit standard swagger format strings
        #[arg(long)]
        no_custom_formats: bool,

        /// Drop documentation fields (info, tags, summaries, descriptions)
        #[arg(long)]
        no_docs: bool,
    },

    /// Load a definition and report what it would produce
    Check {
        /// Path to the definition file
        input: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Format {
            input,
            output,
            format,
            options,
            expand_inline,
            allow_type_references,
            no_custom_formats,
            no_docs,
        } => {
            let mut opts = load_options(options.as_deref())?;
            // Flags only tighten/override; absent flags keep the file values.
            if expand_inline {
                opts.expand_inline = true;
            }
            if allow_type_references {
                opts.allow_defined_type_references = true;
            }
            if no_custom_formats {
                opts.allow_custom_formats = false;
            }
            if no_docs {
                opts.include_documentation = false;
            }
            cmd_format(&input, output.as_deref(), format, opts)
        }

        Commands::Check { input } => cmd_check(&input),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swagfmt", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_options(path: Option<&std::path::Path>) -> Result<FormatOptions> {
    let Some(path) = path else {
        return Ok(FormatOptions::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read options {}", path.display()))?;
    let options: FormatOptions = serde_yaml_ng::from_str(&content)
        .with_context(|| format!("failed to parse options {}", path.display()))?;
    Ok(options)
}

fn load_definition(path: &std::path::Path) -> Result<Definition> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let definition = match ext {
        "json" => model::from_json(&content)?,
        _ => model::from_yaml(&content)?,
    };
    log::debug!("loaded definition {}", definition.id);
    Ok(definition)
}

fn cmd_format(
    input: &std::path::Path,
    output: Option<&std::path::Path>,
    format: OutputFormat,
    options: FormatOptions,
) -> Result<()> {
    let definition = load_definition(input)?;
    let formatter = SwaggerFormatter::with_options(options);
    let document = formatter.format(&definition)?;

    let rendered = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&document)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml_ng::to_string(&document)?,
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_check(input: &std::path::Path) -> Result<()> {
    let definition = load_definition(input)?;

    eprintln!("Valid swagger {} definition: {}", definition.swagger, definition.id);
    eprintln!("  Paths: {}", definition.paths.len());
    eprintln!("  Registered types: {}", definition.registry.types.len());

    // Also check that the document builds.
    let document = SwaggerFormatter::new().format(&definition)?;
    let definitions = document
        .get("definitions")
        .and_then(|d| d.as_object())
        .map(|d| d.len())
        .unwrap_or(0);
    eprintln!("  Definitions emitted: {definitions}");

    eprintln!("Check successful.");
    Ok(())
}
