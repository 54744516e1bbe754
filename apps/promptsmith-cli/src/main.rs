//! Promptsmith CLI
//!
//! Command-line interface for listing, checking, rendering and chaining
//! prompt templates stored as YAML or JSON files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use promptsmith_core::{EngineConfig, PromptEngine, PromptRenderer, TemplateDefinition, Variables};
use promptsmith_loader::{TemplateLoader, discover, read_template};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Promptsmith - prompt template rendering and chaining
///
/// Renders Jinja prompt templates with validated variables.
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, global = true, default_value = "promptsmith.toml")]
    config: PathBuf,

    /// Template directory (overrides `template_dir` from the config file)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List the templates that load successfully
    List,

    /// Print a template definition as JSON
    Show {
        /// Template name
        name: String,
    },

    /// Load every template file and report the ones that fail
    Check,

    /// Render a single template
    Render {
        /// Template name
        name: String,

        #[command(flatten)]
        input: VariableArgs,

        /// Bind the template's few-shot examples to the `examples` variable
        #[arg(long)]
        with_examples: bool,

        /// Print the render history as JSON after the result
        #[arg(long)]
        history: bool,
    },

    /// Render templates in sequence, feeding each output into the next
    Chain {
        /// Template names, in chain order
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        input: VariableArgs,

        /// Variable name each step's output is passed on under
        #[arg(long)]
        output_key: Option<String>,

        /// Print the render history as JSON after the result
        #[arg(long)]
        history: bool,
    },
}

/// Variable inputs shared by `render` and `chain`
#[derive(Args)]
struct VariableArgs {
    /// Variable binding, may be repeated
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    vars: Vec<(String, String)>,

    /// JSON file holding an object of variables; `--var` entries override it
    #[arg(long, value_name = "FILE")]
    vars_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing subscriber
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = run_command(cli) {
        // Log with tracing
        error!("Command failed: {:#}", e);
        // Also print to stderr for CLI users
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing subscriber for structured logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("promptsmith=debug,promptsmith_core=debug,promptsmith_loader=debug")
    } else {
        EnvFilter::new("promptsmith=info,promptsmith_core=info,promptsmith_loader=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Execute the specified command
fn run_command(cli: Cli) -> Result<()> {
    let config = EngineConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let template_dir = resolve_template_dir(&cli.config, &config, cli.dir);
    info!("Template directory: {}", template_dir.display());

    match cli.command {
        Commands::List => run_list(&template_dir),
        Commands::Show { name } => run_show(&template_dir, &name),
        Commands::Check => run_check(&template_dir),
        Commands::Render {
            name,
            input,
            with_examples,
            history,
        } => run_render(&config, &template_dir, &name, &input, with_examples, history),
        Commands::Chain {
            names,
            input,
            output_key,
            history,
        } => run_chain(
            &config,
            &template_dir,
            &names,
            &input,
            output_key.as_deref(),
            history,
        ),
    }
}

/// Run the list command
fn run_list(template_dir: &Path) -> Result<()> {
    let loader = load_templates(template_dir)?;
    for name in loader.list_templates() {
        println!("{name}");
    }
    Ok(())
}

/// Run the show command
fn run_show(template_dir: &Path, name: &str) -> Result<()> {
    let loader = load_templates(template_dir)?;
    let template = loader.require(name)?;
    let json = serde_json::to_string_pretty(template).context("Failed to serialize template")?;
    println!("{json}");
    Ok(())
}

/// Run the check command
fn run_check(template_dir: &Path) -> Result<()> {
    let files = discover(template_dir)?;
    let mut failures = 0;

    for path in &files {
        match read_template(path) {
            Ok(template) => println!("✔ {} ({})", path.display(), template.name()),
            Err(e) => {
                failures += 1;
                println!("✘ {}: {e}", path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} template files failed to load", files.len());
    }
    println!("\nAll {} template files are valid.", files.len());
    Ok(())
}

/// Run the render command
fn run_render(
    config: &EngineConfig,
    template_dir: &Path,
    name: &str,
    input: &VariableArgs,
    with_examples: bool,
    history: bool,
) -> Result<()> {
    let loader = load_templates(template_dir)?;
    let template = loader.require(name)?;

    let mut variables = collect_variables(input)?;
    if with_examples {
        bind_examples(template, &mut variables);
    }

    let engine = PromptEngine::with_config(config);
    let rendered = engine
        .render(template, &variables)
        .with_context(|| format!("Failed to render template '{name}'"))?;
    println!("{rendered}");

    if history {
        print_history(&engine)?;
    }
    Ok(())
}

/// Run the chain command
fn run_chain(
    config: &EngineConfig,
    template_dir: &Path,
    names: &[String],
    input: &VariableArgs,
    output_key: Option<&str>,
    history: bool,
) -> Result<()> {
    let loader = load_templates(template_dir)?;
    let steps = names
        .iter()
        .map(|name| loader.require(name))
        .collect::<promptsmith_loader::Result<Vec<_>>>()?;

    let variables = collect_variables(input)?;
    let engine = PromptEngine::with_config(config);
    let output_key = output_key.unwrap_or(engine.output_key());

    let result = engine
        .chain_prompts(&steps, &variables, output_key)
        .context("Prompt chain failed")?;
    println!("{result}");

    if history {
        print_history(&engine)?;
    }
    Ok(())
}

/// Resolve the template directory: `--dir` first, then the config value
/// relative to the config file's directory.
fn resolve_template_dir(
    config_path: &Path,
    config: &EngineConfig,
    dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = dir {
        return dir;
    }
    if config.template_dir.is_relative()
        && let Some(parent) = config_path.parent()
    {
        return parent.join(&config.template_dir);
    }
    config.template_dir.clone()
}

/// Load every template in the directory
fn load_templates(template_dir: &Path) -> Result<TemplateLoader> {
    let mut loader = TemplateLoader::with_dir(template_dir);
    loader
        .load_directory(None)
        .with_context(|| format!("Failed to load templates from {}", template_dir.display()))?;
    Ok(loader)
}

/// Merge `--vars-file` and `--var` bindings
fn collect_variables(input: &VariableArgs) -> Result<Variables> {
    let mut variables = match &input.vars_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read variables file {}", path.display()))?;
            serde_json::from_str::<Variables>(&content).with_context(|| {
                format!("Variables file {} must hold a JSON object", path.display())
            })?
        }
        None => Variables::new(),
    };

    for (key, value) in &input.vars {
        variables.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(variables)
}

/// Bind the definition's examples under `examples` unless already supplied
fn bind_examples(template: &TemplateDefinition, variables: &mut Variables) {
    if let Some(examples) = template.examples()
        && !variables.contains_key("examples")
    {
        variables.insert("examples".to_string(), serde_json::json!(examples));
    }
}

/// Print the engine's render history as pretty JSON
fn print_history(engine: &PromptEngine) -> Result<()> {
    let json = serde_json::to_string_pretty(&engine.render_history())
        .context("Failed to serialize render history")?;
    println!("{json}");
    Ok(())
}

/// Parse a `KEY=VALUE` argument
fn parse_key_value(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}
