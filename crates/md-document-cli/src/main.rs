//! mddoc: CLI tool to build and run the markdown document output format

mod config;
mod front_matter;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{CONFIG_FILE_NAME, Config};
use md_document::{
    FixedPandoc, LuaFilters, MdDocumentOptions, OutputFormat, Pandoc, PostProcessor,
    SystemPandoc, md_document,
};
use pandoc_opts::{Includes, PandocVersion, adapt_variant};

#[derive(Parser, Debug)]
#[command(name = "mddoc")]
#[command(about = "Build and run the markdown document output format")]
#[command(version)]
#[command(after_help = "Examples:
  mddoc build report.Rmd                 # Print the format for a document as JSON
  mddoc build --variant gfm --toc        # Format from command-line options
  mddoc variant markdown                 # Show the adapted variant
  mddoc preprocess report.knit.md        # Run the pre-processor in place
  mddoc postprocess report.knit.md report.md
  mddoc init                             # Write a sample _mddoc.toml")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the output format and print it as JSON
    Build {
        /// Document whose front matter supplies format options
        document: Option<PathBuf>,

        /// Write the JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: FormatArgs,

        #[command(flatten)]
        env: EnvArgs,
    },

    /// Print a variant adapted for the installed Pandoc
    Variant {
        /// Variant such as `gfm` or `markdown+footnotes`
        variant: String,

        #[command(flatten)]
        env: EnvArgs,
    },

    /// Run the format's pre-processor on a file (rewrites it in place)
    Preprocess {
        /// Knitted markdown file
        file: PathBuf,

        /// Document whose front matter supplies format options
        #[arg(long)]
        document: Option<PathBuf>,

        #[command(flatten)]
        format: FormatArgs,

        #[command(flatten)]
        env: EnvArgs,
    },

    /// Copy the front matter of INPUT to the top of OUTPUT
    Postprocess {
        /// File the conversion read from
        input: PathBuf,

        /// File the conversion produced
        output: PathBuf,
    },

    /// Write a sample configuration file
    Init {
        /// Directory to write `_mddoc.toml` to
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Print the JSON schema of the configuration file
    Schema,
}

/// Format options given on the command line
#[derive(Args, Debug, Default)]
struct FormatArgs {
    /// Markdown variant, e.g. gfm or markdown+footnotes
    #[arg(long)]
    variant: Option<String>,

    /// Keep the source YAML front matter in the output
    #[arg(long, overrides_with = "no_preserve_yaml")]
    preserve_yaml: bool,

    /// Drop the source YAML front matter even if configured
    #[arg(long, overrides_with = "preserve_yaml")]
    no_preserve_yaml: bool,

    /// Include a table of contents
    #[arg(long, overrides_with = "no_toc")]
    toc: bool,

    /// Omit the table of contents even if configured
    #[arg(long, overrides_with = "toc")]
    no_toc: bool,

    /// Deepest header level in the table of contents
    #[arg(long)]
    toc_depth: Option<u32>,

    /// Number section headers
    #[arg(long, overrides_with = "no_number_sections")]
    number_sections: bool,

    /// Do not number section headers even if configured
    #[arg(long, overrides_with = "number_sections")]
    no_number_sections: bool,

    /// Produce a standalone document
    #[arg(long, overrides_with = "no_standalone")]
    standalone: bool,

    /// Do not force a standalone document (--toc still implies one)
    #[arg(long, overrides_with = "standalone")]
    no_standalone: bool,

    /// Input format extension (repeatable), e.g. +gfm_auto_identifiers
    #[arg(long = "md-extension", allow_hyphen_values = true)]
    md_extensions: Vec<String>,

    /// Extra Pandoc argument (repeatable)
    #[arg(long = "pandoc-arg", allow_hyphen_values = true)]
    pandoc_args: Vec<String>,

    /// File to include in the header (repeatable)
    #[arg(long)]
    include_in_header: Vec<PathBuf>,

    /// File to include before the body (repeatable)
    #[arg(long)]
    include_before_body: Vec<PathBuf>,

    /// File to include after the body (repeatable)
    #[arg(long)]
    include_after_body: Vec<PathBuf>,

    /// Output file extension
    #[arg(long)]
    ext: Option<String>,
}

impl FormatArgs {
    fn apply(&self, options: &mut MdDocumentOptions) {
        if let Some(variant) = &self.variant {
            options.variant = variant.clone();
        }
        set_flag(&mut options.preserve_yaml, self.preserve_yaml, self.no_preserve_yaml);
        set_flag(&mut options.toc, self.toc, self.no_toc);
        set_flag(
            &mut options.number_sections,
            self.number_sections,
            self.no_number_sections,
        );
        set_flag(&mut options.standalone, self.standalone, self.no_standalone);
        if let Some(depth) = self.toc_depth {
            options.toc_depth = depth;
        }
        if !self.md_extensions.is_empty() {
            options.md_extensions = Some(self.md_extensions.clone());
        }
        if !self.pandoc_args.is_empty() {
            options.pandoc_args = Some(self.pandoc_args.clone());
        }
        let includes = Includes {
            in_header: self.include_in_header.clone(),
            before_body: self.include_before_body.clone(),
            after_body: self.include_after_body.clone(),
        };
        if !includes.is_empty() {
            options.includes = Some(includes);
        }
        if let Some(ext) = &self.ext {
            options.ext = ext.clone();
        }
    }
}

/// Apply a `--flag`/`--no-flag` pair; clap keeps only the last one given
fn set_flag(option: &mut bool, on: bool, off: bool) {
    if on {
        *option = true;
    } else if off {
        *option = false;
    }
}

/// Pandoc and configuration lookup
#[derive(Args, Debug, Default)]
struct EnvArgs {
    /// Configuration file (default: _mddoc.toml in the document's or current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the pandoc binary
    #[arg(long)]
    pandoc: Option<PathBuf>,

    /// Assume this Pandoc version instead of asking the binary
    #[arg(long)]
    pandoc_version: Option<String>,

    /// Directory bundled Lua filters are written to
    #[arg(long)]
    lua_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Build {
            document,
            output,
            format,
            env,
        } => build(document.as_deref(), output.as_deref(), &format, &env),
        Command::Variant { variant, env } => show_variant(&variant, &env),
        Command::Preprocess {
            file,
            document,
            format,
            env,
        } => preprocess(&file, document.as_deref(), &format, &env),
        Command::Postprocess { input, output } => postprocess(&input, &output),
        Command::Init { dir, force } => init(&dir, force),
        Command::Schema => {
            println!("{}", Config::json_schema_string()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else if verbose {
        "mddoc=debug,md_document=debug"
    } else {
        "mddoc=info,md_document=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the output format and write it as JSON
fn build(
    document: Option<&Path>,
    output: Option<&Path>,
    format_args: &FormatArgs,
    env: &EnvArgs,
) -> Result<()> {
    let config = load_config(document, env)?;
    let options = resolve_options(document, &config, format_args)?;
    let pandoc = select_pandoc(&config, env)?;

    let (format, _filters) = build_format(&options, pandoc.as_ref(), &config, env, true)?;
    let json = format.to_json().context("Failed to serialize output format")?;

    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn show_variant(variant: &str, env: &EnvArgs) -> Result<()> {
    let config = load_config(None, env)?;
    let pandoc = select_pandoc(&config, env)?;
    println!("{}", adapt_variant(variant, pandoc.version().as_ref()));
    Ok(())
}

/// Run the pre-processor, if the resolved format has one
fn preprocess(
    file: &Path,
    document: Option<&Path>,
    format_args: &FormatArgs,
    env: &EnvArgs,
) -> Result<()> {
    let config = load_config(document.or(Some(file)), env)?;
    let options = resolve_options(document, &config, format_args)?;
    let pandoc = select_pandoc(&config, env)?;

    let (format, _filters) = build_format(&options, pandoc.as_ref(), &config, env, false)?;
    match &format.pre_processor {
        Some(pre_processor) => {
            pre_processor
                .run(pandoc.as_ref(), file)
                .with_context(|| format!("Pre-processing failed: {}", file.display()))?;
            tracing::info!("Pre-processed {}", file.display());
        }
        None => tracing::info!("No pre-processing needed for {}", file.display()),
    }

    Ok(())
}

fn postprocess(input: &Path, output: &Path) -> Result<()> {
    let result = PostProcessor::PreserveYaml
        .run(input, output)
        .with_context(|| format!("Post-processing failed: {}", output.display()))?;
    println!("{}", result.display());
    Ok(())
}

fn init(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    fs::write(&path, Config::sample().to_toml_with_schema()?)
        .with_context(|| format!("Failed to write: {}", path.display()))?;

    println!("{}", path.display());
    Ok(())
}

/// Load `--config`, or `_mddoc.toml` next to the document or in the current
/// directory
fn load_config(document: Option<&Path>, env: &EnvArgs) -> Result<Config> {
    if let Some(path) = &env.config {
        return Config::load(path);
    }

    let dir = document
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    Ok(Config::load_from_dir(dir)?.unwrap_or_default())
}

/// Merge option sources: defaults, config file, document front matter,
/// then command-line flags
fn resolve_options(
    document: Option<&Path>,
    config: &Config,
    format_args: &FormatArgs,
) -> Result<MdDocumentOptions> {
    let mut options = MdDocumentOptions::default();
    config.format.apply(&mut options);

    if let Some(document) = document {
        match front_matter::load_format_config(document)? {
            Some(from_document) => from_document.apply(&mut options),
            None => tracing::debug!(
                "No md_document options in front matter of {}",
                document.display()
            ),
        }
    }

    format_args.apply(&mut options);
    Ok(options)
}

/// Pick the Pandoc to use: a pinned version, an explicit binary, or a search
fn select_pandoc(config: &Config, env: &EnvArgs) -> Result<Box<dyn Pandoc>> {
    if let Some(version) = env.pandoc_version.as_ref().or(config.pandoc.version.as_ref()) {
        let version: PandocVersion = version
            .parse()
            .with_context(|| format!("Invalid Pandoc version: {}", version))?;
        return Ok(Box::new(FixedPandoc::new(Some(version))));
    }

    if let Some(path) = env.pandoc.as_ref().or(config.pandoc.path.as_ref()) {
        return Ok(Box::new(SystemPandoc::new(path)));
    }

    match SystemPandoc::find() {
        Some(pandoc) => {
            tracing::debug!("Using pandoc at {}", pandoc.path().display());
            Ok(Box::new(pandoc))
        }
        None => {
            tracing::warn!("Pandoc not found; building the format without a Pandoc version");
            Ok(Box::new(FixedPandoc::new(None)))
        }
    }
}

/// Build the format with filters in `--lua-dir`, the configured directory, or
/// a private temporary directory
///
/// With `persist`, a temporary directory for section numbering is left on
/// disk so the filter paths in the printed format stay valid after `mddoc`
/// exits. The returned
/// locator must be kept alive while the filters are in use.
fn build_format(
    options: &MdDocumentOptions,
    pandoc: &dyn Pandoc,
    config: &Config,
    env: &EnvArgs,
    persist: bool,
) -> Result<(OutputFormat, LuaFilters)> {
    let filters = match env.lua_dir.as_ref().or(config.lua.dir.as_ref()) {
        Some(dir) => LuaFilters::new(dir),
        None if persist && options.number_sections => LuaFilters::persistent()?,
        None => LuaFilters::temporary()?,
    };
    let format =
        md_document(options, pandoc, &filters).context("Failed to build the markdown format")?;
    Ok((format, filters))
}
