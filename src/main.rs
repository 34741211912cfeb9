use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use knowledge_query::output;
use knowledge_query::query::{
    ExecutionPlan, QueryCompiler, QueryMatch, QueryMode, QueryOrder, QuerySort, QuerySpec,
    StandardParser,
};
use knowledge_query::utils::{CompilerConfig, get_config_path, sanitize_terms_with_limit};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "kq")]
#[command(about = "Compile knowledge-base search requests into backend queries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to config.json in the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    color: ColorWhen,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorWhen {
    Auto,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a search request and print the query tree and execution plan
    Compile {
        #[command(flatten)]
        spec: SpecArgs,

        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Print the description of a search request
    Describe {
        #[command(flatten)]
        spec: SpecArgs,
    },
    /// Print the sanitized terms of some query text
    Sanitize {
        /// Raw query text
        #[arg(required = true)]
        text: Vec<String>,

        /// Print JSON instead of one term per line
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Search request, built from a JSON file and/or individual flags
#[derive(Args)]
struct SpecArgs {
    /// Search terms
    terms: Vec<String>,

    /// Load the request from a JSON file; other flags override its values
    #[arg(long, value_name = "FILE")]
    spec: Option<PathBuf>,

    /// Typo-corrected search terms
    #[arg(long)]
    corrected: Option<String>,

    /// Search terms without stopwords
    #[arg(long)]
    stopword_free: Option<String>,

    /// Literal backend query, bypassing everything else
    #[arg(long)]
    literal: Option<String>,

    #[arg(long)]
    app_id: Option<String>,

    /// incremental or standard
    #[arg(long)]
    mode: Option<QueryMode>,

    /// title-only or title-and-synopsis
    #[arg(long = "match")]
    match_: Option<QueryMatch>,

    /// relevance, sequence-number, date or alphabetical
    #[arg(long)]
    sort: Option<QuerySort>,

    /// ascending or descending
    #[arg(long)]
    order: Option<QueryOrder>,

    #[arg(long)]
    limit: Option<u32>,

    #[arg(long)]
    offset: Option<u32>,

    /// Tag every result must have
    #[arg(long = "tag-all", value_name = "TAG")]
    tags_all: Vec<String>,

    /// Tag of which a result must have at least one
    #[arg(long = "tag-any", value_name = "TAG")]
    tags_any: Vec<String>,

    /// Restrict results to this id
    #[arg(long = "id", value_name = "ID")]
    ids: Vec<String>,

    #[arg(long = "exclude-id", value_name = "ID")]
    excluded_ids: Vec<String>,

    #[arg(long = "exclude-tag", value_name = "TAG")]
    excluded_tags: Vec<String>,

    /// Content type prefix, e.g. video or text/html
    #[arg(long)]
    content_type: Option<String>,

    #[arg(long)]
    exclude_content_type: Option<String>,
}

impl SpecArgs {
    fn into_spec(self) -> Result<QuerySpec> {
        let base = match &self.spec {
            Some(path) => load_spec(path)?,
            None => QuerySpec::default(),
        };
        let mut builder = base.to_builder();

        if !self.terms.is_empty() {
            builder = builder.search_terms(self.terms.join(" "));
        }
        if let Some(v) = self.corrected {
            builder = builder.corrected_terms(v);
        }
        if let Some(v) = self.stopword_free {
            builder = builder.stopword_free_terms(v);
        }
        if let Some(v) = self.literal {
            builder = builder.literal_query(v);
        }
        if let Some(v) = self.app_id {
            builder = builder.app_id(v);
        }
        if let Some(v) = self.content_type {
            builder = builder.content_type(v);
        }
        if let Some(v) = self.exclude_content_type {
            builder = builder.excluded_content_type(v);
        }
        if let Some(v) = self.mode {
            builder = builder.mode(v);
        }
        if let Some(v) = self.match_ {
            builder = builder.match_(v);
        }
        if let Some(v) = self.sort {
            builder = builder.sort(v);
        }
        if let Some(v) = self.order {
            builder = builder.order(v);
        }
        if let Some(v) = self.limit {
            builder = builder.limit(v);
        }
        if let Some(v) = self.offset {
            builder = builder.offset(v);
        }
        if !self.tags_all.is_empty() {
            builder = builder.tags_match_all(self.tags_all);
        }
        if !self.tags_any.is_empty() {
            builder = builder.tags_match_any(self.tags_any);
        }
        if !self.ids.is_empty() {
            builder = builder.ids(self.ids);
        }
        if !self.excluded_ids.is_empty() {
            builder = builder.excluded_ids(self.excluded_ids);
        }
        if !self.excluded_tags.is_empty() {
            builder = builder.excluded_tags(self.excluded_tags);
        }

        Ok(builder.build())
    }
}

fn load_spec(path: &Path) -> Result<QuerySpec> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read spec file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse spec file {}", path.display()))
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => CompilerConfig::load_from(path)?,
        None => CompilerConfig::load()?,
    };
    let color = matches!(cli.color, ColorWhen::Auto);

    match cli.command {
        Commands::Compile { spec, json } => {
            let spec = spec.into_spec()?;
            compile(&spec, config, json, color)?;
        }
        Commands::Describe { spec } => {
            println!("{}", spec.into_spec()?.debug_describe());
        }
        Commands::Sanitize { text, json } => {
            let terms = sanitize_terms_with_limit(&text.join(" "), config.max_term_length);
            if json {
                println!("{}", serde_json::to_string(&terms)?);
            } else {
                output::print_terms(&terms, color)?;
            }
        }
        Commands::Config => {
            match &cli.config {
                Some(path) => eprintln!("Config file: {}", path.display()),
                None => eprintln!("Config file: {}", get_config_path()?.display()),
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn compile(spec: &QuerySpec, config: CompilerConfig, json: bool, color: bool) -> Result<()> {
    let compiler = QueryCompiler::new(config);
    let prefixes = &compiler.config().prefixes;
    let plan = ExecutionPlan::for_spec(spec, compiler.config());

    // Field syntax is only honoured in a literal query; search text keeps `tag:x` as a word
    let parser = if spec.literal_query().is_some() {
        StandardParser::from_prefixes(prefixes)
    } else {
        StandardParser::new()
    };

    let query = compiler
        .compile(spec, &parser)
        .context("Failed to compile query")?;

    if json {
        let out = serde_json::json!({
            "description": query.to_string(),
            "query": query,
            "plan": plan,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", query);
        println!();
        output::print_query_tree(&query, prefixes, color)?;
        println!();
        output::print_execution_plan(&plan, color)?;
    }

    Ok(())
}
