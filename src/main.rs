//! Datamesh Checker CLI - Command-line interface for catalog compliance checks
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to checker operations
//! - Handles external concerns like configuration discovery, exit codes and terminal output
//! - Provides clean separation between user interface and rule evaluation

use clap::{Parser, Subcommand, ValueEnum};
use datamesh_checker::{
    Checker, CheckerConfig, CheckerError, CheckerOptions, CheckerResult, DescriptorProvider,
    EntityKind, OutputFormat, ReportFormatter, ReportOptions, RuleSet, SnapshotCatalog,
    ValidationReport,
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Exit code when every rule passed
const EXIT_PASSED: i32 = 0;
/// Exit code when at least one rule failed
const EXIT_FAILED: i32 = 1;
/// Exit code for hard errors (missing entity, unreachable catalog, bad config)
const EXIT_ERROR: i32 = 2;

/// Datamesh Checker - Governance compliance for data-mesh catalogs
#[derive(Parser)]
#[command(name = "datamesh-checker")]
#[command(version)]
#[command(about = "Check data-mesh domains, data products and datasets against governance rules")]
#[command(long_about = "Datamesh Checker audits catalog descriptors against naming, metadata and structural rules before data products are published.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog snapshot file or directory
    #[arg(long, global = true, default_value = "catalog.yaml")]
    catalog: PathBuf,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Write the report to a file instead of stdout (required for pdf)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Only show failing results
    #[arg(long, global = true)]
    only_failures: bool,

    /// Check independent entities in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a domain's own metadata
    Domain {
        /// Domain name
        name: String,
    },

    /// Check one data product of a domain and its datasets
    Product {
        /// Domain name
        domain: String,
        /// Data product name
        product: String,
    },

    /// Check every data product of a domain
    Products {
        /// Domain name
        domain: String,
    },

    /// Check every dataset of a data product
    Datasets {
        /// Domain name
        domain: String,
        /// Data product name
        product: String,
    },

    /// Check every domain in scope with its data products and datasets
    All,

    /// List the governance rules
    Rules {
        /// Only list rules for one entity type
        #[arg(long, value_enum)]
        entity: Option<EntityArg>,
    },

    /// Explain what a specific rule checks
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// Validate a configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Junit,
    Pdf,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Junit => OutputFormat::Junit,
            OutputFormatArg::Pdf => OutputFormat::Pdf,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum EntityArg {
    Domain,
    DataProduct,
    Dataset,
}

impl From<EntityArg> for EntityKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Domain => EntityKind::Domain,
            EntityArg::DataProduct => EntityKind::DataProduct,
            EntityArg::Dataset => EntityKind::Dataset,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Warning: {e:#}");
    }

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(EXIT_ERROR);
        }
    }
}

fn run_command(cli: Cli) -> CheckerResult<i32> {
    match &cli.command {
        Commands::Rules { entity } => Ok(run_list_rules(entity.map(Into::into))),
        Commands::Explain { rule_id } => Ok(run_explain(rule_id)),
        Commands::ValidateConfig { config_file } => {
            Ok(run_validate_config(config_file.clone().or_else(|| cli.config.clone())))
        }
        Commands::Domain { name } => run_check(&cli, |checker| checker.check_domain(name)),
        Commands::Product { domain, product } => {
            run_check(&cli, |checker| checker.check_data_product_tree(domain, product))
        }
        Commands::Products { domain } => {
            run_check(&cli, |checker| checker.check_domain_all_data_products(domain))
        }
        Commands::Datasets { domain, product } => run_check(&cli, |checker| {
            let product = checker.provider().get_data_product(domain, product)?;
            checker.check_data_product_all_datasets(&product)
        }),
        Commands::All => run_check(&cli, |checker| checker.run_checks()),
    }
}

fn load_config(path: Option<&PathBuf>) -> CheckerResult<CheckerConfig> {
    match path {
        Some(path) => CheckerConfig::load_from_file(path),
        None => CheckerConfig::discover("."),
    }
}

/// Build a checker from the CLI options, run `check` and write its report
fn run_check<F>(cli: &Cli, check: F) -> CheckerResult<i32>
where
    F: FnOnce(&Checker<SnapshotCatalog>) -> CheckerResult<ValidationReport>,
{
    let format = OutputFormat::from(cli.format);
    if format == OutputFormat::Pdf && cli.output.is_none() {
        return Err(CheckerError::config("PDF output needs a file, pass --output <file>"));
    }

    let config = load_config(cli.config.as_ref())?;
    let fingerprint = config.fingerprint();
    let checker = Checker::with_config(SnapshotCatalog::new(&cli.catalog), config)?
        .with_options(CheckerOptions { parallel: cli.parallel });

    let report = check(&checker)?;

    let formatter = ReportFormatter::new(ReportOptions {
        use_colors: !cli.no_color && cli.output.is_none(),
        only_failures: cli.only_failures,
        config_fingerprint: Some(fingerprint),
    });
    match &cli.output {
        Some(path) => {
            formatter.write_report(&report, format, BufWriter::new(File::create(path)?))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => formatter.write_report(&report, format, io::stdout().lock())?,
    }

    Ok(if report.passed() { EXIT_PASSED } else { EXIT_FAILED })
}

fn run_list_rules(entity: Option<EntityKind>) -> i32 {
    let rules = RuleSet::builtin();

    println!("📋 Governance Rules\n");

    for kind in [EntityKind::Domain, EntityKind::DataProduct, EntityKind::Dataset] {
        if entity.is_some_and(|e| e != kind) {
            continue;
        }

        println!("📂 {}", kind);
        for rule in rules.rules_for(kind) {
            println!(
                "  🔍 {} [{}, {}] - {}",
                rule.id,
                rule.severity.as_str(),
                rule.category.as_str(),
                rule.description
            );
        }
        println!();
    }

    EXIT_PASSED
}

fn run_explain(rule_id: &str) -> i32 {
    let rules = RuleSet::builtin();

    if let Some(rule) = rules.find(rule_id) {
        println!("📖 Rule: {}", rule.id);
        println!("🎯 Applies to: {}", rule.entity_kind());
        println!("📂 Category: {}", rule.category.as_str());
        println!("⚠️ Severity: {}", rule.severity.as_str());
        println!();
        println!("📝 Description:");
        println!("   {}", rule.description);
        return EXIT_PASSED;
    }

    eprintln!("❌ Rule '{}' not found", rule_id);
    println!();
    println!("Available rules:");
    for rule in rules.rules() {
        println!("  - {}", rule.id);
    }

    EXIT_FAILED
}

fn run_validate_config(config_path: Option<PathBuf>) -> i32 {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("datamesh_checker.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match CheckerConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");
            println!("📊 Configuration summary:");
            println!("  Naming style: {}", config.naming.style.as_str());
            println!(
                "  Name length: {}..={}",
                config.naming.min_length, config.naming.max_length
            );
            println!("  Allowed catalogs: {}", config.metadata.allowed_catalogs.join(", "));
            println!("  Scope: include {:?}, exclude {:?}", config.scope.include, config.scope.exclude);
            println!("  Fingerprint: {}", config.fingerprint());
            EXIT_PASSED
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {}", e);
            EXIT_FAILED
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("datamesh_checker={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}
