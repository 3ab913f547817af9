pub mod aliases;
pub mod catalog;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod export;
pub mod io_utils;
pub mod normalize;
pub mod query;
pub mod repl;
pub mod table;

use std::{
    env,
    io::{self, Write},
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    aliases::{CanonicalField, ColumnAliasTable},
    catalog::{BuildReport, CatalogBuilder},
    cli::{Cli, Commands, OutputFormat, SearchArgs, SourceArgs},
    discovery::DiscoveryRules,
    normalize::SourceFormat,
    query::Session,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("price_finder", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => handle_interactive(&cli.source),
        Commands::Search(args) => handle_search(&cli.source, &args),
        Commands::Aliases => handle_aliases(&cli.source),
    }
}

fn load_aliases(source: &SourceArgs) -> Result<ColumnAliasTable> {
    match &source.aliases {
        Some(path) => ColumnAliasTable::load(path)
            .with_context(|| format!("Loading column aliases from {path:?}")),
        None => Ok(ColumnAliasTable::default()),
    }
}

fn catalog_builder(source: &SourceArgs) -> Result<CatalogBuilder> {
    let aliases = load_aliases(source)?;
    let format = SourceFormat {
        delimiter: source.delimiter.unwrap_or(io_utils::DEFAULT_DELIMITER),
        encoding: io_utils::resolve_encoding(source.input_encoding.as_deref())?,
    };
    info!(
        "Scanning {:?} (delimiter '{}', encoding {})",
        source.dir,
        io_utils::printable_delimiter(format.delimiter),
        format.encoding.name()
    );
    let rules = DiscoveryRules::new(&source.marker, &source.extension);
    Ok(CatalogBuilder::new(aliases, format, rules))
}

fn load_session(source: &SourceArgs) -> Result<(Session, BuildReport)> {
    let builder = catalog_builder(source)?;
    let mut session = Session::new();
    let report = session
        .load(&builder, &source.dir)
        .with_context(|| format!("Loading price lists from {:?}", source.dir))?;
    if !report.skipped_files.is_empty() {
        warn!(
            "{} of {} price list(s) skipped as malformed",
            report.skipped_files.len(),
            report.files_scanned
        );
    }
    debug!("{report:?}");
    Ok((session, report))
}

fn handle_interactive(source: &SourceArgs) -> Result<()> {
    let (mut session, report) = load_session(source)?;
    println!("Items loaded: {}", report.rows_loaded);
    let stdin = io::stdin();
    repl::run(&mut session, stdin.lock(), io::stdout())
}

fn handle_search(source: &SourceArgs, args: &SearchArgs) -> Result<()> {
    let (mut session, _) = load_session(source)?;
    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Table => repl::handle_search(&mut session, &args.term, &mut stdout)?,
        OutputFormat::Json => {
            let result = session.search(&args.term)?;
            serde_json::to_writer_pretty(&mut stdout, result).context("Writing JSON result")?;
            writeln!(stdout)?;
        }
    }
    if let Some(name) = &args.export {
        let Some(result) = session.last_result() else {
            return Err(error::PriceError::NothingToExport.into());
        };
        let target = export::resolve_target(Some(name));
        export::export(result, &target)
            .with_context(|| format!("Exporting search result to {target:?}"))?;
        info!("Report written to {target:?}");
    }
    Ok(())
}

fn handle_aliases(source: &SourceArgs) -> Result<()> {
    let aliases = load_aliases(source)?;
    let headers = vec!["field".to_string(), "synonyms".to_string()];
    let rows = CanonicalField::ALL
        .iter()
        .map(|field| {
            vec![
                field.to_string(),
                aliases.synonyms(*field).collect::<Vec<_>>().join(", "),
            ]
        })
        .collect::<Vec<_>>();
    print!(
        "{}",
        table::render_table(&headers, &[table::Align::Left, table::Align::Left], &rows)
    );
    Ok(())
}
