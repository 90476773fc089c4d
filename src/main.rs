use anyhow::{Context, Result};
use dmc_db::{
    cli::{tables_named, Cli, Commands, OutputFormat},
    config::Config,
    dataset::{DataDir, Dataset, DatasetLoader},
    logging,
    router::{self, Page},
    schema::{Tab, TableSchema, MISSIONS},
    ui::BrowserApp,
    view::compose,
    writer::export_missions_to,
    ListQuery,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn load(config: &Config) -> Result<Arc<Dataset>> {
    let loader = DatasetLoader::new(DataDir::resolve(config.data_dir.clone())?);
    loader.get()
}

fn print_tables(tables: &[&TableSchema]) {
    for table in tables {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| {
                let required = if c.nullable { "" } else { ", required" };
                format!("{} ({}{})", c.name, c.col_type, required)
            })
            .collect();
        let facets: Vec<&str> = table.facets.iter().map(|f| f.label).collect();
        println!("{} ({})", table.name, table.source_file);
        println!("  columns: {}", columns.join(", "));
        println!("  search:  {}", table.search_columns.join(", "));
        println!("  facets:  {}", facets.join(", "));
        if let Some(kind) = table.entity {
            println!("  detail:  ?type={}&id=<id>", kind);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let mut config = Config::load()?;
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }

    let command = cli.command.unwrap_or(Commands::Browse { open: None });
    match &command {
        Commands::Browse { .. } => {
            if let Some(path) = Config::log_file_path() {
                logging::init_file(config.log_filter.as_deref(), cli.verbose, &path)?;
            }
        }
        _ => logging::init(config.log_filter.as_deref(), cli.verbose)?,
    }

    match command {
        Commands::Browse { open } => {
            let dataset = load(&config)?;
            let mut app = BrowserApp::new(dataset, config.export_file())?;
            if let Some(location) = open {
                app.open(&location);
            }
            app.run()?;
        }

        Commands::List { tab, filters, format } => {
            let query = filters.to_query(tab.schema())?;
            let dataset = load(&config)?;
            let view = compose(&dataset, tab, &query);
            match format {
                OutputFormat::Json => print_json(&view)?,
                OutputFormat::Text => print!("{}", view),
            }
        }

        Commands::Open { query, format } => {
            let dataset = load(&config)?;
            let page = router::open(&dataset, &query);
            if let OutputFormat::Json = format {
                return print_json(&page);
            }
            match page {
                Page::Detail(view) => print!("{}", view),
                Page::NotFound { message, back, .. } => {
                    println!("{}", message);
                    println!("Back to list: {}", back);
                }
                Page::List => {
                    for tab in Tab::ALL {
                        print!("{}", compose(&dataset, tab, &ListQuery::default()));
                    }
                }
            }
        }

        Commands::Export { filters, output } => {
            let start = Instant::now();
            let output = config.export_path(output);
            let query = filters.to_query(&MISSIONS)?;
            let dataset = load(&config)?;
            let rows = export_missions_to(&dataset, &query, &output)?;
            if output.as_os_str() != "-" {
                eprintln!(
                    "Exported {} of {} missions to {:?} in {:.1}s",
                    rows,
                    dataset.missions.rows.len(),
                    output,
                    start.elapsed().as_secs_f64()
                );
            }
        }

        Commands::Tables { name } => print_tables(&tables_named(name.as_deref())?),
    }

    Ok(())
}
