use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::DATA_DIR_ENV;
use crate::filter::ListQuery;
use crate::schema::{get_table, table_names, Tab, TableSchema, ALL_TABLES};

#[derive(Parser, Debug)]
#[command(name = "dmc-db")]
#[command(version, about = "Browse the Devil May Cry character, weapon, boss and mission tables")]
pub struct Cli {
    /// Directory containing characters.csv, weapons.csv, bosses.csv and missions.csv
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive browser (default)
    Browse {
        /// Start at this query string, e.g. "?type=boss&id=3"
        #[arg(long)]
        open: Option<String>,
    },

    /// Print one tab, filtered
    List {
        /// Tab to show
        #[arg(value_enum)]
        tab: Tab,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Open a page by query string, e.g. "?type=character&id=7"
    Open {
        query: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export filtered missions as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output path, `-` for stdout [default: the configured export file]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the tables with their columns, search columns and facets
    Tables {
        /// Only this table, e.g. "bosses"
        name: Option<String>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring search
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Facet selection as FACET=VALUE[,VALUE...]; FACET is a facet label or column
    #[arg(short, long = "facet", value_name = "FACET=VALUES")]
    pub facets: Vec<String>,
}

impl FilterArgs {
    /// Build the query for `schema`, rejecting unknown facets
    pub fn to_query(&self, schema: &TableSchema) -> Result<ListQuery> {
        let mut query = ListQuery::new(self.search.clone());

        for arg in &self.facets {
            let Some((key, values)) = arg.split_once('=') else {
                bail!("Expected FACET=VALUE, got {:?}", arg);
            };
            let Some(facet) = schema.facet(key.trim()) else {
                let known: Vec<&str> = schema.facets.iter().map(|f| f.column).collect();
                bail!(
                    "{} has no facet {:?} (available: {})",
                    schema.name,
                    key,
                    known.join(", ")
                );
            };
            for value in values.split(',').map(str::trim).filter(|v| !v.is_empty()) {
                query = query.select(facet.column, value);
            }
        }

        Ok(query)
    }
}

/// Tables to describe for `tables [NAME]`
pub fn tables_named(name: Option<&str>) -> Result<Vec<&'static TableSchema>> {
    match name {
        None => Ok(ALL_TABLES.to_vec()),
        Some(name) => match get_table(name.trim()) {
            Some(table) => Ok(vec![table]),
            None => bail!(
                "Unknown table {:?} (available: {})",
                name,
                table_names().join(", ")
            ),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MISSIONS, WEAPONS};

    fn args(search: &str, facets: &[&str]) -> FilterArgs {
        FilterArgs {
            search: search.to_string(),
            facets: facets.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_to_query_accumulates_values() {
        let q = args("sword", &["Game=DMC3, DMC5", "game=DMC4", "wielder=Dante"])
            .to_query(&WEAPONS)
            .unwrap();
        assert_eq!(q.search, "sword");
        assert_eq!(q.selected("game"), ["DMC3", "DMC5", "DMC4"]);
        assert_eq!(q.selected("wielder"), ["Dante"]);
    }

    #[test]
    fn test_to_query_rejects_unknown_facet() {
        let err = args("", &["wielder=Dante"]).to_query(&MISSIONS).unwrap_err();
        assert!(err.to_string().contains("no facet"));

        assert!(args("", &["game"]).to_query(&MISSIONS).is_err());
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "dmc-db", "list", "weapons", "-s", "sword", "-f", "type=Sword", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::List { tab, filters, format }) => {
                assert_eq!(tab, Tab::Weapons);
                assert_eq!(filters.search, "sword");
                assert_eq!(filters.facets, vec!["type=Sword"]);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_export_output_defaults_to_config() {
        let cli = Cli::try_parse_from(["dmc-db", "export", "-f", "game=DMC3"]).unwrap();
        match cli.command {
            Some(Commands::Export { output, .. }) => assert_eq!(output, None),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["dmc-db", "export", "-o", "-"]).unwrap();
        match cli.command {
            Some(Commands::Export { output, .. }) => assert_eq!(output, Some(PathBuf::from("-"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_tables_named() {
        assert_eq!(tables_named(None).unwrap().len(), 4);

        let only = tables_named(Some("bosses")).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].tab_label, "Bosses");

        let err = tables_named(Some("quests")).unwrap_err().to_string();
        assert!(err.contains("characters, weapons, bosses, missions"), "{}", err);
    }

    #[test]
    fn test_no_subcommand_means_browse() {
        let cli = Cli::try_parse_from(["dmc-db"]).unwrap();
        assert!(cli.command.is_none());
    }
}
