pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod logging;
pub mod parser;
pub mod router;
pub mod schema;
pub mod ui;
pub mod view;
pub mod writer;

pub use cli::{Cli, Commands};
pub use dataset::{DataDir, Dataset, DatasetLoader};
pub use error::{NotFound, ResolveError, RoutingError};
pub use filter::{filter, ListQuery};
pub use router::{dispatch, route, Page, Route};
pub use ui::{BrowserApp, BrowserState};
