mod config;
mod index;
mod query;
mod search;
mod stats;
mod tree;

pub use config::ConfigCommand;
pub use index::IndexArgs;
pub use query::QueryArgs;
pub use search::SearchArgs;
pub use tree::TreeArgs;

pub use config::handle_config;
pub use index::handle_index;
pub use query::handle_query;
pub use search::handle_search;
pub use stats::handle_stats;
pub use tree::handle_tree;
