mod collect;
mod parse;
mod record;
mod report;

pub use collect::{load_collection, parse_collection_str};
pub use record::{Record, RecordKind};
pub use report::CollectionReport;
