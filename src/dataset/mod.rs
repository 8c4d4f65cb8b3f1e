mod columns;
mod error;
mod load;
pub mod parse;
mod record;

pub use columns::ColumnMapping;
pub use error::{DatasetError, ErrorKind};
pub use load::{load_dataset, load_from_reader};
pub use record::{AnimeRecord, Dataset};
