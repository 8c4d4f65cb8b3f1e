//! Dataset loading.

use super::columns::{ColumnIndices, ColumnMapping};
use super::parse::{parse_count, parse_label_list, parse_score, parse_text, parse_year};
use super::{AnimeRecord, Dataset, DatasetError};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

fn cell<'a>(row: &'a StringRecord, index: usize) -> &'a str {
    row.get(index).unwrap_or("")
}

fn optional_cell<'a>(row: &'a StringRecord, index: Option<usize>) -> &'a str {
    index.and_then(|i| row.get(i)).unwrap_or("")
}

fn build_record(id: usize, row: &StringRecord, columns: &ColumnIndices) -> AnimeRecord {
    AnimeRecord {
        id,
        title: cell(row, columns.title).trim().to_string(),
        year: parse_year(cell(row, columns.year)),
        genres: parse_label_list(cell(row, columns.genres)),
        studios: parse_label_list(optional_cell(row, columns.studios)),
        score: parse_score(cell(row, columns.score)),
        members: parse_count(cell(row, columns.members)),
        favorites: parse_count(optional_cell(row, columns.favorites)),
        recommendation_count: parse_count(optional_cell(row, columns.recommendation_count)),
        episodes: parse_count(optional_cell(row, columns.episodes))
            .and_then(|e| u32::try_from(e).ok()),
        kind: parse_text(optional_cell(row, columns.kind)),
        status: parse_text(optional_cell(row, columns.status)),
    }
}

/// Reads CSV data from `reader`. Rows are never dropped: cells that cannot
/// be coerced are kept as missing values.
pub fn load_from_reader<R: Read>(
    reader: R,
    mapping: &ColumnMapping,
) -> Result<Dataset, DatasetError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(DatasetError::BadHeader)?.clone();
    let columns = mapping.resolve(&headers)?;
    debug!("Resolved dataset columns: {:?}", columns);

    let mut records = Vec::new();
    for (id, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|source| DatasetError::BadRecord {
            record: source
                .position()
                .map(|p| p.record())
                .unwrap_or(id as u64 + 1),
            source,
        })?;
        records.push(build_record(id, &row, &columns));
    }

    Ok(Dataset {
        source: None,
        records,
    })
}

/// Loads the dataset file at `path`.
pub fn load_dataset<P: AsRef<Path>>(
    path: P,
    mapping: &ColumnMapping,
) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    info!("Loading dataset at {:?}...", path);

    let unavailable = |source: std::io::Error| DatasetError::Unavailable {
        path: path.to_path_buf(),
        source,
    };

    if path.is_dir() {
        return Err(unavailable(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path is a directory",
        )));
    }
    let file = std::fs::File::open(path).map_err(unavailable)?;

    // Read failures surfacing through the csv reader are availability
    // problems, not structural ones.
    let mut dataset = load_from_reader(file, mapping).map_err(|err| {
        let io_err = match &err {
            DatasetError::BadRecord { source, .. } | DatasetError::BadHeader(source) => {
                match source.kind() {
                    csv::ErrorKind::Io(io_err) => {
                        Some(std::io::Error::new(io_err.kind(), io_err.to_string()))
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        match io_err {
            Some(io_err) => unavailable(io_err),
            None => err,
        }
    })?;
    dataset.source = Some(path.to_path_buf());

    let missing_year = dataset.iter().filter(|r| r.year.is_none()).count();
    let missing_score = dataset.iter().filter(|r| r.score.is_none()).count();
    info!(
        "Dataset has:\n{} titles\n{} without a year\n{} without a score",
        dataset.len(),
        missing_year,
        missing_score
    );
    Ok(dataset)
}
