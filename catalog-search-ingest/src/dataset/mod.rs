//! Dataset module for the catalog ingest.
//!
//! Reads the product dataset from a CSV file or from a ZIP archive holding
//! `products.csv`. Archives are extracted into a scratch directory that is
//! removed once the rows are read, whether or not reading succeeded.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::errors::IngestError;
use crate::processor::{ProductProcessor, ProductRow};
use catalog_search_shared::ProductRecord;

/// File name of the product table inside a seed archive.
pub const ARCHIVE_CSV_NAME: &str = "products.csv";

/// Where the seed dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A ZIP archive containing `products.csv`.
    Archive(PathBuf),
    /// A plain CSV file.
    Csv(PathBuf),
}

impl DatasetSource {
    /// Pick the source kind from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

        if is_zip {
            Self::Archive(path)
        } else {
            Self::Csv(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Archive(path) | Self::Csv(path) => path,
        }
    }
}

/// Load every product record of the dataset.
///
/// File work runs on the blocking pool.
#[instrument(fields(path = %source.path().display()))]
pub async fn load_records(source: &DatasetSource) -> Result<Vec<ProductRecord>, IngestError> {
    let source = source.clone();
    let rows = tokio::task::spawn_blocking(move || read_source(&source)).await??;

    let records = ProductProcessor::new().process_batch(rows);
    info!(count = records.len(), "Loaded product dataset");
    Ok(records)
}

fn read_source(source: &DatasetSource) -> Result<Vec<ProductRow>, IngestError> {
    match source {
        DatasetSource::Csv(path) => read_csv(path),
        DatasetSource::Archive(path) => {
            let scratch = tempfile::Builder::new()
                .prefix("seed_data")
                .tempdir()
                .map_err(|e| {
                    IngestError::data_source(format!("Failed to create scratch dir: {}", e))
                })?;

            let csv_path = extract_archive(path, scratch.path())?;
            let rows = read_csv(&csv_path);

            if let Err(e) = scratch.close() {
                warn!(error = %e, "Failed to remove scratch dir");
            }
            rows
        }
    }
}

/// Extract `products.csv` from an archive into `dest`.
///
/// The entry may sit in a sub-folder; macOS resource forks are ignored.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<PathBuf, IngestError> {
    let file = File::open(archive).map_err(|e| {
        IngestError::data_source(format!("Cannot open archive {}: {}", archive.display(), e))
    })?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| {
        IngestError::data_source(format!("Corrupt archive {}: {}", archive.display(), e))
    })?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| IngestError::data_source(format!("Corrupt archive entry: {}", e)))?;

        let Some(entry_path) = entry.enclosed_name() else {
            continue;
        };
        if entry.is_dir() || entry_path.starts_with("__MACOSX") {
            continue;
        }
        if entry_path.file_name().and_then(|n| n.to_str()) != Some(ARCHIVE_CSV_NAME) {
            continue;
        }

        let out_path = dest.join(ARCHIVE_CSV_NAME);
        let mut out = File::create(&out_path).map_err(|e| {
            IngestError::data_source(format!("Cannot write {}: {}", out_path.display(), e))
        })?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            IngestError::data_source(format!("Failed to extract {}: {}", ARCHIVE_CSV_NAME, e))
        })?;

        debug!(entry = %entry_path.display(), "Extracted dataset");
        return Ok(out_path);
    }

    Err(IngestError::data_source(format!(
        "Archive {} has no {}",
        archive.display(),
        ARCHIVE_CSV_NAME
    )))
}

/// Position of each known column in a CSV header.
#[derive(Debug, Default)]
struct ColumnIndex {
    name: Option<usize>,
    main_category: Option<usize>,
    sub_category: Option<usize>,
    image: Option<usize>,
    link: Option<usize>,
    ratings: Option<usize>,
    no_of_ratings: Option<usize>,
    discount_price: Option<usize>,
    actual_price: Option<usize>,
    asin: Option<usize>,
    description: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut index = Self::default();
        for (i, header) in headers.iter().enumerate() {
            let slot = match header {
                "name" => &mut index.name,
                "main_category" => &mut index.main_category,
                "sub_category" => &mut index.sub_category,
                "image" => &mut index.image,
                "link" => &mut index.link,
                "ratings" => &mut index.ratings,
                "no_of_ratings" => &mut index.no_of_ratings,
                "discount_price" => &mut index.discount_price,
                "actual_price" => &mut index.actual_price,
                "asin" => &mut index.asin,
                "description" => &mut index.description,
                _ => continue,
            };
            slot.get_or_insert(i);
        }
        index
    }

    // Cells are decoded one by one so that bad bytes in one cell cannot
    // cost the rest of the row.
    fn row(&self, record: &csv::ByteRecord) -> ProductRow {
        let cell = |column: Option<usize>| {
            column
                .and_then(|i| record.get(i))
                .filter(|bytes| !bytes.is_empty())
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        };

        ProductRow {
            name: cell(self.name),
            main_category: cell(self.main_category),
            sub_category: cell(self.sub_category),
            image: cell(self.image),
            link: cell(self.link),
            ratings: cell(self.ratings),
            no_of_ratings: cell(self.no_of_ratings),
            discount_price: cell(self.discount_price),
            actual_price: cell(self.actual_price),
            asin: cell(self.asin),
            description: cell(self.description),
        }
    }
}

/// Read product rows from a CSV file with a header row.
///
/// Header names are trimmed. A cell holding invalid UTF-8 is decoded
/// lossily and never drops its row; an unreadable file or a header
/// without a `name` column fails the whole read.
pub fn read_csv(path: &Path) -> Result<Vec<ProductRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| {
            IngestError::data_source(format!("Cannot open {}: {}", path.display(), e))
        })?;

    let headers = reader.headers().map_err(|e| {
        IngestError::data_source(format!("Cannot read header of {}: {}", path.display(), e))
    })?;
    let columns = ColumnIndex::from_headers(headers);
    if columns.name.is_none() {
        return Err(IngestError::data_source(format!(
            "{} has no name column",
            path.display()
        )));
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line, result) in reader.byte_records().enumerate() {
        match result {
            Ok(record) => rows.push(columns.row(&record)),
            Err(e) if e.is_io_error() => {
                return Err(IngestError::data_source(format!(
                    "Failed reading {}: {}",
                    path.display(),
                    e
                )));
            }
            Err(e) => {
                skipped += 1;
                warn!(line = line + 2, error = %e, "Skipping malformed row");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped = skipped, "Skipped malformed rows");
    }
    Ok(rows)
}
