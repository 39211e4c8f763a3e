use apache_avro::types::Value as AvroValue;
use apache_avro::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::value::WriterSchema;

/// One decoded record and where it came from.
#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub value: AvroValue,
    /// Input file the record was read from.
    pub source: Arc<Path>,
    /// Position of the record within its file.
    pub index: usize,
    /// Writer schema of the file, shared by all its records.
    pub schema: Arc<WriterSchema>,
}

fn decode_error(path: &Path, source: apache_avro::Error) -> Error {
    Error::Decode {
        path: path.to_path_buf(),
        source,
    }
}

/// Decode every record of one Avro object container file.
///
/// The writer schema embedded in the file is used; no reader schema is
/// applied. The file handle is released when this returns, on success or
/// error.
#[cfg_attr(feature = "trace", tracing::instrument(skip_all, fields(path = %path.display())))]
pub fn read_records(path: &Path) -> Result<Vec<DecodedRecord>> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = Reader::new(BufReader::new(file)).map_err(|e| decode_error(path, e))?;
    trace!(schema = %reader.writer_schema().canonical_form(), "read container header");

    let schema = Arc::new(WriterSchema::new(reader.writer_schema())?);
    let source: Arc<Path> = Arc::from(path);
    let records = reader
        .enumerate()
        .map(|(index, value)| {
            Ok(DecodedRecord {
                value: value.map_err(|e| decode_error(path, e))?,
                source: Arc::clone(&source),
                index,
                schema: Arc::clone(&schema),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), records = records.len(), "decoded Avro container");
    Ok(records)
}

/// Decode all files in order and concatenate their records.
///
/// Each file keeps its own embedded schema; records from files with
/// different schemas end up side by side in the result.
pub fn read_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DecodedRecord>> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(read_records(path.as_ref())?);
    }
    Ok(records)
}
