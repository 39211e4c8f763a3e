use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::body::extract_bodies;
use crate::error::{Error, Result};
use crate::reader::read_all;

/// Inputs and destination of one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Avro container files, read in this order.
    pub inputs: Vec<PathBuf>,
    /// Where to write the JSON. `None` returns it instead.
    pub output: Option<PathBuf>,
}

impl ConvertOptions {
    pub fn new<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// No destination was given; the serialized JSON.
    Json(String),
    /// The JSON was written to `output`.
    Written {
        output: PathBuf,
        /// The last input read, named in the confirmation message.
        last_input: Option<PathBuf>,
    },
}

impl Conversion {
    /// The JSON text, if it was returned rather than written.
    pub fn into_json(self) -> Option<String> {
        match self {
            Conversion::Json(json) => Some(json),
            Conversion::Written { .. } => None,
        }
    }

    /// Human-readable confirmation for a written conversion.
    ///
    /// Only the last input is named, even when several were read.
    pub fn confirmation(&self) -> Option<String> {
        match self {
            Conversion::Json(_) => None,
            Conversion::Written { output, last_input } => Some(format!(
                "Successfully converted {} to {}",
                last_input
                    .as_deref()
                    .map_or_else(|| "no input files".to_string(), |p| p.display().to_string()),
                output.display()
            )),
        }
    }
}

/// Serialize the output collection as a 2-space indented JSON array.
pub fn to_json_string(items: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Convert Avro container files into one JSON array.
///
/// All records of all inputs are decoded first, then each record is passed
/// through the `Body` extraction rule (see [`crate::body::extract_body`]).
/// Records from inputs with unrelated schemas are concatenated as-is.
///
/// # Arguments
/// * `options` - Input paths (in order) and an optional destination file.
///
/// # Returns
/// [`Conversion::Json`] with the JSON text when no destination is set,
/// otherwise [`Conversion::Written`] after the destination file has been
/// created or overwritten.
#[cfg_attr(feature = "trace", tracing::instrument(skip_all, fields(inputs = options.inputs.len())))]
pub fn convert(options: &ConvertOptions) -> Result<Conversion> {
    let records = read_all(options.inputs.as_slice())?;
    let items = extract_bodies(&records)?;
    let json = to_json_string(&items)?;

    match &options.output {
        Some(output) => {
            fs::write(output, &json).map_err(|source| Error::Write {
                path: output.clone(),
                source,
            })?;
            info!(
                output = %output.display(),
                records = records.len(),
                items = items.len(),
                "wrote JSON output"
            );
            Ok(Conversion::Written {
                output: output.clone(),
                last_input: options.inputs.last().cloned(),
            })
        }
        None => Ok(Conversion::Json(json)),
    }
}

/// Convert Avro files to JSON, reporting outcome on stdout.
///
/// Returns the JSON text when `json_file_path` is `None` or empty. When a
/// destination is given the file is written, a confirmation line is
/// printed, and `None` is returned. Any failure prints
/// `Error converting Avro to JSON: ...` and also returns `None`; use
/// [`convert`] to tell failures apart.
pub fn avro_to_json<P: AsRef<Path>>(
    avro_file_paths: &[P],
    json_file_path: Option<&Path>,
) -> Option<String> {
    avro_to_json_reporting(avro_file_paths, json_file_path, &mut io::stdout().lock())
}

/// [`avro_to_json`], writing its status lines to `report` instead of stdout.
pub fn avro_to_json_reporting<P: AsRef<Path>, W: Write>(
    avro_file_paths: &[P],
    json_file_path: Option<&Path>,
    report: &mut W,
) -> Option<String> {
    let mut options = ConvertOptions::new(avro_file_paths.iter().map(|p| p.as_ref()));
    options.output = json_file_path
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf);

    let (message, json) = match convert(&options) {
        Ok(conversion) => (conversion.confirmation(), conversion.into_json()),
        Err(e) => (Some(format!("Error converting Avro to JSON: {e}")), None),
    };
    if let Some(message) = message {
        let _ = writeln!(report, "{message}");
    }
    json
}
