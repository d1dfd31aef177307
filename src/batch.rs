//! File and directory conversion.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::TintError;
use crate::{Options, convert_with_options};

/// Outcome of converting one file of a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<(), TintError>,
}

/// Per-file outcomes of a directory conversion, sorted by input path.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|item| item.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|item| item.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.items.iter().all(|item| item.result.is_ok())
    }
}

/// Convert `input` and write the result to `output`, creating its parent
/// directories.
pub fn convert_file(input: &Path, output: &Path, options: &Options) -> Result<(), TintError> {
    let svg = fs::read_to_string(input)?;
    let converted = convert_with_options(&svg, options)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, converted)?;
    Ok(())
}

/// Convert every `.svg` file directly inside `input_dir` into `output_dir`,
/// keeping file names.
///
/// Only listing the input or creating the output directory fails the whole
/// call; each file's own failure is recorded in the report.
pub fn convert_directory(
    input_dir: &Path,
    output_dir: &Path,
    options: &Options,
) -> Result<BatchReport, TintError> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && has_svg_extension(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();

    fs::create_dir_all(output_dir)?;

    let items: Vec<BatchItem> = inputs
        .into_par_iter()
        .map(|input| {
            // file_name is always present for read_dir entries
            let output = output_dir.join(input.file_name().unwrap_or_default());
            let result = convert_file(&input, &output, options);
            if let Err(e) = &result {
                warn!(
                    input = %input.display(),
                    stage = failure_stage(e),
                    error = %e,
                    "conversion failed"
                );
            }
            BatchItem {
                input,
                output,
                result,
            }
        })
        .collect();

    let report = BatchReport { items };
    info!(
        converted = report.succeeded().count(),
        failed = report.failed().count(),
        output = %output_dir.display(),
        "converted directory"
    );
    Ok(report)
}

fn failure_stage(error: &TintError) -> &'static str {
    if error.is_parse() {
        "parse"
    } else if error.is_serialize() {
        "serialize"
    } else {
        "io"
    }
}

fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// `icons/logo.svg` -> `icons/logo-converted.svg`
pub fn default_file_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}-converted.{}", stem, ext.to_string_lossy()),
        None => format!("{}-converted", stem),
    };
    input.with_file_name(name)
}

/// `assets/icons` -> `assets/icons-converted`
pub fn default_directory_output(dir: &Path) -> PathBuf {
    match dir.file_name() {
        Some(name) => dir.with_file_name(format!("{}-converted", name.to_string_lossy())),
        None => dir.join("converted"),
    }
}
