//! CLI command implementations.

pub mod analyze;
pub mod categories;
pub mod classify;
pub mod fisher;

use std::path::{Path, PathBuf};

use amrscope::{
    AmrScope, AnalyzerConfig, CategoryConfig, IngestConfig, InterpretationPolicy, ParserConfig,
    ScopeConfig,
};
use tracing::debug;

use crate::cli::InputArgs;

/// Build the pipeline for a command that reads an isolate table.
pub fn build_scope(
    input: &InputArgs,
    confidence_level: f64,
) -> Result<AmrScope, Box<dyn std::error::Error>> {
    if !input.file.exists() {
        return Err(format!("File not found: {}", input.file.display()).into());
    }

    let delimiter = match input.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => return Err(format!("Delimiter must be an ASCII character, got '{}'", c).into()),
        None => None,
    };

    let categories = match &input.categories {
        Some(path) => CategoryConfig::load(path)?,
        None => CategoryConfig::standard(),
    };

    let config = ScopeConfig {
        parser: ParserConfig {
            delimiter,
            ..ParserConfig::default()
        },
        categories,
        ingest: IngestConfig {
            id_column: input.id_column.clone(),
            policy: if input.lenient {
                InterpretationPolicy::TreatAsMissing
            } else {
                InterpretationPolicy::Reject
            },
        },
        analyzer: AnalyzerConfig { confidence_level },
    };

    Ok(AmrScope::with_config(config)?)
}

/// File stem of the input, used to name exports.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Directory receiving exports: `--output` if given, else the input's directory.
pub fn export_dir(input: &Path, output: Option<PathBuf>) -> PathBuf {
    let dir = output.unwrap_or_else(|| input.parent().map(PathBuf::from).unwrap_or_default());
    debug!(input = %input.display(), dir = %dir.display(), "resolved export directory");
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_dir_defaults_to_input_directory() {
        let dir = export_dir(Path::new("runs/2024/isolates.csv"), None);
        assert_eq!(dir, PathBuf::from("runs/2024"));
    }

    #[test]
    fn test_export_dir_prefers_explicit_output() {
        let dir = export_dir(Path::new("runs/isolates.csv"), Some(PathBuf::from("out")));
        assert_eq!(dir, PathBuf::from("out"));
    }

    #[test]
    fn test_export_dir_bare_file_name() {
        assert_eq!(export_dir(Path::new("isolates.csv"), None), PathBuf::from(""));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("data/isolates.tsv")), "isolates");
    }
}
