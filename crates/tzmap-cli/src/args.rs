//! Command-line argument definitions for the tzmap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input page, the mapping files, the
//! output path, project metadata, configuration file selection and logging
//! verbosity.

use std::path::Path;

use clap::Parser;

/// Command-line arguments for the tzmap threat-model converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input page export (JSON)
    #[arg(help = "Path to the input page export")]
    pub input: String,

    /// Mapping files (YAML), merged in the given order
    #[arg(short, long = "mapping", required = true, num_args = 1..)]
    pub mappings: Vec<String>,

    /// Path to the output OTM file
    #[arg(short, long, default_value = "out.otm.json")]
    pub output: String,

    /// Project id; defaults to the input file name without extension
    #[arg(long)]
    pub project_id: Option<String>,

    /// Project name; defaults to the project id
    #[arg(long)]
    pub project_name: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The explicit project id, or the input file stem
    pub fn project_id(&self) -> String {
        self.project_id.clone().unwrap_or_else(|| {
            Path::new(&self.input)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "tzmap".to_string())
        })
    }

    pub fn project_name(&self) -> String {
        self.project_name.clone().unwrap_or_else(|| self.project_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::parse_from(["tzmap", "diagrams/aws.json", "-m", "aws.yaml"]);

        assert_eq!(args.mappings, vec!["aws.yaml"]);
        assert_eq!(args.output, "out.otm.json");
        assert_eq!(args.project_id(), "aws");
        assert_eq!(args.project_name(), "aws");
    }

    #[test]
    fn test_parse_several_mappings_and_project() {
        let args = Args::parse_from([
            "tzmap",
            "in.json",
            "-m",
            "base.yaml",
            "custom.yaml",
            "--project-id",
            "p-1",
            "--project-name",
            "Payments",
        ]);

        assert_eq!(args.mappings, vec!["base.yaml", "custom.yaml"]);
        assert_eq!(args.project_id(), "p-1");
        assert_eq!(args.project_name(), "Payments");
    }

    #[test]
    fn test_mapping_is_required() {
        assert!(Args::try_parse_from(["tzmap", "in.json"]).is_err());
    }
}
