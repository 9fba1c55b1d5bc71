//! Error adapter for converting TzmapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use tzmap::TzmapError;

/// Adapter that renders a [`TzmapError`] as a miette diagnostic.
///
/// Each variant gets a stable code; variants with a common fix also carry
/// a help message.
pub struct ErrorAdapter<'a>(pub &'a TzmapError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TzmapError::Io(_) => "tzmap::io",
            TzmapError::Source(_) => "tzmap::source",
            TzmapError::Mapping(_) => "tzmap::mapping",
            TzmapError::Geometry(_) => "tzmap::geometry",
            TzmapError::MappingConfiguration(_) => "tzmap::mapping_configuration",
            TzmapError::Serialize(_) => "tzmap::serialize",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TzmapError::MappingConfiguration(_) => {
                "add `default: true` to one trust zone of a mapping file, \
                 or enable `public_cloud_fallback` in the configuration"
            }
            TzmapError::Mapping(_) => {
                "mapping files need `trustzones` and `components` lists whose \
                 entries have a `label` and a `type`"
            }
            TzmapError::Geometry(_) => "check that the shape has a position, a width and a height",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
