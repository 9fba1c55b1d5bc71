//! CLI logic for the tzmap threat-model converter.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use tzmap::{ThreatModelBuilder, TzmapError, mapping::MappingSet, otm::Project, page::Page};

/// Run the tzmap CLI application
///
/// Reads the page export and the mapping files, runs the pipeline and
/// writes the OTM document to the output file.
///
/// # Errors
///
/// Returns `TzmapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid page exports or mapping files
/// - Unmeasurable shapes
/// - Mapping configuration errors
pub fn run(args: &Args) -> Result<(), TzmapError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let page = Page::from_file(&args.input)?;
    let mapping_files = args
        .mappings
        .iter()
        .map(fs::read)
        .collect::<Result<Vec<_>, _>>()?;
    let mappings = MappingSet::load(&mapping_files)?;

    let builder = ThreatModelBuilder::new(app_config);
    let diagram = builder.load_diagram(page.shapes())?;
    let project = Project {
        name: args.project_name(),
        id: args.project_id(),
    };
    let otm = builder.build_otm(diagram, &mappings, project)?;

    fs::write(&args.output, builder.to_json(&otm)?)?;

    info!(output_file = args.output; "OTM exported successfully");

    Ok(())
}
