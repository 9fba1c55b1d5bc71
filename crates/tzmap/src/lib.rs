//! tzmap - Normalizes vector diagrams into Open Threat Model (OTM) graphs.
//!
//! The pipeline reads the shapes of one diagram page, infers which boundary
//! zone contains which shape, drops everything the mapping files do not
//! mention, and maps what remains onto OTM trust zones, components and
//! dataflows.
//!
//! ```text
//! shapes ─▶ load_diagram ─▶ Diagram ─▶ build_otm ─▶ Otm ─▶ to_json
//!           classify                   prune
//!           represent                  map
//!           resolve parents            consistency passes
//! ```

pub mod config;
pub mod consistency;
pub mod deterministic;
pub mod diagram;
pub mod loader;
pub mod mapper;
pub mod measure;
pub mod parent;
pub mod prune;
pub mod representation;

mod error;

pub use tzmap_core::{geometry, otm};
pub use tzmap_source::{mapping, page, shape};

pub use error::TzmapError;

use log::{debug, info, trace};

use config::AppConfig;
use consistency::ConsistencyPasses;
use diagram::Diagram;
use loader::DiagramLoader;
use mapper::{
    ComponentLookup, ComponentMapper, ConnectorMapper, RepresentationCalculator, TrustZoneMapper,
    default_trust_zone,
};
use mapping::MappingSet;
use otm::{Otm, Project};
use prune::DiagramPruner;
use shape::Shape;

/// Builder for turning diagram pages into threat models.
///
/// # Examples
///
/// ```rust,no_run
/// use tzmap::{ThreatModelBuilder, mapping::MappingSet, otm::Project, page::Page};
///
/// let page = Page::from_file("diagram.json").expect("Failed to read page");
/// let mappings = MappingSet::from_yaml(&std::fs::read_to_string("mapping.yaml").unwrap())
///     .expect("Invalid mapping");
///
/// let builder = ThreatModelBuilder::default();
/// let diagram = builder.load_diagram(page.shapes()).expect("Failed to load");
/// let project = Project {
///     name: "Demo".to_string(),
///     id: "demo".to_string(),
/// };
/// let otm = builder
///     .build_otm(diagram, &mappings, project)
///     .expect("Failed to map");
///
/// println!("{}", builder.to_json(&otm).expect("Failed to serialize"));
/// ```
#[derive(Debug, Default)]
pub struct ThreatModelBuilder {
    config: AppConfig,
}

impl ThreatModelBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Classify `shapes` into a diagram and resolve their parents.
    ///
    /// # Errors
    ///
    /// Returns [`TzmapError::Geometry`] if a shape cannot be measured.
    pub fn load_diagram<S: Shape>(&self, shapes: &[S]) -> Result<Diagram, TzmapError> {
        info!(shapes_count = shapes.len(); "Loading diagram");
        let diagram = DiagramLoader::new(self.config.pipeline()).load(shapes)?;
        trace!(diagram:?; "Loaded diagram");
        Ok(diagram)
    }

    /// Prune `diagram` against `mappings`, map it onto OTM entities and run
    /// the consistency passes.
    ///
    /// # Errors
    ///
    /// Returns [`TzmapError::MappingConfiguration`] if some component has
    /// no enclosing trust zone and no default trust zone is available.
    pub fn build_otm(
        &self,
        diagram: Diagram,
        mappings: &MappingSet,
        project: Project,
    ) -> Result<Otm, TzmapError> {
        let pipeline = self.config.pipeline();

        info!(labels_count = mappings.labels().len(); "Pruning diagram");
        let mut diagram = DiagramPruner::new(mappings.labels()).prune(diagram);

        let calculator = RepresentationCalculator::new(&project.id, diagram.bounds());
        let default_zone = default_trust_zone(mappings, pipeline.public_cloud_fallback());

        info!("Mapping diagram");
        let mut trust_zones = TrustZoneMapper::new(mappings, &calculator).map(&mut diagram);
        let components = ComponentMapper::new(
            ComponentLookup::new(mappings),
            default_zone.as_ref().map(|zone| zone.id.as_str()),
            &calculator,
        )
        .map(&diagram)?;
        let dataflows = ConnectorMapper.map(&diagram);

        if let Some(zone) = default_zone {
            let adopted = components.iter().any(|c| c.parent.id() == zone.id);
            if adopted && !trust_zones.iter().any(|tz| tz.id == zone.id) {
                debug!(trust_zone_id = zone.id.as_str(); "Default trust zone added");
                trust_zones.push(zone);
            }
        }

        let mut otm = Otm::new(project.name.clone(), project.id.clone());
        otm.representations = vec![calculator.diagram_representation(&project.id)];
        otm.trust_zones = trust_zones;
        otm.components = components;
        otm.dataflows = dataflows;

        ConsistencyPasses::new(pipeline.prune_incomplete_representations()).run(&mut otm);

        info!(
            trust_zones_count = otm.trust_zones.len(),
            components_count = otm.components.len(),
            dataflows_count = otm.dataflows.len();
            "Threat model built"
        );
        Ok(otm)
    }

    /// Serialize `otm` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TzmapError::Serialize`] if serialization fails.
    pub fn to_json(&self, otm: &Otm) -> Result<String, TzmapError> {
        Ok(serde_json::to_string_pretty(otm)?)
    }
}
