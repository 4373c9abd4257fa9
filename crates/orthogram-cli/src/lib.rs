//! CLI logic for the Orthogram layout tool.
//!
//! The CLI reads a state graph from TOML, runs the layered importer and
//! writes the positioned elements, relationships and segments to a layout
//! document in TOML or JSON.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::{CliError, ConfigError};

use std::{fs, path::Path};

use log::{info, warn};
use serde::Serialize;

use orthogram::{
    Diagram, DiagramBuilder,
    element::Element,
    layout::{SkippedTransition, StateGraph},
    relationship::{Relationship, Segment},
};

/// The serialized result of a run.
#[derive(Debug, Serialize)]
pub struct LayoutDocument<'a> {
    elements: Vec<&'a Element>,
    relationships: Vec<&'a Relationship>,
    segments: Vec<&'a Segment>,
    skipped: &'a [SkippedTransition],
}

impl<'a> LayoutDocument<'a> {
    pub fn new(diagram: &'a Diagram, skipped: &'a [SkippedTransition]) -> Self {
        Self {
            elements: diagram.elements().collect(),
            relationships: diagram.relationships().collect(),
            segments: diagram.segments().collect(),
            skipped,
        }
    }

    fn render(&self, path: &Path) -> Result<String, CliError> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(toml::to_string(self)?)
        }
    }
}

/// Run the Orthogram CLI application
///
/// This function lays out the input state graph and writes the resulting
/// layout document to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed state graphs
/// - Layout errors
/// - Serialization errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing state graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let graph: StateGraph =
        toml::from_str(&source).map_err(|err| CliError::input(&args.input, source.clone(), &err))?;

    let builder = DiagramBuilder::new(app_config);
    let (diagram, skipped) = builder.import(&graph)?;

    for transition in &skipped {
        warn!(
            source:% = transition.source(),
            target:% = transition.target();
            "Transition target not found, not drawn"
        );
    }

    let output = LayoutDocument::new(&diagram, &skipped).render(Path::new(&args.output))?;
    fs::write(&args.output, output)?;

    info!(
        output_file = args.output,
        elements = diagram.elements().count(),
        relationships = diagram.relationships().count();
        "Layout exported successfully"
    );

    Ok(())
}
