pub mod emit;
mod events;
mod service;
pub mod unit;

pub use emit::{Emit, RustEmitter};
pub use unit::{Bundle, ServiceUnit, plan};

use eventify_core::policy::{Config, PolicyFilter};
use eventify_schema::model::Schema;
use std::fs;
use thiserror::Error as ThisError;
use tracing::{debug, error};

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("emitted unit failed to parse: {0}")]
    Parse(#[from] syn::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

///
/// BundleBuilder
///
/// Orchestrates one generation run: plans the unit IR from the schema and
/// policy, renders each unit through an emitter, and writes the artifact
/// set under `out_dir`. Writes are independent; a failed unit is logged
/// and folded into the aggregate status after every unit has settled, so
/// one bad artifact never blocks its siblings.
///

pub struct BundleBuilder<'a> {
    schema: &'a Schema,
    config: &'a Config,
    filter: PolicyFilter,
}

impl<'a> BundleBuilder<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema, config: &'a Config) -> Self {
        Self {
            schema,
            config,
            filter: PolicyFilter::new(config),
        }
    }

    /// Generate the full bundle as Rust source.
    #[must_use]
    pub fn generate(&self) -> bool {
        self.generate_with(&RustEmitter)
    }

    /// Generate the full bundle through a caller-supplied emitter.
    #[must_use]
    pub fn generate_with(&self, emitter: &dyn Emit) -> bool {
        let bundle = plan(self.schema, &self.filter);
        let mut status = Vec::new();

        status.push(self.write_unit("events.rs", emitter.events_unit(&bundle.events)));
        status.push(self.write_config_stub(emitter, &bundle));
        status.push(self.write_unit(
            "config_types.rs",
            emitter.config_types_unit(&bundle.config_types),
        ));

        for unit in &bundle.services {
            status.push(self.write_unit(&unit.file_name(), emitter.service_unit(unit)));
        }

        !status.contains(&false)
    }

    // The config stub is seeded once and hand-maintained afterwards; an
    // existing file is left untouched.
    fn write_config_stub(&self, emitter: &dyn Emit, bundle: &Bundle) -> bool {
        if self.config.out_dir.join("config.rs").exists() {
            debug!("config stub already present, keeping hand-maintained file");
            return true;
        }

        self.write_unit("config.rs", emitter.config_unit(&bundle.config))
    }

    fn write_unit(&self, file_name: &str, source: Result<String, BuildError>) -> bool {
        match source.and_then(|text| self.write_file(file_name, &text)) {
            Ok(()) => true,
            Err(err) => {
                error!(file_name, %err, "artifact generation failed");
                false
            }
        }
    }

    fn write_file(&self, file_name: &str, text: &str) -> Result<(), BuildError> {
        fs::create_dir_all(&self.config.out_dir)?;
        fs::write(self.config.out_dir.join(file_name), text)?;

        Ok(())
    }
}

/// Plan and render the events-registry unit without touching disk.
/// Useful for build scripts that `include!` the catalog directly.
pub fn generate_events_source(schema: &Schema, config: &Config) -> Result<String, BuildError> {
    let filter = PolicyFilter::new(config);
    let bundle = plan(schema, &filter);

    RustEmitter.events_unit(&bundle.events)
}

/// List the artifact file names one generation run produces for a schema.
#[must_use]
pub fn artifact_names(schema: &Schema, config: &Config) -> Vec<String> {
    let filter = PolicyFilter::new(config);
    let mut names = vec![
        "events.rs".to_string(),
        "config.rs".to_string(),
        "config_types.rs".to_string(),
    ];

    names.extend(
        plan(schema, &filter)
            .services
            .iter()
            .map(ServiceUnit::file_name),
    );

    names
}

#[cfg(test)]
mod tests {
    use super::{BundleBuilder, artifact_names, generate_events_source};
    use eventify_core::policy::Config;
    use eventify_schema::model::{FieldDescriptor, ModelDescriptor, Schema};
    use std::fs;

    fn schema() -> Schema {
        Schema::new(vec![
            ModelDescriptor::new(
                "User".into(),
                vec![
                    FieldDescriptor::new("id".into(), "Int".into()),
                    FieldDescriptor::new("email".into(), "String".into()),
                ],
            ),
            ModelDescriptor::new("Post".into(), vec![]),
        ])
    }

    #[test]
    fn generates_the_full_artifact_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            out_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        assert!(BundleBuilder::new(&schema(), &config).generate());

        for name in artifact_names(&schema(), &config) {
            assert!(dir.path().join(&name).exists(), "{name}");
        }
    }

    #[test]
    fn regeneration_preserves_a_hand_edited_config_stub() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            out_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let schema = schema();
        let builder = BundleBuilder::new(&schema, &config);

        assert!(builder.generate());
        let stub = dir.path().join("config.rs");
        fs::write(&stub, "// hand edited").unwrap();

        assert!(builder.generate());
        assert_eq!(fs::read_to_string(&stub).unwrap(), "// hand edited");

        // regenerated-wholesale artifacts are overwritten
        let events = fs::read_to_string(dir.path().join("events.rs")).unwrap();
        assert!(events.starts_with("// Generated by eventify"));
    }

    #[test]
    fn write_failures_are_reported_not_thrown() {
        let dir = tempfile::tempdir().unwrap();
        // out_dir collides with an existing file: every write fails
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();

        let config = Config {
            out_dir: blocker,
            ..Config::default()
        };

        assert!(!BundleBuilder::new(&schema(), &config).generate());
    }

    #[test]
    fn events_source_is_available_without_disk_io() {
        let source = generate_events_source(&schema(), &Config::default()).unwrap();
        assert!(source.contains("pub fn catalog"));

        let flat: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        assert!(flat.contains(r#"model_level("User""#));
    }

    #[test]
    fn excluded_models_produce_no_service_artifact() {
        let config = Config {
            exclude_models: vec!["post".into()],
            ..Config::default()
        };
        let names = artifact_names(&schema(), &config);

        assert!(names.contains(&"user_service.rs".to_string()));
        assert!(!names.contains(&"post_service.rs".to_string()));
    }
}
