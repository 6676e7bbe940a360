//! Immutable triage context built once at startup.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::classifier::{Classifier, LinearClassifier};
use crate::config::{self, ConfigPaths, ConfigResult};
use crate::extractor::FeatureExtractor;
use crate::models::{FeatureSchema, PredictionResult};
use crate::predictor::{DepartmentMap, DepartmentResolver, PredictResult, Predictor};

/// The loaded classifier, or why it could not be loaded.
pub enum ClassifierSlot {
    Loaded(Box<dyn Classifier>),
    Unavailable(String),
}

impl ClassifierSlot {
    pub fn loaded<C: Classifier + 'static>(classifier: C) -> Self {
        Self::Loaded(Box::new(classifier))
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

impl fmt::Debug for ClassifierSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(_) => f.write_str("Loaded"),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Everything a request needs: extractor, department routing and classifier.
///
/// Read-only after construction, so it can be shared across threads.
#[derive(Debug)]
pub struct TriageContext {
    extractor: FeatureExtractor,
    departments: DepartmentResolver,
    classifier: ClassifierSlot,
}

impl TriageContext {
    /// Assemble a context from already-loaded parts.
    pub fn from_parts(
        schema: FeatureSchema,
        seed: &BTreeMap<String, Vec<String>>,
        departments: DepartmentMap,
        classifier: ClassifierSlot,
    ) -> ConfigResult<Self> {
        Ok(Self {
            extractor: FeatureExtractor::new(schema, seed)?,
            departments: DepartmentResolver::new(departments),
            classifier,
        })
    }

    /// Load the context from a config directory.
    ///
    /// Schema, synonym and department problems are fatal. A classifier
    /// that fails to load leaves the context usable for extraction.
    pub fn load<P: AsRef<Path>>(dir: P) -> ConfigResult<Self> {
        let paths = ConfigPaths::in_dir(dir);

        let schema = config::load_schema(&paths.features)?;
        let seed = config::load_synonym_seed(&paths.synonyms)?;
        let departments = config::load_department_map(&paths.departments)?;

        let classifier = match LinearClassifier::load(&paths.model, &paths.labels) {
            Ok(clf) if clf.n_features() != schema.len() => {
                let reason = format!(
                    "model expects {} features, schema has {}",
                    clf.n_features(),
                    schema.len()
                );
                warn!(%reason, "Classifier unavailable");
                ClassifierSlot::Unavailable(reason)
            }
            Ok(clf) => {
                info!(classes = clf.classes().len(), "Loaded classifier");
                ClassifierSlot::loaded(clf)
            }
            Err(e) => {
                warn!(error = %e, "Classifier unavailable");
                ClassifierSlot::Unavailable(e.to_string())
            }
        };

        let ctx = Self::from_parts(schema, &seed, departments, classifier)?;
        info!(
            symptoms = ctx.schema().len(),
            synonyms = ctx.extractor.synonyms().phrase_count(),
            departments = ctx.departments.map().len(),
            classifier = ctx.classifier.is_loaded(),
            "Triage context ready"
        );
        Ok(ctx)
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn departments(&self) -> &DepartmentResolver {
        &self.departments
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.extractor.schema()
    }

    /// The classifier, or the reason it is unavailable.
    pub fn classifier(&self) -> Result<&dyn Classifier, &str> {
        match &self.classifier {
            ClassifierSlot::Loaded(clf) => Ok(clf.as_ref()),
            ClassifierSlot::Unavailable(reason) => Err(reason.as_str()),
        }
    }

    /// Run the full pipeline on symptom text.
    pub fn diagnose(&self, text: &str) -> PredictResult<PredictionResult> {
        Predictor::new(self).diagnose(text).map_err(|e| {
            warn!(error = %e, "Diagnosis failed");
            e
        })
    }
}
