//! Per-isolate resistance classification.

mod categories;
mod classifier;
mod interpretation;
mod panel;
mod record;

pub use categories::{
    normalize_drug_name, AntimicrobialCategory, CategoryConfig, CARBAPENEMS,
    MDR_CATEGORY_THRESHOLD,
};
pub use classifier::{
    CarbapenemStatus, CategoryPrevalence, Classification, ClassifiedCollection,
    ClassifiedIsolate, MdrPhenotype, ResistanceClassifier, ResistancePattern,
};
pub(crate) use classifier::percentage;
pub use interpretation::{decode_cell, Interpretation, InterpretationPolicy};
pub use panel::{DrugPanel, PanelCategory};
pub use record::{IngestConfig, IsolateRecord, IsolateTable};
