//! amrscope: multidrug-resistance classification of bacterial isolates.
//!
//! Each isolate row carries S/I/R interpretations for a fixed antimicrobial
//! panel. amrscope groups the drugs into categories, labels every isolate
//! MDR (resistant in at least three categories) or Non-MDR, labels its
//! carbapenem status, and tests the association between the two with an
//! exact test and an odds ratio.
//!
//! # Example
//!
//! ```no_run
//! use amrscope::AmrScope;
//!
//! let report = AmrScope::new().run("isolates.csv").unwrap();
//!
//! println!("MDR isolates: {}", report.collection.mdr_count());
//! if let Some(association) = &report.association {
//!     println!(
//!         "OR {:.2} ({})",
//!         association.odds_ratio.estimate, association.odds_ratio.significance
//!     );
//! }
//! ```

pub mod classify;
pub mod error;
pub mod export;
pub mod input;
pub mod stats;

mod report;
mod scope;

pub use classify::{
    CarbapenemStatus, CategoryConfig, ClassifiedCollection, IngestConfig, Interpretation,
    InterpretationPolicy, MdrPhenotype, ResistanceClassifier,
};
pub use error::{AmrError, Result};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use report::Report;
pub use scope::{AmrScope, ScopeConfig};
pub use stats::{
    fisher_exact, AnalyzerConfig, AssociationAnalyzer, AssociationResult, ContingencyTable,
    ExactTestResult, OddsRatioRecord,
};
