//! # Diagnostics
//!
//! Non-fatal findings surfaced alongside results. Silent omission of
//! unmapped assemblies is deliberate (a partial estimate is still useful),
//! but callers need a structured record of what was skipped or degraded so
//! completeness can be asserted in tests instead of scraped from logs.

use serde::{Deserialize, Serialize};

/// What kind of degradation occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An assembly had no part mapping and was omitted from the BOM
    UnmappedAssembly,
    /// A mapping referenced a part_id absent from the parts catalog
    MissingPart,
    /// A part had no price; priced as zero
    MissingPrice,
    /// A trim segment exceeded the stock length; dedicated sticks ordered
    OversizedSegment,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnmappedAssembly => "UNMAPPED_ASSEMBLY",
            DiagnosticKind::MissingPart => "MISSING_PART",
            DiagnosticKind::MissingPrice => "MISSING_PRICE",
            DiagnosticKind::OversizedSegment => "OVERSIZED_SEGMENT",
        }
    }
}

/// One non-fatal finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The assembly (or part) the finding is about
    pub subject: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}
