//! Marker/explanation consistency checks

use serde::Serialize;
use std::collections::BTreeSet;

use crate::block::CodeBlock;
use crate::explanation::ExplanationSet;
use crate::marker::ExtractedMarkers;
use crate::warning::Warning;

/// A code block with markers, paired with whatever explanation follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCandidate {
    /// The code block
    pub block: CodeBlock,
    /// Marker groups and cleaned code
    pub markers: ExtractedMarkers,
    /// The explanation, `None` when nothing recognizable follows the block
    pub explanations: Option<ExplanationSet>,
}

/// Outcome of validating a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Every marker has exactly one explanation and vice versa
    Convertible,
    /// Numbers are missing, extra or duplicated on either side
    Mismatch {
        /// Marker numbers, duplicates kept
        code_numbers: Vec<u32>,
        /// Explanation numbers, duplicates kept
        explanation_numbers: Vec<u32>,
    },
    /// No explanation was found after the block
    MissingExplanation {
        /// Marker numbers, duplicates kept
        code_numbers: Vec<u32>,
    },
}

/// Serializable status of a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockStatus {
    /// Ready to convert
    Convertible,
    /// Numbers disagree
    Mismatch,
    /// No explanation
    MissingExplanation,
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockStatus::Convertible => write!(f, "convertible"),
            BlockStatus::Mismatch => write!(f, "mismatch"),
            BlockStatus::MissingExplanation => write!(f, "missing explanation"),
        }
    }
}

impl Classification {
    /// Check if the block can be converted
    pub fn is_convertible(&self) -> bool {
        matches!(self, Classification::Convertible)
    }

    /// Status without the number lists
    pub fn status(&self) -> BlockStatus {
        match self {
            Classification::Convertible => BlockStatus::Convertible,
            Classification::Mismatch { .. } => BlockStatus::Mismatch,
            Classification::MissingExplanation { .. } => BlockStatus::MissingExplanation,
        }
    }

    /// Turn a failed classification into the warning reported to the user
    pub fn into_warning(self, file_hint: Option<&str>, block: &CodeBlock) -> Option<Warning> {
        let file_hint = file_hint.map(str::to_string);
        let line_range = block.span();
        match self {
            Classification::Convertible => None,
            Classification::Mismatch {
                code_numbers,
                explanation_numbers,
            } => Some(Warning::Mismatch {
                file_hint,
                line_range,
                code_numbers,
                explanation_numbers,
            }),
            Classification::MissingExplanation { code_numbers } => {
                Some(Warning::MissingExplanation {
                    file_hint,
                    line_range,
                    code_numbers,
                })
            }
        }
    }
}

/// Check a number list for a repeated entry
fn has_duplicates(numbers: &[u32]) -> bool {
    let mut seen = BTreeSet::new();
    !numbers.iter().all(|n| seen.insert(*n))
}

/// Classifies conversion candidates
pub struct Validator;

impl Validator {
    /// Compare marker numbers with explanation numbers
    pub fn classify(candidate: &ConversionCandidate) -> Classification {
        let code_numbers = candidate.markers.numbers();

        let Some(ref explanations) = candidate.explanations else {
            return Classification::MissingExplanation { code_numbers };
        };
        let explanation_numbers = explanations.numbers();

        let code_set: BTreeSet<u32> = code_numbers.iter().copied().collect();
        let explanation_set: BTreeSet<u32> = explanation_numbers.iter().copied().collect();

        if code_set == explanation_set
            && !has_duplicates(&code_numbers)
            && !has_duplicates(&explanation_numbers)
        {
            Classification::Convertible
        } else {
            Classification::Mismatch {
                code_numbers,
                explanation_numbers,
            }
        }
    }
}
