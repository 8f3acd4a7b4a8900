use serde::{Deserialize, Serialize};

use crate::construct::Construct;

/// How the finished construct is rendered back to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Bare sequence, nothing else
    RawSequence,
    /// FASTA with a one-line construct header
    Fasta,
    /// GenBank-flavored record (LOCUS/DEFINITION header, not a full parser
    /// target)
    Genbank,
}

impl OutputFormat {
    /// Parse the classifier's format label, case-insensitively
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "RAW_SEQUENCE" | "RAW" => Some(OutputFormat::RawSequence),
            "FASTA" => Some(OutputFormat::Fasta),
            "GENBANK" => Some(OutputFormat::Genbank),
            _ => None,
        }
    }

    /// Upper-case label, the same vocabulary the classifier returns
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::RawSequence => "RAW_SEQUENCE",
            OutputFormat::Fasta => "FASTA",
            OutputFormat::Genbank => "GENBANK",
        }
    }

    /// Render a construct in this format
    pub fn render(&self, construct: &Construct) -> String {
        match self {
            OutputFormat::RawSequence => construct.final_sequence.clone(),
            OutputFormat::Fasta => format!(
                ">Construct ({}): {} in {}\n{}",
                construct.method, construct.gene_name, construct.backbone_name,
                construct.final_sequence
            ),
            OutputFormat::Genbank => format!(
                "LOCUS   {}_in_{} {} bp\nDEFINITION  Expression construct ({})\nSEQUENCE\n{}\n//",
                construct.gene_name,
                construct.backbone_name,
                construct.len(),
                construct.method,
                construct.final_sequence
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
