//!
//! Clonepilot Assembly - the sequence arithmetic behind the conversation
//!
//! Pure, synchronous code: sequence records and alphabet checks, the
//! restriction-site catalogue, the insertion-point decision ladder, and the
//! renderers for the finished construct. Nothing here talks to a
//! collaborator or keeps state; given the same backbone and gene it always
//! produces the same construct.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Sequence records and alphabet handling
pub mod sequence;

/// Restriction-site and promoter-motif scanning
pub mod sites;

/// Gene insertion into a backbone
pub mod insert;

/// The assembled construct
pub mod construct;

/// Output rendering (raw, FASTA, GenBank-style)
pub mod format;

/// Error types
pub mod error;

// Re-export key types
pub use construct::Construct;
pub use error::AssemblyError;
pub use format::OutputFormat;
pub use insert::{insert_gene, Insertion, InsertionMethod};
pub use sequence::{
    is_valid_dna, longest_dna_run, sanitize_sequence, SequenceRecord, MIN_BACKBONE_LEN,
};
pub use sites::{find_promoter_motif, find_recognition_sites, PromoterMatch, SiteMatch};
