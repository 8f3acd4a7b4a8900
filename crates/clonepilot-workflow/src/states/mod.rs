//! The concrete conversation states, one module per state.

mod backbone_lookup;
mod backbone_method;
mod backbone_recommend;
mod backbone_sequence;
mod construct_confirm;
mod entry;
mod final_summary;
mod gene_choice;
mod gene_lookup;
mod gene_mismatch;
mod gene_sequence;
mod output_format;
mod support;

pub use backbone_lookup::BackboneLookup;
pub use backbone_method::BackboneMethod;
pub use backbone_recommend::BackboneRecommend;
pub use backbone_sequence::BackboneSequence;
pub use construct_confirm::ConstructConfirm;
pub use entry::Entry;
pub use final_summary::FinalSummary;
pub use gene_choice::GeneChoice;
pub use gene_lookup::GeneLookup;
pub use gene_mismatch::GeneMismatch;
pub use gene_sequence::GeneSequence;
pub use output_format::OutputFormatSelection;
