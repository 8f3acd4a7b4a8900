//! Field names shared between classifier replies and session memory.
//!
//! Classifier reply fields are part of the prompt contract: the templates in
//! [`crate::prompts`] instruct the classifier to answer with exactly these
//! keys, so changing one here means changing the template too. Recorded
//! fields are internal and only need to agree between the state that writes
//! them and the states that read them back.

/// Keys the classifier is instructed to return.
pub mod reply {
    /// Free-text reasoning, surfaced to the user as the selection rationale
    pub const THOUGHTS: &str = "Thoughts";

    /// Backbone acquisition choice, one of the labels in
    /// [`crate::views::BackboneChoice`]
    pub const CHOICE: &str = "Choice";

    /// Generic proceed/modify style decision
    pub const STATUS: &str = "Status";

    pub const BACKBONE_NAME: &str = "BackboneName";

    /// Whether the user's message contained a pasted sequence (boolean)
    pub const SEQUENCE_PROVIDED: &str = "SequenceProvided";

    /// The sequence the classifier pulled out of the message
    pub const SEQUENCE_EXTRACTED: &str = "SequenceExtracted";

    pub const PROMOTER: &str = "Promoter";
    pub const SELECTION_MARKER: &str = "SelectionMarker";
    pub const ORIGIN: &str = "Origin";

    /// yes/no: does the user hold the exact insert sequence
    pub const HAS_EXACT_SEQUENCE: &str = "Has exact sequence";

    pub const TARGET_GENE: &str = "Target gene";

    /// The insert sequence when the user pasted it inline with their choice
    pub const GENE_SEQUENCE_PROVIDED: &str = "Sequence provided";

    /// Close variants of the requested gene the classifier suggests trying
    pub const SUGGESTED_VARIANTS: &str = "Suggested variants";

    /// Lower-case reasoning key used by the insert-choice template
    pub const RATIONALE: &str = "rationale";

    /// Why a recommended backbone fits the stated requirements
    pub const DETAILS: &str = "Details";

    /// One of GENBANK, FASTA, RAW_SEQUENCE
    pub const SELECTED_FORMAT: &str = "Selected Format";

    /// One of DOWNLOAD_DESIGN, MODIFY_DESIGN, START_NEW_PROJECT
    pub const NEXT_ACTION: &str = "Next Action";

    // Gene-identification reply keys
    pub const GENE_NAME: &str = "Gene Name";
    pub const ORGANISM: &str = "Organism";
    pub const CONFIDENCE: &str = "Confidence";
    pub const REASONING: &str = "Reasoning";
    pub const ALTERNATIVE_GENES: &str = "Alternative Genes";
}

/// Keys states write into session memory for later states to read.
pub mod recorded {
    pub const BACKBONE_NAME: &str = "BackboneName";
    pub const BACKBONE_SEQUENCE: &str = "BackboneSequence";
    pub const PROMOTER: &str = "Promoter";
    pub const SELECTION_MARKER: &str = "SelectionMarker";
    pub const ORIGIN: &str = "Origin";

    pub const GENE_NAME: &str = "GeneName";
    pub const GENE_SEQUENCE: &str = "GeneSequence";

    /// What the user asked the lookup for, kept when the hit did not match
    pub const REQUESTED_GENE_NAME: &str = "RequestedGeneName";

    /// Variant names to suggest when a lookup comes back empty
    pub const SUGGESTED_VARIANTS: &str = "SuggestedVariants";

    /// Mismatched lookup hit, held until the user accepts or rejects it
    pub const PENDING_GENE_NAME: &str = "PendingGeneName";
    pub const PENDING_GENE_SEQUENCE: &str = "PendingGeneSequence";

    pub const SELECTED_FORMAT: &str = "SelectedFormat";
    pub const METHOD: &str = "Method";
    pub const INSERTION_POSITION: &str = "InsertionPosition";
    pub const CONSTRUCT_SEQUENCE: &str = "ConstructSequence";

    /// The construct as shown to the user, kept for the download reprise
    pub const RENDERED_CONSTRUCT: &str = "RenderedConstruct";
}
