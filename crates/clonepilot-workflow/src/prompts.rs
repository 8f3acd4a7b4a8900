//! Prompt catalogue: user-facing request messages and classifier templates.
//!
//! Templates are plain constants with `{key}` placeholders, filled through
//! the pure [`fill`] function. Nothing here holds state, so two sessions can
//! never see each other's substitutions. The classifier templates end with
//! the exact JSON schema the reply must follow; the keys in those schemas
//! are the constants in [`crate::fields::reply`].

/// Replace every `{key}` placeholder with its value
///
/// Unknown placeholders are left as-is, which keeps the JSON schemas inside
/// classifier templates intact.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Opening banner, shown once per session by the entry state
pub const ENTRY_BANNER: &str = "**Plasmid construct designer**\n\n\
We will design an expression construct in three moves: pick a plasmid \
backbone, specify the gene insert, then choose how the finished construct \
should be rendered. You can change course at any point before the final \
confirmation.";

pub const BACKBONE_METHOD_REQUEST: &str = "**Step 1: plasmid backbone**\n\n\
How would you like to provide the backbone?\n\n\
{options}\n\n\
You can pick a curated option, paste your own sequence, give me a backbone \
name to look up, or describe your requirements and I will recommend one.";

pub const BACKBONE_SEQUENCE_REQUEST: &str = "Paste the full DNA sequence of \
your backbone (plain text, A/C/G/T). Include its name if it has one, and any \
promoter, selection marker, or origin details you want recorded.";

pub const BACKBONE_LOOKUP_REQUEST: &str = "Which backbone should I look \
up?{hint} Give me the plasmid name as published.";

pub const BACKBONE_RECOMMEND_REQUEST: &str = "Describe what you need from \
the backbone: expression system, promoter preference, selection marker, and \
anything else that matters. I will recommend one of the curated options:\n\n\
{options}";

pub const GENE_CHOICE_REQUEST: &str = "**Step 2: gene insert**\n\n\
Do you already have the exact DNA sequence of the gene to insert, or should \
I fetch it by name?";

pub const GENE_SEQUENCE_REQUEST: &str = "Paste the exact DNA sequence of \
{gene} (plain text, A/C/G/T).";

pub const GENE_LOOKUP_REQUEST: &str = "Which gene should I fetch?{hint} An \
official symbol works best.";

pub const GENE_MISMATCH_REQUEST: &str = "**Possible mismatch**\n\n\
You asked for **{requested}**, but the lookup returned **{found}** \
({length} bp). Should I use that sequence anyway, or try a different name?";

pub const CONSTRUCT_CONFIRM_REQUEST: &str = "**Design so far**\n\n\
- Backbone: {backbone} ({backbone_len} bp)\n\
- Insert: {gene} ({gene_len} bp)\n\n\
Shall I proceed to the output format, or would you like to modify the \
design first?";

/// Shown when the confirmation state is reached without both sequences;
/// the format step that follows routes back to whatever is missing
pub const CONSTRUCT_CONFIRM_REQUEST_BARE: &str = "Shall I proceed to the \
output format, or would you like to modify the design first?";

pub const OUTPUT_FORMAT_REQUEST: &str = "**Step 3: output format**\n\n\
How should the finished construct be rendered? I can produce GenBank, \
FASTA, or the raw sequence.";

pub const FINAL_SUMMARY_REQUEST: &str = "**Construct ready**\n\n\
Your design is complete. I can print the final design once more \
(download), modify the design, or start a new project.";

pub const BACKBONE_METHOD_CLASSIFY: &str = "You are helping a user choose a \
plasmid backbone for an expression construct. The curated options are:\n\
{options}\n\n\
User message:\n{message}\n\n\
Decide how the user wants to provide the backbone. Reply with exactly one \
JSON object:\n\
{\"Thoughts\": \"<brief reasoning>\", \
\"Choice\": \"<CURATED | CUSTOM_SEQUENCE | LOOKUP_BY_NAME | RECOMMEND>\", \
\"BackboneName\": \"<the curated option they picked, empty otherwise>\", \
\"Status\": \"<proceed | unclear>\"}";

pub const BACKBONE_SEQUENCE_CLASSIFY: &str = "The user was asked to paste a \
plasmid backbone sequence.\n\n\
User message:\n{message}\n\n\
Extract what was provided. Reply with exactly one JSON object:\n\
{\"BackboneName\": \"<name if mentioned, empty otherwise>\", \
\"SequenceProvided\": <true | false>, \
\"SequenceExtracted\": \"<the DNA sequence, empty if none>\", \
\"Promoter\": \"<promoter if mentioned>\", \
\"SelectionMarker\": \"<marker if mentioned>\", \
\"Origin\": \"<origin if mentioned>\", \
\"Status\": \"<proceed | unclear>\"}";

pub const BACKBONE_NAME_CLASSIFY: &str = "The user was asked which plasmid \
backbone to look up.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"BackboneName\": \"<the plasmid name, empty if none given>\"}";

pub const BACKBONE_RECOMMEND_CLASSIFY: &str = "The user described what they \
need from a plasmid backbone. The curated options are:\n\
{options}\n\n\
User message:\n{message}\n\n\
Recommend the curated option that fits best. Reply with exactly one JSON \
object:\n\
{\"Thoughts\": \"<brief reasoning>\", \
\"BackboneName\": \"<name of the recommended option, empty if the \
requirements are too unclear>\", \
\"Details\": \"<one sentence on why it fits>\"}";

pub const GENE_CHOICE_CLASSIFY: &str = "The user was asked whether they \
hold the exact DNA sequence of their gene insert or want it fetched by \
name.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"Has exact sequence\": \"<yes | no>\", \
\"Target gene\": \"<gene name if mentioned, empty otherwise>\", \
\"Sequence provided\": \"<DNA sequence if pasted inline, empty otherwise>\", \
\"Suggested variants\": [\"<close variants of the gene name, if any>\"], \
\"rationale\": \"<brief reasoning>\"}";

pub const GENE_SEQUENCE_CLASSIFY: &str = "The user was asked to paste the \
DNA sequence of their gene insert.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"Target gene\": \"<gene name if mentioned, empty otherwise>\"}";

pub const GENE_NAME_CLASSIFY: &str = "The user was asked which gene to \
fetch.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"Target gene\": \"<the gene name, empty if none given>\"}";

pub const GENE_MISMATCH_CLASSIFY: &str = "The user asked for the gene \
'{requested}' but the lookup returned '{found}'. They were asked whether to \
use the returned sequence anyway or retry with a different name.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"Thoughts\": \"<brief reasoning>\", \
\"Status\": \"<proceed | retry | unclear>\"}";

pub const CONSTRUCT_CONFIRM_CLASSIFY: &str = "The user saw a summary of \
their construct design and was asked to confirm it or modify it.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"Thoughts\": \"<brief reasoning>\", \
\"Status\": \"<proceed | modify | unclear>\"}";

pub const OUTPUT_FORMAT_CLASSIFY: &str = "The user was asked how the \
finished construct should be rendered.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"Thoughts\": \"<brief reasoning>\", \
\"Selected Format\": \"<GENBANK | FASTA | RAW_SEQUENCE>\"}";

pub const FINAL_SUMMARY_CLASSIFY: &str = "The construct design is finished. \
The user was asked whether to download the design, modify it, or start a \
new project.\n\n\
User message:\n{message}\n\n\
Reply with exactly one JSON object:\n\
{\"Thoughts\": \"<brief reasoning>\", \
\"Next Action\": \"<DOWNLOAD_DESIGN | MODIFY_DESIGN | START_NEW_PROJECT>\"}";

pub const GENE_IDENTIFY_CLASSIFY: &str = "Identify the gene this DNA \
sequence most likely encodes. The sequence may be truncated.\n\n\
Sequence:\n{sequence}\n\n\
Reply with exactly one JSON object:\n\
{\"Gene Name\": \"<most likely gene>\", \
\"Organism\": \"<most likely organism>\", \
\"Confidence\": \"<high | medium | low>\", \
\"Reasoning\": \"<brief reasoning>\", \
\"Alternative Genes\": [\"<other candidates, if any>\"]}";
