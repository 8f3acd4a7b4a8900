//! Whole-conversation scenarios: the standard workflow graph run through
//! the session driver with scripted collaborators.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use clonepilot_core::{CollaboratorError, SessionDriver, StateId};
use clonepilot_test_utils::{
    payload_of, scripted_services, synthetic_backbone, synthetic_gene, ScriptedClassifier,
    ScriptedLookup, StaticLibrary,
};
use clonepilot_workflow::fields::recorded;
use clonepilot_workflow::{ids, standard_registry_with, WorkflowOptions};

const MCHERRY: &str = "ATGGTGAGCAAGGGCGAGGAGGATAACATGGCCATCATCAAGGAGTTCATGCGCTTCAAG";

fn fast_options() -> WorkflowOptions {
    WorkflowOptions {
        lookup_attempts: 2,
        lookup_retry_delay: Duration::ZERO,
    }
}

fn curated_library() -> StaticLibrary {
    let mut record = synthetic_backbone();
    record.name = "pcDNA3.1(+)".to_string();
    StaticLibrary::new().with_record(record)
}

fn driver_with(
    classifier: Arc<ScriptedClassifier>,
    lookup: Arc<ScriptedLookup>,
) -> SessionDriver {
    let registry = standard_registry_with(fast_options()).unwrap();
    let services = scripted_services(classifier, curated_library(), lookup);
    SessionDriver::new(Arc::new(registry), services).unwrap()
}

fn curated_backbone_reply() -> clonepilot_core::Payload {
    payload_of(&[
        ("Thoughts", json!("User picked the first curated option.")),
        ("Choice", json!("CURATED")),
        ("BackboneName", json!("pcDNA3.1(+)")),
        ("Status", json!("proceed")),
    ])
}

#[tokio::test]
async fn test_happy_path_curated_backbone_pasted_insert() {
    let gene = synthetic_gene();
    let classifier = Arc::new(ScriptedClassifier::with_replies(vec![
        curated_backbone_reply(),
        payload_of(&[
            ("Has exact sequence", json!("yes")),
            ("Target gene", json!("eGFP")),
        ]),
        payload_of(&[("Target gene", json!("eGFP"))]),
        payload_of(&[("Status", json!("proceed"))]),
        payload_of(&[("Selected Format", json!("FASTA"))]),
        payload_of(&[("Next Action", json!("DOWNLOAD_DESIGN"))]),
    ]));
    let mut driver = driver_with(classifier, Arc::new(ScriptedLookup::new()));

    let opening = driver.begin().await.unwrap();
    assert!(opening.text.contains("Plasmid construct designer"));
    assert!(opening.text.contains("Step 1: plasmid backbone"));
    assert!(!opening.finished);

    let reply = driver.handle_message("the pcDNA one please").await.unwrap();
    assert!(reply.text.contains("Selection made"));
    assert!(reply.text.contains("pcDNA3.1(+)"));
    assert!(reply.text.contains("Step 2: gene insert"));

    let reply = driver.handle_message("I have the sequence").await.unwrap();
    assert!(reply.text.contains("Paste the exact DNA sequence of eGFP"));

    let reply = driver
        .handle_message(&format!("here you go: {}", gene.sequence))
        .await
        .unwrap();
    assert!(reply.text.contains("Insert recorded"));
    assert!(reply.text.contains("Design so far"));
    assert!(reply.text.contains("pcDNA3.1(+) (248 bp)"));
    assert!(reply.text.contains("eGFP (84 bp)"));

    let reply = driver.handle_message("looks right, proceed").await.unwrap();
    assert!(reply.text.contains("Step 3: output format"));

    let reply = driver.handle_message("fasta please").await.unwrap();
    assert!(reply.text.contains(">Construct (mcs): eGFP in pcDNA3.1(+)"));
    assert!(reply.text.contains("**Design summary**"));
    assert!(reply.text.contains("- Total size: 332 bp"));
    assert!(reply.text.contains("Construct ready"));
    assert!(!reply.finished);

    let reply = driver.handle_message("download it").await.unwrap();
    assert!(reply.text.contains(">Construct (mcs): eGFP in pcDNA3.1(+)"));
    assert!(reply.text.contains("Session complete"));
    assert!(reply.finished);
    assert!(driver.is_finished());
}

#[tokio::test]
async fn test_lookup_mismatch_accepted_after_review() {
    let mut hit = synthetic_gene();
    hit.name = "mCherry".to_string();
    hit.sequence = MCHERRY.to_string();

    let classifier = Arc::new(ScriptedClassifier::with_replies(vec![
        curated_backbone_reply(),
        payload_of(&[
            ("Has exact sequence", json!("no")),
            ("Target gene", json!("GFP")),
        ]),
        payload_of(&[("Target gene", json!("GFP"))]),
        payload_of(&[("Status", json!("proceed"))]),
        payload_of(&[("Status", json!("proceed"))]),
        payload_of(&[("Selected Format", json!("GENBANK"))]),
    ]));
    let lookup = Arc::new(ScriptedLookup::with_replies(vec![Ok(Some(hit))]));
    let mut driver = driver_with(classifier, lookup);

    driver.begin().await.unwrap();
    driver.handle_message("pcDNA3.1(+)").await.unwrap();

    let reply = driver.handle_message("fetch GFP for me").await.unwrap();
    assert!(reply.text.contains("Looking up GFP"));
    assert!(reply.text.contains("Which gene should I fetch?"));

    let reply = driver.handle_message("GFP").await.unwrap();
    assert!(reply.text.contains("Possible mismatch"));
    assert!(reply.text.contains("**GFP**"));
    assert!(reply.text.contains("**mCherry**"));
    assert_eq!(
        driver.current_state(),
        Some(&StateId::new(ids::GENE_MISMATCH))
    );

    let reply = driver.handle_message("use it anyway").await.unwrap();
    assert!(reply.text.contains("Insert recorded"));
    assert!(reply.text.contains("mCherry (60 bp)"));

    driver.handle_message("proceed").await.unwrap();
    let reply = driver.handle_message("genbank").await.unwrap();
    assert!(reply.text.contains("LOCUS   mCherry_in_pcDNA3.1(+) 308 bp"));
    assert!(reply.text.contains("- Gene: mCherry"));
}

#[tokio::test]
async fn test_modify_loop_swaps_the_insert() {
    // First insert is pasted; the modify loop replaces it with a lookup
    // hit, and the later entry is the one that gets assembled.
    let gene = synthetic_gene();
    let mut hit = synthetic_gene();
    hit.name = "mCherry".to_string();
    hit.sequence = MCHERRY.to_string();

    let classifier = Arc::new(ScriptedClassifier::with_replies(vec![
        curated_backbone_reply(),
        payload_of(&[
            ("Has exact sequence", json!("yes")),
            ("Target gene", json!("eGFP")),
        ]),
        payload_of(&[("Target gene", json!("eGFP"))]),
        payload_of(&[("Status", json!("modify"))]),
        payload_of(&[
            ("Has exact sequence", json!("no")),
            ("Target gene", json!("mCherry")),
        ]),
        payload_of(&[("Target gene", json!("mCherry"))]),
        payload_of(&[("Status", json!("proceed"))]),
        payload_of(&[("Selected Format", json!("RAW_SEQUENCE"))]),
    ]));
    let lookup = Arc::new(ScriptedLookup::with_replies(vec![Ok(Some(hit))]));
    let mut driver = driver_with(classifier, lookup);

    driver.begin().await.unwrap();
    driver.handle_message("pcDNA3.1(+)").await.unwrap();
    driver.handle_message("I have it").await.unwrap();
    driver.handle_message(&gene.sequence).await.unwrap();

    let reply = driver.handle_message("wait, change the insert").await.unwrap();
    assert!(reply.text.contains("adjust the insert"));
    assert_eq!(driver.current_state(), Some(&StateId::new(ids::GENE_CHOICE)));

    driver.handle_message("fetch mCherry instead").await.unwrap();
    let reply = driver.handle_message("mCherry").await.unwrap();
    assert!(reply.text.contains("Insert found"));
    assert!(reply.text.contains("mCherry (60 bp)"));

    driver.handle_message("proceed").await.unwrap();
    let reply = driver.handle_message("raw").await.unwrap();
    assert!(reply.text.contains(MCHERRY));
    assert!(!reply.text.contains(&gene.sequence));
    assert!(reply.text.contains("- Gene: mCherry"));
}

#[tokio::test]
async fn test_gene_not_found_returns_to_choice_with_variants() {
    let classifier = Arc::new(ScriptedClassifier::with_replies(vec![
        curated_backbone_reply(),
        payload_of(&[
            ("Has exact sequence", json!("no")),
            ("Target gene", json!("GFPP")),
            ("Suggested variants", json!(["GFP", "eGFP"])),
        ]),
        payload_of(&[("Target gene", json!("GFPP"))]),
    ]));
    let lookup = Arc::new(ScriptedLookup::with_replies(vec![Ok(None)]));
    let mut driver = driver_with(classifier, lookup);

    driver.begin().await.unwrap();
    driver.handle_message("pcDNA3.1(+)").await.unwrap();
    driver.handle_message("fetch GFPP").await.unwrap();

    let reply = driver.handle_message("GFPP").await.unwrap();
    assert!(reply.text.contains("could not find a sequence for 'GFPP'"));
    assert!(reply.text.contains("GFP, eGFP"));
    assert_eq!(driver.current_state(), Some(&StateId::new(ids::GENE_CHOICE)));
}

#[tokio::test]
async fn test_lookup_outage_degrades_to_pasting() {
    let classifier = Arc::new(ScriptedClassifier::with_replies(vec![
        curated_backbone_reply(),
        payload_of(&[
            ("Has exact sequence", json!("no")),
            ("Target gene", json!("eGFP")),
        ]),
        payload_of(&[("Target gene", json!("eGFP"))]),
    ]));
    let lookup = Arc::new(ScriptedLookup::with_replies(vec![
        Err(CollaboratorError::Transport("connection refused".to_string())),
        Err(CollaboratorError::Transport("connection refused".to_string())),
    ]));
    let mut driver = driver_with(classifier, lookup.clone());

    driver.begin().await.unwrap();
    driver.handle_message("pcDNA3.1(+)").await.unwrap();
    driver.handle_message("fetch eGFP").await.unwrap();

    let reply = driver.handle_message("eGFP").await.unwrap();
    assert!(reply.text.contains("lookup service is unavailable"));
    assert!(reply.text.contains("Paste the exact DNA sequence"));
    assert_eq!(
        driver.current_state(),
        Some(&StateId::new(ids::GENE_SEQUENCE))
    );
    // Both configured attempts were spent
    assert_eq!(lookup.queries().len(), 2);
}

#[tokio::test]
async fn test_start_new_project_wipes_the_session() {
    let gene = synthetic_gene();
    let classifier = Arc::new(ScriptedClassifier::with_replies(vec![
        curated_backbone_reply(),
        payload_of(&[
            ("Has exact sequence", json!("yes")),
            ("Target gene", json!("eGFP")),
        ]),
        payload_of(&[("Target gene", json!("eGFP"))]),
        payload_of(&[("Status", json!("proceed"))]),
        payload_of(&[("Selected Format", json!("FASTA"))]),
        payload_of(&[("Next Action", json!("START_NEW_PROJECT"))]),
    ]));
    let mut driver = driver_with(classifier, Arc::new(ScriptedLookup::new()));

    driver.begin().await.unwrap();
    let old_session = driver.session_id().clone();
    driver.handle_message("pcDNA3.1(+)").await.unwrap();
    driver.handle_message("I have it").await.unwrap();
    driver.handle_message(&gene.sequence).await.unwrap();
    driver.handle_message("proceed").await.unwrap();
    driver.handle_message("fasta").await.unwrap();

    let reply = driver.handle_message("start over").await.unwrap();
    assert!(reply.text.contains("Starting a new project."));
    assert!(reply.text.contains("Plasmid construct designer"));
    assert!(reply.text.contains("Step 1: plasmid backbone"));
    assert!(!reply.finished);
    assert_ne!(driver.session_id(), &old_session);
    assert_eq!(
        driver
            .memory()
            .field(&StateId::new(ids::BACKBONE_METHOD), recorded::BACKBONE_SEQUENCE),
        None
    );
    assert_eq!(
        driver.current_state(),
        Some(&StateId::new(ids::BACKBONE_METHOD))
    );
}

#[tokio::test]
async fn test_repeated_unclear_answers_escalate_to_pasting() {
    let unclear = || payload_of(&[("Choice", json!("no idea")), ("Status", json!("unclear"))]);
    let classifier = Arc::new(ScriptedClassifier::with_replies(vec![
        unclear(),
        unclear(),
        unclear(),
    ]));
    let mut driver = driver_with(classifier, Arc::new(ScriptedLookup::new()));

    driver.begin().await.unwrap();
    driver.handle_message("hmm").await.unwrap();
    driver.handle_message("not sure").await.unwrap();

    let reply = driver.handle_message("whatever you think").await.unwrap();
    assert!(reply.text.contains("different route"));
    assert!(reply.text.contains("Paste the full DNA sequence"));
    assert_eq!(
        driver.current_state(),
        Some(&StateId::new(ids::BACKBONE_SEQUENCE))
    );
}

#[tokio::test]
async fn test_classifier_outage_is_a_recoverable_turn() {
    let classifier = Arc::new(ScriptedClassifier::new());
    let mut driver = driver_with(classifier.clone(), Arc::new(ScriptedLookup::new()));

    driver.begin().await.unwrap();

    // No reply scripted: the turn fails gracefully and re-prompts
    let reply = driver.handle_message("pcDNA3.1(+)").await.unwrap();
    assert!(reply.text.contains("Something went wrong"));
    assert!(reply.text.contains("Step 1: plasmid backbone"));
    assert_eq!(
        driver.current_state(),
        Some(&StateId::new(ids::BACKBONE_METHOD))
    );

    // Once the classifier is back, the same state carries on
    classifier.push(curated_backbone_reply());
    let reply = driver.handle_message("pcDNA3.1(+)").await.unwrap();
    assert!(reply.text.contains("Selection made"));
    assert!(reply.text.contains("Step 2: gene insert"));
}
