//! Scripted fakes and mockall mocks for the three collaborator traits.
//!
//! The scripted fakes queue canned replies and hand them out in order,
//! which keeps multi-turn conversation tests readable: the test script and
//! the reply script line up one to one. The mockall mocks cover
//! expectation-style unit tests.

use async_trait::async_trait;
use mockall::mock;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use clonepilot_assembly::SequenceRecord;
use clonepilot_core::{
    Classifier, CollaboratorError, LookupQuery, Payload, SequenceLookup, SequenceRepository,
    Services,
};

/// Classifier fake that replays a queue of canned payloads
///
/// Each `classify` call pops the next reply; running past the end of the
/// script returns `Unavailable`, which makes an off-by-one in a test
/// script fail loudly instead of silently reusing a reply.
#[derive(Default)]
pub struct ScriptedClassifier {
    replies: Mutex<VecDeque<Payload>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reply at the end of the script
    pub fn push(&self, payload: Payload) {
        self.replies.lock().push_back(payload);
    }

    /// Build a classifier from a whole script at once
    pub fn with_replies(replies: Vec<Payload>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts seen so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, prompt: &str) -> Result<Payload, CollaboratorError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies.lock().pop_front().ok_or_else(|| {
            CollaboratorError::Unavailable("scripted classifier has no reply queued".to_string())
        })
    }
}

/// In-memory sequence repository with case-insensitive name matching
#[derive(Default, Clone)]
pub struct StaticLibrary {
    records: Vec<SequenceRecord>,
}

impl StaticLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record
    #[must_use]
    pub fn with_record(mut self, record: SequenceRecord) -> Self {
        self.records.push(record);
        self
    }
}

#[async_trait]
impl SequenceRepository for StaticLibrary {
    async fn find_by_name(&self, name: &str) -> Result<Option<SequenceRecord>, CollaboratorError> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .records
            .iter()
            .find(|record| record.name.to_lowercase() == wanted && !record.is_empty())
            .cloned())
    }

    async fn list(&self) -> Result<Vec<SequenceRecord>, CollaboratorError> {
        Ok(self.records.clone())
    }
}

/// Lookup fake replaying a queue of canned outcomes
///
/// Outcomes are full `Result`s so a test can script transport failures
/// between successes and watch retry behavior. Queries are recorded for
/// assertion.
#[derive(Default)]
pub struct ScriptedLookup {
    replies: Mutex<VecDeque<Result<Option<SequenceRecord>, CollaboratorError>>>,
    queries: Mutex<Vec<LookupQuery>>,
}

impl ScriptedLookup {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one outcome at the end of the script
    pub fn push(&self, outcome: Result<Option<SequenceRecord>, CollaboratorError>) {
        self.replies.lock().push_back(outcome);
    }

    /// Build a lookup from a whole script at once
    pub fn with_replies(
        replies: Vec<Result<Option<SequenceRecord>, CollaboratorError>>,
    ) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries seen so far, in call order
    pub fn queries(&self) -> Vec<LookupQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SequenceLookup for ScriptedLookup {
    async fn lookup(
        &self,
        query: &LookupQuery,
    ) -> Result<Option<SequenceRecord>, CollaboratorError> {
        self.queries.lock().push(query.clone());
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(CollaboratorError::Unavailable(
                "scripted lookup has no reply queued".to_string(),
            ))
        })
    }
}

/// Bundle scripted fakes into a [`Services`] handle
pub fn scripted_services(
    classifier: Arc<ScriptedClassifier>,
    library: StaticLibrary,
    lookup: Arc<ScriptedLookup>,
) -> Services {
    Services::new(classifier, Arc::new(library), lookup)
}

mock! {
    /// mockall mock for [`Classifier`]
    pub Classifier {}

    #[async_trait]
    impl Classifier for Classifier {
        async fn classify(&self, prompt: &str) -> Result<Payload, CollaboratorError>;
    }
}

mock! {
    /// mockall mock for [`SequenceRepository`]
    pub SequenceRepository {}

    #[async_trait]
    impl SequenceRepository for SequenceRepository {
        async fn find_by_name(&self, name: &str) -> Result<Option<SequenceRecord>, CollaboratorError>;
        async fn list(&self) -> Result<Vec<SequenceRecord>, CollaboratorError>;
    }
}

mock! {
    /// mockall mock for [`SequenceLookup`]
    pub SequenceLookup {}

    #[async_trait]
    impl SequenceLookup for SequenceLookup {
        async fn lookup(&self, query: &LookupQuery) -> Result<Option<SequenceRecord>, CollaboratorError>;
    }
}
