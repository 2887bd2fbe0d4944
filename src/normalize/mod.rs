//! Normalization pipeline
//!
//! Runs after every edit to restore the tree invariants. The mutation log is
//! the work queue: each round drains it and runs the passes in fixed order
//! (line breaks, tokenizer, exclusivity, markers, caret). Rounds repeat until
//! a round leaves no new mutations behind, so callers only ever observe a
//! fixpoint.

pub mod exclusivity;
pub mod line_break;
pub mod markers;
pub mod tokenizer;

use crate::classify::Classifier;
use crate::config::EditorConfig;
use crate::model::{Document, Node};

pub use markers::MarkerSync;

/// Upper bound on rounds per settle; a well-formed tree converges in two or
/// three
pub const MAX_ROUNDS: usize = 16;

/// Read-only context shared by the passes
#[derive(Clone, Copy)]
pub struct Pass<'a> {
    pub config: &'a EditorConfig,
    pub classifier: &'a dyn Classifier,
}

impl<'a> Pass<'a> {
    pub fn new(config: &'a EditorConfig, classifier: &'a dyn Classifier) -> Self {
        Self { config, classifier }
    }

    /// Build a detached token for `word`, labelled by the oracle
    pub fn make_token(&self, doc: &mut Document, word: &str) -> Node {
        let label = self.classifier.classify(word);
        let disabled = !self.classifier.is_resolvable(&label);
        doc.create_token(word, label, disabled, self.config.token_style)
    }
}

/// What a settle did, for the update layer to turn into notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub rounds: usize,
    /// Mutations drained across all rounds
    pub mutations: usize,
    /// A user-typed line break was stripped
    pub submitted: bool,
    /// Runs split into tokens
    pub tokenized: usize,
    /// Tokens turned back into text by exclusivity
    pub demoted: usize,
}

impl Outcome {
    pub fn changed(&self) -> bool {
        self.mutations > 0
    }
}

/// Drain the mutation log to a fixpoint
pub fn settle(doc: &mut Document, markers: &mut MarkerSync, pass: &Pass<'_>) -> Outcome {
    let config = pass.config;
    let mut outcome = Outcome::default();

    for round in 0..MAX_ROUNDS {
        let batch = doc.take_mutations();
        if batch.is_empty() && round > 0 {
            return outcome;
        }
        outcome.rounds += 1;
        outcome.mutations += batch.len();
        tracing::trace!(round, mutations = batch.len(), "normalize round");

        if !config.allow_multiline {
            outcome.submitted |= line_break::strip(doc, &batch);
        }

        // exclusivity wins over splitting when both are configured
        if config.tokenize_on_space && !config.exclusive {
            let mut seen = Vec::new();
            for m in batch.iter().filter(|m| m.is_user_text_edit()) {
                if seen.contains(&m.id) {
                    continue;
                }
                seen.push(m.id);
                if tokenizer::tokenize_run(doc, m.id, pass) {
                    outcome.tokenized += 1;
                }
            }
        }

        if config.exclusive && batch.iter().any(|m| m.is_user_text_edit()) {
            outcome.demoted += exclusivity::enforce(doc, pass);
        }

        markers.reconcile(doc, &batch, &config.marker_payload, config.uses_markers());
        markers::compensate_caret(doc);
    }

    tracing::warn!(
        rounds = MAX_ROUNDS,
        pending = doc.has_pending_mutations(),
        "normalization did not reach a fixpoint"
    );
    doc.take_mutations();
    outcome
}
