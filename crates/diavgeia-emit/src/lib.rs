//! Type-directed N3 triple emission for Diavgeia decisions.
//!
//! Turns one `Decision` record into the canonical triple-block document the
//! triple store ingests. Emission is a pure, synchronous computation: the
//! only state is the output buffer and a document-global verifier counter,
//! both local to one generation call, so independent generations can run
//! concurrently without coordination.
//!
//! Emission is best-effort: a missing or empty field suppresses exactly the
//! triples gated on it and never raises an error. A record that fails the
//! gate for an entity block another block references produces a dangling
//! reference; the target store tolerates this and so do we.
//!
//! Stage order (each stage appends to the shared buffer):
//! 1. prefixes + header (`header`), which dispatches into the per-type rule
//!    table (`rules`) unless benchmarking,
//! 2. narrative bodies (`body`),
//! 3. auxiliary entities (`entities`), skipped when benchmarking.

mod body;
mod entities;
mod header;
mod kallikratis;
mod linking;
mod literal;
mod rules;

use chrono::{DateTime, Utc};
use diavgeia_model::{Decision, DecisionFields};

pub use literal::Term;

pub const ONT_IRI: &str = "<http://diavgeia.gov.gr/ontology/>";
pub const ELI_IRI: &str = "<http://data.europa.eu/eli/ontology#>";
pub const LEG_IRI: &str = "<http://legislation.di.uoa.gr/eli/>";
/// Base IRI every decision document (and cross-decision reference) hangs off.
pub const DECISION_BASE: &str = "http://diavgeia.gov.gr/eli/decision/";

/// Generate the N3 document for a decision, stamped with the current time.
pub fn generate(decision: &Decision) -> String {
    generate_at(decision, Utc::now())
}

/// Generate with an explicit timestamp. `submission_timestamp` (epoch
/// milliseconds) and `eli:date_publication` (`YYYY-MM-DD`) both derive from
/// `now`, which keeps document generation deterministic under test.
pub fn generate_at(decision: &Decision, now: DateTime<Utc>) -> String {
    let mut emitter = Emitter::new(decision, now);
    emitter.write_prefixes();
    emitter.write_general_info();
    emitter.write_decision_body();
    if !decision.benchmark {
        emitter.write_rest_entities();
    }
    emitter.finish()
}

/// One generation in progress: the decision under emission, the shared
/// ordered output buffer, and the verifier counter that numbers
/// `Verifier/<n>` subjects across every verification group in the document.
pub(crate) struct Emitter<'a> {
    decision: &'a Decision,
    now: DateTime<Utc>,
    out: String,
    verifier_counter: u32,
}

impl<'a> Emitter<'a> {
    fn new(decision: &'a Decision, now: DateTime<Utc>) -> Self {
        Self {
            decision,
            now,
            out: String::with_capacity(4096),
            verifier_counter: 1,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    pub(crate) fn decision(&self) -> &'a Decision {
        self.decision
    }

    pub(crate) fn fields(&self) -> &'a DecisionFields {
        &self.decision.fields
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// `\t<prefix>:<name> <term>` with the block-position terminator.
    pub(crate) fn triple(&mut self, prefix: &str, name: &str, term: Term<'_>, last: bool) {
        let line = literal::format_triple(prefix, name, term, last);
        self.out.push_str(&line);
    }

    /// Opens a triple block: `<local> a ont:<class>;`.
    pub(crate) fn subject(&mut self, local: &str, class: &str) {
        self.out.push('<');
        self.out.push_str(local);
        self.out.push_str("> a ont:");
        self.out.push_str(class);
        self.out.push_str(";\n");
    }

    pub(crate) fn next_verifier(&mut self) -> u32 {
        let n = self.verifier_counter;
        self.verifier_counter += 1;
        n
    }
}

/// Renders a possibly-absent value where the original format emits the
/// property unconditionally: absent becomes the empty string, keeping the
/// block shape (and every reference into it) stable.
pub(crate) fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}
