//! Cleaner - the per-document entry point.

use tracing::debug;

use crate::document::Document;
use crate::options::CleanOptions;
use crate::prune::prune_in_place;
use crate::rules::RuleSet;

/// Outcome of cleaning one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// The document was a resource and has been cleaned.
    Cleaned(RuleSet),
    /// The document has neither kind nor apiVersion and was left alone.
    Skipped,
}

/// Cleaner applies the rule sets with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    options: CleanOptions,
}

impl Cleaner {
    pub fn new(options: CleanOptions) -> Self {
        Cleaner { options }
    }

    /// Cleans `doc` in place using the rule set registered for its kind.
    pub fn clean(&self, doc: &mut Document) -> CleanOutcome {
        if !doc.is_resource() {
            debug!("skipping document without kind or apiVersion");
            return CleanOutcome::Skipped;
        }

        let rules = RuleSet::for_kind(doc.kind());
        debug!(resource = %doc, %rules, "cleaning");
        rules.apply(doc, &self.options);

        if self.options.remove_empty {
            prune_in_place(doc.root_mut());
        }
        CleanOutcome::Cleaned(rules)
    }
}
