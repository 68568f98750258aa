//! Combines the configured predicates into one inclusion decision
pub mod predicate;

use crate::entry::Entry;
use crate::search::SearchConfig;
use log::trace;

pub use predicate::Predicate;

/// Logical AND over every configured predicate. Absent constraints contribute
/// no predicate, so an empty pipeline accepts everything.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    predicates: Vec<Predicate>,
}

impl FilterPipeline {
    pub fn new(mut predicates: Vec<Predicate>) -> Self {
        predicates.sort_by_key(Predicate::cost);
        Self { predicates }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        let mut predicates = vec![Predicate::Type(config.file_type())];
        if let Some(uid) = config.uid() {
            predicates.push(Predicate::Owner(uid));
        }
        if let Some(gid) = config.gid() {
            predicates.push(Predicate::Group(gid));
        }
        if let Some(perm) = config.perm() {
            predicates.push(Predicate::Perm(*perm));
        }
        if let Some(name) = config.name() {
            predicates.push(Predicate::Name(name.clone()));
        }
        Self::new(predicates)
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        for predicate in &self.predicates {
            if !predicate.test(entry) {
                trace!(
                    "{} rejected by {} predicate",
                    entry.path.display(),
                    predicate.name()
                );
                return false;
            }
        }
        true
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}
