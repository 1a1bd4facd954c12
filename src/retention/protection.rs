//! Protected-id resolution.

use std::sync::Arc;

use crate::{
    db::{DbResult, MarkRepo},
    models::{MarkTable, ProtectedIds},
};

/// Computes the set of article ids that no purge may delete.
///
/// Any row in either mark table protects its article, whatever its value: a
/// relevance mark of `false` is still an editorial judgment.
#[derive(Clone)]
pub struct ProtectionResolver {
    marks: Arc<dyn MarkRepo>,
}

impl ProtectionResolver {
    pub fn new(marks: Arc<dyn MarkRepo>) -> Self {
        Self { marks }
    }

    /// Read both mark tables and return the union of their article ids.
    ///
    /// Rows whose id does not parse to an integer are dropped.
    pub async fn resolve(&self) -> DbResult<ProtectedIds> {
        let mut protected = ProtectedIds::new();

        for table in MarkTable::ALL {
            let mut discarded = 0usize;
            for raw in self.marks.list_article_ids(table).await? {
                match raw.parse() {
                    Some(id) => {
                        protected.insert(id);
                    }
                    None => discarded += 1,
                }
            }

            if discarded > 0 {
                tracing::debug!(
                    table = %table,
                    discarded,
                    "Ignoring mark rows with unparseable article ids"
                );
            }
        }

        Ok(protected)
    }
}
