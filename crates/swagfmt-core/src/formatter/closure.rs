use serde_json::Value;

use crate::JsonMap;
use crate::error::FormatError;
use crate::model::DataType;

use super::BuildContext;
use super::defined::format_defined_type;

/// Work list of defined types discovered while building schemas for
/// parameters, responses, and elements. Scoped to one format run.
#[derive(Debug, Default)]
pub(crate) struct ReferenceQueue {
    pending: Vec<(String, DataType)>,
}

impl ReferenceQueue {
    pub(crate) fn enqueue(&mut self, id: String, ty: DataType) {
        self.pending.push((id, ty));
    }

    pub(crate) fn take_batch(&mut self) -> Vec<(String, DataType)> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Drain the queue into `definitions` until a full pass adds nothing.
///
/// Writing out a type can reference further types, so this is a fixpoint
/// loop. An id already present in `definitions` is never rebuilt, which makes
/// the loop terminate on a finite type graph and a re-drain of a stabilized
/// queue a no-op.
pub(crate) fn drain_references(
    ctx: &mut BuildContext<'_>,
    definitions: &mut JsonMap,
) -> Result<(), FormatError> {
    while !ctx.referenced.is_empty() {
        let batch = ctx.referenced.take_batch();
        for (id, ty) in batch {
            if definitions.contains_key(&id) {
                continue;
            }
            let schema = format_defined_type(ctx, &ty, true)?;
            definitions.insert(id, Value::Object(schema));
        }
    }
    Ok(())
}
