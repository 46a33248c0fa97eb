use std::collections::BTreeMap;

use crate::foundation::error::StyleResult;

/// Parameter handling shared by all symbolizers.
///
/// Names a concrete symbolizer does not recognize end up here. They are kept for
/// inspection and never rejected.
#[derive(Clone, Debug, Default)]
pub struct SymbolizerBase {
    unhandled: BTreeMap<String, String>,
}

impl SymbolizerBase {
    pub fn bind_parameter(&mut self, name: &str, value: &str) -> StyleResult<()> {
        tracing::debug!(name, value, "ignoring unsupported symbolizer parameter");
        self.unhandled.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    /// Parameters that were bound but not understood, by name.
    pub fn unhandled_parameters(&self) -> &BTreeMap<String, String> {
        &self.unhandled
    }
}
