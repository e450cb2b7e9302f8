//! Identifier quoting.

use std::fmt;

/// Quote identifier with backticks, doubling embedded backticks.
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// The physical table of a layer: `annotation_layer_<id>`.
///
/// System layers have negative ids, so their table names contain `-` and
/// must be backtick-quoted; ordinary layers are emitted bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerTable(i64);

impl LayerTable {
    pub fn new(layer_id: i64) -> Self {
        Self(layer_id)
    }

    /// The unquoted table name.
    pub fn name(self) -> String {
        format!("annotation_layer_{}", self.0)
    }
}

impl fmt::Display for LayerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "{}", quote_backtick(&self.name()))
        } else {
            write!(f, "{}", self.name())
        }
    }
}
