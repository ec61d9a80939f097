use serde_json::{Map, Value};

/// What every fetched record must offer to be shown in a grid.
pub trait GridRow {
    /// Column-name → value mapping for one grid row. `view` selects an
    /// alternative projection when the same record backs several grids.
    ///
    /// `None` means the record cannot be displayed.
    fn display_columns(&self, view: Option<&str>) -> Option<Map<String, Value>>;

    /// Text value of a named field, used for action `data-*` attributes.
    fn resolve_field(&self, _field: &str) -> Option<String> {
        None
    }
}
