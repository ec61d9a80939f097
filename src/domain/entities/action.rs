use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::entities::row::GridRow;

/// Value of one `data-*` attribute on a menu entry.
///
/// Deserializes from either a bare string or `{"value": "<field>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ActionData {
    Literal(String),
    Field { value: String },
}

impl ActionData {
    pub fn field(name: impl Into<String>) -> Self {
        ActionData::Field { value: name.into() }
    }

    fn resolve<R: GridRow>(&self, row: &R) -> String {
        match self {
            ActionData::Literal(value) => value.clone(),
            ActionData::Field { value } => row.resolve_field(value).unwrap_or_default(),
        }
    }
}

pub type Visibility<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

pub struct ActionDescriptor<R> {
    pub text: String,
    pub data: BTreeMap<String, ActionData>,
    pub visible: Option<Visibility<R>>,
}

impl<R> ActionDescriptor<R> {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: BTreeMap::new(),
            visible: None,
        }
    }

    pub fn data(mut self, name: impl Into<String>, value: ActionData) -> Self {
        self.data.insert(name.into(), value);
        self
    }

    pub fn visible_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.visible = Some(Arc::new(predicate));
        self
    }

    fn is_visible(&self, row: &R) -> bool {
        self.visible.as_ref().map_or(true, |predicate| predicate(row))
    }
}

impl<R> Clone for ActionDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            data: self.data.clone(),
            visible: self.visible.clone(),
        }
    }
}

impl<R> fmt::Debug for ActionDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("text", &self.text)
            .field("data", &self.data)
            .field("conditional", &self.visible.is_some())
            .finish()
    }
}

/// Dropdown menu for one row, listing only the actions visible for it.
pub fn render_menu<R: GridRow>(actions: &[ActionDescriptor<R>], row: &R) -> String {
    let mut html = String::from(
        "<div class=\"btn-group\"><button type=\"button\" class=\"btn btn-default btn-xs dropdown-toggle\" data-toggle=\"dropdown\" aria-haspopup=\"true\" aria-expanded=\"false\"><span class=\"caret\"></span></button><ul class=\"dropdown-menu dropdown-menu-right\">",
    );

    for action in actions.iter().filter(|action| action.is_visible(row)) {
        html.push_str("<li><a href=\"#\"");
        for (name, value) in &action.data {
            let _ = write!(
                html,
                " data-{}=\"{}\"",
                escape_html(name),
                escape_html(&value.resolve(row))
            );
        }
        let _ = write!(html, ">{}</a></li>", escape_html(&action.text));
    }

    html.push_str("</ul></div>");
    html
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
