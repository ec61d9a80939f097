use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::entities::action::{render_menu, ActionDescriptor};
use crate::domain::entities::criteria::{Condition, Criteria, Join};
use crate::domain::entities::grid::{GridRequest, GridResponse, SortDirection};
use crate::domain::entities::row::GridRow;
use crate::domain::entities::search::{build_search_condition, SearchField};
use crate::infra::http::response::json_api_response;
use crate::usecase::error::GridError;
use crate::usecase::ports::render::ActionRenderer;
use crate::usecase::ports::repo::GridRepository;

/// What to do with a fetched record that cannot project itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Stop at the first such record and return the rows before it.
    #[default]
    Truncate,
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub row_policy: RowPolicy,
    /// When set, sorting on any other column is rejected.
    pub sortable_columns: Option<Vec<String>>,
    pub view: Option<String>,
}

pub enum Actions<R> {
    View(Arc<dyn ActionRenderer<R>>),
    Menu(Vec<ActionDescriptor<R>>),
}

impl<R> fmt::Debug for Actions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actions::View(_) => f.write_str("Actions::View"),
            Actions::Menu(menu) => f.debug_tuple("Actions::Menu").field(menu).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Value,
    Http,
}

#[derive(Debug)]
pub enum GridOutput {
    Value(GridResponse),
    Http(http::Response<Vec<u8>>),
}

/// Answers one grid draw request against a repository.
///
/// The total row count is taken at construction from the base criteria;
/// search, sort and paging are layered on top before [`GridQuery::result`]
/// runs the filtered count and the fetch.
pub struct GridQuery<R> {
    repo: Arc<dyn GridRepository<R>>,
    request: GridRequest,
    config: GridConfig,
    criteria: Criteria,
    /// Filter handed in at construction; `recordsTotal` never sees search.
    base_condition: Option<Condition>,
    total: i64,
    actions: Option<Actions<R>>,
}

impl<R: GridRow> GridQuery<R> {
    pub fn new(
        repo: Arc<dyn GridRepository<R>>,
        request: GridRequest,
        criteria: Option<Criteria>,
    ) -> Result<Self, GridError> {
        Self::with_config(repo, request, criteria, GridConfig::default())
    }

    pub fn with_config(
        repo: Arc<dyn GridRepository<R>>,
        request: GridRequest,
        criteria: Option<Criteria>,
        config: GridConfig,
    ) -> Result<Self, GridError> {
        repo.validate()
            .map_err(|err| GridError::Config(err.to_string()))?;

        let criteria = criteria.unwrap_or_default();
        let total = repo.count(&criteria.for_count())?;
        debug!(draw = request.draw, total, "grid query initialised");

        Ok(Self {
            repo,
            request,
            config,
            base_condition: criteria.condition.clone(),
            criteria,
            total,
            actions: None,
        })
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn request(&self) -> &GridRequest {
        &self.request
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Replaces the joined relations and recounts the total with them,
    /// over the base filter only.
    pub fn set_joins(&mut self, joins: Vec<Join>) -> Result<(), GridError> {
        let base = Criteria {
            condition: self.base_condition.clone(),
            joins: joins.clone(),
            ..Criteria::default()
        };
        self.total = self.repo.count(&base)?;
        self.criteria.joins = joins;
        Ok(())
    }

    pub fn set_view(&mut self, view: impl Into<String>) {
        self.config.view = Some(view.into());
    }

    pub fn set_actions(&mut self, actions: Actions<R>) {
        self.actions = Some(actions);
    }

    /// Adds the global search over `fields`. No-op without a search term, or
    /// when no field yields a predicate for it.
    pub fn set_search_fields(&mut self, fields: &[SearchField]) {
        let Some(term) = self.request.search.term() else {
            return;
        };

        if let Some(condition) = build_search_condition(fields, term) {
            debug!(term, fields = fields.len(), "grid search applied");
            self.criteria.add_condition(condition);
        }
    }

    pub fn result(self, emit: Emit) -> Result<GridOutput, GridError> {
        match emit {
            Emit::Value => self.into_response().map(GridOutput::Value),
            Emit::Http => self.into_http().map(GridOutput::Http),
        }
    }

    /// Writes the response as a JSON API body with no-cache headers.
    pub fn into_http(self) -> Result<http::Response<Vec<u8>>, GridError> {
        let response = self.into_response()?;
        Ok(json_api_response(&response, http::StatusCode::OK)?)
    }

    pub fn into_response(mut self) -> Result<GridResponse, GridError> {
        self.apply_sort()?;

        let filtered = self
            .repo
            .count(&self.criteria.for_count())?
            .min(self.total);

        self.criteria.apply_page(
            self.request.page_size(self.total),
            self.request.current_page(),
        );

        let rows = self.repo.find_all(&self.criteria)?;
        let mut data = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match self.shape_row(row)? {
                Some(columns) => data.push(columns),
                None => match self.config.row_policy {
                    RowPolicy::Truncate => {
                        warn!(
                            index,
                            fetched = rows.len(),
                            "row has no display columns, truncating"
                        );
                        break;
                    }
                    RowPolicy::Reject => return Err(GridError::NonConformingRow { index }),
                },
            }
        }

        let response = GridResponse {
            draw: self.request.draw,
            records_total: self.total,
            records_filtered: filtered,
            data,
        };
        debug!(
            draw = response.draw,
            total = response.records_total,
            filtered = response.records_filtered,
            rows = response.data.len(),
            "grid query answered"
        );

        Ok(response)
    }

    /// Only the first order entry is honoured.
    fn apply_sort(&mut self) -> Result<(), GridError> {
        let Some(order) = self.request.order.first() else {
            return Ok(());
        };
        if self.request.order.len() > 1 {
            debug!(
                ignored = self.request.order.len() - 1,
                "multi-column sort requested, using first column only"
            );
        }

        let column = usize::try_from(order.column)
            .ok()
            .and_then(|idx| self.request.columns.get(idx))
            .ok_or_else(|| {
                GridError::InvalidRequest(format!(
                    "sort column out of range: {} (columns: {})",
                    order.column,
                    self.request.columns.len()
                ))
            })?;

        if column.name.is_empty() || order.dir.is_empty() || !column.orderable {
            return Ok(());
        }

        let direction = SortDirection::parse(&order.dir).ok_or_else(|| {
            GridError::InvalidRequest(format!("unknown sort direction: {}", order.dir))
        })?;

        if let Some(sortable) = &self.config.sortable_columns {
            if !sortable.iter().any(|name| name == &column.name) {
                return Err(GridError::InvalidRequest(format!(
                    "column is not sortable: {}",
                    column.name
                )));
            }
        }

        self.criteria.set_order(column.name.clone(), direction);
        Ok(())
    }

    fn shape_row(&self, row: &R) -> Result<Option<Map<String, Value>>, GridError> {
        let Some(mut columns) = row.display_columns(self.config.view.as_deref()) else {
            return Ok(None);
        };

        match &self.actions {
            Some(Actions::View(renderer)) => {
                let html = renderer.render(row).map_err(GridError::Render)?;
                columns.insert("actions".to_string(), Value::String(html));
            }
            Some(Actions::Menu(menu)) => {
                columns.insert("actions".to_string(), Value::String(render_menu(menu, row)));
            }
            None => {}
        }

        Ok(Some(columns))
    }
}
