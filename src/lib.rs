//! Server-side adapter for paginated, searchable, sortable grid widgets.
//!
//! A [`GridRequest`] parsed from the widget's query string is turned into
//! [`Criteria`] (search, order, window), run against a [`GridRepository`],
//! and shaped into a [`GridResponse`] or a ready-to-send HTTP response.

pub mod domain;
pub mod infra;
pub mod usecase;


pub use domain::entities::action::{ActionData, ActionDescriptor};
pub use domain::entities::criteria::{Condition, Criteria, CriteriaValue, Join};
pub use domain::entities::grid::{GridRequest, GridResponse, SortDirection};
pub use domain::entities::row::GridRow;
pub use domain::entities::search::SearchField;
pub use infra::sqlite::repo::{Model, Record, SqliteGridRepo};
pub use usecase::error::GridError;
pub use usecase::ports::render::ActionRenderer;
pub use usecase::ports::repo::{GridRepository, RepoError};
pub use usecase::services::grid_service::{
    Actions, Emit, GridConfig, GridOutput, GridQuery, RowPolicy,
};
