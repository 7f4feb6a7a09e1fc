//! Shared types used across the query and projection layers

use sea_orm::sea_query::Order;
use serde::{Deserialize, Serialize};

pub mod errors;

pub use errors::{ConfigError, CoreError, MetadataError, ProjectionError, QueryError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum SortDirection {
	Asc,
	Desc,
}

impl From<SortDirection> for Order {
	fn from(value: SortDirection) -> Order {
		match value {
			SortDirection::Asc => Order::Asc,
			SortDirection::Desc => Order::Desc,
		}
	}
}
