//! Criteria for the `GET systems` / `GET operations` search endpoints

use std::fmt::Display;

use crate::url_builder::QueryParams;

/// Filter, projection and ordering of a search
///
/// The server caps results at 100 items unless `size` says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    filters: QueryParams,
    fields: Option<String>,
    order_by: Option<String>,
    size: Option<u32>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match `key` against `value`
    pub fn filter(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.filters.push(key, value);
        self
    }

    /// Comma-separated list of fields to return
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into()).filter(|f: &String| !f.is_empty());
        self
    }

    /// Comma-separated list of fields to order by
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into()).filter(|o: &String| !o.is_empty());
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Query parameters: filters first, then `fields`, `orderBy` and `size`
    pub fn to_params(&self) -> QueryParams {
        let mut params = self.filters.clone();
        if let Some(fields) = &self.fields {
            params.push("fields", fields);
        }
        if let Some(order_by) = &self.order_by {
            params.push("orderBy", order_by);
        }
        if let Some(size) = self.size {
            params.push("size", size);
        }
        params
    }
}
