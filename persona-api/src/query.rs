//! Sort and pagination assembly for person listings
//!
//! Turns raw query-string values into validated [`SortOptions`] and
//! [`PaginateOptions`], filling gaps from the configured [`QueryDefaults`].

use persona_common::config::QueryDefaults;
use persona_common::models::{SortField, SortOrder};
use persona_common::{Error, Result};
use serde::Deserialize;

/// Sort directives as received (`?sort_by=age&sort_order=desc`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSort {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Paging directives as received (`?page=0&per_page=20`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPaginate {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    pub field: SortField,
    pub order: SortOrder,
}

/// Zero-based page of `per_page` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginateOptions {
    pub page: i64,
    pub per_page: i64,
}

impl PaginateOptions {
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.per_page)
    }
}

/// Resolve raw directives against the defaults
///
/// Blank strings count as absent. `per_page` above the configured maximum is
/// clamped; everything else that is out of range is a `BadRequest`.
pub fn resolve(
    raw_sort: &RawSort,
    raw_paginate: &RawPaginate,
    defaults: &QueryDefaults,
) -> Result<(SortOptions, PaginateOptions)> {
    let field = non_blank(&raw_sort.sort_by)
        .unwrap_or(defaults.default_sort_field.as_str())
        .parse::<SortField>()?;
    let order = non_blank(&raw_sort.sort_order)
        .unwrap_or(defaults.default_sort_order.as_str())
        .parse::<SortOrder>()?;

    let page = raw_paginate.page.unwrap_or(defaults.default_page);
    if page < 0 {
        return Err(Error::BadRequest(format!("page must be >= 0, got {}", page)));
    }

    let per_page = raw_paginate.per_page.unwrap_or(defaults.default_per_page);
    if per_page < 1 {
        return Err(Error::BadRequest(format!(
            "per_page must be >= 1, got {}",
            per_page
        )));
    }

    Ok((
        SortOptions { field, order },
        PaginateOptions {
            page,
            per_page: per_page.min(defaults.max_per_page),
        },
    ))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
