//! Wire DTO → domain conversion.
//!
//! Nothing here fails. A field that is missing, blank or malformed becomes
//! absent or takes its documented default, and the entity is still built.

pub mod task;
pub mod user;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::dto::PageDto;
use crate::model::page::PagedResult;
use crate::model::task::{TaskPriority, TaskStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Conversion from a wire DTO to its domain entity.
pub trait ToDomain {
    type Entity;

    fn to_domain(self) -> Self::Entity;
}

/// Absent in, absent out; anything present always yields an entity.
pub fn to_domain<D: ToDomain>(dto: Option<D>) -> Option<D::Entity> {
    dto.map(ToDomain::to_domain)
}

/// Absent list → empty list. Absent entries are skipped, not kept as holes.
pub fn to_domain_list<D: ToDomain>(dtos: Option<Vec<Option<D>>>) -> Vec<D::Entity> {
    dtos.unwrap_or_default()
        .into_iter()
        .filter_map(to_domain)
        .collect()
}

/// Page metadata passes through as sent; only the items are mapped.
pub fn to_paged<D: ToDomain>(page: PageDto<D>) -> PagedResult<D::Entity> {
    PagedResult {
        current_page: page.current_page,
        last_page: page.last_page,
        per_page: page.per_page,
        total: page.total,
        items: to_domain_list(page.data),
    }
}

/// Trim; blank becomes absent.
pub fn clean(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalise the date formats the server has used into `YYYY-MM-DD`.
pub fn parse_date(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    // Already `YYYY-MM-DD`, with or without a trailing time: kept as sent.
    if has_date_prefix(value) {
        return first_ten(value);
    }

    if value.contains('T') {
        return parse_iso_date(value)
            .map(|date| date.format(DATE_FORMAT).to_string())
            .or_else(|| first_ten(value));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(|date| date.format(DATE_FORMAT).to_string())
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").map(|dt| dt.date()))
        .ok()
}

fn first_ten(value: &str) -> Option<String> {
    let head: String = value.chars().take(10).collect();
    if head.chars().count() == 10 {
        Some(head)
    } else {
        None
    }
}

/// `dddd-dd-dd` at the start of the string.
fn has_date_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Case-insensitive; anything unknown is `Pending`.
pub fn parse_status(value: Option<&str>) -> TaskStatus {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("pending") => TaskStatus::Pending,
        Some("running") | Some("in_progress") => TaskStatus::Running,
        Some("completed") => TaskStatus::Completed,
        Some("cancelled") | Some("canceled") => TaskStatus::Cancelled,
        _ => TaskStatus::default(),
    }
}

/// Case-insensitive; `urgent` counts as `High`, anything unknown is `Normal`.
pub fn parse_priority(value: Option<&str>) -> TaskPriority {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("low") => TaskPriority::Low,
        Some("normal") | Some("medium") => TaskPriority::Normal,
        Some("high") | Some("urgent") => TaskPriority::High,
        _ => TaskPriority::default(),
    }
}
