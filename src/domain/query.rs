//! Read-side views over in-memory collections.
//!
//! Every function here takes its input by reference and returns a fresh
//! collection; the source slice is never reordered or modified.

use std::cmp::Reverse;

use serde::Deserialize;

use crate::domain::clock::parse_iso8601;
use crate::domain::models::{Device, LogEntry};

/// Filters accepted by the logs listing, all optional and combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogQuery {
    pub severity: Option<String>,
    pub device: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
}

impl LogQuery {
    /// Only a positive integer limits the result; anything else is ignored.
    pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
        raw?.trim().parse::<usize>().ok().filter(|limit| *limit > 0)
    }
}

pub fn filter_devices_by_status(devices: &[Device], status: Option<&str>) -> Vec<Device> {
    match supplied(status) {
        Some(status) => devices
            .iter()
            .filter(|device| device.status.as_str() == status)
            .cloned()
            .collect(),
        None => devices.to_vec(),
    }
}

pub fn find_device<'a>(devices: &'a [Device], id: &str) -> Option<&'a Device> {
    devices.iter().find(|device| device.id == id)
}

pub fn query_logs(logs: &[LogEntry], query: &LogQuery) -> Vec<LogEntry> {
    let severity = supplied(query.severity.as_deref());
    let device = supplied(query.device.as_deref());
    let search = supplied(query.search.as_deref()).map(str::to_lowercase);

    let mut matched: Vec<LogEntry> = logs
        .iter()
        .filter(|entry| severity.is_none_or(|wanted| entry.severity.as_str() == wanted))
        .filter(|entry| device.is_none_or(|wanted| entry.device == wanted))
        .filter(|entry| {
            search
                .as_deref()
                .is_none_or(|term| entry.message.to_lowercase().contains(term))
        })
        .cloned()
        .collect();

    sort_newest_first(&mut matched);

    if let Some(limit) = LogQuery::parse_limit(query.limit.as_deref()) {
        matched.truncate(limit);
    }

    matched
}

/// Stable sort on `timestamp` descending; unparseable timestamps go last.
pub fn sort_newest_first(logs: &mut [LogEntry]) {
    logs.sort_by_cached_key(|entry| Reverse(parse_iso8601(&entry.timestamp)));
}

fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
