// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Input contract checks.
//!
//! These run before any store access. Every failure is a `KernelError`:
//! `InvalidEnum` for enumerated literals (see `types::enums`), otherwise
//! `InvalidField` naming the field.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::MAX_EMAIL_LEN;
use crate::error::{KernelError, KernelResult};

static EMAIL_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn email_regex() -> KernelResult<&'static Regex> {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$"))
        .as_ref()
        .map_err(|e| KernelError::invalid_field("email", format!("pattern unavailable: {}", e)))
}

pub fn non_empty(field: &'static str, value: &str) -> KernelResult<()> {
    if value.trim().is_empty() {
        return Err(KernelError::invalid_field(field, "must not be empty"));
    }
    Ok(())
}

/// Length is counted in characters, not bytes.
pub fn max_len(field: &'static str, value: &str, max: usize) -> KernelResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(KernelError::invalid_field(
            field,
            format!("{} characters exceeds limit of {}", len, max),
        ));
    }
    Ok(())
}

pub fn optional_max_len(field: &'static str, value: Option<&str>, max: usize) -> KernelResult<()> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

/// Non-empty and within `max`.
pub fn bounded(field: &'static str, value: &str, max: usize) -> KernelResult<()> {
    non_empty(field, value)?;
    max_len(field, value, max)
}

pub fn email(value: &str) -> KernelResult<()> {
    bounded("email", value, MAX_EMAIL_LEN)?;
    if !email_regex()?.is_match(value) {
        return Err(KernelError::invalid_field("email", "not a valid address"));
    }
    Ok(())
}
