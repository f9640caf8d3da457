/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("hostname is not available")]
    Unavailable,
    #[error("empty hostname")]
    Empty,
    #[error("hostname is not valid utf-8")]
    NotUtf8,
}

pub trait HostnameResolver {
    fn current_hostname(&self) -> Result<String, LookupError>;
}

/// Ask the system for the hostname on each call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHostname;

impl HostnameResolver for SystemHostname {
    fn current_hostname(&self) -> Result<String, LookupError> {
        let name = g3_compat::hostname().map_err(|e| {
            debug!("failed to get hostname: {e}");
            LookupError::Unavailable
        })?;
        let name = name.into_string().map_err(|_| LookupError::NotUtf8)?;
        if name.is_empty() {
            return Err(LookupError::Empty);
        }
        Ok(name)
    }
}

/// Resolve once, and only resolve again when `refresh` is called.
pub struct CachedHostname<R = SystemHostname> {
    resolver: R,
    cached: ArcSwapOption<String>,
}

impl<R: HostnameResolver> CachedHostname<R> {
    pub fn new(resolver: R) -> Self {
        let cached = ArcSwapOption::empty();
        let c = CachedHostname { resolver, cached };
        c.refresh();
        c
    }

    /// Returns false and keeps no value if the lookup failed.
    pub fn refresh(&self) -> bool {
        match self.resolver.current_hostname() {
            Ok(name) => {
                self.cached.store(Some(Arc::new(name)));
                true
            }
            Err(e) => {
                debug!("failed to refresh cached hostname: {e}");
                self.cached.store(None);
                false
            }
        }
    }
}

impl<R> HostnameResolver for CachedHostname<R> {
    fn current_hostname(&self) -> Result<String, LookupError> {
        self.cached
            .load()
            .as_deref()
            .cloned()
            .ok_or(LookupError::Unavailable)
    }
}

impl<T: HostnameResolver + ?Sized> HostnameResolver for Arc<T> {
    #[inline]
    fn current_hostname(&self) -> Result<String, LookupError> {
        (**self).current_hostname()
    }
}

/// Keep only the leading label, a leading `.` is not treated as a separator.
pub(crate) fn short_hostname(mut host: String) -> String {
    if let Some(p) = memchr::memchr(b'.', host.as_bytes())
        && p > 0
    {
        host.truncate(p);
    }
    host
}
