/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod handler;
pub use handler::Handler;

mod reporter;
pub use reporter::StatsReporter;

mod user_agent;
pub use user_agent::{UserAgent, UserAgentMatcher, UserAgentParser};

mod hostname;
pub use hostname::{CachedHostname, HostnameResolver, LookupError, SystemHostname};

mod instrument;
pub use instrument::{Instrument, METRIC_NAME_LATENCY, METRIC_NAME_RECEIVED, instrument};
