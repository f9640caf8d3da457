/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Browser and OS names found in a `User-Agent` header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserAgent {
    pub browser: Option<String>,
    pub os: Option<String>,
}

pub trait UserAgentParser {
    fn parse(&self, raw: &str) -> UserAgent;
}

// Order matters, as most browsers put the tokens of the browsers they
// are compatible with into the header.
const BROWSER_RULES: &[(&str, &str)] = &[
    ("Edg/", "Edge"),
    ("Edge/", "Edge"),
    ("EdgA/", "Edge"),
    ("EdgiOS/", "Edge"),
    ("OPR/", "Opera"),
    ("Opera", "Opera"),
    ("Firefox/", "Firefox"),
    ("FxiOS/", "Firefox"),
    ("Chromium/", "Chromium"),
    ("CriOS/", "Chrome Mobile iOS"),
    ("Chrome/", "Chrome"),
    ("Safari/", "Safari"),
    ("MSIE ", "IE"),
    ("Trident/", "IE"),
    ("curl/", "curl"),
];

const OS_RULES: &[(&str, &str)] = &[
    ("Windows", "Windows"),
    ("iPhone", "iOS"),
    ("iPad", "iOS"),
    ("Mac OS X", "Mac OS X"),
    ("Android", "Android"),
    ("CrOS", "Chrome OS"),
    ("Linux", "Linux"),
];

/// Token matching parser for the common browsers and operating systems.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserAgentMatcher;

impl UserAgentMatcher {
    fn find(raw: &str, rules: &[(&str, &str)]) -> Option<String> {
        rules
            .iter()
            .find(|(token, _)| raw.contains(token))
            .map(|(_, name)| name.to_string())
    }
}

impl UserAgentParser for UserAgentMatcher {
    fn parse(&self, raw: &str) -> UserAgent {
        if raw.is_empty() {
            return UserAgent::default();
        }
        UserAgent {
            browser: Self::find(raw, BROWSER_RULES),
            os: Self::find(raw, OS_RULES),
        }
    }
}
