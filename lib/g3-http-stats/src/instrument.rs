/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Instant;

use http::{Request, header};
use log::trace;

use g3_types::metrics::MetricTags;

use crate::hostname::short_hostname;
use crate::{
    Handler, HostnameResolver, StatsReporter, SystemHostname, UserAgentMatcher, UserAgentParser,
};

pub const METRIC_NAME_RECEIVED: &str = "handler.received";
pub const METRIC_NAME_LATENCY: &str = "handler.latency";

/// Wrap `handler` so that each call emits a received counter and a
/// latency timer to `reporter`.
pub fn instrument<H, S>(handler: H, reporter: S) -> Instrument<H, S> {
    Instrument {
        handler,
        reporter,
        user_agent_parser: UserAgentMatcher,
        hostname_resolver: SystemHostname,
        static_tags: MetricTags::default(),
    }
}

pub struct Instrument<H, S, U = UserAgentMatcher, N = SystemHostname> {
    handler: H,
    reporter: S,
    user_agent_parser: U,
    hostname_resolver: N,
    static_tags: MetricTags,
}

impl<H, S, U, N> Instrument<H, S, U, N> {
    pub fn with_user_agent_parser<U2>(self, parser: U2) -> Instrument<H, S, U2, N> {
        Instrument {
            handler: self.handler,
            reporter: self.reporter,
            user_agent_parser: parser,
            hostname_resolver: self.hostname_resolver,
            static_tags: self.static_tags,
        }
    }

    pub fn with_hostname_resolver<N2>(self, resolver: N2) -> Instrument<H, S, U, N2> {
        Instrument {
            handler: self.handler,
            reporter: self.reporter,
            user_agent_parser: self.user_agent_parser,
            hostname_resolver: resolver,
            static_tags: self.static_tags,
        }
    }

    /// Extra tags added to every request.
    ///
    /// `os`, `browser` and `host` only ever come from the request, so any
    /// value set for them here is dropped.
    pub fn with_static_tags(mut self, tags: MetricTags) -> Self {
        self.static_tags = tags.extra().collect();
        self
    }
}

impl<H, S, U, N> Instrument<H, S, U, N>
where
    U: UserAgentParser,
    N: HostnameResolver,
{
    fn request_tags<B>(&self, req: &Request<B>) -> MetricTags {
        let raw_ua = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let ua = self.user_agent_parser.parse(raw_ua);
        let mut tags = self.static_tags.clone();
        tags.os = ua.os;
        tags.browser = ua.browser;

        match self.hostname_resolver.current_hostname() {
            Ok(host) => tags.host = Some(short_hostname(host)),
            Err(e) => trace!("no host tag for this request: {e}"),
        }

        tags
    }
}

impl<B, H, S, U, N> Handler<B> for Instrument<H, S, U, N>
where
    H: Handler<B>,
    S: StatsReporter,
    U: UserAgentParser,
    N: HostnameResolver,
{
    type Output = H::Output;

    fn handle(&self, req: Request<B>) -> Self::Output {
        let start = Instant::now();
        let tags = self.request_tags(&req);
        self.reporter.inc_counter(METRIC_NAME_RECEIVED, &tags, 1);

        let output = self.handler.handle(req);

        self.reporter
            .record_timer(METRIC_NAME_LATENCY, &tags, start.elapsed());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use g3_types::metrics::encode_name;

    use crate::{LookupError, UserAgent};

    #[derive(Debug, Clone, PartialEq)]
    enum Emission {
        Counter(String, MetricTags, u64),
        Timer(String, MetricTags, Duration),
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Emission>>);

    impl Recorder {
        fn take(&self) -> Vec<Emission> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl StatsReporter for Recorder {
        fn inc_counter(&self, name: &str, tags: &MetricTags, delta: u64) {
            self.0
                .lock()
                .unwrap()
                .push(Emission::Counter(name.to_string(), tags.clone(), delta));
        }

        fn record_timer(&self, name: &str, tags: &MetricTags, duration: Duration) {
            self.0
                .lock()
                .unwrap()
                .push(Emission::Timer(name.to_string(), tags.clone(), duration));
        }
    }

    struct FixedHostname(Result<&'static str, LookupError>);

    impl HostnameResolver for FixedHostname {
        fn current_hostname(&self) -> Result<String, LookupError> {
            self.0.clone().map(|s| s.to_string())
        }
    }

    struct FixedUserAgent(UserAgent);

    impl UserAgentParser for FixedUserAgent {
        fn parse(&self, _raw: &str) -> UserAgent {
            self.0.clone()
        }
    }

    const CHROME_LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    fn request(user_agent: Option<&str>) -> Request<()> {
        let mut builder = Request::get("/stats");
        if let Some(ua) = user_agent {
            builder = builder.header(header::USER_AGENT, ua);
        }
        builder.body(()).unwrap()
    }

    fn hello(_req: Request<()>) -> &'static str {
        "Hello Planet!"
    }

    #[test]
    fn one_counter_one_timer() {
        let recorder = Arc::new(Recorder::default());
        let h = instrument(hello, recorder.clone())
            .with_hostname_resolver(FixedHostname(Ok("myhost.example.com")));

        assert_eq!(h.handle(request(Some(CHROME_LINUX))), "Hello Planet!");

        let emissions = recorder.take();
        assert_eq!(emissions.len(), 2);
        let Emission::Counter(name, counter_tags, delta) = &emissions[0] else {
            panic!("counter should be emitted first");
        };
        assert_eq!(name, METRIC_NAME_RECEIVED);
        assert_eq!(*delta, 1);
        let Emission::Timer(name, timer_tags, _) = &emissions[1] else {
            panic!("timer should be emitted last");
        };
        assert_eq!(name, METRIC_NAME_LATENCY);
        assert_eq!(counter_tags, timer_tags);

        assert_eq!(
            encode_name(METRIC_NAME_RECEIVED, counter_tags),
            "handler.received.myhost.Linux.Chrome"
        );
    }

    #[test]
    fn hostname_failure_omits_host() {
        let recorder = Recorder::default();
        let h = instrument(hello, &recorder)
            .with_hostname_resolver(FixedHostname(Err(LookupError::Unavailable)));
        h.handle(request(Some(CHROME_LINUX)));

        for e in recorder.take() {
            let (Emission::Counter(_, tags, _) | Emission::Timer(_, tags, _)) = e;
            assert!(!tags.contains("host"));
            assert_eq!(
                encode_name(METRIC_NAME_LATENCY, &tags),
                "handler.latency.Linux.Chrome"
            );
        }
    }

    #[test]
    fn unknown_user_agent() {
        let recorder = Recorder::default();
        let h = instrument(hello, &recorder)
            .with_hostname_resolver(FixedHostname(Ok("web-1")));
        h.handle(request(None));
        h.handle(request(Some("my-bot/1.0")));

        let emissions = recorder.take();
        assert_eq!(emissions.len(), 4);
        for e in emissions {
            let (Emission::Counter(_, tags, _) | Emission::Timer(_, tags, _)) = e;
            assert_eq!(tags.os, None);
            assert_eq!(tags.browser, None);
            assert_eq!(
                encode_name(METRIC_NAME_RECEIVED, &tags),
                "handler.received.web-1.no-os.no-browser"
            );
        }
    }

    #[test]
    fn injected_parser_and_static_tags() {
        let recorder = Recorder::default();
        let ua = UserAgent {
            browser: Some("Chro\\:me".to_string()),
            os: Some("Linu{}/\tx".to_string()),
        };
        let h = instrument(hello, &recorder)
            .with_user_agent_parser(FixedUserAgent(ua))
            .with_hostname_resolver(FixedHostname(Ok("my-host-name")))
            .with_static_tags(
                MetricTags::default()
                    .with_tag("endpoint", "stats")
                    .with_tag("os", "static-os"),
            );
        h.handle(request(None));

        let Emission::Counter(_, tags, _) = &recorder.take()[0] else {
            panic!("counter should be emitted first");
        };
        assert_eq!(
            encode_name("r.call", tags),
            "r.call.my-host-name.stats.Linu----x.Chro--me"
        );
    }

    #[test]
    fn static_tags_never_fill_request_tags() {
        let recorder = Recorder::default();
        let h = instrument(hello, &recorder)
            .with_hostname_resolver(FixedHostname(Err(LookupError::Unavailable)))
            .with_static_tags(
                MetricTags::default()
                    .with_tag("host", "static-host")
                    .with_tag("os", "static-os")
                    .with_tag("browser", "static-browser")
                    .with_tag("zone", "a"),
            );
        h.handle(request(Some("my-bot/1.0")));

        let emissions = recorder.take();
        assert_eq!(emissions.len(), 2);
        for e in emissions {
            let (Emission::Counter(_, tags, _) | Emission::Timer(_, tags, _)) = e;
            assert!(!tags.contains("host"));
            assert_eq!(tags.os, None);
            assert_eq!(tags.browser, None);
            assert_eq!(tags.get("zone"), Some("a"));
            assert_eq!(
                encode_name(METRIC_NAME_RECEIVED, &tags),
                "handler.received.a.no-os.no-browser"
            );
        }
    }

    #[test]
    fn timer_covers_handler() {
        let recorder = Recorder::default();
        let h = instrument(
            |_req: Request<()>| thread::sleep(Duration::from_millis(50)),
            &recorder,
        )
        .with_hostname_resolver(FixedHostname(Ok("web-1")));
        h.handle(request(None));

        let emissions = recorder.take();
        let Emission::Timer(_, _, duration) = emissions[1] else {
            panic!("timer should be emitted last");
        };
        assert!(duration >= Duration::from_millis(50));
    }

    #[test]
    fn panic_propagates() {
        let recorder = Recorder::default();
        let h = instrument(
            |_req: Request<()>| -> &'static str { panic!("handler failed") },
            &recorder,
        )
        .with_hostname_resolver(FixedHostname(Ok("web-1")));

        let r = panic::catch_unwind(AssertUnwindSafe(|| h.handle(request(None))));
        assert!(r.is_err());

        let emissions = recorder.take();
        assert_eq!(emissions.len(), 1);
        assert!(matches!(emissions[0], Emission::Counter(..)));
    }

    #[test]
    fn nested_instrument() {
        let inner_recorder = Recorder::default();
        let outer_recorder = Recorder::default();
        let inner = instrument(hello, &inner_recorder)
            .with_hostname_resolver(FixedHostname(Ok("web-1")));
        let outer = instrument(inner, &outer_recorder)
            .with_hostname_resolver(FixedHostname(Ok("web-1")));

        assert_eq!(outer.handle(request(None)), "Hello Planet!");
        assert_eq!(inner_recorder.take().len(), 2);
        assert_eq!(outer_recorder.take().len(), 2);
    }

    #[test]
    fn concurrent_requests() {
        let recorder = Arc::new(Recorder::default());
        let h = Arc::new(
            instrument(hello, recorder.clone())
                .with_hostname_resolver(FixedHostname(Ok("web-1"))),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let h = h.clone();
                thread::spawn(move || {
                    for _ in 0..16 {
                        h.handle(request(Some(CHROME_LINUX)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let emissions = recorder.take();
        let counters = emissions
            .iter()
            .filter(|e| matches!(e, Emission::Counter(..)))
            .count();
        assert_eq!(counters, 128);
        assert_eq!(emissions.len(), 256);
    }

    #[test]
    fn statsd_client_reporter() {
        let server = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        server
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();

        let mut config = g3_statsd_client::StatsdClientConfig::with_prefix(
            g3_types::metrics::MetricsName::from_str("test").unwrap(),
        );
        config.set_backend(g3_statsd_client::StatsdBackend::Udp(
            server.local_addr().unwrap(),
            None,
        ));
        let client = Arc::new(Mutex::new(config.build().unwrap()));

        let h = instrument(hello, client.clone())
            .with_hostname_resolver(FixedHostname(Err(LookupError::Empty)));
        h.handle(request(Some(CHROME_LINUX)));
        client.lock().unwrap().flush_sink();

        let mut buf = [0u8; 512];
        let n = server.recv(&mut buf).unwrap();
        let msg = std::str::from_utf8(&buf[..n]).unwrap();
        let mut lines = msg.lines();
        assert_eq!(
            lines.next(),
            Some("test.handler.received.Linux.Chrome:1|c")
        );
        let timer = lines.next().unwrap();
        assert!(timer.starts_with("test.handler.latency.Linux.Chrome:"));
        assert!(timer.ends_with("|ms"));
        assert_eq!(lines.next(), None);
    }
}
