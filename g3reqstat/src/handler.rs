/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use http::header::{self, HeaderValue};
use http::{Request, Response, StatusCode};

use g3_http_stats::Handler;

pub(crate) type HttpResponse = Response<&'static str>;

const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

fn response(status: StatusCode, content_type: &'static str, body: &'static str) -> HttpResponse {
    let mut rsp = Response::new(body);
    *rsp.status_mut() = status;
    rsp.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    rsp
}

pub(crate) fn hello(_req: Request<()>) -> HttpResponse {
    response(StatusCode::OK, CONTENT_TYPE_TEXT, "Hello Planet!\n")
}

fn index(_req: Request<()>) -> HttpResponse {
    response(
        StatusCode::OK,
        CONTENT_TYPE_HTML,
        "<a href=\"stats\">check</a>",
    )
}

fn not_found(_req: Request<()>) -> HttpResponse {
    response(StatusCode::NOT_FOUND, CONTENT_TYPE_TEXT, "404 page not found\n")
}

pub(crate) fn bad_request() -> HttpResponse {
    response(StatusCode::BAD_REQUEST, CONTENT_TYPE_TEXT, "400 bad request\n")
}

/// Dispatch by path, only `/stats` goes through the instrumented handler.
pub(crate) struct Router<H> {
    stats: H,
}

impl<H> Router<H>
where
    H: Handler<(), Output = HttpResponse>,
{
    pub(crate) fn new(stats: H) -> Self {
        Router { stats }
    }

    pub(crate) fn route(&self, req: Request<()>) -> HttpResponse {
        match req.uri().path() {
            "/stats" => self.stats.handle(req),
            "/" => index(req),
            _ => not_found(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn get(path: &str) -> Request<()> {
        Request::get(path).body(()).unwrap()
    }

    struct Counting(AtomicUsize);

    impl Handler<()> for Counting {
        type Output = HttpResponse;

        fn handle(&self, req: Request<()>) -> HttpResponse {
            self.0.fetch_add(1, Ordering::Relaxed);
            hello(req)
        }
    }

    #[test]
    fn route() {
        let router = Router::new(Counting(AtomicUsize::new(0)));

        let rsp = router.route(get("/stats"));
        assert_eq!(rsp.status(), StatusCode::OK);
        assert_eq!(*rsp.body(), "Hello Planet!\n");
        assert_eq!(
            rsp.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_TEXT
        );

        let rsp = router.route(get("/"));
        assert_eq!(rsp.status(), StatusCode::OK);
        assert_eq!(*rsp.body(), "<a href=\"stats\">check</a>");

        let rsp = router.route(get("/stats/more"));
        assert_eq!(rsp.status(), StatusCode::NOT_FOUND);
        let rsp = router.route(get("/favicon.ico"));
        assert_eq!(rsp.status(), StatusCode::NOT_FOUND);

        assert_eq!(router.stats.0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn query_ignored() {
        let router = Router::new(hello);
        let rsp = router.route(get("/stats?from=test"));
        assert_eq!(*rsp.body(), "Hello Planet!\n");
    }
}
