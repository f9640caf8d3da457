/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io::Write;

use http::Response;

/// Serialize the response, the connection is always closed after it.
pub(crate) fn encode_response(rsp: &Response<&str>) -> Vec<u8> {
    let body = rsp.body().as_bytes();
    let status = rsp.status();

    let mut buf = Vec::with_capacity(128 + body.len());
    let _ = write!(
        buf,
        "HTTP/1.1 {} {}\r\n",
        status.as_str(),
        status.canonical_reason().unwrap_or_default()
    );
    for (name, value) in rsp.headers() {
        buf.extend_from_slice(name.as_str().as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    let _ = write!(buf, "Content-Length: {}\r\n", body.len());
    buf.extend_from_slice(b"Connection: close\r\n\r\n");
    buf.extend_from_slice(body);
    buf
}
