/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::str::FromStr;

use http::header::{HeaderName, HeaderValue};
use http::{Method, Request, Uri, Version};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

const MAX_HEAD_SIZE: usize = 8192;
const MAX_HEADERS: usize = 64;
const READ_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Error)]
pub(crate) enum RequestParseError {
    #[error("read failed: {0:?}")]
    ReadFailed(#[from] io::Error),
    #[error("closed before the end of request head")]
    ClosedEarly,
    #[error("request head too large")]
    TooLargeHead,
    #[error("invalid request head: {0}")]
    InvalidHead(#[from] httparse::Error),
    #[error("invalid method")]
    InvalidMethod,
    #[error("invalid request target")]
    InvalidUri,
    #[error("unsupported http version")]
    UnsupportedVersion,
    #[error("invalid header {0}")]
    InvalidHeader(String),
}

/// Returns `None` if more data is needed.
pub(crate) fn parse_request_head(buf: &[u8]) -> Result<Option<Request<()>>, RequestParseError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut head = httparse::Request::new(&mut headers);
    if head.parse(buf)?.is_partial() {
        return Ok(None);
    }

    let mut req = Request::new(());
    let method = head.method.ok_or(RequestParseError::InvalidMethod)?;
    *req.method_mut() =
        Method::from_bytes(method.as_bytes()).map_err(|_| RequestParseError::InvalidMethod)?;
    let path = head.path.ok_or(RequestParseError::InvalidUri)?;
    *req.uri_mut() = Uri::from_str(path).map_err(|_| RequestParseError::InvalidUri)?;
    *req.version_mut() = match head.version {
        Some(0) => Version::HTTP_10,
        Some(1) => Version::HTTP_11,
        _ => return Err(RequestParseError::UnsupportedVersion),
    };

    let map = req.headers_mut();
    for h in head.headers.iter() {
        let name = HeaderName::from_bytes(h.name.as_bytes())
            .map_err(|_| RequestParseError::InvalidHeader(h.name.to_string()))?;
        let value = HeaderValue::from_bytes(h.value)
            .map_err(|_| RequestParseError::InvalidHeader(h.name.to_string()))?;
        map.append(name, value);
    }
    Ok(Some(req))
}

/// Read until a complete request head is received, the body is ignored.
///
/// Returns `None` if the peer closed the connection without sending anything.
pub(crate) async fn read_request<R>(reader: &mut R) -> Result<Option<Request<()>>, RequestParseError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let nr = reader.read(&mut chunk).await?;
        if nr == 0 {
            return if buf.is_empty() {
                Ok(None)
            } else {
                Err(RequestParseError::ClosedEarly)
            };
        }
        buf.extend_from_slice(&chunk[..nr]);
        if let Some(req) = parse_request_head(&buf)? {
            return Ok(Some(req));
        }
        if buf.len() >= MAX_HEAD_SIZE {
            return Err(RequestParseError::TooLargeHead);
        }
    }
}
