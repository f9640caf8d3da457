/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use http::Request;

/// A synchronous request handler.
///
/// Any `Fn(Request<B>) -> O` closure or function is a handler.
pub trait Handler<B> {
    type Output;

    fn handle(&self, req: Request<B>) -> Self::Output;
}

impl<B, O, F> Handler<B> for F
where
    F: Fn(Request<B>) -> O,
{
    type Output = O;

    #[inline]
    fn handle(&self, req: Request<B>) -> O {
        self(req)
    }
}
