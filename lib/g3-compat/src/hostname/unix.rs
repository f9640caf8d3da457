/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use std::ffi::{OsStr, OsString};
use std::io;
use std::os::unix::ffi::OsStrExt;

pub fn hostname() -> io::Result<OsString> {
    let uname = rustix::system::uname();
    let name = uname.nodename().to_bytes();
    if name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no nodename set for this host",
        ));
    }
    Ok(OsStr::from_bytes(name).to_os_string())
}
