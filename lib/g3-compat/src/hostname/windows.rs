/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use std::ffi::OsString;
use std::io;
use std::os::windows::ffi::OsStringExt;

use windows_sys::Win32::System::SystemInformation::{
    ComputerNamePhysicalDnsHostname, GetComputerNameExW,
};

pub fn hostname() -> io::Result<OsString> {
    let mut size = 0u32;
    // the first call only fills in the required buffer size
    unsafe {
        GetComputerNameExW(
            ComputerNamePhysicalDnsHostname,
            std::ptr::null_mut(),
            &mut size,
        );
    }
    if size == 0 {
        return Err(io::Error::last_os_error());
    }

    let mut buffer = vec![0u16; size as usize];
    let r = unsafe {
        GetComputerNameExW(
            ComputerNamePhysicalDnsHostname,
            buffer.as_mut_ptr(),
            &mut size,
        )
    };
    if r == 0 {
        return Err(io::Error::last_os_error());
    }

    // size excludes the terminating null char on success
    buffer.truncate(size as usize);
    Ok(OsString::from_wide(&buffer))
}
