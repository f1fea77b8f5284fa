// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A low level library to access GPIO sysfs attribute files on Linux.
//!
//! Each exported GPIO pin is controlled through a set of attribute files
//! below `/sys/class/gpio/gpio<N>/`, with the class-level `export` and
//! `unexport` files creating and removing that directory.
//! This crate provides the paths to those files, reads and writes their
//! contents, and waits for the exceptional condition the kernel raises on a
//! value file when an edge fires.
//!
//! Higher level pin semantics, including reservation bookkeeping, are
//! provided by the `gpiosysfs` crate.

use core::ptr::null;
use libc::{c_long, pollfd, ppoll, sigset_t, time_t, timespec, POLLERR, POLLPRI};
use std::fs;
use std::fs::File;
use std::io::Error as IoError;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The result returned by [`gpiosysfs_attr`] functions.
///
/// [`gpiosysfs_attr`]: crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`gpiosysfs_attr`] functions.
///
/// [`gpiosysfs_attr`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error returned from an underlying os call.
    #[error(transparent)]
    Os(#[from] std::io::Error),

    /// An attribute file contained content this library cannot interpret.
    //
    // Should only be seen if the kernel writes something other than the
    // documented values into an attribute file.
    #[error("invalid attribute content: {0:?}")]
    InvalidContent(String),
}

/// The path of the class-level control file that exports a pin.
pub fn export_path(root: &Path) -> PathBuf {
    root.join("export")
}

/// The path of the class-level control file that unexports a pin.
pub fn unexport_path(root: &Path) -> PathBuf {
    root.join("unexport")
}

/// The path of the attribute directory for an exported pin.
pub fn pin_path(root: &Path, pin: u32) -> PathBuf {
    root.join(format!("gpio{}", pin))
}

/// The path of the direction attribute for an exported pin.
pub fn direction_path(root: &Path, pin: u32) -> PathBuf {
    pin_path(root, pin).join("direction")
}

/// The path of the value attribute for an exported pin.
pub fn value_path(root: &Path, pin: u32) -> PathBuf {
    pin_path(root, pin).join("value")
}

/// The path of the edge attribute for an exported pin.
pub fn edge_path(root: &Path, pin: u32) -> PathBuf {
    pin_path(root, pin).join("edge")
}

/// Read the content of an attribute file.
///
/// The kernel terminates attribute content with a newline, which is
/// stripped here.
pub fn read_attr(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim_end().to_string())
}

/// Write a value to an attribute file.
pub fn write_attr(path: &Path, value: &str) -> Result<()> {
    fs::write(path, value)?;
    Ok(())
}

/// Read a value attribute as a level.
///
/// Value attributes only ever hold `0` or `1`.
pub fn read_value(path: &Path) -> Result<u8> {
    let content = read_attr(path)?;
    match content.as_str() {
        "0" => Ok(0),
        "1" => Ok(1),
        _ => Err(Error::InvalidContent(content)),
    }
}

/// Wait for a value file to signal an exceptional condition.
///
/// The kernel reports edge interrupts on sysfs value files as **POLLPRI**
/// readiness, so this is the suspension point for edge waits.
/// A `timeout` of [`None`] waits indefinitely.
///
/// Returns false if the timeout expired with no event.
///
/// * `f` - The open value File.
pub fn wait_interrupt(f: &File, timeout: Option<Duration>) -> Result<bool> {
    let mut pfd = pollfd {
        fd: f.as_raw_fd(),
        events: POLLPRI | POLLERR,
        revents: 0,
    };
    let ts;
    let tsp = match timeout {
        Some(d) => {
            ts = timespec {
                tv_sec: d.as_secs() as time_t,
                tv_nsec: d.subsec_nanos() as c_long,
            };
            std::ptr::addr_of!(ts)
        }
        None => null(),
    };
    unsafe {
        match ppoll(std::ptr::addr_of_mut!(pfd), 1, tsp, null() as *const sigset_t) {
            -1 => Err(Error::from(IoError::last_os_error())),
            0 => Ok(false),
            _ => Ok(true),
        }
    }
}
