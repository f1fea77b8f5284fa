// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library for accessing GPIO pins on Linux platforms
//! using the sysfs GPIO interface.
//!
//! Pins are reserved, configured and read through the [`Driver`],
//! which tracks the pins this process has exported and guarantees a pin
//! has at most one live reservation at a time.
//!
//! Setting the direction of a pin reserves it:
//! ```no_run
//! # fn example() -> gpiosysfs::Result<()> {
//! use gpiosysfs::{Direction, Driver};
//!
//! let drv = Driver::new();
//! drv.set_direction(23, Direction::Input)?;
//! let value = drv.read(23)?;
//! # Ok(())
//! # }
//! ```
//!
//! Blocking on an edge uses the [`wait_for_edge`] family of calls, which
//! suspend on the change notification the kernel raises on the pin's value
//! file.
//!
//! [`wait_for_edge`]: Driver::wait_for_edge

use gpiosysfs_attr as attr;
use std::fmt;

/// Types and functions specific to the driver.
pub mod driver;

/// Types specific to pins.
pub mod pin;

/// Watching value files for changes.
pub mod watch;

pub use driver::Driver;
pub use pin::{Direction, Pin, Pull, Trigger};

/// Errors returned by [`gpiosysfs`] functions.
///
/// [`gpiosysfs`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error returned when there is a problem with an argument.
    #[error("{0}")]
    InvalidArgument(String),

    /// The pin is already reserved by a live handle.
    #[error("pin {0} is already reserved")]
    Conflict(Pin),

    /// The operation requires the pin to be reserved.
    #[error("pin {0} is not reserved")]
    NotReserved(Pin),

    /// The capability is not available on the sysfs backend.
    #[error("{0}")]
    Unsupported(String),

    /// A value file contained unexpected content.
    #[error("unexpected value file content: {0:?}")]
    UnexpectedContent(String),

    /// An error returned from an underlying sysfs call.
    #[error("sysfs {0} returned: {1}")]
    Sysfs(SysfsCall, #[source] attr::Error),

    /// Some pins could not be released during a bulk release.
    ///
    /// The pins are untracked regardless, so the failures are reported
    /// once and will not recur.
    #[error("failed to release {} pins", .failures.len())]
    ReleaseAll {
        /// The pins that failed to release, with the error for each.
        failures: Vec<(Pin, Error)>,
    },
}

/// Identifiers for the underlying sysfs calls.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SysfsCall {
    Export,
    Unexport,
    SetDirection,
    GetValue,
    SetValue,
    SetEdge,
    WaitInterrupt,
}

impl fmt::Display for SysfsCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SysfsCall::Export => "export",
            SysfsCall::Unexport => "unexport",
            SysfsCall::SetDirection => "set_direction",
            SysfsCall::GetValue => "get_value",
            SysfsCall::SetValue => "set_value",
            SysfsCall::SetEdge => "set_edge",
            SysfsCall::WaitInterrupt => "wait_interrupt",
        };
        write!(f, "{}", name)
    }
}

/// The result for [`gpiosysfs`] functions.
///
/// [`gpiosysfs`]: crate
pub type Result<T> = std::result::Result<T, Error>;
