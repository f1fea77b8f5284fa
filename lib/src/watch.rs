// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Error, Result, SysfsCall};
use gpiosysfs_attr as attr;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::os::unix::prelude::{AsFd, AsRawFd, BorrowedFd};
use std::path::Path;
use std::time::Duration;

/// Watch a file for out-of-band changes.
///
/// This is the suspension point for edge waits: each call to [`wait`]
/// blocks the calling thread until the watched file signals a change, at
/// which point the caller re-reads the file and decides whether the change
/// is the one it was waiting for.
///
/// The [`SysfsWatch`] implementation covers the kernel's value files.
/// Alternate implementations can drive
/// [`Driver::wait_for_edge_with`](crate::Driver::wait_for_edge_with) from
/// other notification sources.
///
/// [`wait`]: Watch::wait
pub trait Watch {
    /// Block until the watched file signals a change.
    ///
    /// Returns false if `timeout` expires with no change signalled.
    /// A `timeout` of [`None`] waits indefinitely.
    fn wait(&mut self, timeout: Option<Duration>) -> Result<bool>;
}

/// A watch backed by exceptional-condition readiness on an open value file.
///
/// The kernel flags an edge interrupt on a sysfs value file as **POLLPRI**
/// on a descriptor that has previously been read, so the file is primed
/// with a read on open and drained again after each event.
#[derive(Debug)]
pub struct SysfsWatch {
    /// The open value file.
    f: File,
}

impl SysfsWatch {
    /// Open a watch on the value file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SysfsWatch> {
        let f = File::open(path).map_err(|e| Error::Sysfs(SysfsCall::WaitInterrupt, e.into()))?;
        let mut w = SysfsWatch { f };
        w.drain()?;
        Ok(w)
    }

    // consume the pending content so the next interrupt re-arms POLLPRI.
    fn drain(&mut self) -> Result<()> {
        let mut buf = [0_u8; 16];
        self.f
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.f.read(&mut buf))
            .map_err(|e| Error::Sysfs(SysfsCall::WaitInterrupt, e.into()))?;
        Ok(())
    }
}

impl Watch for SysfsWatch {
    fn wait(&mut self, timeout: Option<Duration>) -> Result<bool> {
        if !attr::wait_interrupt(&self.f, timeout)
            .map_err(|e| Error::Sysfs(SysfsCall::WaitInterrupt, e))?
        {
            return Ok(false);
        }
        self.drain()?;
        Ok(true)
    }
}

impl AsFd for SysfsWatch {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.f.as_fd()
    }
}

impl AsRawFd for SysfsWatch {
    #[inline]
    fn as_raw_fd(&self) -> i32 {
        self.f.as_raw_fd()
    }
}
