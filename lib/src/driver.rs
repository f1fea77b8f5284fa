// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::pin::{Direction, Pin, Pull, Trigger};
use crate::watch::{SysfsWatch, Watch};
use crate::{Error, Result, SysfsCall};
use gpiosysfs_attr as attr;
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// The default location of the sysfs GPIO tree.
pub const SYSFS_GPIO_PATH: &str = "/sys/class/gpio";

/// A handle on the sysfs GPIO interface.
///
/// The driver tracks the pins this process instance has exported and
/// guarantees each has at most one live reservation.
/// Setting the direction of a pin reserves it; a pin stays reserved until
/// it is explicitly released or the driver is dropped.
///
/// Pin configuration is never cached - the sysfs attribute files are the
/// single source of truth, so a fresh driver sees whatever state the
/// kernel holds.
///
/// The driver is intended to be constructed once and shared, by reference,
/// with everything that touches pins:
///
/// ```no_run
/// # fn example() -> gpiosysfs::Result<()> {
/// use gpiosysfs::{Direction, Driver};
///
/// let drv = Driver::new();
/// drv.set_direction(22, Direction::Output)?;
/// drv.write(22, 1)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Driver {
    /// The root of the sysfs GPIO tree.
    root: PathBuf,

    /// The pins exported by this driver instance.
    exported: Mutex<HashSet<Pin>>,
}

impl Driver {
    /// Constructs a Driver on the system sysfs GPIO tree.
    pub fn new() -> Driver {
        Driver::from_path(SYSFS_GPIO_PATH)
    }

    /// Constructs a Driver on the GPIO tree rooted at `path`.
    ///
    /// Only the location of the tree changes - all attribute files are
    /// expected in their usual places below it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Driver {
        Driver {
            root: path.as_ref().to_path_buf(),
            exported: Mutex::new(HashSet::new()),
        }
    }

    /// Return the root of the GPIO tree for this driver.
    pub fn path(&self) -> &Path {
        self.root.as_ref()
    }

    /// Check if a pin is reserved by this driver.
    pub fn is_reserved(&self, pin: Pin) -> bool {
        self.exported
            .lock()
            .expect("failed to acquire lock on exported set")
            .contains(&pin)
    }

    /// Set the direction of a pin.
    ///
    /// This is the operation that opens a pin - the pin is reserved, and
    /// exported to the kernel, as a side effect.
    /// Setting the direction of a pin that is already reserved fails with
    /// [`Error::Conflict`], so a pin is opened exactly once and released
    /// before it can be re-opened.
    ///
    /// # Examples
    /// ```no_run
    /// # fn example() -> gpiosysfs::Result<()> {
    /// use gpiosysfs::{Direction, Driver};
    ///
    /// let drv = Driver::new();
    /// drv.set_direction(23, Direction::Input)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_direction(&self, pin: Pin, direction: Direction) -> Result<()> {
        self.reserve(pin)?;
        if !self.is_reserved(pin) {
            return Err(Error::NotReserved(pin));
        }
        attr::write_attr(&attr::direction_path(&self.root, pin), direction.as_str())
            .map_err(|e| Error::Sysfs(SysfsCall::SetDirection, e))
    }

    /// Read the value of a pin.
    ///
    /// The pin must be reserved.
    pub fn read(&self, pin: Pin) -> Result<u8> {
        self.require_reserved(pin)?;
        attr::read_value(&attr::value_path(&self.root, pin)).map_err(|e| match e {
            attr::Error::InvalidContent(v) => Error::UnexpectedContent(v),
            e => Error::Sysfs(SysfsCall::GetValue, e),
        })
    }

    /// Write the value of a pin.
    ///
    /// `value` must be 0 or 1, and the pin must be reserved.
    pub fn write(&self, pin: Pin, value: u8) -> Result<()> {
        if value > 1 {
            return Err(Error::InvalidArgument(format!(
                "value should be 0 or 1, not {}",
                value
            )));
        }
        self.require_reserved(pin)?;
        attr::write_attr(&attr::value_path(&self.root, pin), &value.to_string())
            .map_err(|e| Error::Sysfs(SysfsCall::SetValue, e))
    }

    /// Set the pull resistor mode for a pin.
    ///
    /// The sysfs interface cannot drive pull resistors, so only
    /// [`Pull::Off`] is accepted, as a null operation.
    /// Anything else fails with [`Error::Unsupported`].
    pub fn set_pull(&self, _pin: Pin, pull: Pull) -> Result<()> {
        match pull {
            Pull::Off => Ok(()),
            _ => Err(Error::Unsupported(format!(
                "pull {} is not available with this driver, keep it off",
                pull
            ))),
        }
    }

    /// Set the edge trigger for a pin.
    ///
    /// The pin must be reserved.
    pub fn set_trigger(&self, pin: Pin, trigger: Trigger) -> Result<()> {
        self.require_reserved(pin)?;
        attr::write_attr(&attr::edge_path(&self.root, pin), trigger.as_str())
            .map_err(|e| Error::Sysfs(SysfsCall::SetEdge, e))
    }

    /// Block until an edge matching `trigger` occurs on a pin.
    ///
    /// The trigger is applied to the pin, the current value is taken as
    /// the baseline, and the calling thread then suspends on the value
    /// file's change notification, re-reading the value on each event
    /// until a qualifying transition is observed.
    /// Notifications that do not change the value, or that land on the
    /// wrong side of the requested trigger, are ignored.
    ///
    /// Returns true once a qualifying transition is observed - never
    /// false.  Use [`wait_for_edge_timeout`] for a bounded wait.
    ///
    /// Waits on different pins are independent and may run on parallel
    /// threads.  Concurrent waits on the same pin are not supported.
    ///
    /// # Examples
    /// ```no_run
    /// # fn example() -> gpiosysfs::Result<()> {
    /// use gpiosysfs::{Direction, Driver, Trigger};
    ///
    /// let drv = Driver::new();
    /// drv.set_direction(23, Direction::Input)?;
    /// drv.wait_for_edge(23, Trigger::Rising)?;
    /// println!("pin 23 went high");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// [`wait_for_edge_timeout`]: Driver::wait_for_edge_timeout
    pub fn wait_for_edge(&self, pin: Pin, trigger: Trigger) -> Result<bool> {
        self.require_reserved(pin)?;
        let mut watch = SysfsWatch::open(attr::value_path(&self.root, pin))?;
        self.wait_edge(pin, trigger, &mut watch, None)
    }

    /// Block until an edge matching `trigger` occurs on a pin, or `timeout`
    /// expires.
    ///
    /// Returns false if the timeout expires with no qualifying transition.
    /// The timeout bounds the whole wait, not the gap between
    /// notifications.
    pub fn wait_for_edge_timeout(
        &self,
        pin: Pin,
        trigger: Trigger,
        timeout: Duration,
    ) -> Result<bool> {
        self.require_reserved(pin)?;
        let mut watch = SysfsWatch::open(attr::value_path(&self.root, pin))?;
        self.wait_edge(pin, trigger, &mut watch, Some(timeout))
    }

    /// Block until an edge matching `trigger` occurs on a pin, using a
    /// caller-supplied [`Watch`] as the notification source.
    ///
    /// The wait ends early, returning false, if the watch reports that it
    /// has nothing further to deliver.
    pub fn wait_for_edge_with<W: Watch>(
        &self,
        pin: Pin,
        trigger: Trigger,
        watch: &mut W,
    ) -> Result<bool> {
        self.wait_edge(pin, trigger, watch, None)
    }

    // The edge wait proper: notifications are evaluated strictly in arrival
    // order against the last observed value, so coalesced or no-op writes
    // cannot satisfy the wait and a wrong-direction change cannot strand it
    // on a stale baseline.
    fn wait_edge(
        &self,
        pin: Pin,
        trigger: Trigger,
        watch: &mut impl Watch,
        timeout: Option<Duration>,
    ) -> Result<bool> {
        self.set_trigger(pin, trigger)?;
        let mut last = self.read(pin)?;
        let deadline = timeout.map(|d| Instant::now() + d);
        loop {
            let remaining = match deadline {
                Some(d) => {
                    let r = d.saturating_duration_since(Instant::now());
                    if r.is_zero() {
                        return Ok(false);
                    }
                    Some(r)
                }
                None => None,
            };
            if !watch.wait(remaining)? {
                return Ok(false);
            }
            let value = self.read(pin)?;
            if value == last {
                // spurious - nothing actually changed
                continue;
            }
            last = value;
            match trigger {
                Trigger::Rising if value == 0 => continue,
                Trigger::Falling if value == 1 => continue,
                _ => return Ok(true),
            }
        }
    }

    /// Release a pin, unexporting it from the kernel.
    ///
    /// Releasing a pin that is not reserved is a null operation, so a
    /// release can always be retried safely.
    pub fn release(&self, pin: Pin) -> Result<()> {
        let mut exported = self
            .exported
            .lock()
            .expect("failed to acquire lock on exported set");
        if !exported.remove(&pin) {
            return Ok(());
        }
        // the pin is untracked even if the unexport fails - re-unexporting
        // a gone pin is harmless, while keeping it tracked leaks it forever.
        attr::write_attr(&attr::unexport_path(&self.root), &pin.to_string())
            .map_err(|e| Error::Sysfs(SysfsCall::Unexport, e))?;
        debug!("unexported pin {}", pin);
        Ok(())
    }

    /// Release every pin reserved by this driver.
    ///
    /// A failure to release one pin does not stop the rest being
    /// attempted; the failures are reported together as
    /// [`Error::ReleaseAll`].
    pub fn release_all(&self) -> Result<()> {
        // iterate over a stable copy - release mutates the set.
        let pins: Vec<Pin> = self
            .exported
            .lock()
            .expect("failed to acquire lock on exported set")
            .iter()
            .copied()
            .collect();
        let mut failures = Vec::new();
        for pin in pins {
            if let Err(e) = self.release(pin) {
                warn!("failed to release pin {}: {}", pin, e);
                failures.push((pin, e));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::ReleaseAll { failures })
        }
    }

    // Export the pin and mark it reserved.
    //
    // The export write and the bookkeeping are one logical action - the
    // pin is only marked once the kernel accepts the export.
    fn reserve(&self, pin: Pin) -> Result<()> {
        let mut exported = self
            .exported
            .lock()
            .expect("failed to acquire lock on exported set");
        if exported.contains(&pin) {
            return Err(Error::Conflict(pin));
        }
        attr::write_attr(&attr::export_path(&self.root), &pin.to_string())
            .map_err(|e| Error::Sysfs(SysfsCall::Export, e))?;
        exported.insert(pin);
        debug!("exported pin {}", pin);
        Ok(())
    }

    fn require_reserved(&self, pin: Pin) -> Result<()> {
        if !self.is_reserved(pin) {
            return Err(Error::NotReserved(pin));
        }
        Ok(())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new()
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if let Err(e) = self.release_all() {
            warn!("failed to release pins on drop: {}", e);
        }
    }
}
