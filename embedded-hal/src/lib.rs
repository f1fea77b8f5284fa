// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library providing [`embedded_hal::digital`] traits for pins driven by
//! a [`gpiosysfs::Driver`], and therefore for any Linux platform
//! supporting the sysfs GPIO interface.
//!
//! Each wrapper holds one pin in the matching direction; constructing the
//! wrapper opens the pin, so the driver's exclusivity guarantee carries
//! over - a pin can back at most one live wrapper.
//!
//! # Example Usage
//!
//! Reading an input pin:
//!
//! ```no_run
//! # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
//! use embedded_hal::digital::InputPin;
//!
//! let drv = gpiosysfs::Driver::new();
//! let mut pin = gpiosysfs_embedded_hal::InputPin::new(&drv, 4)?;
//! if pin.is_high()? {
//!     println!("Input is high.");
//! }
//! # Ok(())
//! # }
//! ```
//! Setting an output pin:
//!
//! ```no_run
//! # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
//! use embedded_hal::digital::{OutputPin, PinState};
//!
//! let drv = gpiosysfs::Driver::new();
//! // level is set as part of the open
//! let mut led0 = gpiosysfs_embedded_hal::OutputPin::new(&drv, 22, PinState::High)?;
//!
//! // change the level later
//! led0.set_low()?;
//! # Ok(())
//! # }
//! ```

use embedded_hal::digital::PinState;
use gpiosysfs::{Direction, Driver, Pin};

/// Core common class for InputPin and OutputPin.
#[derive(Debug)]
struct PinRef<'d> {
    drv: &'d Driver,
    pin: Pin,
}

impl PinRef<'_> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Error> {
        Ok(self.drv.read(self.pin)? == 1)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Error> {
        Ok(!self.is_high()?)
    }
}

/// Provides [`embedded_hal::digital`] traits for an input pin on a
/// [`Driver`].
///
/// Holding the [`InputPin`] holds the driver's reservation of the pin.
/// The reservation is not dropped with the wrapper - release it with
/// [`release`], or through the driver.
///
/// [`release`]: InputPin::release
#[derive(Debug)]
pub struct InputPin<'d>(PinRef<'d>);

impl<'d> InputPin<'d> {
    /// Open `pin` as an input on the given driver.
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
    /// use embedded_hal::digital::InputPin;
    ///
    /// let drv = gpiosysfs::Driver::new();
    /// let mut pin = gpiosysfs_embedded_hal::InputPin::new(&drv, 4)?;
    /// if pin.is_high()? {
    ///     println!("Input is high.");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(drv: &'d Driver, pin: Pin) -> Result<Self, Error> {
        drv.set_direction(pin, Direction::Input)?;
        Ok(InputPin(PinRef { drv, pin }))
    }

    /// Set this pin to output mode.
    ///
    /// Setting the direction is the reserve operation on this backend, so
    /// the pin is released and re-opened in the new direction.
    pub fn into_output_pin(self, state: PinState) -> Result<OutputPin<'d>, Error> {
        self.0.drv.release(self.0.pin)?;
        OutputPin::new(self.0.drv, self.0.pin, state)
    }

    /// Release the pin back to the driver.
    pub fn release(self) -> Result<(), Error> {
        Ok(self.0.drv.release(self.0.pin)?)
    }
}

impl embedded_hal::digital::InputPin for InputPin<'_> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl embedded_hal::digital::ErrorType for InputPin<'_> {
    /// Errors returned by [`InputPin`].
    type Error = Error;
}

/// Provides [`embedded_hal::digital`] traits for an output pin on a
/// [`Driver`].
///
/// Holding the [`OutputPin`] holds the driver's reservation of the pin.
/// The reservation is not dropped with the wrapper - release it with
/// [`release`], or through the driver.
///
/// [`release`]: OutputPin::release
#[derive(Debug)]
pub struct OutputPin<'d>(PinRef<'d>);

impl<'d> OutputPin<'d> {
    /// Open `pin` as an output on the given driver, driven to `state`.
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
    /// use embedded_hal::digital::{OutputPin, PinState};
    ///
    /// let drv = gpiosysfs::Driver::new();
    /// let mut pin = gpiosysfs_embedded_hal::OutputPin::new(&drv, 17, PinState::Low)?;
    /// // later...
    /// pin.set_high()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(drv: &'d Driver, pin: Pin, state: PinState) -> Result<Self, Error> {
        drv.set_direction(pin, Direction::Output)?;
        drv.write(pin, state_to_value(state))?;
        Ok(OutputPin(PinRef { drv, pin }))
    }

    /// Set this pin to input mode.
    ///
    /// Setting the direction is the reserve operation on this backend, so
    /// the pin is released and re-opened in the new direction.
    pub fn into_input_pin(self) -> Result<InputPin<'d>, Error> {
        self.0.drv.release(self.0.pin)?;
        InputPin::new(self.0.drv, self.0.pin)
    }

    /// Release the pin back to the driver.
    pub fn release(self) -> Result<(), Error> {
        Ok(self.0.drv.release(self.0.pin)?)
    }
}

impl embedded_hal::digital::InputPin for OutputPin<'_> {
    // Supporting InputPin is intentional to allow reading back the value
    // file for output pins, which the sysfs interface permits.

    #[inline]
    /// Is the line high?
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    #[inline]
    /// Is the line low?
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl embedded_hal::digital::OutputPin for OutputPin<'_> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Error> {
        Ok(self.0.drv.write(self.0.pin, state_to_value(state))?)
    }
}

impl embedded_hal::digital::StatefulOutputPin for OutputPin<'_> {
    // The value file is the source of truth, so set state is read back
    // rather than cached.

    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let value = self.0.drv.read(self.0.pin)?;
        Ok(self.0.drv.write(self.0.pin, 1 - value)?)
    }
}

impl embedded_hal::digital::ErrorType for OutputPin<'_> {
    /// Errors returned by [`OutputPin`].
    type Error = Error;
}

/// Converts a [`PinState`] to a sysfs pin value.
fn state_to_value(state: PinState) -> u8 {
    match state {
        PinState::High => 1,
        PinState::Low => 0,
    }
}

/// Errors returned by [`gpiosysfs_embedded_hal`](crate) types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error returned from an underlying gpiosysfs call.
    #[error("gpiosysfs returned: {0}")]
    Sysfs(#[source] gpiosysfs::Error),
}

impl From<gpiosysfs::Error> for Error {
    fn from(err: gpiosysfs::Error) -> Self {
        Self::Sysfs(err)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
