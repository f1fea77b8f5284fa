// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Error;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An identifier for a GPIO pin.
///
/// This is the number the kernel knows the pin by, as written to the
/// class-level `export` file.
pub type Pin = u32;

/// The direction of a pin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// The pin is an input.
    Input,

    /// The pin is an output.
    Output,
}
impl Default for Direction {
    fn default() -> Self {
        Self::Input
    }
}
impl Direction {
    /// The value the direction attribute holds for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "in",
            Direction::Output => "out",
        }
    }
}
impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::Input),
            "out" => Ok(Direction::Output),
            _ => Err(Error::InvalidArgument(format!(
                "direction should be 'in' or 'out', not {:?}",
                s
            ))),
        }
    }
}

/// The edge transitions reported as interrupts on a pin's value file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Trigger {
    /// No transitions are reported.
    None,

    /// Transitions from low to high are reported.
    Rising,

    /// Transitions from high to low are reported.
    Falling,

    /// Transitions in both directions are reported.
    Both,
}
impl Default for Trigger {
    fn default() -> Self {
        Self::None
    }
}
impl Trigger {
    /// The value the edge attribute holds for this trigger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::None => "none",
            Trigger::Rising => "rising",
            Trigger::Falling => "falling",
            Trigger::Both => "both",
        }
    }
}
impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for Trigger {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Trigger::None),
            "rising" => Ok(Trigger::Rising),
            "falling" => Ok(Trigger::Falling),
            "both" => Ok(Trigger::Both),
            _ => Err(Error::InvalidArgument(format!(
                "trigger should be 'falling', 'rising', 'both' or 'none', not {:?}",
                s
            ))),
        }
    }
}

/// The pull resistor modes for a pin.
///
/// The sysfs interface cannot drive pull resistors, so only [`Pull::Off`]
/// is accepted by the driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pull {
    /// No pull resistor is requested.
    Off,

    /// The pin is pulled up.
    Up,

    /// The pin is pulled down.
    Down,
}
impl Default for Pull {
    fn default() -> Self {
        Self::Off
    }
}
impl Pull {
    /// The conventional name for this pull mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pull::Off => "off",
            Pull::Up => "up",
            Pull::Down => "down",
        }
    }
}
impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for Pull {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Pull::Off),
            "up" => Ok(Pull::Up),
            "down" => Ok(Pull::Down),
            _ => Err(Error::InvalidArgument(format!(
                "pull should be 'off', 'up' or 'down', not {:?}",
                s
            ))),
        }
    }
}
