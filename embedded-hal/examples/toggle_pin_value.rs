// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::Context;
use embedded_hal::digital::{PinState, StatefulOutputPin};
use std::thread::sleep;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let drv = gpiosysfs::Driver::new();
    let mut pin = gpiosysfs_embedded_hal::OutputPin::new(&drv, 22, PinState::Low)
        .context("Failed to open pin")?;

    loop {
        sleep(Duration::from_millis(500));
        pin.toggle().context("Failed to toggle value")?;
    }
}
