// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::Context;
use gpiosysfs::{Direction, Driver};
use std::result::Result;
use std::thread::sleep;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut value = 1;

    let drv = Driver::new();
    drv.set_direction(22, Direction::Output)
        .context("Failed to open pin")?;

    loop {
        sleep(Duration::from_millis(500));
        value = 1 - value;
        println!("{}", value);
        drv.write(22, value).context("Failed to toggle value")?;
    }
}
