// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gpiosysfs::{Direction, Driver};

fn main() {
    let drv = Driver::new();
    if let Err(e) = drv.set_direction(23, Direction::Input) {
        eprintln!("Failed to open pin: {}", e);
        std::process::exit(1);
    }
    match drv.read(23) {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("Failed to read value: {}", e);
            std::process::exit(1);
        }
    }
}
