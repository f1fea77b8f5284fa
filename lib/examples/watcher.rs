// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gpiosysfs::{Direction, Driver, Trigger};

fn main() {
    env_logger::init();

    let drv = Driver::new();
    if let Err(e) = drv.set_direction(23, Direction::Input) {
        eprintln!("Failed to open pin: {}", e);
        std::process::exit(1);
    }
    loop {
        match drv.wait_for_edge(23, Trigger::Both) {
            Ok(_) => match drv.read(23) {
                Ok(value) => println!("pin 23 -> {}", value),
                Err(e) => {
                    eprintln!("Failed to read value: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Failed to wait for edge: {}", e);
                std::process::exit(1);
            }
        }
    }
}
