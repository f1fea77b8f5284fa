// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Driver behavior against a populated GPIO tree, using a tempdir standing
// in for /sys/class/gpio.  The kernel creates the gpio<N> directories on
// export; here they are created up front.

use gpiosysfs::watch::Watch;
use gpiosysfs::{Direction, Driver, Error, Pull, Trigger};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn add_pin(root: &Path, pin: u32, value: &str) {
    let dir = root.join(format!("gpio{}", pin));
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("direction"), "in\n").unwrap();
    fs::write(dir.join("value"), value).unwrap();
    fs::write(dir.join("edge"), "none\n").unwrap();
}

fn fake_tree(pins: &[(u32, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (pin, value) in pins {
        add_pin(dir.path(), *pin, value);
    }
    dir
}

fn attr(root: &Path, pin: u32, name: &str) -> String {
    fs::read_to_string(root.join(format!("gpio{}/{}", pin, name)))
        .unwrap()
        .trim_end()
        .to_string()
}

/// A scripted notification source - each wait rewrites the value file with
/// the next scripted value and reports an event, and the wait ends once
/// the script is exhausted.
struct FakeWatch {
    path: PathBuf,
    events: VecDeque<&'static str>,
}

impl FakeWatch {
    fn new(root: &Path, pin: u32, events: &[&'static str]) -> FakeWatch {
        FakeWatch {
            path: root.join(format!("gpio{}/value", pin)),
            events: events.iter().copied().collect(),
        }
    }
}

impl Watch for FakeWatch {
    fn wait(&mut self, _timeout: Option<Duration>) -> gpiosysfs::Result<bool> {
        match self.events.pop_front() {
            Some(v) => {
                fs::write(&self.path, v).unwrap();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[test]
fn set_direction_reserves() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    assert!(!drv.is_reserved(4));
    drv.set_direction(4, Direction::Input).unwrap();
    assert!(drv.is_reserved(4));
    assert_eq!(attr(tree.path(), 4, "direction"), "in");
    assert_eq!(
        fs::read_to_string(tree.path().join("export")).unwrap(),
        "4"
    );
}

#[test]
fn set_direction_out() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Output).unwrap();
    assert_eq!(attr(tree.path(), 4, "direction"), "out");
}

#[test]
fn set_direction_multiple_pins() {
    let tree = fake_tree(&[(4, "0\n"), (5, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    drv.set_direction(5, Direction::Input).unwrap();
    assert!(drv.is_reserved(4));
    assert!(drv.is_reserved(5));
}

#[test]
fn set_direction_conflict() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    // a reserved pin cannot be re-opened, whatever the direction
    assert!(matches!(
        drv.set_direction(4, Direction::Input),
        Err(Error::Conflict(4))
    ));
    assert!(matches!(
        drv.set_direction(4, Direction::Output),
        Err(Error::Conflict(4))
    ));
}

#[test]
fn failed_export_is_not_tracked() {
    let tree = fake_tree(&[(4, "0\n")]);
    // a directory in place of the control file makes the export write fail
    fs::create_dir(tree.path().join("export")).unwrap();
    let drv = Driver::from_path(tree.path());
    assert!(matches!(
        drv.set_direction(4, Direction::Input),
        Err(Error::Sysfs(..))
    ));
    assert!(!drv.is_reserved(4));
}

#[test]
fn read_value() {
    let tree = fake_tree(&[(4, "1\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    assert_eq!(drv.read(4).unwrap(), 1);
    fs::write(tree.path().join("gpio4/value"), "0\n").unwrap();
    assert_eq!(drv.read(4).unwrap(), 0);
}

#[test]
fn read_unexpected_content() {
    let tree = fake_tree(&[(4, "7\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    assert!(matches!(
        drv.read(4),
        Err(Error::UnexpectedContent(v)) if v == "7"
    ));
}

#[test]
fn write_value() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Output).unwrap();
    drv.write(4, 1).unwrap();
    assert_eq!(attr(tree.path(), 4, "value"), "1");
    drv.write(4, 0).unwrap();
    assert_eq!(attr(tree.path(), 4, "value"), "0");
}

#[test]
fn write_invalid_value_touches_nothing() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Output).unwrap();
    assert!(matches!(drv.write(4, 2), Err(Error::InvalidArgument(_))));
    assert_eq!(attr(tree.path(), 4, "value"), "0");
}

#[test]
fn set_trigger_writes_edge() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    for trigger in [Trigger::Both, Trigger::None, Trigger::Falling, Trigger::Rising] {
        drv.set_trigger(4, trigger).unwrap();
        assert_eq!(attr(tree.path(), 4, "edge"), trigger.as_str());
    }
}

#[test]
fn set_pull() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    assert!(drv.set_pull(4, Pull::Off).is_ok());
    assert!(matches!(
        drv.set_pull(4, Pull::Up),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn release() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    drv.release(4).unwrap();
    assert!(!drv.is_reserved(4));
    assert_eq!(
        fs::read_to_string(tree.path().join("unexport")).unwrap(),
        "4"
    );
    // idempotent - the second release is a null operation
    drv.release(4).unwrap();
}

#[test]
fn release_keeps_other_pins() {
    let tree = fake_tree(&[(4, "0\n"), (5, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    drv.set_direction(5, Direction::Input).unwrap();
    drv.release(4).unwrap();
    assert!(!drv.is_reserved(4));
    assert!(drv.is_reserved(5));
}

#[test]
fn released_pin_can_be_reopened() {
    let tree = fake_tree(&[(4, "0\n")]);
    let drv = Driver::from_path(tree.path());
    drv.set_direction(4, Direction::Input).unwrap();
    drv.release(4).unwrap();
    drv.set_direction(4, Direction::Output).unwrap();
    assert!(drv.is_reserved(4));
}

#[test]
fn release_all() {
    let tree = fake_tree(&[(4, "0\n"), (5, "0\n"), (6, "0\n")]);
    let drv = Driver::from_path(tree.path());
    for pin in [4, 5, 6] {
        drv.set_direction(pin, Direction::Input).unwrap();
    }
    drv.release_all().unwrap();
    for pin in [4, 5, 6] {
        assert!(!drv.is_reserved(pin), "pin {} still reserved", pin);
    }
}

#[test]
fn release_all_tolerates_failures() {
    let tree = fake_tree(&[(4, "0\n"), (5, "0\n"), (6, "0\n")]);
    let drv = Driver::from_path(tree.path());
    for pin in [4, 5, 6] {
        drv.set_direction(pin, Direction::Input).unwrap();
    }
    // break the unexport control file - every release side effect now fails,
    // but every pin must still be untracked and every failure reported
    fs::create_dir(tree.path().join("unexport")).unwrap();
    match drv.release_all() {
        Err(Error::ReleaseAll { failures }) => {
            let mut pins: Vec<u32> = failures.iter().map(|f| f.0).collect();
            pins.sort_unstable();
            assert_eq!(pins, [4, 5, 6]);
        }
        res => panic!("unexpected result: {:?}", res),
    }
    for pin in [4, 5, 6] {
        assert!(!drv.is_reserved(pin), "pin {} still reserved", pin);
    }
}

#[test]
fn drop_releases_pins() {
    let tree = fake_tree(&[(4, "0\n")]);
    {
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
    }
    assert_eq!(
        fs::read_to_string(tree.path().join("unexport")).unwrap(),
        "4"
    );
}

mod wait_for_edge {
    use super::*;

    #[test]
    fn requires_reservation() {
        let tree = fake_tree(&[(4, "0\n")]);
        let drv = Driver::from_path(tree.path());
        assert!(matches!(
            drv.wait_for_edge(4, Trigger::Rising),
            Err(Error::NotReserved(4))
        ));
    }

    #[test]
    fn sets_trigger() {
        let tree = fake_tree(&[(4, "0\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        let mut watch = FakeWatch::new(tree.path(), 4, &["1"]);
        drv.wait_for_edge_with(4, Trigger::Rising, &mut watch)
            .unwrap();
        assert_eq!(attr(tree.path(), 4, "edge"), "rising");
    }

    #[test]
    fn rising() {
        let tree = fake_tree(&[(4, "0\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        // a no-op 0 -> 0 rewrite must not satisfy the wait
        let mut watch = FakeWatch::new(tree.path(), 4, &["0", "1"]);
        assert!(drv
            .wait_for_edge_with(4, Trigger::Rising, &mut watch)
            .unwrap());
        // satisfied on the transition, exactly once
        assert!(watch.events.is_empty());
    }

    #[test]
    fn rising_ignores_noop_writes() {
        let tree = fake_tree(&[(4, "0\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        let mut watch = FakeWatch::new(tree.path(), 4, &["0", "0"]);
        assert!(!drv
            .wait_for_edge_with(4, Trigger::Rising, &mut watch)
            .unwrap());
    }

    #[test]
    fn falling_ignores_spurious_events() {
        let tree = fake_tree(&[(4, "1\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        // 1 -> 1 is spurious, 1 -> 0 satisfies
        let mut watch = FakeWatch::new(tree.path(), 4, &["1", "0"]);
        assert!(drv
            .wait_for_edge_with(4, Trigger::Falling, &mut watch)
            .unwrap());
    }

    #[test]
    fn falling_tracks_baseline_through_rise() {
        let tree = fake_tree(&[(4, "0\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        // the intermediate rise moves the baseline, so the subsequent fall
        // is still observed as a change
        let mut watch = FakeWatch::new(tree.path(), 4, &["1", "0"]);
        assert!(drv
            .wait_for_edge_with(4, Trigger::Falling, &mut watch)
            .unwrap());
    }

    #[test]
    fn rising_rejects_fall() {
        let tree = fake_tree(&[(4, "1\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        let mut watch = FakeWatch::new(tree.path(), 4, &["0"]);
        assert!(!drv
            .wait_for_edge_with(4, Trigger::Rising, &mut watch)
            .unwrap());
    }

    #[test]
    fn both_accepts_either_edge() {
        let tree = fake_tree(&[(4, "0\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        let mut watch = FakeWatch::new(tree.path(), 4, &["1"]);
        assert!(drv
            .wait_for_edge_with(4, Trigger::Both, &mut watch)
            .unwrap());
        let mut watch = FakeWatch::new(tree.path(), 4, &["0"]);
        assert!(drv
            .wait_for_edge_with(4, Trigger::Both, &mut watch)
            .unwrap());
    }

    #[test]
    fn timeout_expires() {
        let tree = fake_tree(&[(4, "0\n")]);
        let drv = Driver::from_path(tree.path());
        drv.set_direction(4, Direction::Input).unwrap();
        // nothing writes the value file, so the bounded wait lapses
        assert!(!drv
            .wait_for_edge_timeout(4, Trigger::Rising, Duration::from_millis(20))
            .unwrap());
    }
}
