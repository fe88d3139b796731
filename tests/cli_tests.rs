mod common;

use std::process::{Command, Output};

use common::GpioTree;

fn pirwatch(tree: &GpioTree, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pirwatch"))
        .args(args)
        .env("PIRWATCH_GPIO_ROOT", tree.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("run pirwatch")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn missing_pin_exits_with_usage() {
    let tree = GpioTree::new("cli-nopin");
    let out = pirwatch(&tree, &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
}

#[test]
fn partial_redis_target_exits_with_usage() {
    let tree = GpioTree::new("cli-partial");
    tree.export("17", "in\n", "rising\n", "0\n");
    for args in [
        &["17", "127.0.0.1"][..],
        &["17", "127.0.0.1", "6379"][..],
        &["17", "127.0.0.1", "6379", "chan"][..],
    ] {
        let out = pirwatch(&tree, args);
        assert_eq!(out.status.code(), Some(1), "{args:?}");
        assert!(out.stdout.is_empty());
        assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
    }
}

#[test]
fn non_numeric_pin_exits_before_touching_gpio() {
    let tree = GpioTree::new("cli-pin");
    for raw in ["abc", "-5"] {
        let out = pirwatch(&tree, &[raw]);
        assert_eq!(out.status.code(), Some(1));
        assert_eq!(
            stderr(&out).trim_end(),
            format!("GPIO pin not numeric. ({raw})")
        );
    }
}

#[test]
fn unexported_pin_exits_1() {
    let tree = GpioTree::new("cli-unexported");
    let out = pirwatch(&tree, &["23"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("GPIO pin does not appear to be exported."));
}

#[test]
fn misconfigured_pin_exits_1() {
    let tree = GpioTree::new("cli-config");
    tree.export("24", "out\n", "rising\n", "0\n");
    let out = pirwatch(&tree, &["24"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stderr(&out).trim_end(), "GPIO pin is not set to input mode. (o)");

    tree.export("24", "in\n", "falling\n", "0\n");
    let out = pirwatch(&tree, &["24"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stderr(&out).trim_end(),
        "GPIO pin is not set to detect rising edges. (f)"
    );
}

#[cfg(feature = "redis-publish")]
#[test]
fn unreachable_redis_exits_1() {
    let tree = GpioTree::new("cli-redis");
    tree.export("25", "in\n", "both\n", "0\n");
    let out = pirwatch(&tree, &["25", "127.0.0.1", "1", "chan", "-1"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(stderr(&out).starts_with("Unable to connect to Redis."), "{}", stderr(&out));
}

#[test]
fn help_exits_0() {
    let tree = GpioTree::new("cli-help");
    let out = pirwatch(&tree, &["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--format"));
}
