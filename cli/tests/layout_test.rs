//! Integration tests for the `layout` command.

mod common;

use common::{mirror, path, temp_file};
use predicates::prelude::*;

#[test]
fn layout_compatible() {
    let a = temp_file("type R struct { x int32; y *R }");
    let b = temp_file("type R struct { x int32; y *R }");
    mirror()
        .args(["layout", path(&a), path(&b), "R"])
        .assert()
        .code(0)
        .stdout("compatible\n");
}

#[test]
fn layout_incompatible() {
    let a = temp_file("type R struct { x int32; y int32 }");
    let b = temp_file("type R struct { y int32; x int32 }");
    mirror()
        .args(["layout", path(&a), path(&b), "R"])
        .assert()
        .code(1)
        .stdout("incompatible\n");
}

#[test]
fn layout_from_stdin() {
    let b = temp_file("type R struct { n int64; f func() }");
    mirror()
        .args(["layout", "-", path(&b), "R"])
        .write_stdin("type R struct { n int64; f func(int) error }")
        .assert()
        .code(0)
        .stdout("compatible\n");
}

#[test]
fn layout_type_b_must_share_the_record_name() {
    let b = temp_file("type Other struct { n int64 }");
    mirror()
        .args(["layout", "-", path(&b), "Mine", "--type-b", "Other"])
        .write_stdin("type Mine struct { n int64 }")
        .assert()
        .code(1)
        .stdout("incompatible\n");
}

#[test]
fn layout_unknown_type_b() {
    let a = temp_file("type R struct { n int64 }");
    mirror()
        .args(["layout", path(&a), path(&a), "R", "--type-b", "S"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("type `S` is not declared"));
}

#[test]
fn layout_depth_limits_nested_records() {
    let a = temp_file("type O struct { i I }\ntype I struct { x int32 }");
    let b = temp_file("type O struct { i I }\ntype I struct { x float32 }");
    mirror()
        .args(["layout", path(&a), path(&b), "O", "--depth", "0"])
        .assert()
        .code(0);
    mirror()
        .args(["layout", path(&a), path(&b), "O", "--depth", "1"])
        .assert()
        .code(1);
}

#[test]
fn layout_two_stdin_inputs() {
    mirror()
        .args(["layout", "-", "-", "R"])
        .write_stdin("type R int")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("only one schema can be read from stdin"));
}

#[test]
fn layout_huge_depth_on_recursive_records() {
    let a = temp_file("type N struct { next *N; kids []N; v int }");
    mirror()
        .args(["layout", path(&a), path(&a), "N", "--depth", "4000000000"])
        .assert()
        .code(0)
        .stdout("compatible\n");
}
