//! Integration tests for the `walk` command.

mod common;

use common::{check_stdout, mirror, path, temp_file};
use expect_test::expect;
use indoc::indoc;
use predicates::prelude::*;

const PAIR: &str = indoc! {"
    type Pair struct { a *Node; b Node }
    type Node struct { next *Node; val int }
"};

#[test]
fn walk_outline_from_file() {
    let file = temp_file(PAIR);
    check_stdout(
        &["walk", path(&file), "Pair"],
        None,
        expect![[r#"
            Record Pair #0
              Pointer a *Node #1 @0
                Record Node #2
              Record b Node #2 @8
                Pointer next *Node #1 @0
                Primitive val int #3 @8
        "#]],
    );
}

#[test]
fn walk_from_stdin() {
    check_stdout(
        &["walk", "-", "Node"],
        Some(PAIR),
        expect![[r#"
            Record Node #0
              Pointer next *Node #1 @0
                Record Node #0
              Primitive val int #2 @8
        "#]],
    );
}

#[test]
fn walk_html() {
    mirror()
        .args(["walk", "-", "Pair", "--html"])
        .write_stdin(PAIR)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"<div data-kind="Record" data-type="Pair" data-size="24" data-typeid="0">"#,
        ))
        .stdout(predicate::str::contains(r#"data-field="next""#));
}

#[test]
fn walk_page() {
    mirror()
        .args(["walk", "-", "Pair", "--html", "--page"])
        .write_stdin(PAIR)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<title>Pair</title>"));
}

#[test]
fn walk_page_requires_html() {
    mirror()
        .args(["walk", "-", "Pair", "--page"])
        .write_stdin(PAIR)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--html"));
}

#[test]
fn walk_honor_tags() {
    let schema = indoc! {r#"
        type Conf struct {
            name   string
            secret *Conf `mirror:"ignore"`
        }
    "#};
    check_stdout(
        &["walk", "-", "Conf", "--honor-tags"],
        Some(schema),
        expect![[r#"
            Record Conf #0
              Primitive name string #1 @0
        "#]],
    );
}

#[test]
fn walk_tag_error() {
    mirror()
        .args(["walk", "-", "R", "--honor-tags"])
        .write_stdin(r#"type R struct { x int `mirror:"follow"` }"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("field `x`"));
}

#[test]
fn walk_unknown_type() {
    mirror()
        .args(["walk", "-", "Missing"])
        .write_stdin(PAIR)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "type `Missing` is not declared in the schema",
        ));
}

#[test]
fn walk_schema_error_names_the_file() {
    let file = temp_file("type A struct { b Bogus }");
    mirror()
        .args(["--no-color", "walk", path(&file), "A"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown type `Bogus`"))
        .stderr(predicate::str::contains(path(&file)));
}

#[test]
fn walk_missing_file() {
    mirror()
        .args(["walk", "/nonexistent/schema.mirror", "A"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("/nonexistent/schema.mirror"));
}
