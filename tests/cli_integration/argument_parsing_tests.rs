// Tests for argument parsing

use super::test_utils::*;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    offline()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("describe"));
}

#[test]
fn test_version_flag() {
    offline()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_create_help_lists_resource_flags() {
    offline()
        .args(["create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--memory"))
        .stdout(predicate::str::contains("--omp-threads-per-node"))
        .stdout(predicate::str::contains("--storage-file"));
}

#[test]
fn test_unknown_resource_kind_is_rejected() {
    offline()
        .args(["describe", "task", "1"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error: invalid value 'task'"));
}

#[test]
fn test_conflicting_mpi_flags_are_rejected() {
    offline()
        .args(["create", "--openmpi", "--intelmpi", "busybox"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error: the argument '--openmpi'"));
}

#[test]
fn test_non_numeric_flag_value_exits_one() {
    offline()
        .args(["create", "--cpus", "many", "busybox"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("'many'"));
}
