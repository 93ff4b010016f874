use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn taskdeck_help_works() {
    Command::cargo_bin("taskdeck")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("shared task board"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["new", "list", "show", "move", "rename", "chat", "board"];

    for cmd in subcommands {
        Command::cargo_bin("taskdeck")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}
