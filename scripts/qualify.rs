#!/usr/bin/env rust-script
//! ```cargo
//! [dependencies]
//! yansi = "0.5"
//! ```
extern crate yansi;
use std::process::Command;

macro_rules! run_command {
    ($cmd:expr , $($arg:expr),*) => (
        let mut command = command!($cmd, $($arg),*);
        let mut child = command.spawn().unwrap();
        let status = child.wait().unwrap();
        if !status.success() {
            print!("> {}",yansi::Paint::red("qualify terminates due to error"));
            std::process::exit(-1);
        }
    )
}

macro_rules! command {
    ($cmd:expr , $($arg:expr),*) => (
        {
            print!("\n> {}",yansi::Paint::yellow($cmd));
            let mut command = Command::new($cmd);
            $(
                print!(" {}",yansi::Paint::yellow(&$arg));
                command.arg($arg);
            )*
            print!("\n");
            command
        }
    )
}

#[rustfmt::skip]
fn main() {
    println!("Qualify dbconnect");

    // Format
    run_command!("cargo", "fmt");

    // Build with each backend alone, and with all of them
    run_command!("cargo", "build", "--package", "dbconnect");
    run_command!("cargo", "build", "--package", "dbconnect", "--no-default-features", "--features", "mariadb");
    run_command!("cargo", "build", "--package", "dbconnect", "--no-default-features", "--features", "postgres");
    run_command!("cargo", "build", "--package", "dbconnect", "--no-default-features", "--features", "sqlite");
    run_command!("cargo", "build", "--package", "dbconnect", "--release");

    // Clippy
    run_command!("cargo", "+nightly", "clippy", "--all-targets", "--package", "dbconnect_impl", "--", "-D", "warnings");
    run_command!("cargo", "+nightly", "clippy", "--all-targets", "--package", "dbconnect", "--", "-D", "warnings");

    // doc
    run_command!("cargo", "+nightly", "doc", "--package", "dbconnect", "--no-deps", "--open");
    // doc-tests
    run_command!("cargo", "+nightly", "test", "--doc", "--package", "dbconnect");

    // Run tests; the server backends are only tested if
    // DBCONNECT_TEST_MARIADB and DBCONNECT_TEST_POSTGRES are set
    run_command!("cargo", "test", "--package", "dbconnect_impl");
    run_command!("cargo", "test", "--package", "dbconnect", "--release");
    run_command!("cargo", "test", "--package", "dbconnect");

    // check git status
    let mut cmd = command!("git", "status", "-s");
    let child = cmd.stdout(std::process::Stdio::piped()).spawn().unwrap();
    let output = child.wait_with_output().unwrap();
    if output.stdout.len() > 0 {
        print!("> {}", yansi::Paint::red("there are unsubmitted files"));
        std::process::exit(-1);
    }

    // say goodbye
    println!("\n> all done :-)  Looks like you're ready to \"cargo publish\"?");
}
