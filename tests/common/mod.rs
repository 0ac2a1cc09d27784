#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A private registry store plus room for Kronospheres
pub struct Sandbox {
    pub temp: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Sandbox {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn store(&self) -> PathBuf {
        self.temp.path().join("kronospheres.json")
    }

    pub fn dir(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("kronos").unwrap();
        cmd.env("KRONOS_STORE", self.store());
        cmd.env_remove("EDITOR");
        cmd.env_remove("VISUAL");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Create a Kronosphere named `name` in a directory of the same name
    pub fn workspace(&self, name: &str) -> PathBuf {
        self.cmd()
            .args(["workspace", "create", name])
            .arg(self.dir(name))
            .assert()
            .success();
        self.dir(name).canonicalize().unwrap()
    }
}

pub fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}
