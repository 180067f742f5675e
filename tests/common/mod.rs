//! Common test utilities for quickstack scenario and CLI tests.
//!
//! This module provides:
//! - Host fixtures: environment descriptors for the supported distributions
//! - `fresh_host`: a scripted runner that behaves like a machine with no runtime
//! - `provision_into`: one provisioning run against a temp app dir
//! - `quickstack()`: the compiled binary with a neutral terminal and home

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

use quickstack::application::{AppLayout, ProgressReporter, ProvisionOptions, ProvisionUseCase};
use quickstack::domain::ports::{NoPrompt, ProvisionEventSink};
use quickstack::domain::value_objects::{EnvironmentDescriptor, Profile};
use quickstack::infrastructure::LocalFs;
use quickstack::testing::{ScriptedRunner, SequentialSecrets};
use quickstack::{ProvisionReport, ProvisionResult};

pub const ACCOUNT: &str = "ec2-user";

pub fn amazon_2023_arm() -> EnvironmentDescriptor {
    EnvironmentDescriptor::new("amzn", "fedora", "2023", "aarch64")
}

pub fn ubuntu_x86() -> EnvironmentDescriptor {
    EnvironmentDescriptor::new("ubuntu", "debian", "22.04", "x86_64")
}

/// No docker, dnf available, compose plugin arrives with its package
pub fn fresh_host() -> ScriptedRunner {
    ScriptedRunner::new()
        .with_program("dnf")
        .installs("dnf -y install docker", "docker")
        .respond_sequence(
            "docker compose version",
            &[(1, "docker: 'compose' is not a docker command."), (0, "Docker Compose version v2.27.0")],
        )
        .respond("169.254.169.254", 0, "203.0.113.7")
        .respond("hostname", 0, "ip-10-0-0-5")
}

/// Docker and the compose plugin already installed
pub fn ready_host() -> ScriptedRunner {
    ScriptedRunner::new()
        .with_program("docker")
        .respond("docker compose version", 0, "Docker Compose version v2.27.0")
}

pub fn provision_into(
    root: &Path,
    env: &EnvironmentDescriptor,
    runner: &ScriptedRunner,
    profile: Profile,
) -> ProvisionResult<ProvisionReport> {
    let secrets = SequentialSecrets::default();
    let options = ProvisionOptions::new(AppLayout::new(root), ACCOUNT).with_profile(profile);
    ProvisionUseCase::new(env, runner, &LocalFs, &secrets, &NoPrompt).execute(
        &options,
        &mut ProgressReporter::silent(ProvisionUseCase::STEPS),
    )
}

pub fn provision_with_sink(
    root: &Path,
    env: &EnvironmentDescriptor,
    runner: &ScriptedRunner,
    profile: Profile,
    sink: std::sync::Arc<dyn ProvisionEventSink>,
) -> ProvisionResult<ProvisionReport> {
    let secrets = SequentialSecrets::default();
    let options = ProvisionOptions::new(AppLayout::new(root), ACCOUNT).with_profile(profile);
    ProvisionUseCase::new(env, runner, &LocalFs, &secrets, &NoPrompt).execute(
        &options,
        &mut ProgressReporter::new(sink, ProvisionUseCase::STEPS),
    )
}

pub fn mode(path: &Path) -> u32 {
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

/// The compiled binary, isolated from the caller's terminal and config
pub fn quickstack(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_quickstack"));
    cmd.env("NO_COLOR", "1")
        .env("TERM", "dumb")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("QUICKSTACK_DIR")
        .env_remove("QUICKSTACK_LOG")
        .env_remove("PROFILE")
        .env_remove("NONINTERACTIVE")
        .env_remove("DOMAIN")
        .env_remove("LE_EMAIL")
        .env_remove("QUICKSTACK_DOMAIN")
        .env_remove("QUICKSTACK_EMAIL");
    cmd
}
