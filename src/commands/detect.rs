//! Detect command handler

use anyhow::Result;
use serde::Serialize;

use quickstack::domain::services::install_plan::{branch_commands, debian_channel};
use quickstack::domain::services::{select_branch, InstallBranch};
use quickstack::domain::value_objects::EnvironmentDescriptor;
use quickstack::infrastructure::HostDetector;

use super::RunContext;
use crate::cli::Cli;

#[derive(Serialize)]
struct DetectOutput<'a> {
    environment: &'a EnvironmentDescriptor,
    branch: InstallBranch,
    commands: Vec<String>,
}

pub fn cmd_detect(cli: &Cli) -> Result<()> {
    let ctx = RunContext::prepare(cli, false)?;
    let env = HostDetector::default().detect();
    let branch = select_branch(&env);
    let commands: Vec<String> = branch_commands(branch, &env)
        .into_iter()
        .map(|c| c.line)
        .collect();

    if ctx.json {
        let output = DetectOutput {
            environment: &env,
            branch,
            commands,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", env);
    println!("Install branch: {}", branch);
    if branch == InstallBranch::DebianFamily {
        println!("Docker repository channel: {}", debian_channel(&env));
    }
    if commands.is_empty() {
        println!("Commands: chosen at run time from the available package manager");
    } else {
        println!("Commands:");
        for line in commands {
            println!("  {}", line);
        }
    }
    Ok(())
}
