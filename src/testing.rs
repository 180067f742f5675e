//! Test doubles shared by unit and integration tests
//!
//! `ScriptedRunner` stands in for the host: it records every command line,
//! answers with scripted exit codes, and simulates programs appearing on the
//! search path once an install command succeeds.

use std::collections::{HashSet, VecDeque};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::domain::ports::{
    CommandResult, CommandRunner, CommandSpec, OperatorPrompt, ProvisionEvent, ProvisionEventSink,
};
use crate::domain::services::SecretGenerator;
use crate::domain::value_objects::Profile;
use crate::error::{ProvisionError, ProvisionResult};

struct Rule {
    pattern: String,
    responses: VecDeque<CommandResult>,
    last: CommandResult,
}

/// Scripted fake `CommandRunner`
///
/// Unmatched commands succeed with empty output. Rules match by substring;
/// the most recently added matching rule wins.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    on_path: Mutex<HashSet<String>>,
    provides: Mutex<Vec<(String, String)>>,
    log: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `program` on the simulated search path
    pub fn with_program(self, program: &str) -> Self {
        self.add_program(program);
        self
    }

    pub fn add_program(&self, program: &str) {
        lock(&self.on_path).insert(program.to_string());
    }

    /// Every command containing `pattern` exits with `exit_code`
    pub fn respond(self, pattern: &str, exit_code: i32, output: &str) -> Self {
        self.respond_sequence(pattern, &[(exit_code, output)])
    }

    /// Successive matches get successive responses; the last one repeats
    pub fn respond_sequence(self, pattern: &str, responses: &[(i32, &str)]) -> Self {
        let mut queue: VecDeque<CommandResult> = responses
            .iter()
            .map(|(code, out)| CommandResult::new(*code, *out))
            .collect();
        let last = queue
            .pop_back()
            .unwrap_or_else(|| CommandResult::new(0, ""));
        lock(&self.rules).push(Rule {
            pattern: pattern.to_string(),
            responses: queue,
            last,
        });
        self
    }

    /// When a command containing `pattern` succeeds, `program` appears on the path
    pub fn installs(self, pattern: &str, program: &str) -> Self {
        lock(&self.provides).push((pattern.to_string(), program.to_string()));
        self
    }

    /// Command lines in execution order
    pub fn commands(&self) -> Vec<String> {
        lock(&self.log).iter().map(|s| s.line.clone()).collect()
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        lock(&self.log).clone()
    }

    pub fn count_matching(&self, pattern: &str) -> usize {
        self.commands().iter().filter(|c| c.contains(pattern)).count()
    }

    pub fn ran(&self, pattern: &str) -> bool {
        self.count_matching(pattern) > 0
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> ProvisionResult<CommandResult> {
        lock(&self.log).push(spec.clone());

        let result = {
            let mut rules = lock(&self.rules);
            match rules
                .iter_mut()
                .rev()
                .find(|r| spec.line.contains(&r.pattern))
            {
                Some(rule) => rule.responses.pop_front().unwrap_or_else(|| rule.last.clone()),
                None => CommandResult::new(0, ""),
            }
        };

        if result.succeeded {
            let provided: Vec<String> = lock(&self.provides)
                .iter()
                .filter(|(pattern, _)| spec.line.contains(pattern.as_str()))
                .map(|(_, program)| program.clone())
                .collect();
            for program in provided {
                self.add_program(&program);
            }
        }
        Ok(result)
    }

    fn which(&self, program: &str) -> bool {
        lock(&self.on_path).contains(program)
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cloneable in-memory writer
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.0)).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.0).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Event sink that keeps every event
#[derive(Clone, Default)]
pub struct RecordingSink(Arc<Mutex<Vec<ProvisionEvent>>>);

impl RecordingSink {
    pub fn events(&self) -> Vec<ProvisionEvent> {
        lock(&self.0).clone()
    }
}

impl ProvisionEventSink for RecordingSink {
    fn on_event(&self, event: ProvisionEvent) {
        lock(&self.0).push(event);
    }
}

/// Deterministic secrets: the n-th secret repeats the n-th alphabet letter
#[derive(Default)]
pub struct SequentialSecrets {
    counter: Mutex<usize>,
}

impl SecretGenerator for SequentialSecrets {
    fn generate(&self, length: usize) -> String {
        let mut counter = lock(&self.counter);
        let c = (b'A' + (*counter % 26) as u8) as char;
        *counter += 1;
        std::iter::repeat(c).take(length).collect()
    }
}

/// Prompt with canned answers
#[derive(Default)]
pub struct ScriptedPrompt {
    pub profile: Option<Profile>,
    pub inputs: Mutex<VecDeque<String>>,
    pub confirm: bool,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(inputs: &[&str], confirm: bool) -> Self {
        Self {
            profile: None,
            inputs: Mutex::new(inputs.iter().map(|s| s.to_string()).collect()),
            confirm,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn select_profile(&self, default: Profile) -> ProvisionResult<Profile> {
        lock(&self.asked).push("profile".to_string());
        Ok(self.profile.unwrap_or(default))
    }

    fn input(&self, label: &str, _default: Option<&str>) -> ProvisionResult<String> {
        lock(&self.asked).push(label.to_string());
        lock(&self.inputs)
            .pop_front()
            .ok_or_else(|| ProvisionError::InvalidInput {
                field: label.to_string(),
                message: "no scripted answer".to_string(),
            })
    }

    fn confirm(&self, message: &str, _default: bool) -> ProvisionResult<bool> {
        lock(&self.asked).push(message.to_string());
        Ok(self.confirm)
    }
}
