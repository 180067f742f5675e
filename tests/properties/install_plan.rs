//! Property tests for install branch selection.

use proptest::prelude::*;

use quickstack::domain::services::install_plan::{branch_commands, INSTALL_RULES};
use quickstack::domain::services::{select_branch, InstallBranch};
use quickstack::domain::value_objects::EnvironmentDescriptor;

fn any_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("amzn".to_string()),
        Just("ubuntu".to_string()),
        Just("debian".to_string()),
        Just("raspbian".to_string()),
        Just("fedora".to_string()),
        Just("rocky".to_string()),
        "[a-zA-Z0-9 ._-]{0,16}",
    ]
}

fn any_machine() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x86_64".to_string()),
        Just("aarch64".to_string()),
        Just("arm64".to_string()),
        "[a-z0-9_]{0,10}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every descriptor gets exactly the first matching branch.
    #[test]
    fn property_selection_is_total_and_first_match(
        id in any_id(),
        like in any_id(),
        version in "[0-9.]{0,8}",
        machine in any_machine(),
    ) {
        let env = EnvironmentDescriptor::new(id, like, version, machine);
        let branch = select_branch(&env);

        let first = INSTALL_RULES.iter().find(|r| (r.matches)(&env)).map(|r| r.branch);
        prop_assert_eq!(Some(branch), first);
        prop_assert_eq!(select_branch(&env), branch);
    }

    /// PROPERTY: any Amazon 2023.x descriptor uses dnf, never yum or apt-get.
    #[test]
    fn property_amazon_2023_uses_dnf(
        minor in "[0-9]{0,6}",
        machine in any_machine(),
    ) {
        let env = EnvironmentDescriptor::new("amzn", "fedora", format!("2023{}", minor), machine);
        prop_assert_eq!(select_branch(&env), InstallBranch::AmazonLinux2023);
        for command in branch_commands(InstallBranch::AmazonLinux2023, &env) {
            prop_assert!(command.line.contains("dnf") || command.line.contains("systemctl"));
        }
    }

    /// PROPERTY: fixed branches only run privileged commands.
    #[test]
    fn property_fixed_branch_commands_are_privileged(
        id in any_id(),
        like in any_id(),
        version in "[0-9.]{0,8}",
    ) {
        let env = EnvironmentDescriptor::new(id, like, version, "x86_64");
        let branch = select_branch(&env);
        let commands = branch_commands(branch, &env);
        prop_assert_eq!(commands.is_empty(), branch == InstallBranch::Generic);
        for command in commands {
            prop_assert!(command.line.contains("sudo "), "{}", command.line);
        }
    }
}
