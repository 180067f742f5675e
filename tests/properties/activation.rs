//! Property tests for the activation cascade.

use proptest::prelude::*;

use quickstack::application::{ProgressReporter, StackActivator};
use quickstack::testing::ScriptedRunner;

const LINES: [&str; 3] = [
    "docker compose up -d",
    "docker-compose up -d",
    "sudo docker-compose up -d --remove-orphans --build",
];

proptest! {
    /// PROPERTY: attempts run in order and stop at the first success.
    #[test]
    fn property_cascade_stops_at_first_success(
        outcomes in proptest::array::uniform3(any::<bool>()),
    ) {
        // Later rules win, so the sudo line gets its own rule after the plain one
        let runner = LINES
            .iter()
            .zip(outcomes)
            .fold(ScriptedRunner::new(), |runner, (line, ok)| {
                runner.respond(line, if ok { 0 } else { 1 }, "")
            });
        let activator = StackActivator::new("/srv/app");

        let outcome = activator
            .start_cascade()
            .run(&runner, &ProgressReporter::silent(1));

        let first_success = outcomes.iter().position(|ok| *ok);
        prop_assert_eq!(outcome.winner, first_success);
        let expected: Vec<&str> = match first_success {
            Some(i) => LINES[..=i].to_vec(),
            None => LINES.to_vec(),
        };
        prop_assert_eq!(runner.commands(), expected);
        for spec in runner.specs() {
            prop_assert_eq!(
                spec.current_dir.as_deref(),
                Some(std::path::Path::new("/srv/app"))
            );
        }
    }
}
