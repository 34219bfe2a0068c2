//! Property tests for run-level invariants

use baterby_test_utils::{calm_interpreter, scripted_interpreter};
use baterby_vm::{Command, ExecStatus, Interpreter, NullSink, PolicyConfig, Rule};
use proptest::prelude::*;

/// Config whose keywords cannot appear in generated benign lines
fn quiet_config(threshold: u32) -> PolicyConfig {
    PolicyConfig::default()
        .with_prefer_not_probability(0.0)
        .with_max_actions_without_pause(threshold)
        .with_sensitive_keywords(["forbidden"])
}

fn benign_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-c ]{0,8}".prop_map(|s| format!("SAY \"{s}\"")),
        "[a-c ]{1,8}".prop_map(|s| format!("DO \"{s}\"")),
        (0u32..50).prop_map(|ms| format!("WAIT {ms}")),
        "[a-c ]{0,8}".prop_map(|s| format!("ASK \"{s}\"")),
        Just("PAUSE".to_string()),
        Just("# note".to_string()),
        Just(String::new()),
        Just("HOP".to_string()),
    ]
}

proptest! {
    #[test]
    fn prop_invalid_lines_are_skipped(
        prefix in prop::collection::vec(benign_line(), 0..10),
        word in "[QXZ][a-z]{0,5}",
    ) {
        let mut program = prefix;
        program.push(format!("{word} \"x\"!"));
        let mut vm = calm_interpreter(quiet_config(3));
        let events = vm.run(&program);

        for event in events.iter().filter(|e| e.action == Command::Invalid) {
            prop_assert_eq!(event.status, ExecStatus::Skipped);
            prop_assert!(event.context_needed.is_none());
        }
        let last = events.last().unwrap();
        prop_assert_eq!(last.status, ExecStatus::Skipped);
    }

    #[test]
    fn prop_sensitive_text_is_always_refused(
        prefix in prop::collection::vec(benign_line(), 0..12),
        command in prop::sample::select(vec!["SAY", "DO", "WAIT", "ASK", "PAUSE"]),
        before in "[a-z ]{0,5}",
        after in "[a-z ]{0,5}",
        modifier in prop::sample::select(vec!["", "!", "?"]),
        threshold in 0u32..5,
    ) {
        let mut program = prefix;
        program.push(format!("{command} \"{before}FoRbIdDeN{after}\"{modifier}"));
        let mut vm = scripted_interpreter(quiet_config(threshold), []);
        let events = vm.run(&program);

        let last = events.last().unwrap();
        prop_assert_eq!(last.status, ExecStatus::PreferNot);
        prop_assert_eq!(last.message.as_str(), Rule::SensitiveContent.message());
    }

    #[test]
    fn prop_counter_tracks_actions_between_pauses(
        program in prop::collection::vec(benign_line(), 0..30),
        threshold in 1u32..6,
    ) {
        let mut vm = calm_interpreter(quiet_config(threshold));
        let mut expected = 0u32;

        for (index, line) in program.iter().enumerate() {
            let before = vm.state().actions_since_pause;
            prop_assert_eq!(before, expected);

            let Some(event) = vm.exec_line(index + 1, line) else {
                continue;
            };
            match event.action {
                Command::Pause => {
                    prop_assert_eq!(event.status, ExecStatus::Done);
                    expected = 0;
                }
                Command::Invalid => {}
                _ if before >= threshold => {
                    prop_assert_eq!(event.status, ExecStatus::PreferNot);
                    prop_assert_eq!(event.message.as_str(), Rule::ActionFatigue.message());
                }
                _ => {
                    prop_assert_eq!(event.status, ExecStatus::Done);
                    expected += 1;
                }
            }
            prop_assert_eq!(vm.state().actions_since_pause, expected);
        }
    }

    #[test]
    fn prop_nothing_after_end(
        head in prop::collection::vec(benign_line(), 0..10),
        tail in prop::collection::vec(benign_line(), 1..10),
    ) {
        let end_line = head.len() + 1;
        let mut program = head;
        program.push("END".to_string());
        program.extend(tail);

        let mut vm = calm_interpreter(quiet_config(3));
        let events = vm.run(&program);

        prop_assert!(events.iter().all(|e| e.line_number <= end_line));
        let last = events.last().unwrap();
        prop_assert_eq!(last.action, Command::End);
        prop_assert_eq!(last.line_number, end_line);
    }

    #[test]
    fn prop_seeded_runs_are_identical(
        program in prop::collection::vec(benign_line(), 0..30),
        seed in any::<u64>(),
    ) {
        let config = PolicyConfig::default()
            .with_seed(seed)
            .with_prefer_not_probability(0.4)
            .with_sensitive_keywords(["forbidden"]);

        let a = Interpreter::with_sink(config.clone(), NullSink).run(&program);
        let b = Interpreter::with_sink(config, NullSink).run(&program);

        prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
