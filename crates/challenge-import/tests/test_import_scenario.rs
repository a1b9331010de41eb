mod common;

use challenge_import::{ChallengeImporter, DuplicateDecision, NeverCancel};
use common::MemoryCatalog;

/// Test the two-row quoting scenario end to end
///
/// **Test flow:**
/// 1. Import a file whose second row uses escaped quotes and a pipe list
/// 2. Verify both records reach the catalog with the decoded values
/// 3. Verify the outcome counts and terminal state
#[test]
fn test_import_scenario() {
    let text = "identifier,name,question,answers\n\
                q1,\"Add\",\"1+1=?\",2\n\
                q2,\"Quote\",\"Say \"\"hi\"\"\",\"hi|Hi\"\n";
    let mut catalog = MemoryCatalog::new();

    // 1. Import
    let outcome = ChallengeImporter::new().run(
        text,
        &mut catalog,
        |_| DuplicateDecision::Abort,
        |_, _, _: &str| {},
        &NeverCancel,
    );

    // 2. Records
    let q1 = &catalog.records["q1"];
    assert_eq!(q1.name, "Add");
    assert_eq!(q1.answers, vec!["2"]);

    let q2 = &catalog.records["q2"];
    assert_eq!(q2.question, "Say \"hi\"");
    assert_eq!(q2.answers, vec!["hi", "Hi"]);
    assert!(q2.rewards.is_empty());
    assert_eq!(catalog.index, vec!["q1", "q2"]);

    // 3. Outcome
    assert!(outcome.state.is_completed(), "{}", outcome);
    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.seen, 2);
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.checkpointed, 2);
    assert_eq!(outcome.skipped_by_cancellation, 0);
    assert_eq!(catalog.flush_count(), 1);

    println!("{}", outcome);
}
