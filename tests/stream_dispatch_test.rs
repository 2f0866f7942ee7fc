//! Recorded assistant streams applied to a transcript

mod support;

use assistant_relay::chat::{Message, Role, Transcript};
use assistant_relay::stream::{Dispatch, decode_events, dispatch, helper_events};
use futures_util::StreamExt;

async fn replay(name: &str, transcript: &mut Transcript) -> Vec<Dispatch> {
    let mut events = Box::pin(helper_events(decode_events(support::fixture_stream(name))));
    let mut outcomes = Vec::new();
    while let Some(event) = events.next().await {
        outcomes.push(dispatch(transcript, event.expect("valid stream event")));
    }
    outcomes
}

#[tokio::test]
async fn text_run_resolves_annotations_and_images() {
    let mut transcript = Transcript::new();
    let outcomes = replay("text_run.sse", &mut transcript).await;

    assert_eq!(
        transcript.messages(),
        &[Message::new(
            Role::Assistant,
            "Your chart is ready: [download](/api/files/file-chart)\n![file-plot](/api/files/file-plot)\n"
        )]
    );
    assert_eq!(outcomes.last(), Some(&Dispatch::RunCompleted));
    assert!(!transcript.input_disabled());
}

#[tokio::test]
async fn code_interpreter_input_lands_in_a_code_message() {
    let mut transcript = Transcript::new();
    replay("code_interpreter.sse", &mut transcript).await;

    assert_eq!(
        transcript.messages(),
        &[
            Message::new(Role::Code, "import math\nmath.sqrt(2)"),
            Message::new(Role::Assistant, "The square root of 2 is about 1.414."),
        ]
    );
    assert_eq!(transcript.messages()[0].render(), "1. import math\n2. math.sqrt(2)");
}

#[tokio::test]
async fn requires_action_surfaces_every_pending_call() {
    let mut transcript = Transcript::new();
    let outcomes = replay("requires_action.sse", &mut transcript).await;

    let Some(Dispatch::RequiresAction { run_id, tool_calls }) = outcomes
        .into_iter()
        .find(|o| matches!(o, Dispatch::RequiresAction { .. }))
    else {
        panic!("stream should pause for tool outputs");
    };
    assert_eq!(run_id, "run_fn");
    let ids: Vec<_> = tool_calls.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["call_paris", "call_oslo"]);
    // Function calls are not code: nothing is rendered for them.
    assert!(transcript.is_empty());
    assert!(transcript.input_disabled());
}
