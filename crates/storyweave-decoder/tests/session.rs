use std::time::Duration;

use futures_util::{StreamExt, stream};
use storyweave_decoder::{
    DecodedStory, IdleBehavior, SessionConfig, SessionKind, StoryEvent, decode_session,
};

const RESPONSE: &str = r#"{"content": "Mara lit the lamp.\n\nThe hallway answered with a \"whisper\" and a cold draft near the café, under a chalk mark reading A\\B.", "suggestions": ["Follow the whisper", "Close the door", "Call out to the dark"]}"#;

fn chunked(text: &str, size: usize) -> Vec<Result<String, String>> {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(size)
        .map(|c| Ok(c.iter().collect()))
        .collect()
}

async fn collect(
    chunks: Vec<Result<String, String>>,
    kind: SessionKind,
    config: SessionConfig,
) -> Vec<StoryEvent> {
    decode_session(stream::iter(chunks), kind, config)
        .collect()
        .await
}

fn terminal(events: &[StoryEvent]) -> &StoryEvent {
    let terminals: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminals.len(), 1, "events: {events:?}");
    assert!(events.last().unwrap().is_terminal());
    terminals[0]
}

#[tokio::test]
async fn chunk_size_does_not_change_the_result() {
    let whole = collect(
        vec![Ok(RESPONSE.to_string())],
        SessionKind::Initial,
        SessionConfig::default(),
    )
    .await;
    let expected = terminal(&whole).clone();

    for size in [1, 2, 3, 7, 16, 64] {
        let events = collect(
            chunked(RESPONSE, size),
            SessionKind::Initial,
            SessionConfig::default(),
        )
        .await;
        assert_eq!(terminal(&events), &expected, "chunk size {size}");
    }

    let StoryEvent::Complete(story) = expected else {
        panic!("expected a complete event");
    };
    assert_eq!(
        story.content,
        "Mara lit the lamp.\n\nThe hallway answered with a \"whisper\" and a cold draft near the caf\u{e9}, under a chalk mark reading A\\B."
    );
    assert_eq!(story.suggestions.len(), 3);
}

#[tokio::test]
async fn progress_events_are_monotonic() {
    let events = collect(
        chunked(RESPONSE, 1),
        SessionKind::Initial,
        SessionConfig::default(),
    )
    .await;

    let mut previous = String::new();
    let mut generating_at = None;
    let mut indices = Vec::new();
    for (at, event) in events.iter().enumerate() {
        match event {
            StoryEvent::Content { content } => {
                assert!(generating_at.is_none(), "content after generating_suggestions");
                assert!(content.starts_with(&previous), "{content:?} after {previous:?}");
                assert!(content.len() > previous.len());
                previous = content.clone();
            }
            StoryEvent::GeneratingSuggestions => {
                assert!(generating_at.is_none());
                generating_at = Some(at);
            }
            StoryEvent::Suggestion {
                suggestion_index, ..
            } => {
                assert!(generating_at.is_some());
                indices.push(*suggestion_index);
            }
            _ => {}
        }
    }

    assert_eq!(indices, vec![0, 1, 2]);
    match terminal(&events) {
        StoryEvent::Complete(story) => assert_eq!(story.content, previous),
        other => panic!("unexpected terminal {other:?}"),
    }
}

#[tokio::test]
async fn streamed_suggestions_match_final_ones() {
    let events = collect(
        chunked(RESPONSE, 5),
        SessionKind::Initial,
        SessionConfig::default(),
    )
    .await;

    let streamed: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            StoryEvent::Suggestion { suggestion, .. } => Some(suggestion.clone()),
            _ => None,
        })
        .collect();
    match terminal(&events) {
        StoryEvent::Complete(story) => assert_eq!(story.suggestions, streamed),
        other => panic!("unexpected terminal {other:?}"),
    }
}

#[tokio::test]
async fn source_error_ends_with_a_single_error() {
    let chunks = vec![
        Ok(r#"{"content": "The bridge "#.to_string()),
        Err("connection reset".to_string()),
        Ok(r#"creaked", "suggestions": []}"#.to_string()),
    ];
    let events = collect(chunks, SessionKind::Continuation, SessionConfig::default()).await;

    assert_eq!(
        events,
        vec![
            StoryEvent::content("The bridge "),
            StoryEvent::error("Failed to continue story"),
        ]
    );
}

#[tokio::test]
async fn idle_source_fails_by_default() {
    let tokens = stream::iter(vec![Ok::<_, String>(r#"{"content": "Wait"#.to_string())])
        .chain(stream::pending());
    let config = SessionConfig::default().with_idle_timeout(Duration::from_millis(20));

    let events: Vec<_> = decode_session(tokens, SessionKind::Initial, config)
        .collect()
        .await;

    assert_eq!(
        events,
        vec![
            StoryEvent::content("Wait"),
            StoryEvent::error(SessionKind::Initial.timeout_message()),
        ]
    );
}

#[tokio::test]
async fn idle_source_can_finish_with_partial_text() {
    let tokens = stream::iter(vec![Ok::<_, String>(
        r#"{"content": "Enough.", "suggestions": ["More"]}"#.to_string(),
    )])
    .chain(stream::pending());
    let config = SessionConfig::default()
        .with_idle_timeout(Duration::from_millis(20))
        .with_on_idle(IdleBehavior::Finish);

    let events: Vec<_> = decode_session(tokens, SessionKind::Initial, config)
        .collect()
        .await;

    assert_eq!(
        events.last(),
        Some(&StoryEvent::Complete(DecodedStory::new(
            "Enough.",
            vec!["More".into()]
        )))
    );
}

#[tokio::test]
async fn silent_source_times_out_on_first_chunk() {
    let config = SessionConfig::default().with_first_chunk_timeout(Duration::from_millis(20));
    let events: Vec<_> = decode_session(
        stream::pending::<Result<String, String>>(),
        SessionKind::Continuation,
        config,
    )
    .collect()
    .await;

    assert_eq!(
        events,
        vec![StoryEvent::error(
            SessionKind::Continuation.timeout_message()
        )]
    );
}

#[tokio::test]
async fn prose_response_completes_with_default_suggestions() {
    let events = collect(
        chunked("The storm passed. Nobody spoke.", 4),
        SessionKind::Initial,
        SessionConfig::default(),
    )
    .await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        StoryEvent::Complete(story) => {
            assert_eq!(story.content, "The storm passed. Nobody spoke.");
            assert_eq!(story.word_count, 5);
            assert_eq!(story.suggestions.len(), 5);
        }
        other => panic!("unexpected terminal {other:?}"),
    }
}
