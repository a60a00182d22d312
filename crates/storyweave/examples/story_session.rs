//! # Interactive story session
//!
//! Streams a story from a one-line idea, then keeps continuing it with the
//! suggestion you pick (type its number) or any direction you type.
//! An empty line ends the session.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-…
//! export OPENAI_BASE_URL=https://api.deepseek.com   # optional
//! RUST_LOG=storyweave=debug cargo run -p storyweave --example story_session
//! ```

use std::io::{self, BufRead, Write};

use futures_util::StreamExt;
use storyweave::{
    StoryClient, StoryEvent,
    openai::OpenAiAdapterBuilder,
    prompt::{ContinuationPrompt, Direction, InitialStoryPrompt},
};
use tracing_subscriber::EnvFilter;

fn ask(question: &str) -> io::Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

/// Print the session as it streams; returns the final story and suggestions.
async fn render<S>(events: S) -> Option<(String, Vec<String>)>
where
    S: futures_util::Stream<Item = StoryEvent>,
{
    futures_util::pin_mut!(events);
    let mut printed = 0;

    while let Some(event) = events.next().await {
        match event {
            StoryEvent::Content { content } => {
                print!("{}", &content[printed..]);
                io::stdout().flush().ok();
                printed = content.len();
            }
            StoryEvent::GeneratingSuggestions => print!("\n\n(thinking of where to go next)"),
            StoryEvent::Suggestion { .. } => {
                print!(".");
                io::stdout().flush().ok();
            }
            StoryEvent::Complete(story) => {
                if printed == 0 {
                    println!("{}", story.content);
                }
                println!("\n[{} words]", story.word_count);
                return Some((story.content, story.suggestions));
            }
            StoryEvent::Error { error } => {
                eprintln!("\n\nError: {error}");
                return None;
            }
        }
    }
    None
}

fn print_suggestions(suggestions: &[String]) {
    println!("\nWhere next?");
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  {}. {suggestion}", i + 1);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let backend = OpenAiAdapterBuilder::new_from_env().build()?;
    let client = StoryClient::new(backend);

    let idea = ask("Story idea: ")?;
    let Some((opening, mut suggestions)) =
        render(client.stream_story(InitialStoryPrompt::new(idea)?)).await
    else {
        return Ok(());
    };
    let mut segments = vec![opening];

    loop {
        print_suggestions(&suggestions);
        let answer = ask("> ")?;
        if answer.is_empty() {
            break;
        }

        let (choice, direction) = match answer.parse::<usize>() {
            Ok(n) if (1..=suggestions.len()).contains(&n) => {
                (suggestions[n - 1].clone(), Direction::Suggestion)
            }
            _ => (answer, Direction::Custom),
        };

        let prompt = ContinuationPrompt::from_segments(&segments, choice, direction)?;
        println!();
        match render(client.stream_continuation(prompt)).await {
            Some((next, next_suggestions)) => {
                segments.push(next);
                suggestions = next_suggestions;
            }
            None => println!("Try another direction."),
        }
    }

    println!("\nThe story so far has {} segments. Goodbye!", segments.len());
    Ok(())
}
