// Cancellable streaming generation
//
// Generation runs as a spawned task reporting back over a oneshot channel,
// while the session keeps watching the line channel so Ctrl+C can cancel the
// stream mid-flight. The completion channel is always drained before
// returning, so a cancelled task never outlives the prompt it interrupted.

use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::style::Stylize;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::api::{apply_max_tokens_override, build_request, ApiClient, ApiError, CompletionRequest, TokenUsage};
use crate::clipboard;
use crate::output::{self, StreamingColorizer};

use super::events::ReadEvent;
use super::session::{SessionOptions, SessionState};

/// Hard ceiling on a single generation.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Outcome of one streaming generation. `text` holds whatever streamed
/// before completion, error, or cancellation, so a cancelled response is
/// still available to /copy.
#[derive(Debug)]
pub struct GenerationReport {
    pub text: String,
    pub usage: TokenUsage,
    pub duration_ms: u128,
    pub result: Result<(), ApiError>,
}

/// Run one generation for `input`, watching the line channel for Ctrl+C.
/// Returns true if the generation was cancelled (interrupt, EOF, or timeout).
pub async fn run_generation_with_cancel(
    input: &str,
    state: &mut SessionState,
    rx: &mut mpsc::Receiver<ReadEvent>,
    opts: &SessionOptions,
) -> bool {
    let system_prompt = match state.store.render(
        &state.prompt_name,
        state.length,
        &state.project_context.content,
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return false;
        }
    };

    let mut req = match build_request(
        &state.model,
        &system_prompt,
        input,
        state.length,
        opts.temperature,
        true,
        &opts.models,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return false;
        }
    };
    if let Some(limit) = state.store.max_tokens_override(&state.prompt_name, state.length) {
        apply_max_tokens_override(&mut req, limit);
    }

    eprintln!(
        "{}",
        output::generating_message(
            &state.model,
            state.length.as_str(),
            &state.project_context.filename,
        )
    );

    let cancel = CancellationToken::new();
    let (done_tx, done_rx) = oneshot::channel();
    let client = state.client.clone();
    let task_cancel = cancel.clone();
    let colorize = opts.colorize;
    tokio::spawn(async move {
        let report = stream_generation(&client, req, &task_cancel, colorize).await;
        let _ = done_tx.send(report);
    });

    let (cancelled, report) = monitor_generation(done_rx, rx, &cancel).await;
    let Some(report) = report else {
        return cancelled;
    };

    // Keep whatever streamed, even from a cancelled generation.
    state.last_response = report.text;

    if cancelled {
        return true;
    }

    match report.result {
        Ok(()) => {
            println!();
            println!();
            if opts.auto_copy && !state.last_response.is_empty() {
                match clipboard::copy_with_warning(&state.last_response) {
                    Some(warning) => eprintln!("{}", warning.yellow()),
                    None => eprintln!("{}", output::copied_message()),
                }
            }
            eprintln!("{}", output::token_usage_message(&report.usage, report.duration_ms));
            false
        }
        Err(e) if e.is_cancelled() => true,
        Err(e) => {
            println!();
            eprintln!("Error: {e}");
            false
        }
    }
}

/// Wait for the generation task while watching the line channel. Any
/// interrupt, EOF, or reader exit cancels the token and then waits for the
/// task's report, so the stream is fully torn down before returning. Plain
/// lines arriving mid-generation are leftover paste and are ignored.
async fn monitor_generation(
    mut done_rx: oneshot::Receiver<GenerationReport>,
    rx: &mut mpsc::Receiver<ReadEvent>,
    cancel: &CancellationToken,
) -> (bool, Option<GenerationReport>) {
    loop {
        tokio::select! {
            report = &mut done_rx => return (false, report.ok()),
            event = rx.recv() => match event {
                Some(ReadEvent::Line(_)) => {}
                Some(ReadEvent::Interrupted) | Some(ReadEvent::Eof) | Some(ReadEvent::Failed(_)) | None => {
                    cancel.cancel();
                    let report = done_rx.await.ok();
                    return (true, report);
                }
            },
        }
    }
}

/// Stream the completion, printing colorized tokens as they arrive. The
/// timeout counts as cancellation, matching how an interrupt is reported.
async fn stream_generation(
    client: &ApiClient,
    req: CompletionRequest,
    cancel: &CancellationToken,
    colorize: bool,
) -> GenerationReport {
    let mut text = String::new();
    let mut colorizer = StreamingColorizer::new(colorize);

    println!();
    let start = Instant::now();

    let mut on_token = |token: &str| {
        print!("{}", colorizer.process_token(token));
        let _ = std::io::stdout().flush();
        text.push_str(token);
    };

    let outcome = match tokio::time::timeout(
        GENERATION_TIMEOUT,
        client.stream_complete(cancel, req, &mut on_token),
    )
    .await
    {
        Ok(res) => res,
        Err(_) => Err(ApiError::Cancelled),
    };

    let trailing = colorizer.finalize();
    if !trailing.is_empty() {
        print!("{trailing}");
        let _ = std::io::stdout().flush();
    }

    let duration_ms = start.elapsed().as_millis();
    let (usage, result) = match outcome {
        Ok(usage) => (usage, Ok(())),
        Err(e) => (TokenUsage::default(), Err(e)),
    };

    GenerationReport {
        text,
        usage,
        duration_ms,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(text: &str) -> GenerationReport {
        GenerationReport {
            text: text.to_string(),
            usage: TokenUsage::default(),
            duration_ms: 5,
            result: Ok(()),
        }
    }

    #[tokio::test]
    async fn completed_generation_is_not_cancelled() {
        let (done_tx, done_rx) = oneshot::channel();
        let (_tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        done_tx.send(report("done")).unwrap();
        let (cancelled, report) = monitor_generation(done_rx, &mut rx, &cancel).await;

        assert!(!cancelled);
        assert_eq!(report.unwrap().text, "done");
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn interrupt_cancels_and_waits_for_report() {
        let (done_tx, done_rx) = oneshot::channel();
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        // The fake generation only reports after it observes cancellation,
        // proving the monitor drains the completion channel.
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            task_cancel.cancelled().await;
            let _ = done_tx.send(report("partial"));
        });

        tx.send(ReadEvent::Interrupted).await.unwrap();
        let (cancelled, report) = monitor_generation(done_rx, &mut rx, &cancel).await;

        assert!(cancelled);
        assert!(cancel.is_cancelled());
        assert_eq!(report.unwrap().text, "partial");
    }

    #[tokio::test]
    async fn leftover_paste_lines_are_ignored_during_generation() {
        let (done_tx, done_rx) = oneshot::channel();
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();

        tx.send(ReadEvent::Line("stray paste line".into())).await.unwrap();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            let _ = done_tx.send(report("ok"));
        });

        let (cancelled, _) = monitor_generation(done_rx, &mut rx, &cancel).await;
        assert!(!cancelled);
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn closed_line_channel_cancels_generation() {
        let (done_tx, done_rx) = oneshot::channel();
        let (tx, mut rx) = mpsc::channel::<ReadEvent>(8);
        let cancel = CancellationToken::new();
        drop(tx);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            task_cancel.cancelled().await;
            let _ = done_tx.send(report(""));
        });

        let (cancelled, _) = monitor_generation(done_rx, &mut rx, &cancel).await;
        assert!(cancelled);
    }
}
