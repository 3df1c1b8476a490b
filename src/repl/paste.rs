// Paste aggregation
//
// A terminal paste of multi-line text arrives at the reader as a burst of
// individual lines. Aggregating the burst into one input avoids firing a
// separate generation per pasted line. A line is considered part of the
// burst if it arrives within the quiescence window of the previous one.

use std::time::Duration;

use tokio::sync::mpsc;

use super::events::ReadEvent;

pub const PASTE_TIMEOUT: Duration = Duration::from_millis(80);

/// Collect lines that follow `first_line` in rapid succession into a single
/// newline-joined input. Blank lines are kept so pasted structure survives.
/// An interrupt or EOF during the burst ends collection with what arrived so
/// far.
pub async fn collect_pasted_input(rx: &mut mpsc::Receiver<ReadEvent>, first_line: &str) -> String {
    let mut lines = vec![first_line.to_string()];

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(ReadEvent::Line(line)) => lines.push(line.trim().to_string()),
                // Interrupt/EOF/closed channel ends the burst.
                _ => break,
            },
            _ = tokio::time::sleep(PASTE_TIMEOUT) => break,
        }
    }

    lines.join("\n")
}

/// Discard whatever is buffered in the channel without blocking. Used after
/// a cancelled generation so leftover paste lines do not become inputs.
pub fn drain_lines(rx: &mut mpsc::Receiver<ReadEvent>) {
    while rx.try_recv().is_ok() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (mpsc::Sender<ReadEvent>, mpsc::Receiver<ReadEvent>) {
        mpsc::channel(512)
    }

    #[tokio::test(start_paused = true)]
    async fn single_line_returns_after_quiescence() {
        let (_tx, mut rx) = channel();
        let input = collect_pasted_input(&mut rx, "hello").await;
        assert_eq!(input, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_lines_is_joined() {
        let (tx, mut rx) = channel();
        tx.try_send(ReadEvent::Line("second".into())).unwrap();
        tx.try_send(ReadEvent::Line("third".into())).unwrap();

        let input = collect_pasted_input(&mut rx, "first").await;
        assert_eq!(input, "first\nsecond\nthird");
    }

    #[tokio::test(start_paused = true)]
    async fn blank_lines_inside_paste_are_preserved() {
        let (tx, mut rx) = channel();
        tx.try_send(ReadEvent::Line("".into())).unwrap();
        tx.try_send(ReadEvent::Line("para two".into())).unwrap();

        let input = collect_pasted_input(&mut rx, "para one").await;
        assert_eq!(input, "para one\n\npara two");
    }

    #[tokio::test(start_paused = true)]
    async fn lines_are_trimmed_individually() {
        let (tx, mut rx) = channel();
        tx.try_send(ReadEvent::Line("  indented  ".into())).unwrap();

        let input = collect_pasted_input(&mut rx, "first").await;
        assert_eq!(input, "first\nindented");
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_ends_burst_with_partial_input() {
        let (tx, mut rx) = channel();
        tx.try_send(ReadEvent::Line("two".into())).unwrap();
        tx.try_send(ReadEvent::Interrupted).unwrap();
        tx.try_send(ReadEvent::Line("after".into())).unwrap();

        let input = collect_pasted_input(&mut rx, "one").await;
        assert_eq!(input, "one\ntwo");
        // The line after the interrupt is still in the channel.
        assert_eq!(rx.try_recv().unwrap(), ReadEvent::Line("after".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_ends_burst() {
        let (tx, mut rx) = channel();
        tx.try_send(ReadEvent::Line("tail".into())).unwrap();
        drop(tx);

        let input = collect_pasted_input(&mut rx, "head").await;
        assert_eq!(input, "head\ntail");
    }

    #[tokio::test]
    async fn drain_discards_buffered_events() {
        let (tx, mut rx) = channel();
        tx.try_send(ReadEvent::Line("a".into())).unwrap();
        tx.try_send(ReadEvent::Interrupted).unwrap();

        drain_lines(&mut rx);
        assert!(rx.try_recv().is_err());
    }
}
