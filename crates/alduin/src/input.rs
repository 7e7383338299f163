//! Terminal input.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use alduin::core::InputSource;
use alduin::core::tool::Approval;
use tokio::select;
use tokio::signal::ctrl_c;
use tokio::sync::{Mutex, mpsc};

use crate::ui;

/// Lines typed by the user, shared by the prompt and approval requests.
///
/// Stdin is read on its own thread, so a pending read never holds up the
/// runtime or keeps the process alive after the session ends.
#[derive(Clone)]
pub struct Lines {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl Lines {
    pub fn from_stdin() -> Self {
        let (tx, rx) = mpsc::channel(1);
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        error!("error reading input: {err}");
                        break;
                    }
                };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            debug!("stdin reader stopped");
        });
        Self::from_receiver(rx)
    }

    #[inline]
    fn from_receiver(rx: mpsc::Receiver<String>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Waits for the next line. Returns `None` once stdin is closed.
    pub async fn next(&self) -> Option<String> {
        self.rx.lock().await.recv().await
    }

    /// Like [`next`](Self::next), but gives up as soon as `interrupt`
    /// completes. A line already typed wins over the interrupt.
    pub async fn next_or<F: Future>(&self, interrupt: F) -> Option<String> {
        select! {
            biased;
            line = self.next() => line,
            _ = interrupt => None,
        }
    }
}

/// Reads prompts from the terminal. Ctrl-C at the prompt ends the input.
pub struct Terminal {
    lines: Lines,
}

impl Terminal {
    #[inline]
    pub fn new(lines: Lines) -> Self {
        Self { lines }
    }
}

impl InputSource for Terminal {
    async fn read_line(&mut self) -> Option<String> {
        ui::print_prompt();
        let line = self.lines.next_or(ctrl_c()).await;
        if line.is_none() {
            println!();
        }
        line
    }
}

/// Shows the approval request and answers it with the next line typed.
pub fn ask_approval(lines: &Lines, approval: Approval) {
    ui::print_approval_request(&approval);
    let lines = lines.clone();
    tokio::spawn(async move {
        let answer = lines.next().await;
        ui::answer_approval(approval, answer.as_deref());
    });
}

#[cfg(test)]
mod tests {
    use std::future::{pending, ready};
    use std::sync::Mutex as StdMutex;

    use alduin::SessionBuilder;
    use alduin::core::{AgentEvent, AgentStage};
    use alduin_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    /// Input whose user presses Ctrl-C once no typed line is left.
    struct Interrupted(Lines);

    impl InputSource for Interrupted {
        async fn read_line(&mut self) -> Option<String> {
            self.0.next_or(ready(())).await
        }
    }

    #[tokio::test]
    async fn test_lines_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let lines = Lines::from_receiver(rx);
        tx.send("one".to_owned()).await.unwrap();
        tx.send("two".to_owned()).await.unwrap();
        drop(tx);

        assert_eq!(lines.next_or(pending::<()>()).await.as_deref(), Some("one"));
        assert_eq!(lines.next().await.as_deref(), Some("two"));
        assert_eq!(lines.next().await, None);
    }

    #[tokio::test]
    async fn test_interrupt_ends_pending_read() {
        let (tx, rx) = mpsc::channel::<String>(1);
        let lines = Lines::from_receiver(rx);

        // Nothing typed yet and stdin still open.
        assert_eq!(lines.next_or(ready(())).await, None);

        tx.send("later".to_owned()).await.unwrap();
        assert_eq!(lines.next().await.as_deref(), Some("later"));
    }

    #[tokio::test]
    async fn test_interrupt_closes_session() {
        let (tx, rx) = mpsc::channel(1);
        tx.send("Hi".to_owned()).await.unwrap();

        let events = Arc::new(StdMutex::new(Vec::<AgentEvent>::new()));
        let mut session = SessionBuilder::with_model_provider(
            TestModelProvider::with_script([PresetResponse::text("Hello!")]),
        )
        .on_event({
            let events = events.clone();
            move |event: AgentEvent| events.lock().unwrap().push(event)
        })
        .build();

        let mut input = Interrupted(Lines::from_receiver(rx));
        session.run(&mut input).await.unwrap();

        assert_eq!(session.stage(), AgentStage::Closed);
        let events = events.lock().unwrap();
        assert_eq!(events.first(), Some(&AgentEvent::UserMessage("Hi".to_owned())));
        assert_eq!(events.last(), Some(&AgentEvent::Goodbye));
        // The writer is still alive: the read was cut short, not finished.
        drop(tx);
    }
}
