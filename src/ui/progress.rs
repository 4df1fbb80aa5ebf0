// Progress indicator for blocking remote calls.
// A cosmetic spinner thread that is always joined before the wrapped work returns.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};

use crate::error::Result;

const FRAMES: [char; 8] = ['⣾', '⣷', '⣯', '⣟', '⡿', '⢿', '⣻', '⣽'];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Whether remote calls show a spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    #[default]
    Spinner,
    Hidden,
}

impl Progress {
    /// Run `work` while showing `running`, then `finished` (or a failure line).
    pub async fn run<T, F>(self, running: &str, finished: &str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self {
            Progress::Spinner => with_progress(running, finished, work).await,
            Progress::Hidden => work.await,
        }
    }
}

/// Run `work` with a spinner. The spinner thread is joined on every exit path,
/// including when the returned future is dropped mid-flight.
pub async fn with_progress<T, F>(running: &str, finished: &str, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let spinner = Spinner::start(running, finished);
    let result = work.await;
    if result.is_err() {
        spinner.mark_failed();
    }
    drop(spinner);
    result
}

/// Handle to a running spinner thread. Dropping it stops and joins the thread.
pub struct Spinner {
    stop: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(running: &str, finished: &str) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let failed = Arc::new(AtomicBool::new(false));
        let running = running.to_string();
        let finished = finished.to_string();

        let handle = {
            let stop = Arc::clone(&stop);
            let failed = Arc::clone(&failed);
            thread::spawn(move || {
                let mut out = io::stdout();
                for frame in FRAMES.iter().cycle() {
                    if stop.load(Ordering::Acquire) {
                        break;
                    }
                    let _ = execute!(out, MoveToColumn(0), Print(format!("{} {}", running, frame)));
                    thread::park_timeout(FRAME_INTERVAL);
                }

                let last_line = if failed.load(Ordering::Acquire) {
                    format!("{} failed", running)
                } else {
                    finished
                };
                let _ = execute!(
                    out,
                    MoveToColumn(0),
                    Clear(ClearType::CurrentLine),
                    Print(last_line),
                    Print("\n")
                );
                let _ = out.flush();
            })
        };

        Self {
            stop,
            failed,
            handle: Some(handle),
        }
    }

    /// Print a failure line instead of the finished text when stopping.
    pub fn mark_failed(&self) {
        self.failed.store(true, Ordering::Release);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}
