use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use console::Term;

use crate::analyzer::constants::{SPINNER_FRAMES, SPINNER_TICK_MS};
use crate::analyzer::utils::format_elapsed;

/// Animated activity line for long walks. The atomic token is the only stop
/// signal and the shared terminal handle keeps the animation from
/// interleaving with other writers.
pub struct StatusSpinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    started: Instant,
}

impl StatusSpinner {
    pub fn start(term: Arc<Mutex<Term>>, label: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let token = Arc::clone(&running);
        let label = label.to_string();
        let started = Instant::now();

        let handle = thread::spawn(move || {
            let mut frame = 0usize;
            while token.load(Ordering::Relaxed) {
                if let Ok(term) = term.lock() {
                    let line = format!(
                        "{}... {}  Time Elapsed: {}",
                        label,
                        SPINNER_FRAMES[frame % SPINNER_FRAMES.len()],
                        format_elapsed(started.elapsed()),
                    );
                    let _ = term.clear_line();
                    let _ = term.write_str(&line);
                }
                frame += 1;
                thread::sleep(Duration::from_millis(SPINNER_TICK_MS));
            }
            // leave the line clean for whoever writes next
            if let Ok(term) = term.lock() {
                let _ = term.clear_line();
            }
        });

        StatusSpinner {
            running,
            handle: Some(handle),
            started,
        }
    }

    /// Stops the animation, waits for the worker to release the terminal
    /// and reports how long it ran.
    pub fn finish(mut self) -> Duration {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.started.elapsed()
    }
}
