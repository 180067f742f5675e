//! Spinner shown while a long command runs
//!
//! `Spinner` is the frame state; `SpinnerHandle` owns the ticking thread.
//! The thread shares nothing but a stop flag and is joined on `stop`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::{cursor, terminal, QueueableCommand};

const FRAMES_BRAILLE: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAMES_ASCII: &[char] = &['|', '/', '-', '\\'];

pub const TICK: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct Spinner {
    current: usize,
    message: String,
    unicode: bool,
}

impl Spinner {
    pub fn new(message: impl Into<String>, unicode: bool) -> Self {
        Self {
            current: 0,
            message: message.into(),
            unicode,
        }
    }

    pub fn tick(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    pub fn render(&self) -> String {
        let frames = if self.unicode {
            FRAMES_BRAILLE
        } else {
            FRAMES_ASCII
        };
        format!("{} {}", frames[self.current % frames.len()], self.message)
    }
}

/// Running spinner thread
pub struct SpinnerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Start ticking on stderr
    pub fn start(message: impl Into<String>, unicode: bool) -> Self {
        Self::start_with(Spinner::new(message, unicode), io::stderr())
    }

    pub fn start_with<W: Write + Send + 'static>(mut spinner: Spinner, mut out: W) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let thread = std::thread::spawn(move || {
            loop {
                let _ = draw(&mut out, &spinner.render());
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                std::thread::sleep(TICK);
                spinner.tick();
            }
            let _ = draw(&mut out, "");
        });
        Self {
            stop,
            thread: Some(thread),
        }
    }

    /// Signal the thread and wait for it to clear its line
    pub fn stop(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.finish();
    }
}

fn draw(out: &mut impl Write, line: &str) -> io::Result<()> {
    out.queue(cursor::MoveToColumn(0))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.write_all(line.as_bytes())?;
    out.flush()
}
