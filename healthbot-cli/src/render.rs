//! Character-by-character reply rendering with a stop control.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Stop flag shared by everything a session prints or waits on.
///
/// The flag stays raised until [`reset`](Self::reset), so a press that lands
/// between two awaits is not lost.
#[derive(Debug)]
pub struct Interrupt {
    flag: Arc<watch::Sender<bool>>,
    listener: Option<JoinHandle<()>>,
}

impl Default for Interrupt {
    fn default() -> Self {
        Self { flag: Arc::new(watch::channel(false).0), listener: None }
    }
}

impl Interrupt {
    /// Raise the flag on every Ctrl-C for as long as the value lives.
    ///
    /// Installing the handler replaces the default SIGINT behaviour for the
    /// rest of the process, so one listener serves the whole session.
    pub fn ctrl_c() -> Self {
        let mut interrupt = Self::default();
        let flag = Arc::clone(&interrupt.flag);
        interrupt.listener = Some(tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                flag.send_replace(true);
            }
        }));
        interrupt
    }

    pub fn trigger(&self) {
        self.flag.send_replace(true);
    }

    pub fn reset(&self) {
        self.flag.send_replace(false);
    }

    pub fn is_triggered(&self) -> bool {
        *self.flag.borrow()
    }

    /// A receiver for [`type_out`].
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    /// Resolve once the flag is raised.
    pub async fn triggered(&self) {
        let mut rx = self.flag.subscribe();
        if rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Drop for Interrupt {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

/// Write `text` to `out` one character at a time, pausing `delay` between
/// characters, until the text is exhausted or `stop` turns `true`.
///
/// Returns the text written so far. A zero delay writes everything at once
/// unless the stop flag is already set.
pub async fn type_out<W: Write>(
    text: &str,
    delay: Duration,
    mut stop: watch::Receiver<bool>,
    out: &mut W,
) -> io::Result<String> {
    if delay.is_zero() {
        if *stop.borrow() {
            return Ok(String::new());
        }
        out.write_all(text.as_bytes())?;
        out.flush()?;
        return Ok(text.to_string());
    }

    let mut typed = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        if *stop.borrow() {
            break;
        }
        out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        out.flush()?;
        typed.push(ch);

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            Ok(()) = stop.changed() => {}
        }
    }
    Ok(typed)
}
