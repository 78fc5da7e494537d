mod activity;
mod backup;
mod export;
mod ipc;
mod kv;
mod model;
mod project;
mod store;

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Durability safety net: the full snapshot is also persisted on a fixed
/// interval, independent of user action.
const AUTO_PERSIST_INTERVAL: Duration = Duration::from_secs(30);

fn main() {
    // Keep this binary dependency-light. Use simple error mapping.
    let state = Arc::new(Mutex::new(ipc::AppState::default()));

    {
        let state = Arc::clone(&state);
        thread::spawn(move || loop {
            thread::sleep(AUTO_PERSIST_INTERVAL);
            let Ok(mut guard) = state.lock() else {
                break;
            };
            if let Some(session) = guard.session.as_ref() {
                if let Err(e) = session.store.persist(&session.conn) {
                    // No response channel here; the next user-triggered
                    // persist will surface the failure.
                    eprintln!("auto-persist failed: {e:?}");
                }
            }
        });
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id; ignore.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = {
            let Ok(mut guard) = state.lock() else {
                break;
            };
            ipc::handle_request(&mut guard, req)
        };
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
