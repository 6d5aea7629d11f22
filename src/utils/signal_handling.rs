//! Catches SIGINT/SIGTERM so that long running searches can be interrupted gracefully.
//! Call [`initialize`] once (e.g. at the start of `main`); afterwards the solvers poll
//! [`received_ctrl_c`] and unwind when it becomes true.

use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};

static RECEIVED_CTRL_C: AtomicBool = AtomicBool::new(false);

pub fn initialize() {
    if let Err(e) = ctrlc::set_handler(|| RECEIVED_CTRL_C.store(true, Ordering::Relaxed)) {
        warn!("Could not install signal handler: {e}");
    }
}

pub fn received_ctrl_c() -> bool {
    RECEIVED_CTRL_C.load(Ordering::Relaxed)
}
