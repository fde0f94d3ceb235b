use std::sync::{atomic::AtomicBool, Arc};

use anyhow::Result;
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag,
};

/// Sets `shutdown` on SIGINT or SIGTERM so the run can stop at its next
/// checkpoint. A second signal while the flag is already set exits at once.
pub fn register_signals(shutdown: &Arc<AtomicBool>) -> Result<()> {
    for signal in [SIGINT, SIGTERM] {
        // Must be registered before the flag itself, otherwise the first
        // signal would already see the flag set and exit
        flag::register_conditional_shutdown(signal, 1, Arc::clone(shutdown))?;
        flag::register(signal, Arc::clone(shutdown))?;
    }
    Ok(())
}
