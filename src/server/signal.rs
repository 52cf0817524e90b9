use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_interrupt(_signum: libc::c_int) {
    // Only async-signal-safe work is allowed here.
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Installs the SIGINT handler and returns the flag it sets.
pub fn install() -> io::Result<&'static AtomicBool> {
    let previous = unsafe { libc::signal(libc::SIGINT, handle_interrupt as libc::sighandler_t) };
    if previous == libc::SIG_ERR {
        return Err(io::Error::last_os_error());
    }
    Ok(&INTERRUPTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigint_sets_the_flag() {
        let flag = install().unwrap();
        assert!(!flag.load(Ordering::SeqCst));

        unsafe { libc::raise(libc::SIGINT) };

        assert!(flag.load(Ordering::SeqCst));
    }
}
