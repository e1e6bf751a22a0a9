//! CPU pinning to reduce scheduler-induced timing noise.
//!
//! Linux only; other platforms report pinning as unsupported and the
//! driver carries on unpinned.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AffinityError {
    #[cfg(target_os = "linux")]
    #[error("core {core} out of range: system has {count} cores")]
    InvalidCore { core: usize, count: usize },
    #[cfg(target_os = "linux")]
    #[error("sched_setaffinity failed: {0}")]
    Syscall(std::io::Error),
    #[cfg(not(target_os = "linux"))]
    #[error("cpu pinning is not supported on this platform")]
    Unsupported,
}

/// Number of online CPUs (at least 1).
#[cfg(target_os = "linux")]
#[must_use]
pub fn cpu_count() -> usize {
    let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if n < 1 { 1 } else { n as usize }
}

/// Pin the current process to a single core.
#[cfg(target_os = "linux")]
pub fn pin_to_core(core: usize) -> Result<(), AffinityError> {
    let count = cpu_count();
    if core >= count {
        return Err(AffinityError::InvalidCore { core, count });
    }
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);
        if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
            return Err(AffinityError::Syscall(std::io::Error::last_os_error()));
        }
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn pin_to_core(_core: usize) -> Result<(), AffinityError> {
    Err(AffinityError::Unsupported)
}
