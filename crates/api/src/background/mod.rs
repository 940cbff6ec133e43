//! Long-running tasks spawned by `main` and stopped through a shared
//! `CancellationToken` on shutdown.

pub mod lock_sweep;
