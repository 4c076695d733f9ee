// api/host.rs
//
// Host event-loop capability. The engine never owns a timer or a vsync
// source; it schedules its two loops through whatever the embedding
// provides (a browser frame callback, an OS timer, a test pump).

use std::time::Duration;

/// Opaque handle to a scheduled callback.
pub type LoopHandle = u64;

/// Scheduling capability provided by the embedding.
///
/// Callbacks may re-enter the host to schedule or cancel further work, so
/// implementors must not hold internal borrows while firing them.
pub trait HostLoop {
    /// Schedules `callback` to fire repeatedly every `period` until
    /// cancelled.
    fn schedule_repeating(&mut self, period: Duration, callback: Box<dyn FnMut()>) -> LoopHandle;

    /// Cancels a repeating callback. Unknown handles are ignored.
    fn cancel_repeating(&mut self, handle: LoopHandle);

    /// Schedules `callback` to fire once at the next display refresh.
    fn schedule_next_paint(&mut self, callback: Box<dyn FnOnce()>) -> LoopHandle;

    /// Cancels a pending paint callback. Unknown handles are ignored.
    fn cancel_paint(&mut self, handle: LoopHandle);
}
