//! Processor observer trait for external collaborators.

/// Callbacks invoked by [`RouteProcessor`][crate::RouteProcessor] at state
/// transitions an off-route detector cares about.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait ProcessorObserver {
    /// Called whenever the current maneuver changes (index advance or route
    /// reset).  A deviation monitor should drop any cached
    /// distance-from-maneuver readings here — they were measured against
    /// geometry that is no longer current.
    fn on_maneuver_change(&mut self) {}
}

/// A [`ProcessorObserver`] that does nothing.  Used when no off-route
/// detector is attached.
pub struct NoopProcessorObserver;

impl ProcessorObserver for NoopProcessorObserver {}
