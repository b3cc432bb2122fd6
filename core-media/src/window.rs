//! # Window Handle Resolution
//!
//! Window-bound platforms (SMTC on Windows) refuse to create a media session
//! without a native window handle, but host UI toolkits expose that handle in
//! wildly different shapes. This module turns "whatever the toolkit gives us"
//! into a validated [`WindowIdentity`] through an ordered chain of extraction
//! strategies, and parks the result in a process-wide slot so session
//! creation anywhere in the process can pick it up.
//!
//! ## Strategy chain
//!
//! Strategies run strictly in order and the first success wins:
//!
//! 1. [`NativeAccessor`] asks the source for its handle directly. A panicking
//!    accessor (toolkits throw when the window is not realized yet) counts as
//!    a miss, not a crash.
//! 2. [`PeerInspection`] inspects the source's peer object for a raw handle
//!    carrier.
//!
//! Only when every strategy misses does resolution fail, with
//! [`MediaSessionError::HandleUnextractable`] naming each strategy tried.

use crate::error::{MediaSessionError, Result};
use bridge_traits::WindowIdentity;
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Process-wide resolved identity. One window per process: the OS binds the
/// media session to the application's main window.
static IDENTITY_SLOT: RwLock<Option<WindowIdentity>> = RwLock::new(None);

/// A host window as handed to the resolver. Implementations adapt one UI
/// toolkit's window type.
pub trait WindowSource: Send + Sync {
    /// Direct native handle accessor, if the toolkit exposes one. May panic
    /// on an unrealized window; the resolver treats a panic as a miss.
    fn native_handle(&self) -> Option<u64> {
        None
    }

    /// The toolkit's underlying peer object, for strategies that inspect it.
    fn peer(&self) -> &dyn Any;
}

/// Plain raw-handle carrier, the common shape of toolkit peer objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawWindow {
    pub raw: u64,
}

impl WindowSource for RawWindow {
    fn native_handle(&self) -> Option<u64> {
        Some(self.raw)
    }

    fn peer(&self) -> &dyn Any {
        self
    }
}

/// One way of extracting a window identity from a source.
pub trait HandleStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` means "this strategy cannot see a handle here", including a
    /// zero value or a panicking accessor. Never an error: the chain moves
    /// on.
    fn extract(&self, source: &dyn WindowSource) -> Option<WindowIdentity>;
}

/// Strategy 1: call the source's own accessor.
pub struct NativeAccessor;

impl HandleStrategy for NativeAccessor {
    fn name(&self) -> &'static str {
        "native-accessor"
    }

    fn extract(&self, source: &dyn WindowSource) -> Option<WindowIdentity> {
        match catch_unwind(AssertUnwindSafe(|| source.native_handle())) {
            Ok(Some(raw)) => WindowIdentity::new(raw),
            Ok(None) => None,
            Err(_) => {
                tracing::debug!("native handle accessor panicked, trying next strategy");
                None
            }
        }
    }
}

/// Strategy 2: look inside the peer object for a raw-handle carrier.
pub struct PeerInspection;

impl HandleStrategy for PeerInspection {
    fn name(&self) -> &'static str {
        "peer-inspection"
    }

    fn extract(&self, source: &dyn WindowSource) -> Option<WindowIdentity> {
        let peer = source.peer();
        if let Some(raw_window) = peer.downcast_ref::<RawWindow>() {
            return WindowIdentity::new(raw_window.raw);
        }
        if let Some(raw) = peer.downcast_ref::<u64>() {
            return WindowIdentity::new(*raw);
        }
        None
    }
}

/// Ordered strategy chain plus the process-wide identity slot.
pub struct WindowHandleResolver {
    strategies: Vec<Box<dyn HandleStrategy>>,
}

impl Default for WindowHandleResolver {
    fn default() -> Self {
        Self {
            strategies: vec![Box::new(NativeAccessor), Box::new(PeerInspection)],
        }
    }
}

impl WindowHandleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the strategy chain. Order is significant.
    pub fn with_strategies(strategies: Vec<Box<dyn HandleStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run the chain against `source`; first success wins.
    pub fn resolve(&self, source: &dyn WindowSource) -> Result<WindowIdentity> {
        let mut tried = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            if let Some(identity) = strategy.extract(source) {
                tracing::debug!(
                    strategy = strategy.name(),
                    handle = identity.as_raw(),
                    "window identity resolved"
                );
                return Ok(identity);
            }
            tried.push(strategy.name());
        }
        Err(MediaSessionError::HandleUnextractable(format!(
            "no strategy produced a handle (tried: {})",
            tried.join(", ")
        )))
    }

    /// Resolve and store the identity in the process-wide slot.
    pub fn init(&self, source: &dyn WindowSource) -> Result<WindowIdentity> {
        let identity = self.resolve(source)?;
        *IDENTITY_SLOT.write() = Some(identity);
        Ok(identity)
    }

    /// Store an already-known raw handle. Zero is rejected, the platforms
    /// treat it as "no window".
    pub fn init_raw(raw: u64) -> Result<WindowIdentity> {
        let identity =
            WindowIdentity::new(raw).ok_or(MediaSessionError::InvalidWindowHandle(raw))?;
        *IDENTITY_SLOT.write() = Some(identity);
        Ok(identity)
    }

    /// Clear the slot. Used on window teardown and between tests.
    pub fn reset() {
        *IDENTITY_SLOT.write() = None;
    }

    pub fn is_initialized() -> bool {
        IDENTITY_SLOT.read().is_some()
    }

    /// The currently stored identity, if any.
    pub fn current() -> Option<WindowIdentity> {
        *IDENTITY_SLOT.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accessor that panics the way an unrealized toolkit window does, while
    /// the peer still carries the handle.
    struct UnrealizedWindow {
        peer: RawWindow,
    }

    impl WindowSource for UnrealizedWindow {
        fn native_handle(&self) -> Option<u64> {
            panic!("window not realized");
        }

        fn peer(&self) -> &dyn Any {
            &self.peer
        }
    }

    struct HandleLessWindow;

    impl WindowSource for HandleLessWindow {
        fn peer(&self) -> &dyn Any {
            &()
        }
    }

    #[test]
    fn accessor_strategy_wins_when_it_answers() {
        let resolver = WindowHandleResolver::new();
        let identity = resolver.resolve(&RawWindow { raw: 0xBEEF }).unwrap();
        assert_eq!(identity.as_raw(), 0xBEEF);
    }

    #[test]
    fn panicking_accessor_falls_back_to_peer_inspection() {
        let resolver = WindowHandleResolver::new();
        let source = UnrealizedWindow {
            peer: RawWindow { raw: 77 },
        };
        assert_eq!(resolver.resolve(&source).unwrap().as_raw(), 77);
    }

    #[test]
    fn exhausted_chain_names_every_strategy() {
        let resolver = WindowHandleResolver::new();
        let err = resolver.resolve(&HandleLessWindow).unwrap_err();
        let MediaSessionError::HandleUnextractable(message) = err else {
            panic!("wrong variant");
        };
        assert!(message.contains("native-accessor"));
        assert!(message.contains("peer-inspection"));
    }

    #[test]
    fn zero_handles_are_never_an_identity() {
        let resolver = WindowHandleResolver::new();
        assert!(resolver.resolve(&RawWindow { raw: 0 }).is_err());
        assert!(matches!(
            WindowHandleResolver::init_raw(0),
            Err(MediaSessionError::InvalidWindowHandle(0))
        ));
    }
}
