//! Shared in-memory engine fake for integration tests.

#![allow(dead_code)]

use bridge_traits::{AudioEngine, BridgeError, EngineCallback, PlaybackHandle, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
pub struct FakePlayer {
    pub callback: Option<Arc<dyn EngineCallback>>,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub seekable: bool,
    pub paused: bool,
    pub empty: bool,
    pub seeks: Vec<Duration>,
}

/// Handle-keyed engine fake. Records every call by name so tests can assert
/// on ordering, and lets tests script per-player transport readings.
#[derive(Default)]
pub struct FakeEngine {
    next_handle: AtomicU64,
    players: Mutex<HashMap<u64, FakePlayer>>,
    calls: Mutex<Vec<String>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_handle: AtomicU64::new(1),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn with_player<T>(
        &self,
        handle: PlaybackHandle,
        f: impl FnOnce(&mut FakePlayer) -> T,
    ) -> Result<T> {
        let mut players = self.players.lock();
        players
            .get_mut(&handle.as_raw())
            .map(f)
            .ok_or(BridgeError::HandleNotFound(handle.as_raw()))
    }

    pub fn set_position(&self, handle: PlaybackHandle, position: Duration) {
        self.with_player(handle, |p| p.position = position).unwrap();
    }

    pub fn set_duration(&self, handle: PlaybackHandle, duration: Option<Duration>) {
        self.with_player(handle, |p| p.duration = duration).unwrap();
    }

    pub fn set_seekable(&self, handle: PlaybackHandle, seekable: bool) {
        self.with_player(handle, |p| p.seekable = seekable).unwrap();
    }

    pub fn seeks(&self, handle: PlaybackHandle) -> Vec<Duration> {
        self.with_player(handle, |p| p.seeks.clone()).unwrap()
    }

    pub fn player_count(&self) -> usize {
        self.players.lock().len()
    }

    fn callback_of(&self, handle: PlaybackHandle) -> Option<Arc<dyn EngineCallback>> {
        self.players
            .lock()
            .get(&handle.as_raw())
            .and_then(|p| p.callback.clone())
    }

    /// Raise a state notification the way a native engine thread would.
    pub fn raise_state(&self, handle: PlaybackHandle, state: bridge_traits::EngineState) {
        if let Some(callback) = self.callback_of(handle) {
            callback.on_state(state);
        }
    }

    pub fn raise_metadata(&self, handle: PlaybackHandle, key: &str, value: &str) {
        if let Some(callback) = self.callback_of(handle) {
            callback.on_metadata(key, value);
        }
    }

    pub fn raise_error(&self, handle: PlaybackHandle, message: &str) {
        if let Some(callback) = self.callback_of(handle) {
            callback.on_error(message);
        }
    }
}

impl AudioEngine for FakeEngine {
    fn create_player(&self) -> Result<PlaybackHandle> {
        let raw = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.players.lock().insert(
            raw,
            FakePlayer {
                empty: true,
                ..FakePlayer::default()
            },
        );
        self.record(format!("create_player -> {raw}"));
        Ok(PlaybackHandle::from_raw(raw))
    }

    fn destroy_player(&self, handle: PlaybackHandle) -> Result<()> {
        self.record(format!("destroy_player {handle}"));
        self.players
            .lock()
            .remove(&handle.as_raw())
            .map(|_| ())
            .ok_or(BridgeError::HandleNotFound(handle.as_raw()))
    }

    fn play_file(&self, handle: PlaybackHandle, path: &Path, looped: bool) -> Result<()> {
        self.record(format!("play_file {handle} {} {looped}", path.display()));
        self.with_player(handle, |p| {
            p.empty = false;
            p.paused = false;
        })
    }

    fn play_url(&self, handle: PlaybackHandle, url: &str, looped: bool) -> Result<()> {
        self.record(format!("play_url {handle} {url} {looped}"));
        self.with_player(handle, |p| {
            p.empty = false;
            p.paused = false;
        })
    }

    fn play_hls(&self, handle: PlaybackHandle, url: &str, looped: bool) -> Result<()> {
        self.record(format!("play_hls {handle} {url} {looped}"));
        self.with_player(handle, |p| {
            p.empty = false;
            p.paused = false;
        })
    }

    fn play_radio(&self, handle: PlaybackHandle, url: &str) -> Result<()> {
        self.record(format!("play_radio {handle} {url}"));
        self.with_player(handle, |p| {
            p.empty = false;
            p.paused = false;
            // A new source replaces the old transport readings: an endless
            // stream has no duration and is not seekable.
            p.duration = None;
            p.seekable = false;
        })
    }

    fn play_sine(
        &self,
        handle: PlaybackHandle,
        frequency_hz: f32,
        duration: Duration,
    ) -> Result<()> {
        self.record(format!("play_sine {handle} {frequency_hz} {duration:?}"));
        self.with_player(handle, |p| {
            p.empty = false;
            p.paused = false;
            p.duration = Some(duration);
            p.seekable = true;
        })?;
        self.raise_state(handle, bridge_traits::EngineState::Playing);
        Ok(())
    }

    fn play(&self, handle: PlaybackHandle) -> Result<()> {
        self.record(format!("play {handle}"));
        self.with_player(handle, |p| p.paused = false)
    }

    fn pause(&self, handle: PlaybackHandle) -> Result<()> {
        self.record(format!("pause {handle}"));
        self.with_player(handle, |p| p.paused = true)
    }

    fn stop(&self, handle: PlaybackHandle) -> Result<()> {
        self.record(format!("stop {handle}"));
        self.with_player(handle, |p| p.paused = false)
    }

    fn clear(&self, handle: PlaybackHandle) -> Result<()> {
        self.record(format!("clear {handle}"));
        self.with_player(handle, |p| {
            p.empty = true;
            p.paused = false;
            p.position = Duration::ZERO;
            p.duration = None;
            p.seekable = false;
        })
    }

    fn set_volume(&self, handle: PlaybackHandle, volume: f32) -> Result<()> {
        self.record(format!("set_volume {handle} {volume}"));
        self.with_player(handle, |_| ())
    }

    fn seek(&self, handle: PlaybackHandle, position: Duration) -> Result<()> {
        self.record(format!("seek {handle} {position:?}"));
        self.with_player(handle, |p| {
            p.seeks.push(position);
            p.position = position;
        })
    }

    fn position(&self, handle: PlaybackHandle) -> Result<Duration> {
        self.with_player(handle, |p| p.position)
    }

    fn duration(&self, handle: PlaybackHandle) -> Result<Option<Duration>> {
        self.with_player(handle, |p| p.duration)
    }

    fn is_seekable(&self, handle: PlaybackHandle) -> Result<bool> {
        self.with_player(handle, |p| p.seekable)
    }

    fn is_paused(&self, handle: PlaybackHandle) -> Result<bool> {
        self.with_player(handle, |p| p.paused)
    }

    fn is_empty(&self, handle: PlaybackHandle) -> Result<bool> {
        self.with_player(handle, |p| p.empty)
    }

    fn set_callback(
        &self,
        handle: PlaybackHandle,
        callback: Arc<dyn EngineCallback>,
    ) -> Result<()> {
        self.record(format!("set_callback {handle}"));
        self.with_player(handle, |p| p.callback = Some(callback))
    }

    fn clear_callback(&self, handle: PlaybackHandle) -> Result<()> {
        self.record(format!("clear_callback {handle}"));
        self.with_player(handle, |p| p.callback = None)
    }

    fn set_allow_invalid_certs(&self, allow: bool) -> Result<()> {
        self.record(format!("set_allow_invalid_certs {allow}"));
        Ok(())
    }

    fn add_trusted_root_pem(&self, pem: &str) -> Result<()> {
        self.record(format!("add_trusted_root_pem {} bytes", pem.len()));
        Ok(())
    }

    fn clear_trusted_roots(&self) -> Result<()> {
        self.record("clear_trusted_roots");
        Ok(())
    }
}
