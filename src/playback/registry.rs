use std::collections::HashMap;

use crate::playback::sink::{MediaSink, ProgressSink, TimeTextSink};

/// Media sinks bound by the host, keyed by annotation id.
#[derive(Default)]
pub struct SinkRegistry {
    sinks: HashMap<String, Box<dyn MediaSink>>,
}

impl SinkRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `sink` to `id`, returning any sink it replaces.
    pub fn bind(
        &mut self,
        id: impl Into<String>,
        sink: Box<dyn MediaSink>,
    ) -> Option<Box<dyn MediaSink>> {
        self.sinks.insert(id.into(), sink)
    }

    /// Remove and return the sink bound to `id`.
    pub fn unbind(&mut self, id: &str) -> Option<Box<dyn MediaSink>> {
        self.sinks.remove(id)
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.sinks.clear();
    }

    /// Whether `id` has a bound sink.
    pub fn contains(&self, id: &str) -> bool {
        self.sinks.contains_key(id)
    }

    /// Borrow the sink bound to `id`.
    pub fn get(&self, id: &str) -> Option<&dyn MediaSink> {
        self.sinks.get(id).map(|s| s.as_ref())
    }

    /// Mutably borrow the sink bound to `id`.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn MediaSink + 'static)> {
        self.sinks.get_mut(id).map(|s| s.as_mut())
    }

    /// Visit every bound sink.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&str, &mut dyn MediaSink)) {
        for (id, sink) in &mut self.sinks {
            f(id, sink.as_mut());
        }
    }

    /// Number of bound sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Return `true` when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.sinks.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("SinkRegistry").field("ids", &ids).finish()
    }
}

/// The two optional imperative UI handles, bypassing any reactive update path.
#[derive(Default)]
pub struct UiSinks {
    pub(crate) time_text: Option<Box<dyn TimeTextSink>>,
    pub(crate) progress: Option<Box<dyn ProgressSink>>,
}

impl UiSinks {
    pub(crate) fn update(&mut self, text: &str, ratio: f64) {
        if let Some(t) = self.time_text.as_mut() {
            t.set_text(text);
        }
        if let Some(p) = self.progress.as_mut() {
            p.set_ratio(ratio);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.time_text = None;
        self.progress = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/registry.rs"]
mod tests;
