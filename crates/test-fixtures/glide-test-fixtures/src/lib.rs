//! Shared test support for glide: an in-memory host and JSON scene fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod memory;

pub use memory::MemoryTargets;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenes: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup(name: &str) -> Result<&'static str> {
    MANIFEST
        .scenes
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown scene fixture '{name}'"))
}

pub mod scenes {
    use glide_core::{
        EaseType, LoopMode, Record, Segment, TargetId, TransitionType, Value,
    };
    use serde::Deserialize;

    use super::*;

    /// A host state plus the records to register against it.
    #[derive(Debug, Deserialize)]
    pub struct Scene {
        #[serde(default)]
        pub targets: Vec<SceneTarget>,
        pub tracks: Vec<SceneTrack>,
    }

    #[derive(Debug, Deserialize)]
    pub struct SceneTarget {
        pub id: u64,
        #[serde(default)]
        pub kind: Option<String>,
        #[serde(default)]
        pub values: HashMap<String, Value>,
    }

    #[derive(Debug, Deserialize)]
    pub struct SceneTrack {
        pub target: u64,
        pub property: String,
        pub segments: Vec<SceneSegment>,
        #[serde(default = "one")]
        pub loops: u32,
        #[serde(default)]
        pub loop_mode: LoopMode,
        #[serde(default)]
        pub delay: f32,
        #[serde(default)]
        pub snap: bool,
        #[serde(default)]
        pub id: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct SceneSegment {
        pub start: Value,
        pub end: Value,
        pub duration: f32,
        #[serde(default)]
        pub transition: TransitionType,
        #[serde(default)]
        pub ease: EaseType,
    }

    fn one() -> u32 {
        1
    }

    impl SceneTrack {
        pub fn to_record(&self) -> Record {
            let mut rec = Record::new(TargetId(self.target), self.property.as_str())
                .with_segments(self.segments.iter().map(|s| {
                    Segment::new(s.start, s.end, s.duration).with_ease(s.transition, s.ease)
                }))
                .with_loops(self.loops, self.loop_mode)
                .with_delay(self.delay)
                .with_snap(self.snap);
            if let Some(id) = &self.id {
                rec = rec.with_correlation_id(id.as_str());
            }
            rec
        }
    }

    impl Scene {
        /// Host preloaded with every target in the scene.
        pub fn host(&self) -> MemoryTargets {
            let mut host = MemoryTargets::new();
            for t in &self.targets {
                let id = TargetId(t.id);
                host.add_target(id);
                if let Some(kind) = &t.kind {
                    host.set_kind(id, kind);
                }
                for (prop, value) in &t.values {
                    host.insert(id, prop, *value);
                }
            }
            host
        }

        /// One record per track, tagged with its target's kind.
        pub fn records(&self) -> Vec<Record> {
            self.tracks
                .iter()
                .map(|track| {
                    let rec = track.to_record();
                    let kind = self
                        .targets
                        .iter()
                        .find(|t| t.id == track.target)
                        .and_then(|t| t.kind.as_deref());
                    match kind {
                        Some(kind) => rec.with_target_kind(kind),
                        None => rec,
                    }
                })
                .collect()
        }
    }

    pub fn keys() -> Vec<String> {
        MANIFEST.scenes.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(name)?)
    }

    pub fn load(name: &str) -> Result<Scene> {
        load_json(lookup(name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(name)?))
    }
}
