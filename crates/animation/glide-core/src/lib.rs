//! Glide core: frame-driven tweening engine.
//!
//! A `Tweener` owns every running animation record, advances them once per
//! host frame in `tick`, and delivers the interpolated values to the host
//! through [`TargetAccess`] as one batched flush. Easing goes through a
//! precomputed lookup table; the ephemeral scheduler covers values that are
//! not bound to a target property.

pub mod callbacks;
pub mod config;
pub mod curve;
pub mod ease;
pub mod ephemeral;
pub mod error;
pub mod handle;
pub mod ids;
pub mod record;
pub mod registry;
pub mod scheduler;
pub mod scratch;
pub mod segment;
pub mod target;
pub mod value;
pub mod writes;

// Re-exports for hosts
pub use callbacks::{Callback, Callbacks, SharedHandler, TweenEvent, TweenEventKind, TweenHandler};
pub use config::Config;
pub use curve::{CustomEase, SampledCurve};
pub use ease::{EaseType, Easing, EasingTable, LookupMode, TransitionType};
pub use ephemeral::{EaseSpec, EphemeralScheduler};
pub use error::{GlideError, Result};
pub use handle::Handle;
pub use ids::{EphemeralId, RecordId, TargetId};
pub use record::{ConflictMode, LoopMode, Property, Record};
pub use registry::ConflictRegistry;
pub use scheduler::{TickStats, Tweener};
pub use segment::{Segment, SegmentOrigin};
pub use target::TargetAccess;
pub use value::{Value, ValueKind};
pub use writes::{PendingWrite, WriteBatch};
