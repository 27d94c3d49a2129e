//! # Weatherdash Core Library
//!
//! This library provides the timeline selection engine behind the weather
//! dashboard. A user picks either a single instant or a start/end range on a
//! bounded timeline, through draggable handles on a track or through date and
//! time fields, and the resulting selection drives the weather readout.
//!
//! ## Architecture
//!
//! - **Bounds**: The timeline extent is computed once from an injected clock
//!   and never changes afterwards
//! - **Selection Store**: Single source of truth for mode, start, end and the
//!   region of interest. Every write is clamped and ordered before it lands
//! - **Interaction Surface**: Drag gestures edit a draft that commits once on
//!   pointer-up. Field edits are debounced and settle when the caller
//!   invokes `tick()`
//! - **Presentation**: Pure derivations for the track, the summary panel and
//!   duration text
//! - **Weather**: Collaborator contracts for the archive query, the hourly
//!   series it returns, and playback over that series
//!
//! ## Key Components
//!
//! - [`BoundsAuthority`]: Fixed timeline extent
//! - [`SelectionStore`]: Selection state and change notifications
//! - [`InteractionSurface`]: Pointer and field input state machine
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod interaction;
pub mod presentation;
pub mod region;
pub mod storage;
pub mod timeline;
pub mod weather;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{ConfigError, CoreError, SeriesError, ValidationError};
pub use events::Event;
pub use interaction::{DraftSelection, GestureState, Handle, InteractionSurface};
pub use presentation::{format_duration, SelectionPanel, SelectionSummary, TrackView};
pub use region::{Centroid, RegionOfInterest};
pub use storage::Config;
pub use timeline::{
    BoundsAuthority, Selection, SelectionMode, SelectionStore, TimeInstant, TimelineBounds,
    TrackMapping,
};
pub use weather::{HourlySeries, PlaybackEngine, PlaybackState, WeatherQuery};
