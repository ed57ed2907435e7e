//! GridSketch Core Library
//!
//! Platform-agnostic geometry, snapping and interaction logic for the
//! GridSketch line editor.

pub mod camera;
pub mod config;
pub mod document;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod line;
pub mod persistence;
pub mod query;
pub mod snap;
pub mod storage;

pub use camera::Camera;
pub use config::{ConfigError, EditorConfig};
pub use document::LineSet;
pub use editor::{DragSession, EditorState, Effects, Interaction, Phase, ViewState};
pub use geometry::{distance, distance_to_segment, length_in_millimeters, point_from_length_and_direction};
pub use input::{EditorEvent, EditorKey};
pub use line::{Endpoint, EndpointRef, Line, LineId};
pub use persistence::{EXPORT_FILE_NAME, PersistError, export_lines, import_lines};
pub use query::{Exclude, LineHit, find_endpoint_at, find_line_at_point, find_nearby_endpoint};
pub use snap::{GRID_SIZE, GridMode, SnapKind, SnapResult, snap_point, snap_to_grid};
pub use storage::{
    AutoSaveManager, BlobStore, PlatformAutoSaveManager, StorageError, StorageResult,
    create_autosave_manager,
};
