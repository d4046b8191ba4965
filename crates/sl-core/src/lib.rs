//! Spotlight core: the in-memory model behind the level editor.
//!
//! A [`Zone`] owns a set of [`WorldObject`]s. General objects carry named
//! link lists pointing at other objects by [`ObjectId`]; rails are bezier
//! paths that can be linked to but never link themselves. The incoming side
//! of every link is a derived index recomputed from scratch by
//! [`Zone::update_link_destinations`].
//!
//! Duplication ([`duplicate_selected`], [`Clipboard`], [`duplicate_into`])
//! clones objects and rewrites links across the whole zone so that copies
//! link to copies, and originals that were left behind gain links to the
//! copies of their targets.

/// Editor and duplication settings.
pub mod config;
/// Copy and paste between zones.
pub mod clipboard;
/// Persisted record layout for objects, rails and whole zones.
pub mod codec;
/// Object duplication and link rewriting.
pub mod duplicate;
/// Error types.
pub mod error;
/// Zone transforms and Euler angle helpers.
pub mod geometry;
/// Object identity, links, and the object variants.
pub mod object;
/// Per-class default properties.
pub mod param_db;
/// Rails and rail points.
pub mod rail;
/// Dynamically typed property values.
pub mod value;
/// The zone container.
pub mod zone;

pub use clipboard::{Clipboard, duplicate_into};
pub use codec::{ZoneDocument, decode_object, encode_object};
pub use config::{DuplicationPolicy, EditorConfig};
pub use duplicate::{DuplicationInfo, describe_selection, duplicate_selected};
pub use error::{SlError, SlResult};
pub use geometry::{ZonePlacement, ZoneTransform};
pub use object::{GeneralObject, LinkDestination, Links, ObjectId, ObjectKind, WorldObject};
pub use param_db::{NoDefaults, ParameterDatabase, RailParameters};
pub use rail::{Rail, RailPoint};
pub use value::{Properties, PropertyValue};
pub use zone::Zone;
