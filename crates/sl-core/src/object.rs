use std::fmt;

use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::DuplicationPolicy;
use crate::duplicate::{DuplicationInfo, rewrite_links};
use crate::geometry::{ZoneTransform, transform_position, transform_rotation};
use crate::rail::Rail;
use crate::value::Properties;

/// Identifier of an object, unique within its zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Create an ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Named, ordered link lists. A list may name the same target more than once.
pub type Links = IndexMap<String, Vec<ObjectId>>;

/// Reverse-index entry: `source` links to the owning object under `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkDestination {
    /// The link name used by the source object.
    pub name: String,
    /// The object holding the link.
    pub source: ObjectId,
}

impl LinkDestination {
    /// Create a reverse-index entry.
    pub fn new(name: impl Into<String>, source: ObjectId) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// The closed set of object variants a zone can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A generic placed object.
    General,
    /// A bezier path.
    Rail,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "object"),
            Self::Rail => write!(f, "rail"),
        }
    }
}

/// A generic placed object with links to other objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralObject {
    /// Unique identifier within the zone.
    pub id: ObjectId,
    /// Class name selecting the default property schema.
    pub class_name: String,
    /// Name shown in the editor.
    pub display_name: String,
    /// Model override, if any.
    pub model_name: Option<String>,
    /// Layer the object is placed on.
    pub layer: String,
    /// Free-text comment carried through load and save.
    pub comment: Option<String>,
    /// Position in zone space.
    pub position: Vec3,
    /// Orientation, Euler degrees.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Free-form properties.
    pub properties: Properties,
    /// Outgoing links by name.
    pub links: Links,
    /// Incoming links. Derived by [`crate::Zone::update_link_destinations`].
    #[serde(skip)]
    pub link_destinations: Vec<LinkDestination>,
}

impl GeneralObject {
    /// Create an object at the origin with no properties or links.
    pub fn new(id: impl Into<ObjectId>, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            id: id.into(),
            display_name: class_name.clone(),
            class_name,
            model_name: None,
            layer: "Common".to_string(),
            comment: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            properties: Properties::new(),
            links: Links::new(),
            link_destinations: Vec::new(),
        }
    }

    /// Place the object at `position`.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Append `target` to the link list `name`, creating the list if needed.
    pub fn add_link(&mut self, name: impl Into<String>, target: ObjectId) {
        self.links.entry(name.into()).or_default().push(target);
    }

    /// Structural clone under a fresh ID.
    ///
    /// Properties and link lists are copied, not shared; the link lists still
    /// name the original targets until the duplication pass rewrites them.
    pub fn duplicate(&self, id: ObjectId, transform: Option<&ZoneTransform>) -> Self {
        Self {
            id,
            class_name: self.class_name.clone(),
            display_name: self.display_name.clone(),
            model_name: self.model_name.clone(),
            layer: self.layer.clone(),
            comment: self.comment.clone(),
            position: transform_position(self.position, transform),
            rotation: transform_rotation(self.rotation, transform),
            scale: self.scale,
            properties: self.properties.clone(),
            links: self.links.clone(),
            link_destinations: Vec::new(),
        }
    }
}

/// Any object that lives in a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorldObject {
    /// A generic placed object.
    General(GeneralObject),
    /// A bezier path. Rails never hold links.
    Rail(Rail),
}

impl WorldObject {
    /// The object's ID.
    pub fn id(&self) -> &ObjectId {
        match self {
            Self::General(o) => &o.id,
            Self::Rail(r) => &r.id,
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::General(_) => ObjectKind::General,
            Self::Rail(_) => ObjectKind::Rail,
        }
    }

    /// The object's class name.
    pub fn class_name(&self) -> &str {
        match self {
            Self::General(o) => &o.class_name,
            Self::Rail(r) => &r.class_name,
        }
    }

    /// Change the object's class name.
    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        match self {
            Self::General(o) => o.class_name = class_name.into(),
            Self::Rail(r) => r.class_name = class_name.into(),
        }
    }

    /// Free-form properties.
    pub fn properties(&self) -> &Properties {
        match self {
            Self::General(o) => &o.properties,
            Self::Rail(r) => &r.properties,
        }
    }

    /// Mutable free-form properties.
    pub fn properties_mut(&mut self) -> &mut Properties {
        match self {
            Self::General(o) => &mut o.properties,
            Self::Rail(r) => &mut r.properties,
        }
    }

    /// Whether this variant can hold outgoing links.
    pub fn supports_links(&self) -> bool {
        matches!(self, Self::General(_))
    }

    /// Outgoing links, `None` for variants without link support.
    pub fn links(&self) -> Option<&Links> {
        match self {
            Self::General(o) => Some(&o.links),
            Self::Rail(_) => None,
        }
    }

    /// Mutable outgoing links, `None` for variants without link support.
    pub fn links_mut(&mut self) -> Option<&mut Links> {
        match self {
            Self::General(o) => Some(&mut o.links),
            Self::Rail(_) => None,
        }
    }

    /// Incoming links.
    pub fn link_destinations(&self) -> &[LinkDestination] {
        match self {
            Self::General(o) => &o.link_destinations,
            Self::Rail(r) => &r.link_destinations,
        }
    }

    /// Drop every incoming-link entry.
    pub fn clear_link_destinations(&mut self) {
        match self {
            Self::General(o) => o.link_destinations.clear(),
            Self::Rail(r) => r.link_destinations.clear(),
        }
    }

    /// Record that `source` links to this object under `name`.
    pub fn add_link_destination(&mut self, name: impl Into<String>, source: ObjectId) {
        let entry = LinkDestination::new(name, source);
        match self {
            Self::General(o) => o.link_destinations.push(entry),
            Self::Rail(r) => r.link_destinations.push(entry),
        }
    }

    /// The point link lines are drawn to.
    pub fn linking_point(&self) -> Vec3 {
        match self {
            Self::General(o) => o.position,
            Self::Rail(r) => r.linking_point().unwrap_or(Vec3::ZERO),
        }
    }

    /// Rewrite this object's links after a duplication batch.
    ///
    /// A no-op for rails.
    pub fn link_duplicates(&mut self, info: &DuplicationInfo, policy: &DuplicationPolicy) {
        match self {
            Self::General(o) => rewrite_links(&o.id, &mut o.links, info, policy),
            Self::Rail(_) => {}
        }
    }
}

impl fmt::Display for WorldObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

impl From<GeneralObject> for WorldObject {
    fn from(o: GeneralObject) -> Self {
        Self::General(o)
    }
}

impl From<Rail> for WorldObject {
    fn from(r: Rail) -> Self {
        Self::Rail(r)
    }
}
