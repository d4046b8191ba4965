use indexmap::IndexMap;

use crate::error::{SlError, SlResult};
use crate::object::{GeneralObject, ObjectId, ObjectKind, WorldObject};
use crate::rail::{Rail, RailPoint};

/// Prefix of IDs handed out to general objects.
pub const OBJECT_ID_PREFIX: &str = "obj";
/// Prefix of IDs handed out to rails.
pub const RAIL_ID_PREFIX: &str = "rail";

/// One node visited by a full-graph scan: an object or a single rail point.
#[derive(Debug, Clone, Copy)]
pub enum GraphNode<'z> {
    /// A zone object.
    Object(&'z WorldObject),
    /// A point of a rail, with its index along the path.
    Point {
        /// The rail owning the point.
        rail: &'z Rail,
        /// Index of the point within the rail.
        index: usize,
        /// The point itself.
        point: &'z RailPoint,
    },
}

/// A zone: the authoritative owner of a set of objects.
///
/// Links between objects are stored as IDs, so any graph shape (cycles and
/// self-links included) is representable.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Zone name, unique within a project.
    pub name: String,
    objects: IndexMap<ObjectId, WorldObject>,

    // ID counters
    next_object: u64,
    next_rail: u64,
}

impl Zone {
    /// An empty zone.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: IndexMap::new(),
            next_object: 0,
            next_rail: 0,
        }
    }

    // -----------------------------------------------------------------------
    // IDs
    // -----------------------------------------------------------------------

    /// Hand out a fresh ID for an object of `kind`.
    pub fn next_id(&mut self, kind: ObjectKind) -> ObjectId {
        let (prefix, counter) = match kind {
            ObjectKind::General => (OBJECT_ID_PREFIX, &mut self.next_object),
            ObjectKind::Rail => (RAIL_ID_PREFIX, &mut self.next_rail),
        };
        loop {
            let id = ObjectId(format!("{prefix}{counter}"));
            // Wraps to scan from zero once the suffix space is exhausted.
            *counter = counter.wrapping_add(1);
            if !self.objects.contains_key(&id) {
                return id;
            }
        }
    }

    /// Reserve an externally supplied ID so that [`Zone::next_id`] never
    /// hands it out again.
    pub fn submit_id(&mut self, id: &ObjectId) {
        let s = id.as_str();
        if let Some(n) = numeric_suffix(s, RAIL_ID_PREFIX) {
            self.next_rail = self.next_rail.max(n.saturating_add(1));
        } else if let Some(n) = numeric_suffix(s, OBJECT_ID_PREFIX) {
            self.next_object = self.next_object.max(n.saturating_add(1));
        }
    }

    // -----------------------------------------------------------------------
    // Object CRUD
    // -----------------------------------------------------------------------

    /// Add an object to the zone. Returns its ID.
    ///
    /// Rails must hold at least one point.
    pub fn insert(&mut self, object: impl Into<WorldObject>) -> SlResult<ObjectId> {
        let object = object.into();
        let id = object.id().clone();
        if self.objects.contains_key(&id) {
            return Err(SlError::DuplicateId(id));
        }
        if matches!(&object, WorldObject::Rail(rail) if rail.points.is_empty()) {
            return Err(SlError::EmptyRail(id));
        }
        self.submit_id(&id);
        self.objects.insert(id.clone(), object);
        Ok(id)
    }

    /// Get an object by ID.
    pub fn get(&self, id: &ObjectId) -> Option<&WorldObject> {
        self.objects.get(id)
    }

    /// Get a mutable object by ID.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut WorldObject> {
        self.objects.get_mut(id)
    }

    /// Get a general object by ID.
    pub fn general(&self, id: &ObjectId) -> Option<&GeneralObject> {
        match self.objects.get(id) {
            Some(WorldObject::General(o)) => Some(o),
            _ => None,
        }
    }

    /// Get a mutable general object by ID.
    pub fn general_mut(&mut self, id: &ObjectId) -> Option<&mut GeneralObject> {
        match self.objects.get_mut(id) {
            Some(WorldObject::General(o)) => Some(o),
            _ => None,
        }
    }

    /// Get a rail by ID.
    pub fn rail(&self, id: &ObjectId) -> Option<&Rail> {
        match self.objects.get(id) {
            Some(WorldObject::Rail(r)) => Some(r),
            _ => None,
        }
    }

    /// Get a mutable rail by ID.
    pub fn rail_mut(&mut self, id: &ObjectId) -> Option<&mut Rail> {
        match self.objects.get_mut(id) {
            Some(WorldObject::Rail(r)) => Some(r),
            _ => None,
        }
    }

    /// Whether an object with `id` exists.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Remove an object and every link occurrence that points at it.
    pub fn remove(&mut self, id: &ObjectId) -> SlResult<WorldObject> {
        let removed = self
            .objects
            .shift_remove(id)
            .ok_or_else(|| SlError::ObjectNotFound(id.clone()))?;

        for object in self.objects.values_mut() {
            if let Some(links) = object.links_mut() {
                for targets in links.values_mut() {
                    targets.retain(|t| t != id);
                }
            }
        }
        self.update_link_destinations();
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Iteration
    // -----------------------------------------------------------------------

    /// All objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    /// All object IDs in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.objects.keys()
    }

    /// All rails in insertion order.
    pub fn rails(&self) -> impl Iterator<Item = &Rail> {
        self.objects.values().filter_map(|o| match o {
            WorldObject::Rail(r) => Some(r),
            WorldObject::General(_) => None,
        })
    }

    /// Every object followed, for rails, by each of its points.
    ///
    /// This is the node order link rewriting walks after a duplication.
    pub fn objects_and_points(&self) -> Vec<GraphNode<'_>> {
        let mut nodes = Vec::new();
        for object in self.objects.values() {
            nodes.push(GraphNode::Object(object));
            if let WorldObject::Rail(rail) = object {
                nodes.extend(
                    rail.points
                        .iter()
                        .enumerate()
                        .map(|(index, point)| GraphNode::Point { rail, index, point }),
                );
            }
        }
        nodes
    }

    // -----------------------------------------------------------------------
    // Links
    // -----------------------------------------------------------------------

    /// Recompute every object's incoming links from all outgoing links.
    ///
    /// Always a full clear-then-populate pass; never patched incrementally.
    pub fn update_link_destinations(&mut self) {
        for object in self.objects.values_mut() {
            object.clear_link_destinations();
        }

        let mut entries: Vec<(ObjectId, String, ObjectId)> = Vec::new();
        for object in self.objects.values() {
            if let Some(links) = object.links() {
                for (name, targets) in links {
                    for target in targets {
                        entries.push((target.clone(), name.clone(), object.id().clone()));
                    }
                }
            }
        }

        for (target, name, source) in entries {
            match self.objects.get_mut(&target) {
                Some(object) => object.add_link_destination(name, source),
                None => log::warn!("{source} links to missing object {target} via \"{name}\""),
            }
        }
    }

    /// Check that every link target exists.
    pub fn validate_links(&self) -> SlResult<()> {
        for object in self.objects.values() {
            if let Some(links) = object.links() {
                for (name, targets) in links {
                    if let Some(target) = targets.iter().find(|t| !self.objects.contains_key(*t)) {
                        return Err(SlError::DanglingLink {
                            source_id: object.id().clone(),
                            name: name.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    /// Number of objects, rails included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the zone holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of rails.
    pub fn rail_count(&self) -> usize {
        self.rails().count()
    }

    /// Total number of link occurrences across all objects.
    pub fn link_count(&self) -> usize {
        self.objects
            .values()
            .filter_map(WorldObject::links)
            .flat_map(|links| links.values())
            .map(Vec::len)
            .sum()
    }
}

/// `Some(n)` if `s` is `prefix` followed by a decimal number.
fn numeric_suffix(s: &str, prefix: &str) -> Option<u64> {
    s.strip_prefix(prefix)?.parse().ok()
}
