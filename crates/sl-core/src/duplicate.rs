//! Duplication of objects and the link rewriting that follows it.
//!
//! A duplication batch runs in three steps: every selected object is cloned
//! into the destination zone and recorded in a [`DuplicationInfo`], then the
//! link lists of every object in that zone are rebuilt against the info, and
//! finally the reverse link index is recomputed from scratch. All three steps
//! run under one `&mut Zone` borrow, so no reader ever sees a half-rewritten
//! graph.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::config::DuplicationPolicy;
use crate::error::{SlError, SlResult};
use crate::geometry::ZoneTransform;
use crate::object::{Links, ObjectId, ObjectKind, WorldObject};
use crate::param_db::ParameterDatabase;
use crate::zone::{GraphNode, Zone};

/// Original-to-copy table for one duplication batch.
#[derive(Debug, Clone, Default)]
pub struct DuplicationInfo {
    duplicates: IndexMap<ObjectId, ObjectId>,
    copies: HashSet<ObjectId>,
    cross_zone: bool,
}

impl DuplicationInfo {
    /// An empty table for a batch whose copies land next to their originals.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table for a batch whose copies land in another zone.
    ///
    /// Original IDs then belong to a different graph, so originals are never
    /// fanned out and copies never keep links to originals.
    pub fn across_zones() -> Self {
        Self {
            cross_zone: true,
            ..Self::default()
        }
    }

    /// Record that `copy` was created from `original`.
    pub fn insert(&mut self, original: ObjectId, copy: ObjectId) {
        self.copies.insert(copy.clone());
        self.duplicates.insert(original, copy);
    }

    /// Whether `id` is a copy created in this batch.
    pub fn is_duplicate(&self, id: &ObjectId) -> bool {
        self.copies.contains(id)
    }

    /// Whether `id` was duplicated in this batch.
    pub fn has_duplicate(&self, id: &ObjectId) -> bool {
        self.duplicates.contains_key(id)
    }

    /// The copy made of `original`, if any.
    pub fn duplicate_of(&self, original: &ObjectId) -> Option<&ObjectId> {
        self.duplicates.get(original)
    }

    /// Whether copies were placed in a different zone than their originals.
    pub fn is_cross_zone(&self) -> bool {
        self.cross_zone
    }

    /// `(original, copy)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &ObjectId)> {
        self.duplicates.iter()
    }

    /// Copies in creation order.
    pub fn copies(&self) -> impl Iterator<Item = &ObjectId> {
        self.duplicates.values()
    }

    /// Number of copies made.
    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    /// Whether nothing was copied.
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Rebuild the link lists of `self_id` after a duplication batch.
///
/// Every list is replaced by a list derived from its previous contents, in
/// order:
/// - a copy links to the copy of its target, or keeps the original target
///   only if the policy allows it;
/// - an original that was not itself duplicated keeps its target and also
///   gains a link to the target's copy;
/// - any other original keeps its targets unchanged.
pub fn rewrite_links(
    self_id: &ObjectId,
    links: &mut Links,
    info: &DuplicationInfo,
    policy: &DuplicationPolicy,
) {
    if links.is_empty() {
        return;
    }

    let self_is_copy = info.is_duplicate(self_id);
    if !self_is_copy && info.is_cross_zone() {
        return;
    }
    let self_has_copy = info.has_duplicate(self_id);
    let keep_originals = policy.allow_link_copy_to_original && !info.is_cross_zone();

    for (name, targets) in links.iter_mut() {
        let previous = std::mem::take(targets);
        for linked in previous {
            let linked_copy = info.duplicate_of(&linked);

            if self_is_copy {
                match linked_copy {
                    Some(copy) => targets.push(copy.clone()),
                    None if keep_originals => targets.push(linked),
                    None => log::trace!("{self_id}: dropped \"{name}\" link to {linked}"),
                }
            } else {
                match linked_copy {
                    Some(copy) if !self_has_copy => {
                        targets.push(linked);
                        targets.push(copy.clone());
                    }
                    _ => targets.push(linked),
                }
            }
        }
    }
}

/// Run [`WorldObject::link_duplicates`] on every link holder found by a
/// [`Zone::objects_and_points`] scan.
pub fn rewrite_zone_links(zone: &mut Zone, info: &DuplicationInfo, policy: &DuplicationPolicy) {
    // Rail points and rails never hold links.
    let holders: Vec<ObjectId> = zone
        .objects_and_points()
        .into_iter()
        .filter_map(|node| match node {
            GraphNode::Object(object) if object.links().is_some_and(|l| !l.is_empty()) => {
                Some(object.id().clone())
            }
            _ => None,
        })
        .collect();

    for id in &holders {
        if let Some(object) = zone.get_mut(id) {
            object.link_duplicates(info, policy);
        }
    }
}

/// Duplicate the selected objects in place.
///
/// Rails contribute a copy holding only their selected points, and have
/// their point selection cleared afterwards. Fails without touching the zone
/// if any selected ID is missing.
pub fn duplicate_selected(
    zone: &mut Zone,
    selection: &[ObjectId],
    policy: &DuplicationPolicy,
    db: &dyn ParameterDatabase,
) -> SlResult<DuplicationInfo> {
    let originals = snapshot(zone, selection)?;
    if originals.is_empty() {
        return Ok(DuplicationInfo::new());
    }

    let info = insert_duplicates(&originals, zone, None, DuplicationInfo::new(), policy, db)?;
    deselect_rail_points(zone, selection);

    log::debug!(
        "duplicated {} of {} selected objects in zone \"{}\"",
        info.len(),
        originals.len(),
        zone.name
    );
    Ok(info)
}

/// Format a selection for the status line: sorted, equal names folded into
/// `"name"xN`, comma-separated and terminated with a period.
pub fn describe_selection<S: AsRef<str>>(names: &[S]) -> String {
    let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let mut parts: Vec<String> = Vec::new();
    let mut iter = sorted.into_iter().peekable();
    while let Some(name) = iter.next() {
        let mut count = 1;
        while iter.peek() == Some(&name) {
            iter.next();
            count += 1;
        }
        if count > 1 {
            parts.push(format!("\"{name}\"x{count}"));
        } else {
            parts.push(format!("\"{name}\""));
        }
    }
    format!("{}.", parts.join(", "))
}

/// Clone the selected objects out of `zone`, dropping repeated IDs.
pub(crate) fn snapshot(zone: &Zone, selection: &[ObjectId]) -> SlResult<Vec<WorldObject>> {
    let mut seen = HashSet::new();
    let mut objects = Vec::with_capacity(selection.len());
    for id in selection {
        let object = zone
            .get(id)
            .ok_or_else(|| SlError::ObjectNotFound(id.clone()))?;
        if seen.insert(id) {
            objects.push(object.clone());
        }
    }
    Ok(objects)
}

/// Clone `originals` into `dest`, then rewrite links and refresh the
/// reverse index of `dest`.
pub(crate) fn insert_duplicates(
    originals: &[WorldObject],
    dest: &mut Zone,
    transform: Option<&ZoneTransform>,
    mut info: DuplicationInfo,
    policy: &DuplicationPolicy,
    db: &dyn ParameterDatabase,
) -> SlResult<DuplicationInfo> {
    for original in originals {
        let copy: WorldObject = match original {
            WorldObject::General(o) => {
                let id = dest.next_id(ObjectKind::General);
                o.duplicate(id, transform).into()
            }
            WorldObject::Rail(r) => match r.duplicate_selected(dest, transform, db)? {
                Some(copy) => copy.into(),
                None => continue,
            },
        };
        let copy_id = dest.insert(copy)?;
        log::trace!("{} -> {copy_id}", original.id());
        info.insert(original.id().clone(), copy_id);
    }

    rewrite_zone_links(dest, &info, policy);
    dest.update_link_destinations();
    Ok(info)
}

pub(crate) fn deselect_rail_points(zone: &mut Zone, selection: &[ObjectId]) {
    for id in selection {
        if let Some(rail) = zone.rail_mut(id) {
            rail.deselect_all();
        }
    }
}
