use crate::config::DuplicationPolicy;
use crate::duplicate::{DuplicationInfo, deselect_rail_points, insert_duplicates, snapshot};
use crate::error::SlResult;
use crate::geometry::ZoneTransform;
use crate::object::{ObjectId, WorldObject};
use crate::param_db::ParameterDatabase;
use crate::zone::Zone;

/// Objects copied out of a zone, waiting to be pasted.
///
/// The snapshot is taken at copy time: later edits to the source zone do not
/// change what gets pasted.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    source_zone: Option<String>,
    objects: Vec<WorldObject>,
}

impl Clipboard {
    /// An empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the selected objects of `zone`.
    ///
    /// Rails are copied together with their current point selection; only the
    /// selected points will be pasted.
    pub fn copy(zone: &Zone, selection: &[ObjectId]) -> SlResult<Self> {
        Ok(Self {
            source_zone: Some(zone.name.clone()),
            objects: snapshot(zone, selection)?,
        })
    }

    /// Name of the zone the snapshot was taken from.
    pub fn source_zone(&self) -> Option<&str> {
        self.source_zone.as_deref()
    }

    /// The copied objects.
    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    /// Number of copied objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing has been copied.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Paste the snapshot into `dest`, moved through `transform` if given.
    ///
    /// Pasting back into the source zone rewrites links exactly like a
    /// duplication; pasting into any other zone only links copies to copies.
    pub fn paste(
        &self,
        dest: &mut Zone,
        transform: Option<&ZoneTransform>,
        policy: &DuplicationPolicy,
        db: &dyn ParameterDatabase,
    ) -> SlResult<DuplicationInfo> {
        if self.objects.is_empty() {
            return Ok(DuplicationInfo::new());
        }

        let info = if self.source_zone.as_deref() == Some(dest.name.as_str()) {
            DuplicationInfo::new()
        } else {
            DuplicationInfo::across_zones()
        };
        let info = insert_duplicates(&self.objects, dest, transform, info, policy, db)?;
        log::debug!(
            "pasted {} objects into zone \"{}\"{}",
            info.len(),
            dest.name,
            if info.is_cross_zone() { " from another zone" } else { "" }
        );
        Ok(info)
    }
}

/// Copy the selected objects of `source` and paste them into `dest`.
///
/// The copies are moved through `transform`, which should map `source`
/// coordinates into `dest` coordinates (see [`ZoneTransform::between`]).
/// Links are rewritten as [`Clipboard::paste`] does, so a `dest` carrying
/// the source zone's name is treated as the source zone.
pub fn duplicate_into(
    source: &mut Zone,
    dest: &mut Zone,
    selection: &[ObjectId],
    transform: Option<&ZoneTransform>,
    policy: &DuplicationPolicy,
    db: &dyn ParameterDatabase,
) -> SlResult<DuplicationInfo> {
    let info = Clipboard::copy(source, selection)?.paste(dest, transform, policy, db)?;
    deselect_rail_points(source, selection);
    Ok(info)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    use super::*;
    use crate::object::GeneralObject;
    use crate::param_db::NoDefaults;
    use crate::rail::{Rail, RailPoint};
    use crate::value::Properties;

    fn id(s: &str) -> ObjectId {
        ObjectId::from(s)
    }

    fn source_zone() -> Zone {
        let mut zone = Zone::new("SourceZone");
        let mut a = GeneralObject::new("obj0", "A").with_position(Vec3::new(1.0, 0.0, 0.0));
        a.add_link("Target", id("obj1"));
        a.add_link("Far", id("obj2"));
        zone.insert(a).unwrap();
        zone.insert(GeneralObject::new("obj1", "B")).unwrap();
        zone.insert(GeneralObject::new("obj2", "C")).unwrap();
        zone.update_link_destinations();
        zone
    }

    fn allow() -> DuplicationPolicy {
        DuplicationPolicy::default().with_links_to_originals(true)
    }

    #[test]
    fn paste_into_same_zone_behaves_like_duplicate() {
        let mut zone = source_zone();
        let clipboard = Clipboard::copy(&zone, &[id("obj0")]).unwrap();
        assert_eq!(clipboard.source_zone(), Some("SourceZone"));

        let info = clipboard.paste(&mut zone, None, &allow(), &NoDefaults).unwrap();
        assert!(!info.is_cross_zone());
        let copy = zone.general(info.duplicate_of(&id("obj0")).unwrap()).unwrap();
        assert_eq!(copy.links["Target"], [id("obj1")]);
        assert_eq!(copy.links["Far"], [id("obj2")]);
    }

    #[test]
    fn paste_into_other_zone_links_only_copies() {
        let source = source_zone();
        let clipboard = Clipboard::copy(&source, &[id("obj0"), id("obj1")]).unwrap();

        let mut dest = Zone::new("DestZone");
        dest.insert(GeneralObject::new("obj0", "Unrelated")).unwrap();
        let mut local = GeneralObject::new("obj1", "Local");
        local.add_link("Target", id("obj0"));
        dest.insert(local).unwrap();

        let t = ZoneTransform::from_placement(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let info = clipboard.paste(&mut dest, Some(&t), &allow(), &NoDefaults).unwrap();
        assert!(info.is_cross_zone());
        assert_eq!(dest.len(), 4);

        let a_copy = info.duplicate_of(&id("obj0")).unwrap();
        let b_copy = info.duplicate_of(&id("obj1")).unwrap();
        let a = dest.general(a_copy).unwrap();
        assert_eq!(a.links["Target"], [b_copy.clone()]);
        assert!(a.links["Far"].is_empty());
        assert_abs_diff_eq!(a.position, Vec3::new(1.0, 0.0, 10.0), epsilon = 1e-5);

        // The destination's own obj1 is not an original of this batch.
        assert_eq!(dest.general(&id("obj1")).unwrap().links["Target"], [id("obj0")]);
        assert!(dest.validate_links().is_ok());
    }

    #[test]
    fn snapshot_is_independent_of_later_edits() {
        let mut zone = source_zone();
        let clipboard = Clipboard::copy(&zone, &[id("obj2")]).unwrap();
        zone.general_mut(&id("obj2")).unwrap().class_name = "Renamed".into();
        assert_eq!(clipboard.objects()[0].class_name(), "C");
    }

    #[test]
    fn empty_clipboard_pastes_nothing() {
        let mut zone = source_zone();
        let info = Clipboard::new()
            .paste(&mut zone, None, &allow(), &NoDefaults)
            .unwrap();
        assert!(info.is_empty());
        assert_eq!(zone.len(), 3);
    }

    #[test]
    fn duplicate_into_zone_of_same_name_fans_out_originals() {
        let mut zone = Zone::new("Shared");
        let mut a = GeneralObject::new("obj0", "A");
        a.add_link("Target", id("obj1"));
        zone.insert(a).unwrap();
        zone.insert(GeneralObject::new("obj1", "B")).unwrap();
        zone.update_link_destinations();
        let mut dest = zone.clone();

        let info = duplicate_into(&mut zone, &mut dest, &[id("obj1")], None, &allow(), &NoDefaults)
            .unwrap();
        assert!(!info.is_cross_zone());
        let copy = info.duplicate_of(&id("obj1")).unwrap();
        assert_eq!(copy, &id("obj2"));
        assert_eq!(dest.general(&id("obj0")).unwrap().links["Target"], [id("obj1"), id("obj2")]);
        assert_eq!(zone.general(&id("obj0")).unwrap().links["Target"], [id("obj1")]);
    }

    #[test]
    fn duplicate_into_other_zone_leaves_originals_alone() {
        let mut source = source_zone();
        let mut dest = source_zone();
        dest.name = "DestZone".into();

        let info = duplicate_into(&mut source, &mut dest, &[id("obj1")], None, &allow(), &NoDefaults)
            .unwrap();
        assert!(info.is_cross_zone());
        assert_eq!(dest.general(&id("obj0")).unwrap().links["Target"], [id("obj1")]);
    }

    #[test]
    fn duplicate_into_moves_rail_and_clears_selection() {
        let mut source = Zone::new("Source");
        let points = vec![RailPoint::at(Vec3::ZERO), RailPoint::at(Vec3::X)];
        let rail =
            Rail::new(points, "rail0", "Rail", false, false, Properties::new(), &NoDefaults).unwrap();
        source.insert(rail).unwrap();
        source.rail_mut(&id("rail0")).unwrap().select_points(&[1]);

        let mut dest = Zone::new("Dest");
        let t = ZoneTransform::between(
            &ZoneTransform::from_placement(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO),
            &ZoneTransform::IDENTITY,
        );
        let info =
            duplicate_into(&mut source, &mut dest, &[id("rail0")], Some(&t), &allow(), &NoDefaults)
                .unwrap();

        let copy = dest.rail(info.duplicate_of(&id("rail0")).unwrap()).unwrap();
        assert_eq!(copy.points.len(), 1);
        assert_abs_diff_eq!(copy.points[0].position, Vec3::new(6.0, 0.0, 0.0), epsilon = 1e-5);
        assert_eq!(source.rail(&id("rail0")).unwrap().selected_count(), 0);
    }
}
