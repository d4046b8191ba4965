use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SlError, SlResult};
use crate::geometry::{ZoneTransform, transform_position};
use crate::object::{LinkDestination, ObjectId, ObjectKind};
use crate::param_db::ParameterDatabase;
use crate::value::{Properties, add_missing_properties};
use crate::zone::Zone;

/// One point of a rail.
///
/// Control points are stored relative to `position`. Anything that reads or
/// writes absolute coordinates goes through the `absolute_*` accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailPoint {
    /// Position in zone space.
    pub position: Vec3,
    /// First bezier handle, relative to `position`.
    pub control_point1: Vec3,
    /// Second bezier handle, relative to `position`.
    pub control_point2: Vec3,
    /// Free-form properties.
    pub properties: Properties,
    /// Editor selection state.
    #[serde(skip)]
    pub selected: bool,
}

impl RailPoint {
    /// A point with relative control points and no properties.
    pub fn new(position: Vec3, control_point1: Vec3, control_point2: Vec3) -> Self {
        Self::with_properties(position, control_point1, control_point2, Properties::new())
    }

    /// A point with relative control points and the given properties.
    pub fn with_properties(
        position: Vec3,
        control_point1: Vec3,
        control_point2: Vec3,
        properties: Properties,
    ) -> Self {
        Self {
            position,
            control_point1,
            control_point2,
            properties,
            selected: false,
        }
    }

    /// A point from absolute control point coordinates.
    pub fn from_absolute(position: Vec3, absolute1: Vec3, absolute2: Vec3) -> Self {
        Self::new(position, absolute1 - position, absolute2 - position)
    }

    /// A point whose handles sit on the point itself.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, Vec3::ZERO)
    }

    /// First handle in zone coordinates.
    pub fn absolute_control_point1(&self) -> Vec3 {
        self.position + self.control_point1
    }

    /// Second handle in zone coordinates.
    pub fn absolute_control_point2(&self) -> Vec3 {
        self.position + self.control_point2
    }

    /// Move the first handle to an absolute zone position.
    pub fn set_absolute_control_point1(&mut self, absolute: Vec3) {
        self.control_point1 = absolute - self.position;
    }

    /// Move the second handle to an absolute zone position.
    pub fn set_absolute_control_point2(&mut self, absolute: Vec3) {
        self.control_point2 = absolute - self.position;
    }

    /// Position in the reference space of `transform`.
    pub fn global_position(&self, transform: &ZoneTransform) -> Vec3 {
        transform.apply_point(self.position)
    }

    /// Set the position from reference-space coordinates.
    pub fn set_global_position(&mut self, global: Vec3, transform: &ZoneTransform) {
        self.position = transform.unapply_point(global);
    }

    /// First handle direction in reference space.
    pub fn global_control_point1(&self, transform: &ZoneTransform) -> Vec3 {
        transform.apply_direction(self.control_point1)
    }

    /// Set the first handle from a reference-space direction.
    pub fn set_global_control_point1(&mut self, global: Vec3, transform: &ZoneTransform) {
        self.control_point1 = transform.unapply_direction(global);
    }

    /// Second handle direction in reference space.
    pub fn global_control_point2(&self, transform: &ZoneTransform) -> Vec3 {
        transform.apply_direction(self.control_point2)
    }

    /// Set the second handle from a reference-space direction.
    pub fn set_global_control_point2(&mut self, global: Vec3, transform: &ZoneTransform) {
        self.control_point2 = transform.unapply_direction(global);
    }

    /// Deep copy, unselected, optionally moved into another zone's space.
    pub fn duplicate(&self, transform: Option<&ZoneTransform>) -> Self {
        let (control_point1, control_point2) = match transform {
            Some(t) => (
                t.apply_direction(self.control_point1),
                t.apply_direction(self.control_point2),
            ),
            None => (self.control_point1, self.control_point2),
        };
        Self {
            position: transform_position(self.position, transform),
            control_point1,
            control_point2,
            properties: self.properties.clone(),
            selected: false,
        }
    }
}

/// A named bezier path. Rails can be link targets but never hold links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rail {
    /// Unique identifier within the zone.
    pub id: ObjectId,
    /// Class name selecting the default point properties.
    pub class_name: String,
    /// Points in path order.
    pub points: Vec<RailPoint>,
    /// Whether the path loops back to its first point.
    pub closed: bool,
    /// Ladder flag.
    pub is_ladder: bool,
    /// Free-form properties of the path itself.
    pub properties: Properties,
    /// Free-text comment carried through load and save.
    pub comment: Option<String>,
    /// Incoming links. Derived by [`crate::Zone::update_link_destinations`].
    #[serde(skip)]
    pub link_destinations: Vec<LinkDestination>,
}

impl Rail {
    /// Build a rail from scratch, merging class defaults into every point.
    ///
    /// Fails with [`SlError::EmptyRail`] when `points` is empty.
    pub fn new(
        points: Vec<RailPoint>,
        id: impl Into<ObjectId>,
        class_name: impl Into<String>,
        closed: bool,
        is_ladder: bool,
        properties: Properties,
        db: &dyn ParameterDatabase,
    ) -> SlResult<Self> {
        let id = id.into();
        if points.is_empty() {
            return Err(SlError::EmptyRail(id));
        }
        let mut rail = Self {
            points: Vec::new(),
            closed,
            is_ladder,
            properties,
            ..Self::empty(id, class_name)
        };
        for point in points {
            rail.add_point(point, db);
        }
        Ok(rail)
    }

    /// A rail with no points and no properties. Points must be added before
    /// it is handed to a zone.
    pub(crate) fn empty(id: impl Into<ObjectId>, class_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class_name: class_name.into(),
            points: Vec::new(),
            closed: false,
            is_ladder: false,
            properties: Properties::new(),
            comment: None,
            link_destinations: Vec::new(),
        }
    }

    /// Merge this rail class's default point properties into `point`.
    ///
    /// Keys the point already has are left alone; an unknown class is skipped.
    pub fn setup_point(&self, point: &mut RailPoint, db: &dyn ParameterDatabase) {
        match db.point_defaults(&self.class_name) {
            Some(defaults) => add_missing_properties(defaults, &mut point.properties),
            None => log::trace!("no point defaults for rail class \"{}\"", self.class_name),
        }
    }

    /// Append a point after setting it up.
    pub fn add_point(&mut self, mut point: RailPoint, db: &dyn ParameterDatabase) {
        self.setup_point(&mut point, db);
        self.points.push(point);
    }

    /// Insert a point at `index` after setting it up. `index` is clamped to
    /// the end of the path.
    pub fn insert_point(&mut self, index: usize, mut point: RailPoint, db: &dyn ParameterDatabase) {
        self.setup_point(&mut point, db);
        let index = index.min(self.points.len());
        self.points.insert(index, point);
    }

    /// Remove and return the point at `index`, or `None` if out of range.
    ///
    /// The last remaining point cannot be removed.
    pub fn remove_point(&mut self, index: usize) -> SlResult<Option<RailPoint>> {
        if index >= self.points.len() {
            return Ok(None);
        }
        if self.points.len() == 1 {
            return Err(SlError::EmptyRail(self.id.clone()));
        }
        Ok(Some(self.points.remove(index)))
    }

    /// Mark the points at `indices` as selected. Out-of-range indices are ignored.
    pub fn select_points(&mut self, indices: &[usize]) {
        for &i in indices {
            if let Some(point) = self.points.get_mut(i) {
                point.selected = true;
            }
        }
    }

    /// Number of selected points.
    pub fn selected_count(&self) -> usize {
        self.points.iter().filter(|p| p.selected).count()
    }

    /// Whether any point is selected.
    pub fn any_selected(&self) -> bool {
        self.points.iter().any(|p| p.selected)
    }

    /// Clear the selection on every point.
    pub fn deselect_all(&mut self) {
        for point in &mut self.points {
            point.selected = false;
        }
    }

    /// Where link lines to this rail are drawn: its first point.
    pub fn linking_point(&self) -> Option<Vec3> {
        self.points.first().map(|p| p.position)
    }

    /// Clone the selected points, in order, into a new rail owned by `dest`.
    ///
    /// Returns `None` without allocating an ID when no point is selected.
    pub fn duplicate_selected(
        &self,
        dest: &mut Zone,
        transform: Option<&ZoneTransform>,
        db: &dyn ParameterDatabase,
    ) -> SlResult<Option<Rail>> {
        if !self.any_selected() {
            return Ok(None);
        }

        let points: Vec<RailPoint> = self
            .points
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.duplicate(transform))
            .collect();

        let mut copy = Rail::new(
            points,
            dest.next_id(ObjectKind::Rail),
            self.class_name.clone(),
            self.closed,
            self.is_ladder,
            self.properties.clone(),
            db,
        )?;
        copy.comment = self.comment.clone();
        Ok(Some(copy))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::param_db::{NoDefaults, RailParameters};
    use crate::value::PropertyValue;

    fn five_point_rail() -> Rail {
        let points = (0..5)
            .map(|i| {
                let mut p = RailPoint::at(Vec3::new(i as f32, 0.0, 0.0));
                p.properties.insert("Index".into(), PropertyValue::Int(i));
                p
            })
            .collect();
        Rail::new(points, "rail0", "Rail", false, false, Properties::new(), &NoDefaults).unwrap()
    }

    #[test]
    fn absolute_control_points_are_offset_by_position() {
        let mut p = RailPoint::new(Vec3::new(1.0, 1.0, 1.0), Vec3::X, -Vec3::X);
        assert_eq!(p.absolute_control_point1(), Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(p.absolute_control_point2(), Vec3::new(0.0, 1.0, 1.0));

        p.set_absolute_control_point1(Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(p.control_point1, Vec3::new(0.0, 2.0, 0.0));

        let q = RailPoint::from_absolute(Vec3::ONE, Vec3::new(2.0, 1.0, 1.0), Vec3::ZERO);
        assert_eq!(q.control_point1, Vec3::X);
        assert_eq!(q.control_point2, -Vec3::ONE);
    }

    #[test]
    fn setup_merges_defaults_without_overwriting() {
        let mut defaults = Properties::new();
        defaults.insert("WaitTime".into(), PropertyValue::Int(0));
        defaults.insert("Speed".into(), PropertyValue::Float(1.0));
        let db = RailParameters::new().with_class("Rail", defaults);

        let mut point = RailPoint::at(Vec3::ZERO);
        point.properties.insert("Speed".into(), PropertyValue::Float(7.0));

        let rail =
            Rail::new(vec![point], "rail0", "Rail", true, false, Properties::new(), &db).unwrap();
        let props = &rail.points[0].properties;
        assert_eq!(props["Speed"], PropertyValue::Float(7.0));
        assert_eq!(props["WaitTime"], PropertyValue::Int(0));
        assert!(rail.closed);
    }

    #[test]
    fn unknown_class_skips_defaults() {
        let db = RailParameters::new();
        let rail = Rail::new(
            vec![RailPoint::at(Vec3::ZERO)],
            "rail0",
            "Mystery",
            false,
            false,
            Properties::new(),
            &db,
        )
        .unwrap();
        assert!(rail.points[0].properties.is_empty());
    }

    #[test]
    fn insert_and_remove_points() {
        let mut rail = five_point_rail();
        rail.insert_point(1, RailPoint::at(Vec3::new(0.5, 0.0, 0.0)), &NoDefaults);
        assert_eq!(rail.points.len(), 6);
        assert_eq!(rail.points[1].position.x, 0.5);

        rail.insert_point(99, RailPoint::at(Vec3::new(9.0, 0.0, 0.0)), &NoDefaults);
        assert_eq!(rail.points.last().unwrap().position.x, 9.0);

        assert!(rail.remove_point(1).unwrap().is_some());
        assert!(rail.remove_point(42).unwrap().is_none());
        assert_eq!(rail.points.len(), 6);
    }

    #[test]
    fn new_rejects_empty_point_list() {
        let result = Rail::new(vec![], "rail0", "Rail", false, false, Properties::new(), &NoDefaults);
        assert!(matches!(result, Err(SlError::EmptyRail(ref id)) if id.as_str() == "rail0"));
    }

    #[test]
    fn last_point_cannot_be_removed() {
        let mut rail = five_point_rail();
        for _ in 0..4 {
            assert!(rail.remove_point(0).unwrap().is_some());
        }
        assert!(matches!(rail.remove_point(0), Err(SlError::EmptyRail(_))));
        assert_eq!(rail.points.len(), 1);
        assert!(rail.remove_point(1).unwrap().is_none());
    }

    #[test]
    fn duplicate_selected_keeps_order_of_selected_points() {
        let mut rail = five_point_rail();
        rail.select_points(&[3, 1, 2]);
        assert_eq!(rail.selected_count(), 3);

        let mut zone = Zone::new("TestZone");
        zone.submit_id(&rail.id);
        let copy = rail.duplicate_selected(&mut zone, None, &NoDefaults).unwrap().unwrap();
        let xs: Vec<f32> = copy.points.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, [1.0, 2.0, 3.0]);
        assert!(copy.points.iter().all(|p| !p.selected));
        assert_eq!(copy.id, ObjectId::from("rail1"));
    }

    #[test]
    fn duplicate_without_selection_allocates_nothing() {
        let rail = five_point_rail();
        let mut zone = Zone::new("TestZone");
        assert!(rail.duplicate_selected(&mut zone, None, &NoDefaults).unwrap().is_none());
        assert_eq!(zone.next_id(ObjectKind::Rail), ObjectId::from("rail0"));
    }

    #[test]
    fn duplicate_moves_points_into_destination_space() {
        let mut rail = five_point_rail();
        rail.points[4].control_point1 = Vec3::Z;
        rail.select_points(&[4]);
        let t = ZoneTransform::from_placement(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 90.0, 0.0));

        let mut zone = Zone::new("Other");
        let copy = rail.duplicate_selected(&mut zone, Some(&t), &NoDefaults).unwrap().unwrap();
        let p = &copy.points[0];
        assert_abs_diff_eq!(p.position, Vec3::new(0.0, 10.0, -4.0), epsilon = 1e-5);
        assert_abs_diff_eq!(p.control_point1, Vec3::X, epsilon = 1e-5);
    }

    #[test]
    fn global_accessors_round_trip() {
        let t = ZoneTransform::from_placement(Vec3::new(3.0, -2.0, 8.0), Vec3::new(0.0, 0.0, 90.0));
        let mut p = RailPoint::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Y, Vec3::Z);

        let global = p.global_position(&t);
        assert_abs_diff_eq!(global, Vec3::new(3.0, -1.0, 8.0), epsilon = 1e-5);
        p.set_global_position(global, &t);
        assert_abs_diff_eq!(p.position, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);

        let cp = p.global_control_point1(&t);
        assert_abs_diff_eq!(cp, -Vec3::X, epsilon = 1e-5);
        p.set_global_control_point1(cp, &t);
        assert_abs_diff_eq!(p.control_point1, Vec3::Y, epsilon = 1e-5);

        let cp2 = p.global_control_point2(&t);
        p.set_global_control_point2(cp2, &t);
        assert_abs_diff_eq!(p.control_point2, Vec3::Z, epsilon = 1e-5);
    }

    proptest! {
        #[test]
        fn global_position_set_get_round_trip(
            x in -100.0f32..100.0, y in -100.0f32..100.0, z in -100.0f32..100.0,
            ry in -180.0f32..180.0, tx in -50.0f32..50.0,
        ) {
            let t = ZoneTransform::from_placement(Vec3::new(tx, 0.0, -tx), Vec3::new(0.0, ry, 0.0));
            let mut p = RailPoint::at(Vec3::ZERO);
            let g = Vec3::new(x, y, z);
            p.set_global_position(g, &t);
            prop_assert!(p.global_position(&t).abs_diff_eq(g, 1e-3));
        }
    }
}
