//! Persisted record layout for zone objects.
//!
//! Records are property maps with PascalCase keys. Positions are written in
//! game units (editor units times [`EditorConfig::unit_scale`]), rail control
//! points are written as absolute coordinates and read back into the
//! relative form [`RailPoint`] stores. Decoding a record is all-or-nothing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::error::{SlError, SlResult};
use crate::object::{GeneralObject, ObjectId, WorldObject};
use crate::rail::{Rail, RailPoint};
use crate::value::{Properties, PropertyValue, parse_vector_record, vector_record};
use crate::zone::Zone;

const DEFAULT_LAYER: &str = "Common";
const POINT_CLASS: &str = "Point";
const RAIL_TYPE: &str = "Bezier";

/// Metadata keys written on every record that never become properties.
const RESERVED_KEYS: &[&str] = &[
    "Comment",
    "Id",
    "IsLinkDest",
    "LayerConfigName",
    "Links",
    "ModelName",
    "Rotate",
    "Scale",
    "UnitConfig",
    "UnitConfigName",
];

/// Keys a rail record consumes on top of [`RESERVED_KEYS`].
const RAIL_KEYS: &[&str] = &["IsClosed", "IsLadder", "RailPoints", "RailType", "Translate"];

/// Keys a general object record consumes on top of [`RESERVED_KEYS`].
/// `RailPoints` would make the record decode as a rail.
const OBJECT_KEYS: &[&str] = &["RailPoints", "Translate"];

/// Keys a rail point record consumes on top of [`RESERVED_KEYS`].
const POINT_KEYS: &[&str] = &["ControlPoints", "Translate"];

// ---------------------------------------------------------------------------
// Zone documents
// ---------------------------------------------------------------------------

/// A whole zone as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneDocument {
    /// Zone name.
    pub name: String,
    /// General object records.
    #[serde(default)]
    pub object_list: Vec<Properties>,
    /// Rail records.
    #[serde(default)]
    pub rail_list: Vec<Properties>,
}

impl ZoneDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> SlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the document as indented JSON.
    pub fn to_json_pretty(&self) -> SlResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode every record into a zone, then resolve links.
    ///
    /// Fails on the first malformed record and on links to IDs that no
    /// record defines.
    pub fn into_zone(&self, config: &EditorConfig) -> SlResult<Zone> {
        let mut zone = Zone::new(self.name.clone());
        let mut deferred = 0usize;

        for record in self.object_list.iter().chain(&self.rail_list) {
            let (object, links_deferred) = decode_object(record, &mut zone, config)?;
            if links_deferred {
                deferred += 1;
            }
            zone.insert(object)?;
        }

        zone.validate_links()?;
        zone.update_link_destinations();
        log::debug!(
            "decoded zone \"{}\": {} objects, {} with links resolved after load",
            zone.name,
            zone.len(),
            deferred
        );
        Ok(zone)
    }

    /// Encode every object of `zone`.
    pub fn from_zone(zone: &Zone, config: &EditorConfig) -> SlResult<Self> {
        let mut document = Self {
            name: zone.name.clone(),
            ..Self::default()
        };
        for object in zone.objects() {
            let record = encode_object(object, config)?;
            match object {
                WorldObject::General(_) => document.object_list.push(record),
                WorldObject::Rail(_) => document.rail_list.push(record),
            }
        }
        Ok(document)
    }
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

/// Decode one record and reserve its ID in `zone`.
///
/// The flag is `true` when the object holds links whose targets must be
/// resolved once every record of the zone has been read. Rails never do.
pub fn decode_object(
    record: &Properties,
    zone: &mut Zone,
    config: &EditorConfig,
) -> SlResult<(WorldObject, bool)> {
    let (object, links_deferred) = if record.contains_key("RailPoints") {
        (WorldObject::Rail(decode_rail(record, config)?), false)
    } else {
        let object = decode_general(record, config)?;
        let deferred = !object.links.is_empty();
        (WorldObject::General(object), deferred)
    };
    zone.submit_id(object.id());
    log::trace!("decoded {} {}", object.kind(), object.id());
    Ok((object, links_deferred))
}

/// Encode one object as a record.
pub fn encode_object(object: &WorldObject, config: &EditorConfig) -> SlResult<Properties> {
    match object {
        WorldObject::General(o) => Ok(encode_general(o, config)),
        WorldObject::Rail(r) => encode_rail(r, config),
    }
}

fn decode_general(record: &Properties, config: &EditorConfig) -> SlResult<GeneralObject> {
    let id = ObjectId::from(required_str(record, "Id", "object")?);
    let context = format!("object {id}");
    let class_name = required_str(record, "UnitConfigName", &context)?;

    let mut object = GeneralObject::new(id, class_name);
    object.model_name = optional_str(record, "ModelName", &context)?;
    object.comment = optional_str(record, "Comment", &context)?;
    if let Some(layer) = optional_str(record, "LayerConfigName", &context)? {
        object.layer = layer;
    }
    if let Some(display_name) = record
        .get("UnitConfig")
        .and_then(PropertyValue::as_map)
        .and_then(|unit| unit.get("DisplayName"))
        .and_then(PropertyValue::as_str)
    {
        object.display_name = display_name.to_string();
    }

    object.position = parse_vector_record(
        required(record, "Translate", &context)?,
        config.unit_scale,
        &format!("{context} Translate"),
    )?;
    if let Some(rotate) = record.get("Rotate") {
        object.rotation = parse_vector_record(rotate, 1.0, &format!("{context} Rotate"))?;
    }
    if let Some(scale) = record.get("Scale") {
        object.scale = parse_vector_record(scale, 1.0, &format!("{context} Scale"))?;
    }

    if let Some(links) = record.get("Links") {
        let links = links
            .as_map()
            .ok_or_else(|| SlError::malformed(&context, "\"Links\" is not a map"))?;
        for (name, targets) in links {
            let targets = targets.as_list().ok_or_else(|| {
                SlError::malformed(&context, format!("link list \"{name}\" is not a list"))
            })?;
            // An empty list is still a link slot and survives a round trip.
            object.links.entry(name.clone()).or_default();
            for target in targets {
                let target = target
                    .as_map()
                    .and_then(|t| t.get("Id"))
                    .and_then(PropertyValue::as_str)
                    .ok_or_else(|| {
                        SlError::malformed(&context, format!("link \"{name}\" entry has no \"Id\""))
                    })?;
                object.add_link(name.clone(), ObjectId::from(target));
            }
        }
    }

    object.properties = extra_properties(record, OBJECT_KEYS);
    Ok(object)
}

fn encode_general(object: &GeneralObject, config: &EditorConfig) -> Properties {
    let mut links = Properties::new();
    for (name, targets) in &object.links {
        let refs = targets
            .iter()
            .map(|t| {
                let mut r = Properties::new();
                r.insert("Id".into(), t.as_str().into());
                PropertyValue::Map(r)
            })
            .collect();
        links.insert(name.clone(), PropertyValue::List(refs));
    }

    let mut record = Properties::new();
    record.insert("Comment".into(), optional_value(object.comment.as_deref()));
    record.insert("Id".into(), object.id.as_str().into());
    record.insert("IsLinkDest".into(), (!object.link_destinations.is_empty()).into());
    record.insert("LayerConfigName".into(), object.layer.as_str().into());
    record.insert("Links".into(), PropertyValue::Map(links));
    record.insert("ModelName".into(), optional_value(object.model_name.as_deref()));
    record.insert("Rotate".into(), vector_record(object.rotation, 1.0));
    record.insert("Scale".into(), vector_record(object.scale, 1.0));
    record.insert("Translate".into(), vector_record(object.position, config.unit_scale));
    record.insert(
        "UnitConfig".into(),
        unit_config(&object.display_name, &object.class_name),
    );
    record.insert("UnitConfigName".into(), object.class_name.as_str().into());
    append_properties(&mut record, &object.properties, OBJECT_KEYS, object.id.as_str());
    record
}

// ---------------------------------------------------------------------------
// Rails
// ---------------------------------------------------------------------------

fn decode_rail(record: &Properties, config: &EditorConfig) -> SlResult<Rail> {
    let id = ObjectId::from(required_str(record, "Id", "rail")?);
    let context = format!("rail {id}");
    let class_name = required_str(record, "UnitConfigName", &context)?;

    let point_records = required(record, "RailPoints", &context)?
        .as_list()
        .ok_or_else(|| SlError::malformed(&context, "\"RailPoints\" is not a list"))?;
    if point_records.is_empty() {
        return Err(SlError::EmptyRail(id));
    }

    let mut rail = Rail::empty(id, class_name);
    for (index, point) in point_records.iter().enumerate() {
        let point_context = format!("{context} point {index}");
        let point = point
            .as_map()
            .ok_or_else(|| SlError::malformed(&point_context, "point is not a record"))?;
        rail.points
            .push(decode_rail_point(point, config.unit_scale, &point_context)?);
    }

    rail.closed = optional_bool(record, "IsClosed", &context)?;
    rail.is_ladder = optional_bool(record, "IsLadder", &context)?;
    rail.comment = optional_str(record, "Comment", &context)?;
    rail.properties = extra_properties(record, RAIL_KEYS);
    Ok(rail)
}

fn encode_rail(rail: &Rail, config: &EditorConfig) -> SlResult<Properties> {
    let first = rail
        .points
        .first()
        .ok_or_else(|| SlError::EmptyRail(rail.id.clone()))?;
    let is_link_dest = !rail.link_destinations.is_empty();

    let points = rail
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let id = format!("{}/{i}", rail.id);
            PropertyValue::Map(encode_rail_point(point, &id, is_link_dest, config.unit_scale))
        })
        .collect();

    let mut record = Properties::new();
    record.insert("Comment".into(), optional_value(rail.comment.as_deref()));
    record.insert("Id".into(), rail.id.as_str().into());
    record.insert("IsClosed".into(), rail.closed.into());
    record.insert("IsLadder".into(), rail.is_ladder.into());
    record.insert("IsLinkDest".into(), is_link_dest.into());
    record.insert("LayerConfigName".into(), DEFAULT_LAYER.into());
    record.insert("Links".into(), PropertyValue::Map(Properties::new()));
    record.insert("ModelName".into(), PropertyValue::Null);
    record.insert("RailPoints".into(), PropertyValue::List(points));
    record.insert("RailType".into(), RAIL_TYPE.into());
    record.insert("Rotate".into(), vector_record(Vec3::ZERO, 1.0));
    record.insert("Scale".into(), vector_record(Vec3::ONE, 1.0));
    record.insert("Translate".into(), vector_record(first.position, config.unit_scale));
    record.insert("UnitConfig".into(), unit_config(&rail.class_name, &rail.class_name));
    record.insert("UnitConfigName".into(), rail.class_name.as_str().into());
    append_properties(&mut record, &rail.properties, RAIL_KEYS, rail.id.as_str());
    Ok(record)
}

/// Decode one point record. Control points are read as absolute positions
/// and stored relative to the point; a point without them gets zero handles.
pub fn decode_rail_point(record: &Properties, scale: f32, context: &str) -> SlResult<RailPoint> {
    let position = parse_vector_record(
        required(record, "Translate", context)?,
        scale,
        &format!("{context} Translate"),
    )?;

    let mut point = RailPoint::at(position);
    for (key, value) in record {
        match key.as_str() {
            "ControlPoints" => {
                let [cp1, cp2] = value.as_list().unwrap_or_default() else {
                    return Err(SlError::malformed(
                        context,
                        "\"ControlPoints\" must hold exactly two records",
                    ));
                };
                let cp_context = format!("{context} ControlPoints");
                point.set_absolute_control_point1(parse_vector_record(cp1, scale, &cp_context)?);
                point.set_absolute_control_point2(parse_vector_record(cp2, scale, &cp_context)?);
            }
            k if is_field_key(k, POINT_KEYS) => {}
            _ => {
                point.properties.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(point)
}

/// Encode one point record with the given record ID.
pub fn encode_rail_point(point: &RailPoint, id: &str, is_link_dest: bool, scale: f32) -> Properties {
    let mut record = Properties::new();
    record.insert("Comment".into(), PropertyValue::Null);
    record.insert(
        "ControlPoints".into(),
        PropertyValue::List(vec![
            vector_record(point.absolute_control_point1(), scale),
            vector_record(point.absolute_control_point2(), scale),
        ]),
    );
    record.insert("Id".into(), id.into());
    record.insert("IsLinkDest".into(), is_link_dest.into());
    record.insert("LayerConfigName".into(), DEFAULT_LAYER.into());
    record.insert("Links".into(), PropertyValue::Map(Properties::new()));
    record.insert("ModelName".into(), PropertyValue::Null);
    record.insert("Rotate".into(), vector_record(Vec3::ZERO, 1.0));
    record.insert("Scale".into(), vector_record(Vec3::ONE, 1.0));
    record.insert("Translate".into(), vector_record(point.position, scale));
    record.insert("UnitConfig".into(), unit_config(POINT_CLASS, POINT_CLASS));
    record.insert("UnitConfigName".into(), POINT_CLASS.into());
    append_properties(&mut record, &point.properties, POINT_KEYS, id);
    record
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn unit_config(display_name: &str, class_name: &str) -> PropertyValue {
    let mut config = Properties::new();
    config.insert("DisplayName".into(), display_name.into());
    config.insert("DisplayTranslate".into(), vector_record(Vec3::ZERO, 1.0));
    config.insert("GenerateCategory".into(), "".into());
    config.insert("ParameterConfigName".into(), class_name.into());
    config.insert("PlacementTargetFile".into(), "Map".into());
    PropertyValue::Map(config)
}

/// Append free-form properties. Keys that name a record field are skipped.
fn append_properties(
    record: &mut Properties,
    properties: &Properties,
    consumed: &[&str],
    owner: &str,
) {
    for (key, value) in properties {
        if is_field_key(key, consumed) || record.contains_key(key) {
            log::warn!("{owner}: property \"{key}\" shadows a record field, not written");
            continue;
        }
        record.insert(key.clone(), value.to_persisted());
    }
}

fn is_field_key(key: &str, consumed: &[&str]) -> bool {
    RESERVED_KEYS.contains(&key) || consumed.contains(&key)
}

fn extra_properties(record: &Properties, consumed: &[&str]) -> Properties {
    record
        .iter()
        .filter(|(k, _)| !is_field_key(k, consumed))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn required<'r>(record: &'r Properties, key: &str, context: &str) -> SlResult<&'r PropertyValue> {
    record
        .get(key)
        .ok_or_else(|| SlError::malformed(context, format!("missing \"{key}\"")))
}

fn required_str(record: &Properties, key: &str, context: &str) -> SlResult<String> {
    required(record, key, context)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SlError::malformed(context, format!("\"{key}\" is not a string")))
}

fn optional_str(record: &Properties, key: &str, context: &str) -> SlResult<Option<String>> {
    match record.get(key) {
        None | Some(PropertyValue::Null) => Ok(None),
        Some(PropertyValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SlError::malformed(context, format!("\"{key}\" is not a string"))),
    }
}

fn optional_bool(record: &Properties, key: &str, context: &str) -> SlResult<bool> {
    match record.get(key) {
        None | Some(PropertyValue::Null) => Ok(false),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| SlError::malformed(context, format!("\"{key}\" is not a boolean"))),
    }
}

fn optional_value(value: Option<&str>) -> PropertyValue {
    value.map_or(PropertyValue::Null, PropertyValue::from)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::object::ObjectKind;
    use crate::param_db::NoDefaults;

    fn config() -> EditorConfig {
        EditorConfig::default()
    }

    fn sample_zone() -> Zone {
        let mut zone = Zone::new("Sample");
        let mut p0 = RailPoint::new(Vec3::new(1.0, 2.0, 3.0), Vec3::X, -Vec3::Z);
        p0.properties.insert("Speed".into(), PropertyValue::Float(1.5));
        p0.properties.insert("Note".into(), "".into());
        let p1 = RailPoint::at(Vec3::new(4.0, 2.0, 3.0));
        let mut props = Properties::new();
        props.insert("Priority".into(), PropertyValue::Int(2));
        let mut rail =
            Rail::new(vec![p0, p1], "rail0", "Rail", true, false, props, &NoDefaults).unwrap();
        rail.comment = Some("camera track".into());
        zone.insert(rail).unwrap();

        let mut mover = GeneralObject::new("obj0", "Kuribo").with_position(Vec3::new(0.5, 0.0, -2.0));
        mover.rotation = Vec3::new(0.0, 90.0, 0.0);
        mover.model_name = Some("KuriboBig".into());
        mover.properties.insert("ShadowLength".into(), PropertyValue::Float(-1.0));
        mover.add_link("Rail", ObjectId::from("rail0"));
        mover.add_link("Target", ObjectId::from("obj1"));
        zone.insert(mover).unwrap();
        zone.insert(GeneralObject::new("obj1", "Coin")).unwrap();
        zone.update_link_destinations();
        zone
    }

    #[test]
    fn zone_survives_document_round_trip() {
        let zone = sample_zone();
        let json = ZoneDocument::from_zone(&zone, &config())
            .unwrap()
            .to_json_pretty()
            .unwrap();
        let decoded = ZoneDocument::from_json(&json)
            .unwrap()
            .into_zone(&config())
            .unwrap();

        assert_eq!(decoded.name, "Sample");
        assert_eq!(decoded.len(), 3);
        let rail = decoded.rail(&ObjectId::from("rail0")).unwrap();
        assert!(rail.closed);
        assert_eq!(rail.comment.as_deref(), Some("camera track"));
        assert_eq!(rail.properties["Priority"], PropertyValue::Int(2));
        assert_abs_diff_eq!(rail.points[0].control_point1, Vec3::X, epsilon = 1e-4);
        assert_abs_diff_eq!(rail.points[0].control_point2, -Vec3::Z, epsilon = 1e-4);
        assert_eq!(rail.points[0].properties["Note"], PropertyValue::Null);
        assert_eq!(rail.link_destinations.len(), 1);

        let mover = decoded.general(&ObjectId::from("obj0")).unwrap();
        assert_abs_diff_eq!(mover.position, Vec3::new(0.5, 0.0, -2.0), epsilon = 1e-4);
        assert_abs_diff_eq!(mover.rotation, Vec3::new(0.0, 90.0, 0.0), epsilon = 1e-4);
        assert_eq!(mover.model_name.as_deref(), Some("KuriboBig"));
        assert_eq!(mover.links["Target"], [ObjectId::from("obj1")]);
        assert_eq!(mover.properties.keys().collect::<Vec<_>>(), ["ShadowLength"]);
    }

    #[test]
    fn rail_record_layout() {
        let zone = sample_zone();
        let rail = zone.get(&ObjectId::from("rail0")).unwrap();
        let record = encode_object(rail, &config()).unwrap();

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "Comment", "Id", "IsClosed", "IsLadder", "IsLinkDest", "LayerConfigName",
                "Links", "ModelName", "RailPoints", "RailType", "Rotate", "Scale", "Translate",
                "UnitConfig", "UnitConfigName", "Priority",
            ]
        );
        assert_eq!(record["IsLinkDest"], PropertyValue::Bool(true));
        assert_eq!(record["Translate"], vector_record(Vec3::new(100.0, 200.0, 300.0), 1.0));

        let points = record["RailPoints"].as_list().unwrap();
        let p0 = points[0].as_map().unwrap();
        assert_eq!(p0["Id"], PropertyValue::from("rail0/0"));
        assert_eq!(p0["UnitConfigName"], PropertyValue::from("Point"));
        assert_eq!(
            p0["ControlPoints"].as_list().unwrap()[0],
            vector_record(Vec3::new(200.0, 200.0, 300.0), 1.0)
        );
        assert_eq!(p0["Note"], PropertyValue::Null);
        assert_eq!(points[1].as_map().unwrap()["Id"], PropertyValue::from("rail0/1"));
    }

    #[test]
    fn links_are_deferred_for_objects_only() {
        let zone = sample_zone();
        let mut scratch = Zone::new("Scratch");
        for id in ["obj0", "obj1", "rail0"] {
            let record = encode_object(zone.get(&ObjectId::from(id)).unwrap(), &config()).unwrap();
            let (object, deferred) = decode_object(&record, &mut scratch, &config()).unwrap();
            assert_eq!(object.id().as_str(), id);
            assert_eq!(deferred, id == "obj0");
        }
        assert_eq!(scratch.next_id(ObjectKind::General), ObjectId::from("obj2"));
        assert_eq!(scratch.next_id(ObjectKind::Rail), ObjectId::from("rail1"));
    }

    #[test]
    fn point_without_translate_is_malformed() {
        let mut record = Properties::new();
        record.insert("Id".into(), "rail0/0".into());
        let err = decode_rail_point(&record, 100.0, "rail0 point 0").unwrap_err();
        assert!(matches!(err, SlError::MalformedRecord { ref reason, .. } if reason.contains("Translate")));
    }

    #[test]
    fn control_points_need_two_records() {
        let mut record = Properties::new();
        record.insert("Translate".into(), vector_record(Vec3::ZERO, 1.0));
        record.insert(
            "ControlPoints".into(),
            PropertyValue::List(vec![vector_record(Vec3::ZERO, 1.0)]),
        );
        assert!(decode_rail_point(&record, 100.0, "p").is_err());

        record.remove("ControlPoints");
        let point = decode_rail_point(&record, 100.0, "p").unwrap();
        assert_eq!(point.control_point1, Vec3::ZERO);
    }

    #[test]
    fn rail_without_points_is_rejected() {
        let json = r#"{"Name": "Z", "RailList": [{"Id": "rail0", "UnitConfigName": "Rail", "RailPoints": []}]}"#;
        let err = ZoneDocument::from_json(json)
            .unwrap()
            .into_zone(&config())
            .unwrap_err();
        assert!(matches!(err, SlError::EmptyRail(_)));

        let empty = WorldObject::from(Rail::empty("rail3", "Rail"));
        assert!(matches!(encode_object(&empty, &config()), Err(SlError::EmptyRail(_))));
    }

    #[test]
    fn properties_never_overwrite_record_fields() {
        let mut object = GeneralObject::new("obj0", "Coin").with_position(Vec3::new(1.0, 0.0, 0.0));
        object.properties.insert("Id".into(), "obj99".into());
        object.properties.insert("Translate".into(), PropertyValue::Int(0));
        object.properties.insert("RailPoints".into(), PropertyValue::List(vec![]));
        object.properties.insert("Links".into(), PropertyValue::Null);
        object.properties.insert("Radius".into(), PropertyValue::Float(2.0));
        object.add_link("Target", ObjectId::from("obj0"));

        let record = encode_object(&WorldObject::from(object), &config()).unwrap();
        assert_eq!(record["Id"], PropertyValue::from("obj0"));
        assert!(record["Translate"].as_map().is_some());
        assert!(record["Links"].as_map().unwrap().contains_key("Target"));
        assert!(!record.contains_key("RailPoints"));
        assert_eq!(record["Radius"], PropertyValue::Float(2.0));

        let mut scratch = Zone::new("Scratch");
        let (decoded, _) = decode_object(&record, &mut scratch, &config()).unwrap();
        assert_eq!(decoded.kind(), ObjectKind::General);
        assert_eq!(decoded.id().as_str(), "obj0");
    }

    #[test]
    fn point_property_named_like_a_field_is_dropped() {
        let mut point = RailPoint::at(Vec3::ZERO);
        point.properties.insert("ControlPoints".into(), PropertyValue::Null);
        point.properties.insert("WaitTime".into(), PropertyValue::Int(30));

        let record = encode_rail_point(&point, "rail0/0", false, 1.0);
        assert_eq!(record["ControlPoints"].as_list().map(<[_]>::len), Some(2));
        let decoded = decode_rail_point(&record, 1.0, "rail0 point 0").unwrap();
        assert_eq!(decoded.properties.len(), 1);
        assert_eq!(decoded.properties["WaitTime"], PropertyValue::Int(30));
    }

    #[test]
    fn largest_id_suffix_decodes() {
        let json = r#"{
            "Name": "Z",
            "ObjectList": [{
                "Id": "obj18446744073709551615",
                "UnitConfigName": "Coin",
                "Translate": {"X": 0, "Y": 0, "Z": 0}
            }]
        }"#;
        let mut zone = ZoneDocument::from_json(json)
            .unwrap()
            .into_zone(&config())
            .unwrap();
        assert_eq!(zone.len(), 1);
        assert_eq!(zone.next_id(ObjectKind::General), ObjectId::from("obj0"));
    }

    #[test]
    fn dangling_link_fails_decode() {
        let json = r#"{
            "Name": "Z",
            "ObjectList": [{
                "Id": "obj0",
                "UnitConfigName": "Kuribo",
                "Translate": {"X": 0, "Y": 0, "Z": 0},
                "Links": {"Target": [{"Id": "obj9"}]}
            }]
        }"#;
        let err = ZoneDocument::from_json(json)
            .unwrap()
            .into_zone(&config())
            .unwrap_err();
        assert!(matches!(err, SlError::DanglingLink { ref target, .. } if target.as_str() == "obj9"));
    }

    #[test]
    fn object_without_class_is_malformed() {
        let json = r#"{"Name": "Z", "ObjectList": [{"Id": "obj0", "Translate": {"X": 0, "Y": 0, "Z": 0}}]}"#;
        let err = ZoneDocument::from_json(json)
            .unwrap()
            .into_zone(&config())
            .unwrap_err();
        assert!(matches!(err, SlError::MalformedRecord { ref context, .. } if context == "object obj0"));
    }

    proptest! {
        #[test]
        fn point_round_trip_keeps_absolute_control_points(
            pos in prop::array::uniform3(-500.0f32..500.0),
            cp1 in prop::array::uniform3(-50.0f32..50.0),
            cp2 in prop::array::uniform3(-50.0f32..50.0),
        ) {
            let point = RailPoint::new(Vec3::from(pos), Vec3::from(cp1), Vec3::from(cp2));
            let record = encode_rail_point(&point, "rail0/0", false, 100.0);
            let decoded = decode_rail_point(&record, 100.0, "rail0/0").unwrap();

            prop_assert!(decoded.position.abs_diff_eq(point.position, 1e-3));
            prop_assert!(decoded
                .absolute_control_point1()
                .abs_diff_eq(point.absolute_control_point1(), 1e-3));
            prop_assert!(decoded
                .absolute_control_point2()
                .abs_diff_eq(point.absolute_control_point2(), 1e-3));
        }
    }
}
