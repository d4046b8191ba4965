pub mod check;
pub mod duplicate;
pub mod list;
pub mod paste;
pub mod show;

use std::path::Path;

use glam::Vec3;
use sl_core::{
    DuplicationInfo, EditorConfig, ObjectId, RailParameters, Zone, ZoneDocument, describe_selection,
};

/// Settings shared by every command.
pub struct Context {
    pub config: EditorConfig,
    pub params: RailParameters,
}

impl Context {
    /// Read the optional config and rail defaults files.
    pub fn load(config: Option<&Path>, defaults: Option<&Path>) -> Result<Self, String> {
        let config = match config {
            Some(path) => EditorConfig::from_json(&read(path)?)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?,
            None => EditorConfig::default(),
        };
        let params = match defaults {
            Some(path) => RailParameters::from_json(&read(path)?)
                .map_err(|e| format!("invalid rail defaults {}: {e}", path.display()))?,
            None => RailParameters::new(),
        };
        log::debug!("{} rail classes with point defaults", params.class_names().len());
        Ok(Self { config, params })
    }

    /// Decode a zone document and resolve its links.
    fn load_zone(&self, path: &Path) -> Result<Zone, String> {
        ZoneDocument::from_json(&read(path)?)
            .and_then(|doc| doc.into_zone(&self.config))
            .map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Encode a zone and write it to `path`.
    fn save_zone(&self, zone: &Zone, path: &Path) -> Result<(), String> {
        let json = ZoneDocument::from_zone(zone, &self.config)
            .and_then(|doc| doc.to_json_pretty())
            .map_err(|e| format!("cannot encode zone \"{}\": {e}", zone.name))?;
        std::fs::write(path, json).map_err(|e| format!("cannot write to {}: {e}", path.display()))
    }
}

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

fn parse_ids(ids: &[String]) -> Vec<ObjectId> {
    ids.iter().map(|id| ObjectId::from(id.as_str())).collect()
}

/// Apply `RAIL:I,J,...` point selections. Listed rails join the selection.
fn select_rail_points(
    zone: &mut Zone,
    specs: &[String],
    selection: &mut Vec<ObjectId>,
) -> Result<(), String> {
    for spec in specs {
        let (rail_id, indices) = spec
            .split_once(':')
            .ok_or_else(|| format!("invalid point selection \"{spec}\", expected RAIL:I,J"))?;
        let indices = indices
            .split(',')
            .map(|i| {
                i.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid point index \"{i}\" in \"{spec}\""))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rail_id = ObjectId::from(rail_id);
        let zone_name = zone.name.clone();
        let rail = zone
            .rail_mut(&rail_id)
            .ok_or_else(|| format!("no rail \"{rail_id}\" in zone \"{zone_name}\""))?;
        if let Some(bad) = indices.iter().find(|&&i| i >= rail.points.len()) {
            return Err(format!(
                "rail \"{rail_id}\" has {} points, no point {bad}",
                rail.points.len()
            ));
        }
        rail.select_points(&indices);
        if !selection.contains(&rail_id) {
            selection.push(rail_id);
        }
    }
    Ok(())
}

fn parse_vec3(value: &str, what: &str) -> Result<Vec3, String> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("invalid {what} \"{value}\", expected X,Y,Z"))?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("invalid {what} \"{value}\", expected X,Y,Z")),
    }
}

/// Class names of the originals that produced a copy, as a status line.
fn summary(originals: &Zone, info: &DuplicationInfo) -> String {
    let names: Vec<&str> = info
        .iter()
        .filter_map(|(original, _)| originals.get(original))
        .map(|o| o.class_name())
        .collect();
    describe_selection(&names)
}
