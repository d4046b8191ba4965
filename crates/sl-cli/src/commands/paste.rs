use std::path::Path;

use glam::Vec3;
use sl_core::{ZonePlacement, duplicate_into};

use super::Context;

#[allow(clippy::too_many_arguments)]
pub fn run(
    ctx: &Context,
    source_path: &Path,
    dest_path: &Path,
    ids: &[String],
    points: &[String],
    offset: Option<&str>,
    rotate: Option<&str>,
    output: Option<&Path>,
) -> Result<(), String> {
    let mut source = ctx.load_zone(source_path)?;
    let mut dest = ctx.load_zone(dest_path)?;

    let mut selection = super::parse_ids(ids);
    super::select_rail_points(&mut source, points, &mut selection)?;

    let transform = if offset.is_some() || rotate.is_some() {
        let position = offset.map_or(Ok(Vec3::ZERO), |v| super::parse_vec3(v, "offset"))?;
        let rotation = rotate.map_or(Ok(Vec3::ZERO), |v| super::parse_vec3(v, "rotation"))?;
        Some(ZonePlacement::new(position, rotation).to_transform())
    } else {
        None
    };

    let info = duplicate_into(
        &mut source,
        &mut dest,
        &selection,
        transform.as_ref(),
        &ctx.config.duplication,
        &ctx.params,
    )
    .map_err(|e| e.to_string())?;
    if info.is_empty() {
        println!("  Can't duplicate nothing!");
        return Ok(());
    }

    let out = output.unwrap_or(dest_path);
    ctx.save_zone(&dest, out)?;

    println!(
        "  Pasted into '{}': {}",
        dest.name,
        super::summary(&source, &info)
    );
    for (original, copy) in info.iter() {
        println!("    {original} -> {copy}");
    }

    Ok(())
}
