use std::path::Path;

use sl_core::duplicate_selected;

use super::Context;

pub fn run(
    ctx: &Context,
    path: &Path,
    ids: &[String],
    points: &[String],
    keep_links_to_originals: bool,
    output: Option<&Path>,
) -> Result<(), String> {
    let mut zone = ctx.load_zone(path)?;

    let mut selection = super::parse_ids(ids);
    super::select_rail_points(&mut zone, points, &mut selection)?;

    let mut policy = ctx.config.duplication;
    if keep_links_to_originals {
        policy = policy.with_links_to_originals(true);
    }

    let info = duplicate_selected(&mut zone, &selection, &policy, &ctx.params)
        .map_err(|e| e.to_string())?;
    if info.is_empty() {
        println!("  Can't duplicate nothing!");
        return Ok(());
    }

    let out = output.unwrap_or(path);
    ctx.save_zone(&zone, out)?;

    println!("  Duplicated {}", super::summary(&zone, &info));
    for (original, copy) in info.iter() {
        println!("    {original} -> {copy}");
    }

    Ok(())
}
