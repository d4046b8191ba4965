use std::path::Path;

use super::Context;

pub fn run(ctx: &Context, path: &Path) -> Result<(), String> {
    let zone = ctx.load_zone(path)?;

    println!("  All checks passed for '{}'.", zone.name);
    println!(
        "  {} objects, {} rails, {} links",
        zone.len() - zone.rail_count(),
        zone.rail_count(),
        zone.link_count()
    );

    Ok(())
}
