use std::path::Path;

use colored::Colorize;
use sl_core::{ObjectId, Properties, WorldObject};

use super::Context;

pub fn run(ctx: &Context, path: &Path, id: &str) -> Result<(), String> {
    let zone = ctx.load_zone(path)?;

    let object = zone
        .get(&ObjectId::from(id))
        .ok_or_else(|| format!("object not found: \"{id}\""))?;

    // Header
    println!(
        "  {} [{}]",
        object.id().to_string().bold(),
        format!("{} {}", object.kind(), object.class_name()).dimmed()
    );
    println!();

    match object {
        WorldObject::General(o) => {
            if o.display_name != o.class_name {
                println!("  name:     {}", o.display_name);
            }
            if let Some(ref model) = o.model_name {
                println!("  model:    {model}");
            }
            println!("  layer:    {}", o.layer);
            println!("  position: {}", fmt_vec(o.position));
            println!("  rotation: {}", fmt_vec(o.rotation));
            println!("  scale:    {}", fmt_vec(o.scale));
            if let Some(ref comment) = o.comment {
                println!("  comment:  {comment}");
            }
            print_properties(&o.properties, "  ");

            if !o.links.is_empty() {
                println!();
                println!("  {}", "Links:".dimmed());
                for (name, targets) in &o.links {
                    for target in targets {
                        let class = zone.get(target).map_or("?", |t| t.class_name());
                        println!("    {name} -> {target} ({class})");
                    }
                }
            }
        }
        WorldObject::Rail(rail) => {
            println!("  closed:   {}", rail.closed);
            println!("  ladder:   {}", rail.is_ladder);
            if let Some(ref comment) = rail.comment {
                println!("  comment:  {comment}");
            }
            print_properties(&rail.properties, "  ");

            println!();
            println!("  {}", "Points:".dimmed());
            for (i, point) in rail.points.iter().enumerate() {
                println!(
                    "    {i}: {}  cp1 {}  cp2 {}",
                    fmt_vec(point.position),
                    fmt_vec(point.absolute_control_point1()),
                    fmt_vec(point.absolute_control_point2())
                );
                print_properties(&point.properties, "       ");
            }
        }
    }

    // Incoming links
    println!();
    if object.link_destinations().is_empty() {
        println!("  {} (none)", "Linked by:".dimmed());
    } else {
        println!("  {}", "Linked by:".dimmed());
        for dest in object.link_destinations() {
            println!("    {} via {}", dest.source, dest.name);
        }
    }

    Ok(())
}

fn print_properties(properties: &Properties, indent: &str) {
    for (key, value) in properties {
        println!("{indent}{key}: {value}");
    }
}

fn fmt_vec(v: glam::Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}
