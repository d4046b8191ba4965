use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context, path: &Path, class: Option<&str>) -> Result<(), String> {
    let zone = ctx.load_zone(path)?;

    let objects: Vec<_> = zone
        .objects()
        .filter(|o| class.is_none_or(|c| o.class_name().eq_ignore_ascii_case(c)))
        .collect();

    if objects.is_empty() {
        println!("  No objects found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Class", "Kind", "Links", "Linked by"]);

    for object in &objects {
        let links = match object.links() {
            Some(links) if !links.is_empty() => links
                .iter()
                .map(|(name, targets)| format!("{name}: {}", join_ids(targets.iter())))
                .collect::<Vec<_>>()
                .join("\n"),
            Some(_) => "—".to_string(),
            None => format!("{} points", point_count(object)),
        };

        let linked_by = if object.link_destinations().is_empty() {
            "—".to_string()
        } else {
            object
                .link_destinations()
                .iter()
                .map(|d| format!("{} ({})", d.source, d.name))
                .collect::<Vec<_>>()
                .join("\n")
        };

        table.add_row(vec![
            object.id().to_string(),
            object.class_name().to_string(),
            object.kind().to_string(),
            links,
            linked_by,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} objects", objects.len());

    Ok(())
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a sl_core::ObjectId>) -> String {
    ids.map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

fn point_count(object: &sl_core::WorldObject) -> usize {
    match object {
        sl_core::WorldObject::Rail(rail) => rail.points.len(),
        sl_core::WorldObject::General(_) => 0,
    }
}
