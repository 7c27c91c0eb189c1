use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(path: &Path) -> Result<(), String> {
    let loaded = super::load_world(path)?;
    let world = &loaded.world;

    println!("  All checks passed for '{}'.", world.name);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Count"]);
    let counts = [
        ("locations", world.locations().count()),
        ("items", world.items().count()),
        ("commands", world.commands().count()),
        ("events", world.events().count()),
        ("inventories", world.inventories().count()),
    ];
    for (kind, count) in counts {
        table.add_row(vec![kind.to_string(), count.to_string()]);
    }
    println!("{table}");

    Ok(())
}
