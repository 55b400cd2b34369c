//! Datasets command implementation.

use anyhow::Result;
use console::style;

use qlab_primitives::DatasetCatalog;

/// Execute the datasets command.
pub fn execute(seed: u64, show: Option<&str>) -> Result<()> {
    let catalog = DatasetCatalog::with_seed(seed);

    if let Some(name) = show {
        let dataset = catalog
            .by_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown dataset: '{name}'"))?;
        println!("{} ({} points)", style(&dataset.name).bold(), dataset.len());
        println!("  {:>8}  {:>8}", "height", "weight");
        for p in &dataset.points {
            println!("  {:>8.2}  {:>8.2}", p.x, p.y);
        }
        return Ok(());
    }

    println!(
        "{} Demo datasets (seed {}):\n",
        style("qlab").cyan().bold(),
        seed
    );
    for dataset in catalog.iter() {
        println!(
            "  {} {}",
            style(dataset.kind.slug()).bold(),
            style(format!("({})", dataset.name)).dim()
        );
        println!("    Points: {}", dataset.len());
        if let (Some((x0, x1)), Some((y0, y1))) = (dataset.x_range(), dataset.y_range()) {
            println!("    Height: {x0:.1} to {x1:.1} cm");
            println!("    Weight: {y0:.1} to {y1:.1} kg");
        }
        println!();
    }
    Ok(())
}
