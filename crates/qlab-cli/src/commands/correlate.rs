//! Correlate command implementation.

use anyhow::Result;
use console::style;

use qlab_primitives::{CorrelationReport, Dataset, DatasetCatalog};

/// Execute the correlate command.
pub fn execute(dataset: Option<&str>, seed: u64, json: bool) -> Result<()> {
    let catalog = DatasetCatalog::with_seed(seed);

    let selected: Vec<&Dataset> = match dataset {
        Some(name) => vec![
            catalog
                .by_name(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown dataset: '{name}'. Run `qlab datasets` for the list"))?,
        ],
        None => catalog.iter().collect(),
    };

    let reports = selected
        .into_iter()
        .map(CorrelationReport::compute)
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!(
        "  {:<24} {:>10} {:>12} {:>14} {:>14}",
        style("Dataset").bold(),
        style("Pearson r").bold(),
        style("p-value").bold(),
        style("<ZZ> product").bold(),
        style("<ZZ> entangled").bold()
    );
    for report in &reports {
        let r = report.pearson.r;
        let r_styled = if r.abs() >= 0.5 {
            style(format!("{r:>10.3}")).green()
        } else {
            style(format!("{r:>10.3}")).dim()
        };
        println!(
            "  {:<24} {} {:>12.2e} {:>14.3} {:>14.3}",
            report.dataset,
            r_styled,
            report.pearson.p_value,
            report.mean_zz_product,
            report.mean_zz_entangled
        );
    }
    Ok(())
}
