//! Categories command - show the antimicrobial category panel.

use std::path::PathBuf;

use amrscope::classify::{AntimicrobialCategory, MDR_CATEGORY_THRESHOLD};
use amrscope::CategoryConfig;
use colored::Colorize;

pub fn run(file: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = match file {
        Some(path) => CategoryConfig::load(&path)?,
        None => CategoryConfig::standard(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!(
        "{} ({} categories, MDR at {} or more)",
        "Antimicrobial categories".cyan().bold(),
        config.len(),
        MDR_CATEGORY_THRESHOLD
    );
    println!();
    for category in &config.categories {
        println!("  {}", category_label(category).white().bold());
        for drug in &category.drugs {
            println!("    {}", drug);
        }
    }

    println!();
    println!(
        "{} {}",
        "Carbapenems:".yellow().bold(),
        config.carbapenems.join(", ")
    );

    Ok(())
}

/// Category heading; single-drug categories are marked as such.
fn category_label(category: &AntimicrobialCategory) -> String {
    if category.is_singleton() {
        format!("{} (single drug)", category.name)
    } else {
        category.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_marks_singletons() {
        let single = AntimicrobialCategory::singleton("Colistin");
        assert_eq!(category_label(&single), "Colistin (single drug)");

        let grouped = AntimicrobialCategory::new("Carbapenems", &["Imipenem", "Meropenem"]);
        assert_eq!(category_label(&grouped), "Carbapenems");
    }

    #[test]
    fn test_standard_panel_has_both_kinds() {
        let config = CategoryConfig::standard();
        let labels: Vec<String> = config.categories.iter().map(category_label).collect();
        assert!(labels.iter().any(|l| l.ends_with("(single drug)")));
        assert!(labels.iter().any(|l| !l.ends_with("(single drug)")));
    }
}
