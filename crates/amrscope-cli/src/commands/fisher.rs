//! Fisher command - exact test on raw counts.

use amrscope::stats::{OddsRatioMethod, SIGNIFICANCE_THRESHOLD};
use amrscope::{AnalyzerConfig, AssociationAnalyzer, ContingencyTable};
use colored::Colorize;

pub fn run(
    [a, b, c, d]: [usize; 4],
    confidence: f64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = AssociationAnalyzer::with_config(AnalyzerConfig {
        confidence_level: confidence,
    })?;
    let result = analyzer.analyze_table(&ContingencyTable::new(a, b, c, d))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let test = &result.exact_test;
    println!("{} {}", "Table".cyan().bold(), result.table);
    println!();
    println!("p-value (two-sided): {:.6e}", test.p_value);
    println!("p-value (less):      {:.6e}", test.p_value_less);
    println!("p-value (greater):   {:.6e}", test.p_value_greater);
    println!(
        "Conditional MLE:     {:.6} ({:.0}% CI {:.6} - {:.6})",
        test.conditional_odds_ratio,
        test.confidence_level * 100.0,
        test.ci_lower,
        test.ci_upper
    );

    let or = &result.odds_ratio;
    println!();
    println!(
        "Reported odds ratio: {:.6} ({:.6} - {:.6}) via {}",
        or.estimate,
        or.ci_lower,
        or.ci_upper,
        or.method.label()
    );
    if or.method == OddsRatioMethod::HaldaneAnscombe {
        println!("  {}", "table has a zero cell".yellow());
    }

    let tag = if or.p_value < SIGNIFICANCE_THRESHOLD {
        or.significance.green().bold()
    } else {
        or.significance.normal()
    };
    println!("Significance:        {}", tag);

    Ok(())
}
