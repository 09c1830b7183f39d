use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_decimal::Decimal;
use std::path::Path;
use tally_finance::{Summary, load_canonical, summarize};
use tally_ingest::RawTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    #[default]
    Table,
    Json,
}

/// Summarize a processed (canonical) CSV as written by `tally normalize`.
pub fn run_summary(path: &Path, format: SummaryFormat) -> Result<()> {
    let raw = RawTable::from_path(path).with_context(|| format!("read {}", path.display()))?;
    let table = load_canonical(&raw).with_context(|| format!("load {}", path.display()))?;
    let summary = summarize(&table);

    match format {
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        SummaryFormat::Table => print!("{}", render(&summary)),
    }
    Ok(())
}

fn money(d: Decimal) -> String {
    let mut d = d.round_dp(2);
    d.rescale(2);
    d.to_string()
}

fn render(summary: &Summary) -> String {
    let mut out = String::new();
    let width = summary
        .by_category
        .iter()
        .map(|c| c.category.len())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    out.push_str(&format!("{:<width$}  {:>12}  {:>5}\n", "Category", "Spent", "Count"));
    for c in &summary.by_category {
        out.push_str(&format!(
            "{:<width$}  {:>12}  {:>5}\n",
            c.category,
            money(c.total),
            c.count
        ));
    }

    if !summary.daily_expenses.is_empty() {
        out.push('\n');
        out.push_str(&format!("{:<10}  {:>12}  {:>12}\n", "Date", "Expenses", "Cumulative"));
        for d in &summary.daily_expenses {
            out.push_str(&format!(
                "{:<10}  {:>12}  {:>12}\n",
                d.date.to_string(),
                money(d.total),
                money(d.cumulative)
            ));
        }
    }

    out.push_str(&format!(
        "\n{} transactions; inflow {}, outflow {}; {} need review\n",
        summary.transactions,
        money(summary.inflow),
        money(summary.outflow),
        summary.needs_review
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_of(csv: &str) -> Summary {
        summarize(&load_canonical(&RawTable::from_reader(csv.as_bytes()).unwrap()).unwrap())
    }

    #[test]
    fn test_render_lists_categories_and_days() {
        let text = render(&summary_of(
            "date,description,amount,auto_category,transaction_type,needs_review\n\
             2024-01-05,STARBUCKS,-4.5,Eating Out,Expense,false\n\
             2024-01-06,AMAZON,-36.99,Amazon,Expense,true\n",
        ));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Category           Spent  Count");
        assert_eq!(lines[1], "Amazon             36.99      1");
        assert_eq!(lines[2], "Eating Out          4.50      1");
        assert!(text.contains("2024-01-06         36.99         41.49"));
        assert!(text.ends_with("2 transactions; inflow 0.00, outflow 41.49; 1 need review\n"));
    }

    #[test]
    fn test_render_skips_daily_block_without_types() {
        let text = render(&summary_of("date,amount,auto_category\n2024-01-05,-4.50,Gas\n"));
        assert!(!text.contains("Cumulative"));
    }
}
