use columnar_masks::{Column, Comparator, JoinOptions, JoinType, Table, TableMasks, Value};
use log::info;

// Sample sales table used to walk through the masks.
fn sample_table() -> columnar_masks::Result<Table> {
    Table::new()
        .with_column("id", (1..=10).collect::<Vec<i64>>())?
        .with_column(
            "region",
            vec!["US", "EU", "ASIA", "US", "EU", "US", "ASIA", "EU", "US", "EU"],
        )?
        .with_column(
            "value",
            vec![120.0, 35.5, 980.0, 410.0, 75.0, 260.0, 15.0, 640.0, 505.0, 330.0],
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let table = sample_table()?;
    info!("loaded sample table with {} rows", table.len());

    let top = table.top_mask("value", 20.0, true)?;
    println!("Top 20% by value:\n{top}");

    let middle = table.mid_mask("value", 50.0, false)?;
    println!("Middle 50% by value:\n{middle}");

    let regions = table.in_eqmask("region", &[Value::from("EU"), Value::from("ASIA")])?;
    println!("EU or ASIA:\n{regions}");

    let tags = ["ge", "eq"];
    let comparators = tags
        .iter()
        .map(|t| t.parse::<Comparator>())
        .collect::<Result<Vec<_>, _>>()?;
    let mixed = table.mixbool_mask(
        &["value", "region"],
        &comparators,
        &[Value::Float(600.0), Value::from("ASIA")],
    )?;
    println!("value >= 600 or ASIA:\n{mixed}");

    let discount = Column::new(vec![0.1, 0.25, 0.05])
        .with_name("discount")
        .with_index(vec![Value::Int(1), Value::Int(3), Value::Int(5)])?;
    let merged = table.merge_column(&discount, &JoinOptions::default().how(JoinType::Left))?;
    println!("With discounts:\n{merged}");

    Ok(())
}
