use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One generated row; blanks are written as empty fields.
struct SampleRow {
    id: u32,
    active: Option<bool>,
    amount: Option<f64>,
    quantity: Option<i64>,
    impedance: String,
    joined: Option<String>,
    region: &'static str,
    note: String,
}

fn generate_row(id: u32, start: NaiveDate, rng: &mut StdRng) -> SampleRow {
    let regions = ["north", "south", "east", "west"];

    SampleRow {
        id,
        active: rng.gen_bool(0.9).then(|| rng.gen_bool(0.5)),
        amount: rng
            .gen_bool(0.95)
            .then(|| (rng.gen_range(1.0..500.0_f64) * 100.0).round() / 100.0),
        quantity: rng.gen_bool(0.9).then(|| rng.gen_range(0..50)),
        impedance: format!(
            "{:.1}{:+.1}j",
            rng.gen_range(0.0..10.0_f64),
            rng.gen_range(-5.0..5.0_f64)
        ),
        joined: rng
            .gen_bool(0.97)
            .then(|| (start + Duration::days(rng.gen_range(0..700))).to_string()),
        region: regions[rng.gen_range(0..regions.len())],
        note: format!("customer-{id:05}-{}", rng.gen_range(1000..9999)),
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_data.csv".to_string());
    let rows: u32 = match args.next() {
        Some(n) => n.parse().context("row count must be a positive integer")?,
        None => 250,
    };

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("start date")?;
    let mut rng = StdRng::seed_from_u64(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "id", "active", "amount", "quantity", "impedance", "joined", "region", "note",
    ])?;

    for id in 1..=rows {
        let row = generate_row(id, start, &mut rng);
        writer.write_record([
            row.id.to_string(),
            row.active.map(|b| b.to_string()).unwrap_or_default(),
            row.amount.map(|a| a.to_string()).unwrap_or_default(),
            row.quantity.map(|q| q.to_string()).unwrap_or_default(),
            row.impedance,
            row.joined.unwrap_or_default(),
            row.region.to_string(),
            row.note,
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
