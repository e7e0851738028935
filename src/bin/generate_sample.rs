use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Builder, Int64Builder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Brand, base price for a new bike (LKR), bike types it sells.
const BRANDS: [(&str, f64, &[&str]); 7] = [
    ("Bajaj", 650_000.0, &["Motorbike"]),
    ("Hero", 450_000.0, &["Motorbike", "Scooter"]),
    ("Honda", 900_000.0, &["Motorbike", "Scooter"]),
    ("Kawasaki", 2_400_000.0, &["Motorbike"]),
    ("Suzuki", 800_000.0, &["Motorbike", "Scooter"]),
    ("TVS", 500_000.0, &["Motorbike", "Scooter", "E-Bike"]),
    ("Yamaha", 1_100_000.0, &["Motorbike", "Scooter"]),
];

const LOCATIONS: [&str; 6] = ["Colombo", "Gampaha", "Kandy", "Kurunegala", "Galle", "Jaffna"];

struct Row {
    brand: String,
    bike_type: String,
    year: i64,
    price: Option<f64>,
    mileage: i64,
    location: String,
}

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<Row> {
    (0..n)
        .map(|_| {
            let (brand, base, types) = *rng.pick(&BRANDS);
            let year = 1998 + (rng.next_f64() * 26.0) as i64;
            let age = (2023 - year) as f64;
            // Depreciation with noise, rounded to the nearest 5,000.
            let raw = base * 0.9_f64.powf(age) * (0.8 + 0.4 * rng.next_f64());
            let price = ((raw / 5_000.0).round() * 5_000.0).max(25_000.0);

            Row {
                brand: brand.to_string(),
                bike_type: rng.pick(types).to_string(),
                year,
                // Roughly one listing in fifty says "negotiable" instead of a price.
                price: (rng.next_f64() > 0.02).then_some(price),
                mileage: ((age + 0.5) * (4_000.0 + 8_000.0 * rng.next_f64())) as i64,
                location: rng.pick(&LOCATIONS).to_string(),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["Brand", "Bike Type", "Year", "Price", "Mileage (km)", "Location"])?;
    for row in rows {
        let price = row.price.map(|p| format!("{p:.0}")).unwrap_or_default();
        writer.write_record([
            row.brand.as_str(),
            row.bike_type.as_str(),
            &row.year.to_string(),
            &price,
            &row.mileage.to_string(),
            row.location.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<RecordBatch> {
    let mut years = Int64Builder::new();
    let mut prices = Float64Builder::new();
    let mut mileages = Int64Builder::new();
    for row in rows {
        years.append_value(row.year);
        prices.append_option(row.price);
        mileages.append_value(row.mileage);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Brand", DataType::Utf8, false),
        Field::new("Bike Type", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Price", DataType::Float64, true),
        Field::new("Mileage (km)", DataType::Int64, false),
        Field::new("Location", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.brand.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.bike_type.as_str()))),
            Arc::new(years.finish()),
            Arc::new(prices.finish()),
            Arc::new(mileages.finish()),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.location.as_str()))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(batch)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 2_000);

    let csv_path = "cleaned_bike_data.csv";
    let parquet_path = "cleaned_bike_data.parquet";
    write_csv(&rows, csv_path)?;
    let batch = write_parquet(&rows, parquet_path)?;

    arrow::util::pretty::print_batches(&[batch.slice(0, 5)]).context("printing preview")?;
    println!(
        "Wrote {} listings to {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
