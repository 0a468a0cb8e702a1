use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Float64Builder, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 2_000;
const CSV_PATH: &str = "airbnb.csv";
const PARQUET_PATH: &str = "airbnb.parquet";

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Neighbourhood group → its neighbourhoods and a price multiplier.
const AREAS: &[(&str, &[&str], f64)] = &[
    ("Centro", &["Sol", "Cortes", "Palacio", "Embajadores"], 1.3),
    ("Salamanca", &["Recoletos", "Goya", "Lista"], 1.4),
    ("Retiro", &["Ibiza", "Jerónimos", "Pacífico"], 1.1),
    ("Tetuán", &["Bellas Vistas", "Cuatro Caminos"], 0.8),
    ("Vallecas", &["Numancia", "San Diego"], 0.7),
];

/// Room type → median nightly price.
const ROOMS: &[(&str, f64)] = &[
    ("Entire home/apt", 95.0),
    ("Private room", 38.0),
    ("Shared room", 22.0),
    ("Hotel room", 120.0),
];

const ADJECTIVES: &[&str] = &["Sunny", "Cosy", "Bright", "Quiet", "Modern", "Charming"];
const NOUNS: &[&str] = &["loft", "studio", "flat", "attic", "room", "suite"];

#[derive(Debug, Serialize)]
struct SampleRow {
    id: i64,
    name: String,
    host_id: i64,
    neighbourhood_group: Option<String>,
    neighbourhood: String,
    latitude: f64,
    longitude: f64,
    room_type: Option<String>,
    price: f64,
    number_of_reviews: i64,
    reviews_per_month: Option<f64>,
    calculated_host_listings_count: i64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<SampleRow> {
    (0..ROWS)
        .map(|i| {
            let (group, neighbourhoods, multiplier) = *rng.pick(AREAS);
            let neighbourhood = *rng.pick(neighbourhoods);
            let (room, median) = *rng.pick(ROOMS);

            // Log-normal prices around the room median.
            let price = (median * multiplier * rng.gauss(0.0, 0.45).exp()).round();

            let number_of_reviews = rng.gauss(1.5, 1.4).exp().floor().max(0.0) as i64;
            let reviews_per_month = (number_of_reviews > 0 && !rng.chance(0.05)).then(|| {
                let months = rng.gauss(24.0, 8.0).max(1.0);
                (number_of_reviews as f64 / months * 100.0).round() / 100.0
            });

            SampleRow {
                id: 10_000 + i as i64,
                name: format!("{} {} in {neighbourhood}", rng.pick(ADJECTIVES), rng.pick(NOUNS)),
                host_id: 500 + (rng.next_u64() % 700) as i64,
                // A few rows with missing categories exercise "Unknown".
                neighbourhood_group: (!rng.chance(0.01)).then(|| group.to_string()),
                neighbourhood: neighbourhood.to_string(),
                latitude: 40.42 + rng.gauss(0.0, 0.02),
                longitude: -3.70 + rng.gauss(0.0, 0.02),
                room_type: (!rng.chance(0.01)).then(|| room.to_string()),
                price,
                number_of_reviews,
                reviews_per_month,
                calculated_host_listings_count: 1 + rng.gauss(0.0, 1.2).exp().floor() as i64,
            }
        })
        .collect()
}

fn write_csv(rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("host_id", DataType::Int64, false),
        Field::new("neighbourhood_group", DataType::Utf8, true),
        Field::new("neighbourhood", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("room_type", DataType::Utf8, true),
        Field::new("price", DataType::Float64, false),
        Field::new("number_of_reviews", DataType::Int64, false),
        Field::new("reviews_per_month", DataType::Float64, true),
        Field::new("calculated_host_listings_count", DataType::Int64, false),
    ]));

    let mut rates = Float64Builder::with_capacity(rows.len());
    for row in rows {
        rates.append_option(row.reviews_per_month);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.host_id))),
        Arc::new(StringArray::from_iter(rows.iter().map(|r| r.neighbourhood_group.as_deref()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.neighbourhood.as_str()))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.latitude))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.longitude))),
        Arc::new(StringArray::from_iter(rows.iter().map(|r| r.room_type.as_deref()))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.price))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.number_of_reviews))),
        Arc::new(rates.finish()),
        Arc::new(Int64Array::from_iter_values(
            rows.iter().map(|r| r.calculated_host_listings_count),
        )),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!("Wrote {} listings to {CSV_PATH} and {PARQUET_PATH}", rows.len());
    Ok(())
}
