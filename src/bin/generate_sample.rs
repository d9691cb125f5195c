use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Poisson-ish keyword count around `mean`, never negative.
    fn count(&mut self, mean: f64) -> i64 {
        self.gauss(mean, mean.sqrt().max(1.0)).round().max(0.0) as i64
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (stock code, name, baseline adoption 0..1)
    let companies = [
        ("000001", "Ping An Bank", 0.9),
        ("000002", "Vanke", 0.3),
        ("000063", "ZTE", 0.95),
        ("600000", "SPD Bank", 0.7),
        ("600519", "Kweichow Moutai", 0.15),
        ("601318", "Ping An Insurance", 0.85),
    ];
    let years = 2010..=2022;

    let mut ids: Vec<&str> = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut all_years: Vec<i64> = Vec::new();
    let mut index: Vec<f64> = Vec::new();
    let mut technology: Vec<f64> = Vec::new();
    let mut application: Vec<f64> = Vec::new();
    let mut keyword_cols: [Vec<i64>; 5] = Default::default();

    for &(id, name, adoption) in &companies {
        for year in years.clone() {
            // skip the odd year so histories have gaps
            if rng.next_f64() < 0.08 {
                continue;
            }
            let trend = adoption * (year - 2009) as f64;
            let ai = rng.count(2.0 * trend);
            let big_data = rng.count(3.0 * trend);
            let cloud = rng.count(2.5 * trend);
            let blockchain = rng.count(0.4 * trend * ((year - 2015).max(0) as f64 / 7.0));
            let digital = rng.count(6.0 * trend);

            let tech = ((ai + big_data + cloud + blockchain) as f64).ln_1p() * 10.0;
            let app = (digital as f64).ln_1p() * 10.0;

            ids.push(id);
            names.push(name);
            all_years.push(year);
            technology.push(tech);
            application.push(app);
            index.push(0.5 * tech + 0.5 * app + rng.gauss(0.0, 0.5));
            for (col, v) in keyword_cols
                .iter_mut()
                .zip([ai, big_data, cloud, blockchain, digital])
            {
                col.push(v);
            }
        }
    }

    let n_rows = ids.len();
    let [ai, big_data, cloud, blockchain, digital] = keyword_cols;

    let schema = Arc::new(Schema::new(vec![
        Field::new("company_id", DataType::Utf8, false),
        Field::new("company_name", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("digital_transformation_index", DataType::Float64, false),
        Field::new("technology_dimension", DataType::Float64, false),
        Field::new("application_dimension", DataType::Float64, false),
        Field::new("ai_frequency", DataType::Int64, false),
        Field::new("big_data_frequency", DataType::Int64, false),
        Field::new("cloud_computing_frequency", DataType::Int64, false),
        Field::new("blockchain_frequency", DataType::Int64, false),
        Field::new("digital_technology_frequency", DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(ids)),
        Arc::new(StringArray::from(names)),
        Arc::new(Int64Array::from(all_years)),
        Arc::new(Float64Array::from(index)),
        Arc::new(Float64Array::from(technology)),
        Arc::new(Float64Array::from(application)),
        Arc::new(Int64Array::from(ai)),
        Arc::new(Int64Array::from(big_data)),
        Arc::new(Int64Array::from(cloud)),
        Arc::new(Int64Array::from(blockchain)),
        Arc::new(Int64Array::from(digital)),
    ];

    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_data.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {n_rows} company-year records ({} companies) to {output_path}",
        companies.len()
    );
}
