use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
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

    fn pick_weighted(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        let mut target = (self.next_f64() * total as f64) as u32;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Region, capital coordinates, relative accident volume.
    let regions: [(&str, f64, f64, u32); 6] = [
        ("SP", -23.55, -46.63, 30),
        ("MG", -19.92, -43.94, 22),
        ("PR", -25.43, -49.27, 16),
        ("RJ", -22.91, -43.17, 14),
        ("RS", -30.03, -51.23, 10),
        ("BA", -12.97, -38.50, 8),
    ];

    // The dashboard covers the last six months of data.
    let months = ["Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho"];

    // Ranked roughly like the real cause distribution.
    let causes: [(&str, u32); 7] = [
        ("Falta de atenção", 28),
        ("Excesso de velocidade", 22),
        ("Ingestão de álcool", 14),
        ("Ultrapassagem indevida", 12),
        ("Chuva", 11),
        ("Defeito mecânico", 8),
        ("Animais na pista", 5),
    ];

    // Accident volume per hour of day, peaking at the commute windows.
    const HOUR_WEIGHTS: [u32; 24] = [
        3, 2, 2, 2, 3, 5, 9, 14, 12, 8, 7, 8, 9, 8, 8, 9, 11, 14, 16, 12, 8, 6, 5, 4,
    ];

    let n_records = 5_000;
    let mut uf_col: Vec<String> = Vec::with_capacity(n_records);
    let mut municipality_col: Vec<String> = Vec::with_capacity(n_records);
    let mut month_col: Vec<String> = Vec::with_capacity(n_records);
    let mut time_col: Vec<String> = Vec::with_capacity(n_records);
    let mut cause_col: Vec<String> = Vec::with_capacity(n_records);
    let mut deaths_col: Vec<i64> = Vec::with_capacity(n_records);
    let mut lat_col: Vec<Option<f64>> = Vec::with_capacity(n_records);
    let mut lon_col: Vec<Option<f64>> = Vec::with_capacity(n_records);

    let region_weights: Vec<u32> = regions.iter().map(|r| r.3).collect();
    let cause_weights: Vec<u32> = causes.iter().map(|c| c.1).collect();

    for _ in 0..n_records {
        let (uf, lat, lon, _) = regions[rng.pick_weighted(&region_weights)];
        let month = months[(rng.next_f64() * months.len() as f64) as usize % months.len()];
        let (cause, _) = causes[rng.pick_weighted(&cause_weights)];

        let hour = rng.pick_weighted(&HOUR_WEIGHTS);
        let minute = (rng.next_f64() * 60.0) as u32 % 60;

        // Fatalities are rare: most accidents have none.
        let roll = rng.next_f64();
        let deaths: i64 = if roll < 0.92 {
            0
        } else if roll < 0.985 {
            1
        } else {
            2 + (rng.next_f64() * 3.0) as i64
        };

        // A few rows were never geocoded.
        let (latitude, longitude) = if rng.next_f64() < 0.05 {
            (None, None)
        } else {
            (
                Some(lat + (rng.next_f64() - 0.5) * 3.0),
                Some(lon + (rng.next_f64() - 0.5) * 3.0),
            )
        };

        uf_col.push(uf.to_string());
        municipality_col.push(format!("{uf} - trecho BR"));
        month_col.push(month.to_string());
        time_col.push(format!("{hour:02}:{minute:02}:00"));
        cause_col.push(cause.to_string());
        deaths_col.push(deaths);
        lat_col.push(latitude);
        lon_col.push(longitude);
    }

    // Build Arrow arrays
    let uf_array = StringArray::from(uf_col.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let municipality_array = StringArray::from(
        municipality_col
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>(),
    );
    let month_array = StringArray::from(month_col.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let time_array = StringArray::from(time_col.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let cause_array = StringArray::from(cause_col.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let deaths_array = Int64Array::from(deaths_col);
    let lat_array = Float64Array::from(lat_col);
    let lon_array = Float64Array::from(lon_col);

    let schema = Arc::new(Schema::new(vec![
        Field::new("uf", DataType::Utf8, false),
        Field::new("municipio", DataType::Utf8, false),
        Field::new("mes", DataType::Utf8, false),
        Field::new("horario", DataType::Utf8, false),
        Field::new("causa_acidente", DataType::Utf8, false),
        Field::new("mortos", DataType::Int64, false),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(uf_array),
            Arc::new(municipality_array),
            Arc::new(month_array),
            Arc::new(time_array),
            Arc::new(cause_array),
            Arc::new(deaths_array),
            Arc::new(lat_array),
            Arc::new(lon_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "accidents_sample.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_records} accident records to {output_path}");
}
