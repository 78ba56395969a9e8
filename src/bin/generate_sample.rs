use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One row of the daily file, columns named as in the published dataset.
#[derive(Debug, Serialize)]
struct DayRow {
    instant: i64,
    dteday: String,
    season: i64,
    yr: i64,
    mnth: i64,
    holiday: i64,
    weekday: i64,
    workingday: i64,
    weathersit: i64,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: i64,
    registered: i64,
    cnt: i64,
}

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
}

/// Season code by month: 1 winter, 2 spring, 3 summer, 4 fall.
fn season_of(month: u32) -> i64 {
    match month {
        12 | 1 | 2 => 1,
        3..=5 => 2,
        6..=8 => 3,
        _ => 4,
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<DayRow> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid date");
    let mut rows = Vec::new();

    for i in 0..731u64 {
        let date = start + Days::new(i);
        let yr = (date.year() - 2011) as i64;
        let day_of_year = date.ordinal0() as f64;

        // Warmest in mid-July, coldest in mid-January.
        let phase = 2.0 * std::f64::consts::PI * (day_of_year - 196.0) / 365.0;
        let seasonal = (phase.cos() + 1.0) / 2.0;
        let temp = (0.15 + 0.65 * seasonal + rng.gauss(0.0, 0.05)).clamp(0.05, 0.95);
        let hum = (0.63 + rng.gauss(0.0, 0.14)).clamp(0.2, 0.97);
        let windspeed = (0.19 + rng.gauss(0.0, 0.07)).clamp(0.02, 0.5);

        let weathersit = match rng.next_f64() {
            p if p < 0.63 => 1,
            p if p < 0.97 => 2,
            p if p < 0.995 => 3,
            _ => 4,
        };
        let weekday = date.weekday().num_days_from_sunday() as i64;
        let workingday = i64::from((1..=5).contains(&weekday));
        let weather_penalty = [1.0, 0.85, 0.45, 0.2][weathersit as usize - 1];
        let growth = if yr == 0 { 1.0 } else { 1.6 };

        let casual_base = if workingday == 1 { 500.0 } else { 1400.0 };
        let casual = (casual_base * (0.3 + temp) * weather_penalty * growth
            + rng.gauss(0.0, 80.0))
        .max(0.0) as i64;
        let registered = ((2200.0 + 3000.0 * temp) * weather_penalty * growth
            + rng.gauss(0.0, 250.0))
        .max(0.0) as i64;

        rows.push(DayRow {
            instant: i as i64 + 1,
            dteday: date.format("%Y-%m-%d").to_string(),
            season: season_of(date.month()),
            yr,
            mnth: date.month() as i64,
            holiday: 0,
            weekday,
            workingday,
            weathersit,
            temp,
            atemp: temp * 0.95,
            hum,
            windspeed,
            casual,
            registered,
            cnt: casual + registered,
        });
    }

    rows
}

fn write_csv(rows: &[DayRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[DayRow], path: &str) -> Result<()> {
    let ints = |f: fn(&DayRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(rows.iter().map(f)))
    };
    let floats = |f: fn(&DayRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(rows.iter().map(f)))
    };
    let dates: ArrayRef = Arc::new(StringArray::from_iter_values(
        rows.iter().map(|r| r.dteday.as_str()),
    ));

    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Utf8, false),
        Field::new("season", DataType::Int64, false),
        Field::new("yr", DataType::Int64, false),
        Field::new("weathersit", DataType::Int64, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("hum", DataType::Float64, false),
        Field::new("windspeed", DataType::Float64, false),
        Field::new("casual", DataType::Int64, false),
        Field::new("cnt", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            dates,
            ints(|r| r.season),
            ints(|r| r.yr),
            ints(|r| r.weathersit),
            floats(|r| r.temp),
            floats(|r| r.hum),
            floats(|r| r.windspeed),
            ints(|r| r.casual),
            ints(|r| r.cnt),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "sample_day.csv")?;
    write_parquet(&rows, "sample_day.parquet")?;

    println!(
        "Wrote {} days to sample_day.csv and sample_day.parquet",
        rows.len()
    );
    Ok(())
}
