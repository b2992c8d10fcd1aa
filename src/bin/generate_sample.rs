use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use parquet::arrow::ArrowWriter;

const TRIPS_PER_CITY: usize = 2000;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CHICAGO_STATIONS: [&str; 6] = [
    "Streeter Dr & Grand Ave",
    "Lake Shore Dr & Monroe St",
    "Clinton St & Washington Blvd",
    "Canal St & Adams St",
    "Theater on the Lake",
    "Michigan Ave & Oak St",
];
const NYC_STATIONS: [&str; 6] = [
    "Pershing Square North",
    "E 17 St & Broadway",
    "W 21 St & 6 Ave",
    "West St & Chambers St",
    "8 Ave & W 31 St",
    "Broadway & E 22 St",
];
const WASHINGTON_STATIONS: [&str; 6] = [
    "Columbus Circle / Union Station",
    "Lincoln Memorial",
    "Jefferson Dr & 14th St SW",
    "Massachusetts Ave & Dupont Circle NW",
    "15th & P St NW",
    "Thomas Circle",
];

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

    /// Uniform in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Skewed pick: earlier entries are more popular.
    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let a = self.below(items.len() as u64);
        let b = self.below(items.len() as u64);
        items[a.min(b) as usize]
    }
}

/// One synthetic trip; gender / birth year stay `None` for Washington.
struct SampleTrip {
    start: NaiveDateTime,
    end: NaiveDateTime,
    duration: i64,
    from: String,
    to: String,
    user_type: Option<String>,
    gender: Option<String>,
    birth_year: Option<i64>,
}

fn generate_trips(rng: &mut SimpleRng, stations: &[&str], demographics: bool) -> Vec<SampleTrip> {
    (0..TRIPS_PER_CITY)
        .map(|_| {
            // First half of 2017, commute-heavy hours.
            let month = 1 + rng.below(6) as u32;
            let day = 1 + rng.below(28) as u32;
            let peak = if rng.next_f64() < 0.5 { 8.0 } else { 17.0 };
            let hour = rng.gauss(peak, 2.5).round().clamp(0.0, 23.0) as u32;
            let minute = rng.below(60) as u32;
            let second = rng.below(60) as u32;

            let start = NaiveDate::from_ymd_opt(2017, month, day)
                .and_then(|d| d.and_hms_opt(hour, minute, second))
                .unwrap_or_default();
            let duration = rng.gauss(900.0, 450.0).max(60.0).round() as i64;
            let end = start + Duration::seconds(duration);

            let roll = rng.next_f64();
            let user_type = match roll {
                r if r < 0.78 => Some("Subscriber"),
                r if r < 0.97 => Some("Customer"),
                r if r < 0.99 => Some("Dependent"),
                _ => None,
            };
            let known_rider = demographics && user_type == Some("Subscriber");

            SampleTrip {
                start,
                end,
                duration,
                from: rng.pick(stations).to_string(),
                to: rng.pick(stations).to_string(),
                user_type: user_type.map(str::to_string),
                gender: known_rider
                    .then(|| (if rng.next_f64() < 0.7 { "Male" } else { "Female" }).to_string()),
                birth_year: known_rider.then(|| rng.gauss(1982.0, 11.0).round() as i64),
            }
        })
        .collect()
}

/// CSV with an unnamed leading index column, as the published extracts have.
fn write_csv(path: &Path, trips: &[SampleTrip], demographics: bool) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;

    let mut header = vec![
        "",
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
    ];
    if demographics {
        header.extend(["Gender", "Birth Year"]);
    }
    writer.write_record(&header)?;

    for (i, t) in trips.iter().enumerate() {
        let mut row = vec![
            i.to_string(),
            t.start.format(TIME_FORMAT).to_string(),
            t.end.format(TIME_FORMAT).to_string(),
            t.duration.to_string(),
            t.from.clone(),
            t.to.clone(),
            t.user_type.clone().unwrap_or_default(),
        ];
        if demographics {
            row.push(t.gender.clone().unwrap_or_default());
            // Missing values force a float column upstream.
            row.push(t.birth_year.map(|y| format!("{y}.0")).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, trips: &[SampleTrip]) -> Result<()> {
    let fmt = |ts: &NaiveDateTime| ts.format(TIME_FORMAT).to_string();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Start Time", DataType::Utf8, false),
        Field::new("End Time", DataType::Utf8, false),
        Field::new("Trip Duration", DataType::Int64, false),
        Field::new("Start Station", DataType::Utf8, false),
        Field::new("End Station", DataType::Utf8, false),
        Field::new("User Type", DataType::Utf8, true),
        Field::new("Gender", DataType::Utf8, true),
        Field::new("Birth Year", DataType::Float64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(trips.iter().map(|t| fmt(&t.start)))),
        Arc::new(StringArray::from_iter_values(trips.iter().map(|t| fmt(&t.end)))),
        Arc::new(Int64Array::from_iter_values(trips.iter().map(|t| t.duration))),
        Arc::new(StringArray::from_iter_values(trips.iter().map(|t| t.from.as_str()))),
        Arc::new(StringArray::from_iter_values(trips.iter().map(|t| t.to.as_str()))),
        Arc::new(trips.iter().map(|t| t.user_type.as_deref()).collect::<StringArray>()),
        Arc::new(trips.iter().map(|t| t.gender.as_deref()).collect::<StringArray>()),
        Arc::new(
            trips
                .iter()
                .map(|t| t.birth_year.map(|y| y as f64))
                .collect::<Float64Array>(),
        ),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let cities: [(&str, &[&str], bool); 3] = [
        ("chicago.csv", &CHICAGO_STATIONS, true),
        ("new_york_city.csv", &NYC_STATIONS, true),
        ("washington.csv", &WASHINGTON_STATIONS, false),
    ];

    for (file_name, stations, demographics) in cities {
        let trips = generate_trips(&mut rng, stations, demographics);
        let path = out_dir.join(file_name);
        write_csv(&path, &trips, demographics)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {} trips to {}", trips.len(), path.display());

        if file_name == "chicago.csv" {
            let path = out_dir.join("chicago.parquet");
            write_parquet(&path, &trips).with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} trips to {}", trips.len(), path.display());
        }
    }

    Ok(())
}
