use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use rusty_play::data::model::RawAppRecord;

const ROWS: usize = 300;

const CATEGORIES: [(&str, &[&str]); 6] = [
    ("GAME", &["Action", "Arcade", "Puzzle", "Racing"]),
    ("TOOLS", &["Tools"]),
    ("FAMILY", &["Casual", "Education", "Pretend Play"]),
    ("ART_AND_DESIGN", &["Art & Design", "Creativity"]),
    ("PRODUCTIVITY", &["Productivity"]),
    ("COMMUNICATION", &["Communication"]),
];

const CONTENT_RATINGS: [&str; 4] = ["Everyone", "Teen", "Mature 17+", "Everyone 10+"];

const INSTALLS: [&str; 8] = [
    "100+",
    "1,000+",
    "10,000+",
    "100,000+",
    "1,000,000+",
    "10,000,000+",
    "100,000,000+",
    "1,000,000,000+",
];

const NAME_PARTS: [&str; 10] = [
    "Photo", "Pixel", "Quick", "Smart", "Super", "Tiny", "Word", "Zen", "Cloud", "Story",
];
const NAME_SUFFIXES: [&str; 6] = ["Editor", "Quest", "Notes", "Chat", "Camera", "Launcher"];

fn random_size(rng: &mut StdRng) -> String {
    match rng.gen_range(0..10) {
        0 => "Varies with device".to_string(),
        1 => format!("{}k", rng.gen_range(100..1000)),
        _ => format!("{:.1}M", rng.gen_range(1.0..120.0)),
    }
}

fn random_rating(rng: &mut StdRng) -> String {
    if rng.gen_bool(0.1) {
        "NaN".to_string()
    } else {
        format!("{:.1}", rng.gen_range(1.0..5.0))
    }
}

fn random_record(rng: &mut StdRng, row: usize, newest: NaiveDate) -> RawAppRecord {
    let (category, genres) = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
    let genre_count = rng.gen_range(1..=genres.len().min(2));
    let picked: Vec<&str> = genres.choose_multiple(rng, genre_count).copied().collect();

    let name = format!(
        "{} {} {}",
        NAME_PARTS[rng.gen_range(0..NAME_PARTS.len())],
        NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())],
        row % 250
    );

    let updated = newest - Duration::days(rng.gen_range(0..1500));

    RawAppRecord {
        app: Some(name),
        category: Some(category.to_string()),
        rating: Some(random_rating(rng)),
        reviews: Some(rng.gen_range(0..5_000_000u64).to_string()),
        size: Some(random_size(rng)),
        installs: Some(INSTALLS[rng.gen_range(0..INSTALLS.len())].to_string()),
        app_type: Some(if rng.gen_bool(0.9) { "Free" } else { "Paid" }.to_string()),
        content_rating: Some(CONTENT_RATINGS[rng.gen_range(0..CONTENT_RATINGS.len())].to_string()),
        genres: Some(picked.join(";")),
        last_updated: Some(updated.format("%B %-d, %Y").to_string()),
    }
}

fn string_column(records: &[RawAppRecord], get: impl Fn(&RawAppRecord) -> &Option<String>) -> StringArray {
    records.iter().map(|r| get(r).as_deref()).collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(42);
    let newest = NaiveDate::from_ymd_opt(2018, 8, 8).context("invalid base date")?;

    let records: Vec<RawAppRecord> = (0..ROWS)
        .map(|row| random_record(&mut rng, row, newest))
        .collect();

    let columns: [(&str, StringArray); 10] = [
        ("App", string_column(&records, |r| &r.app)),
        ("Category", string_column(&records, |r| &r.category)),
        ("Rating", string_column(&records, |r| &r.rating)),
        ("Reviews", string_column(&records, |r| &r.reviews)),
        ("Size", string_column(&records, |r| &r.size)),
        ("Installs", string_column(&records, |r| &r.installs)),
        ("Type", string_column(&records, |r| &r.app_type)),
        ("ContentRating", string_column(&records, |r| &r.content_rating)),
        ("Genres", string_column(&records, |r| &r.genres)),
        ("Last Updated", string_column(&records, |r| &r.last_updated)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns
            .into_iter()
            .map(|(_, array)| Arc::new(array) as ArrayRef)
            .collect(),
    )
    .context("building record batch")?;

    // Write Parquet
    let parquet_path = "sample_apps.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    // Write JSON (same rows, bundled-data layout)
    let json_path = "sample_apps.json";
    let json = serde_json::to_string_pretty(&records).context("serializing JSON")?;
    std::fs::write(json_path, json).context("writing JSON output")?;

    println!("Wrote {ROWS} apps to {parquet_path} and {json_path}");
    Ok(())
}
