use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Write a synthetic Spotify playlist/track table for trying out the dashboard.
#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "sample_spotify_data.csv")]
    output: PathBuf,

    /// Number of playlists to generate
    #[arg(long, default_value_t = 40)]
    playlists: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Serialize)]
struct SampleRow {
    artist_name: String,
    name: String,
    track_name: String,
    release_year: i64,
    track_duration_m: f64,
    num_followers: i64,
}

const ARTISTS: [&str; 12] = [
    "Drake",
    "Rihanna",
    "Kanye West",
    "Kendrick Lamar",
    "Coldplay",
    "Taylor Swift",
    "The Weeknd",
    "Ed Sheeran",
    "Beyoncé",
    "Daft Punk",
    "Arctic Monkeys",
    "Adele",
];

const PLAYLIST_MOODS: [&str; 8] = [
    "Chill", "Workout", "Throwbacks", "Party", "Road Trip", "Focus", "Summer", "Sad",
];

const TITLE_WORDS: [&str; 10] = [
    "Night", "Fire", "Heart", "Gold", "Dream", "Ocean", "City", "Ghost", "Love", "Echo",
];

fn generate(args: &Args) -> Vec<SampleRow> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    // A fixed catalogue so tracks repeat across playlists.
    let catalogue: Vec<(String, String, i64, f64)> = (0..120)
        .map(|i| {
            let artist = ARTISTS[i % ARTISTS.len()];
            let first = TITLE_WORDS[rng.gen_range(0..TITLE_WORDS.len())];
            let second = TITLE_WORDS[rng.gen_range(0..TITLE_WORDS.len())];
            let year = rng.gen_range(2005..=2017);
            let duration = (rng.gen_range(2.2..6.5_f64) * 100.0).round() / 100.0;
            (artist.to_string(), format!("{first} {second}"), year, duration)
        })
        .collect();

    let mut rows = Vec::new();
    for p in 0..args.playlists {
        let mood = PLAYLIST_MOODS[p % PLAYLIST_MOODS.len()];
        let name = format!("{mood} #{}", p / PLAYLIST_MOODS.len() + 1);
        // Follower counts are heavy-tailed: most playlists have a handful.
        let followers = (10f64.powf(rng.gen_range(0.0..4.0))) as i64;

        let size = rng.gen_range(5..=30);
        for (artist, track, year, duration) in catalogue.choose_multiple(&mut rng, size) {
            rows.push(SampleRow {
                artist_name: artist.clone(),
                name: name.clone(),
                track_name: track.clone(),
                release_year: *year,
                track_duration_m: *duration,
                num_followers: followers,
            });
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("artist_name", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("track_name", DataType::Utf8, false),
        Field::new("release_year", DataType::Int64, false),
        Field::new("track_duration_m", DataType::Float64, false),
        Field::new("num_followers", DataType::Int64, false),
    ]));

    let strings = |f: fn(&SampleRow) -> &str| -> StringArray {
        StringArray::from(rows.iter().map(f).collect::<Vec<_>>())
    };

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(strings(|r| r.artist_name.as_str())),
            Arc::new(strings(|r| r.name.as_str())),
            Arc::new(strings(|r| r.track_name.as_str())),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.release_year).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.track_duration_m).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.num_followers).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let rows = generate(&args);

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        write_parquet(&args.output, &rows)?;
    } else {
        write_csv(&args.output, &rows)?;
    }

    println!(
        "Wrote {} rows ({} playlists) to {}",
        rows.len(),
        args.playlists,
        args.output.display()
    );
    Ok(())
}
