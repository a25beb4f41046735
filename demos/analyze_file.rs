//! Example: Analyze a WAV file frame by frame
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--frame S] [--shift S] [--min-hz F] [--max-hz F] [--json] <file.wav>
//!
//! Prints one line per frame: time, autocorrelation pitch, SHS melody note,
//! chord and loudness.

mod wav;

use std::env;

use tonal_dsp::features::pitch::note_name;
use tonal_dsp::{analyze_audio, AnalysisConfig};

fn parse_value(args: &mut Vec<String>, flag: &str) -> Result<f32, Box<dyn std::error::Error>> {
    if args.is_empty() {
        return Err(format!("{} requires a value", flag).into());
    }
    Ok(args.remove(0).parse::<f32>()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut config = AnalysisConfig::default();
    let mut json = false;
    let mut path: Option<String> = None;

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--frame" => config.frame_duration = parse_value(&mut args, "--frame")?,
            "--shift" => config.shift_duration = parse_value(&mut args, "--shift")?,
            "--min-hz" => config.min_frequency_hz = parse_value(&mut args, "--min-hz")?,
            "--max-hz" => config.max_frequency_hz = Some(parse_value(&mut args, "--max-hz")?),
            "--json" => json = true,
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_file [--frame S] [--shift S] [--min-hz F] [--max-hz F] [--json] <file.wav>\n\
                     \n\
                     --frame S    Frame duration in seconds (default: 0.2)\n\
                     --shift S    Frame shift in seconds (default: 0.025)\n\
                     --min-hz F   Lowest reported pitch\n\
                     --max-hz F   Highest reported pitch (default: Nyquist)\n\
                     --json       Emit the full result as JSON\n"
                );
                return Ok(());
            }
            _ => path = Some(a),
        }
    }

    let Some(path) = path else {
        eprintln!("ERROR: Provide a WAV file path. Use --help for usage.");
        std::process::exit(2);
    };

    let (samples, sample_rate) = wav::load_wav(&path)?;
    let result = analyze_audio(&samples, sample_rate, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("time\tpitch_hz\tmelody\tchord\tloudness_db");
    for frame in &result.frames {
        let pitch = frame
            .pitch
            .map(|p| format!("{:.1}", p.frequency_hz))
            .unwrap_or_else(|| "-".to_string());
        let melody = frame
            .melody
            .map(|m| note_name(m.note))
            .unwrap_or_else(|| "-".to_string());
        let chord = frame
            .chord
            .map(|c| c.name())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:.3}\t{}\t{}\t{}\t{:.1}",
            frame.time, pitch, melody, chord, frame.loudness_db
        );
    }

    eprintln!(
        "{} frames, {:.2} s at {} Hz, {:.1} ms",
        result.metadata.frame_count,
        result.metadata.duration_seconds,
        result.metadata.sample_rate,
        result.metadata.processing_time_ms
    );

    Ok(())
}
