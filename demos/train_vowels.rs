//! Example: Train the vowel classifier and label a recording
//!
//! Usage:
//!   cargo run --release --example train_vowels -- <training.wav> <t0> <t1> <t2> <t3> <t4> <t5> [--out param.txt] [--test file.wav]
//!
//! The training recording holds the vowels a, i, u, e, o in that order;
//! `t0..t5` are the segment boundaries in seconds. The parameter dump is
//! written to `--out` (default: param.txt). With `--test`, every frame of the
//! second recording is classified.

mod wav;

use std::env;

use tonal_dsp::{AnalysisConfig, VowelTrainer, Waveform};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut out = "param.txt".to_string();
    let mut test: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--out" => {
                if args.is_empty() {
                    return Err("--out requires a value".into());
                }
                out = args.remove(0);
            }
            "--test" => {
                if args.is_empty() {
                    return Err("--test requires a value".into());
                }
                test = Some(args.remove(0));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: train_vowels <training.wav> <t0> <t1> <t2> <t3> <t4> <t5> [--out param.txt] [--test file.wav]"
                );
                return Ok(());
            }
            _ => positional.push(a),
        }
    }

    if positional.len() != 7 {
        eprintln!("ERROR: Provide a WAV file and six boundary times. Use --help for usage.");
        std::process::exit(2);
    }

    let mut boundaries = [0.0f32; 6];
    for (b, s) in boundaries.iter_mut().zip(&positional[1..]) {
        *b = s.parse()?;
    }

    let config = AnalysisConfig::default();
    let (samples, sample_rate) = wav::load_wav(&positional[0])?;
    let training = Waveform::new(samples, sample_rate)?;

    let mut trainer = VowelTrainer::new(&config, sample_rate)?;
    trainer.add_segments(&training, &boundaries)?;
    let classifier = trainer.train()?;
    classifier.model().save(&out)?;
    eprintln!("Wrote {} classes to {}", classifier.model().class_count(), out);

    if let Some(test) = test {
        let (samples, rate) = wav::load_wav(&test)?;
        let waveform = Waveform::new(samples, rate)?;
        for result in classifier.classify_waveform(&waveform)? {
            println!("{:.3}\t{}", result.time, result.vowel.symbol());
        }
    }

    Ok(())
}
