// Dry run: print the ffmpeg command lines for both stages without running them

use std::path::{Path, PathBuf};

use photo_slideshow::{
    composition::{composer::{build_sequence_request, ResolvedComposition}, mixer::build_mix_request},
    config::Config,
    filter::FilterGraphSpec,
    media::{Dimensions, Stage},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let width: u32 = args.next().map(|w| w.parse::<u32>()).transpose()?.unwrap_or(1280);
    let height: u32 = args.next().map(|h| h.parse::<u32>()).transpose()?.unwrap_or(720);

    let config = Config::default();
    let work_dir = PathBuf::from("./slideshow_output/dry-run");

    println!("🎬 Photo-Slideshow dry run ({}x{})", width, height);

    let resolved = ResolvedComposition {
        frames: vec![PathBuf::from("photo_1.jpg"), PathBuf::from("photo_2.jpg")],
        graph: FilterGraphSpec::for_canvas(
            Dimensions::new(width, height),
            config.composition.zoom_effect,
            config.composition.fade_effect,
        ),
        frame_duration: config.composition.frame_duration,
    };

    let sequence_output = work_dir.join(Stage::Sequence.output_file_name());
    let sequence = build_sequence_request(
        &resolved,
        &config.encoding,
        config.composition.silent_audio_track,
        &work_dir.join("image_list.txt"),
        sequence_output.clone(),
    );

    println!("\n1. {}:", Stage::Sequence);
    println!("   {} {}", config.engine.program, sequence.to_args().join(" "));

    let mix = build_mix_request(
        &sequence_output,
        Path::new("music.mp3"),
        config.mix.volume,
        &config.encoding,
        work_dir.join(Stage::Mix.output_file_name()),
    );

    println!("\n2. {}:", Stage::Mix);
    println!("   {} {}", config.engine.program, mix.to_args().join(" "));

    Ok(())
}
