mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gcflag::{FitMode, PixelGrid, SpaceRaceData, fit};
use image::ImageReader;
use utils::{Assume, exists_decision, fit_mode, mode_description};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the Minecraft world folder
    world: PathBuf,

    #[command(subcommand)]
    command: Option<Subcommands>,

    /// Overwrite output files
    #[arg(short = 'y', long = "overwrite", conflicts_with = "assumeno")]
    assumeyes: bool,

    /// Do not overwrite output files
    #[arg(short = 'n', long = "preserve", conflicts_with = "assumeyes")]
    assumeno: bool,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// List all space races in the world (the default)
    List,

    /// Export a space race flag to an image file
    Export(ExportArgs),

    /// Import an image as a space race flag
    Import(ImportArgs),
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Space race index, as shown by `list`
    index: usize,

    /// Output image path, any format supported by `image`
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ImportArgs {
    /// Space race index, as shown by `list`
    index: usize,

    /// Input image file of any type supported by `image`
    #[arg(short, long)]
    image: PathBuf,

    /// Fitting policy for images that do not match the flag size
    ///
    /// Valid values:
    ///  - stretch: resize to the flag size, ignoring aspect ratio
    ///  - pad: keep aspect ratio, center on a black canvas
    #[arg(short, long, default_value = "stretch", value_parser = fit_mode, verbatim_doc_comment)]
    mode: FitMode,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let assume = if args.assumeyes {
        Some(Assume::Yes)
    } else if args.assumeno {
        Some(Assume::No)
    } else {
        None
    };

    let mut save = SpaceRaceData::open(&args.world)?;

    match args.command.unwrap_or(Subcommands::List) {
        Subcommands::List => list(&save),
        Subcommands::Export(a) => export(&save, a, assume),
        Subcommands::Import(a) => import(&mut save, a),
    }
}

fn list(save: &SpaceRaceData) -> Result<()> {
    if save.races().is_empty() {
        println!("No space races found in this world.");
        return Ok(());
    }

    println!("{:=<60}", "");
    println!("SPACE RACES");
    println!("{:=<60}", "");
    for (index, race) in save.races().iter().enumerate() {
        let players = join_or_none(race.players());
        let bodies = join_or_none(
            race.celestial_bodies()
                .into_iter()
                .map(|(name, _)| name)
                .collect(),
        );
        let size = match race.flag_size() {
            Some((width, height)) => format!("{width}x{height}"),
            None => "none".to_owned(),
        };
        let [r, g, b] = race.team_color();

        println!();
        println!("[{index}] Space Race #{}: {}", race.space_race_id(), race.team_name());
        println!("  Players: {players}");
        println!("  Flag Size: {size}");
        println!("  Team Color: RGB({r:.2}, {g:.2}, {b:.2})");
        println!("  Celestial Bodies Visited: {bodies}");
        println!("  Ticks Spent: {}", race.ticks_spent());
    }
    println!();

    Ok(())
}

fn export(save: &SpaceRaceData, args: ExportArgs, assume: Option<Assume>) -> Result<()> {
    let race = save.race(args.index)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("flag_race_{}.png", args.index)));

    if output.try_exists()? && !exists_decision("Output", "Overwrite", &output, assume) {
        return Ok(());
    }

    let flag = race
        .flag()
        .with_context(|| format!("space race {} has no usable flag", args.index))?;
    flag.to_image().save(&output)?;

    println!("Flag exported to {}", output.display());

    Ok(())
}

fn import(save: &mut SpaceRaceData, args: ImportArgs) -> Result<()> {
    if !args.image.try_exists()? {
        bail!("Input file {:?} does not exist", args.image);
    }

    let (width, height) = save
        .race(args.index)?
        .flag_size()
        .with_context(|| format!("space race {} declares no flag size", args.index))?;

    let decoded = ImageReader::open(&args.image)?.decode()?.into_rgb8();
    let fitted = fit(&PixelGrid::from_image(&decoded), width, height, args.mode)?;

    let (id, name) = {
        let race = save.race_mut(args.index)?;
        race.set_flag(&fitted)?;
        (race.space_race_id(), race.team_name().to_owned())
    };
    save.save()?;

    println!(
        "Flag imported from {} using mode: {}",
        args.image.display(),
        mode_description(args.mode)
    );
    println!("Applied to Space Race #{id}: {name}");
    println!("Space race data saved to {}", save.path().display());

    Ok(())
}

fn join_or_none(items: Vec<String>) -> String {
    if items.is_empty() {
        "None".to_owned()
    } else {
        items.join(", ")
    }
}
