//! `imgfscmd`: the local command-line interpreter for imgFS core commands
//! (spec.md §6 "CLI surface"). One subcommand per operation, each opening
//! the store, running the operation, and closing the store before
//! returning; errors map to the stable exit codes of spec.md §7.

use clap::{Parser, Subcommand};
use imgfs::error::{ImgFsError, Result};
use imgfs::ops::{self, CreateOptions, ListMode, MAX_SMALL_RES, MAX_THUMB_RES};
use imgfs::store::{Resolution, Store};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imgfscmd", about = "imgFS command line interpreter", disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// list imgFS content.
    List { file: PathBuf },
    /// create a new imgFS.
    Create {
        file: PathBuf,
        /// `-max_files <N>`, `-thumb_res <W> <H>`, `-small_res <W> <H>`.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        opts: Vec<String>,
    },
    /// read an image from the imgFS and save it to a file.
    Read {
        file: PathBuf,
        img_id: String,
        /// default resolution is "original".
        resolution: Option<String>,
    },
    /// insert a new image in the imgFS.
    Insert {
        file: PathBuf,
        img_id: String,
        source_image_path: PathBuf,
    },
    /// delete image imgID from imgFS.
    Delete { file: PathBuf, img_id: String },
    /// displays the help text.
    Help,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::List { file } => do_list(&file),
        Command::Create { file, opts } => do_create(&file, &opts),
        Command::Read { file, img_id, resolution } => do_read(&file, &img_id, resolution.as_deref()),
        Command::Insert { file, img_id, source_image_path } => do_insert(&file, &img_id, &source_image_path),
        Command::Delete { file, img_id } => do_delete(&file, &img_id),
        Command::Help => {
            print_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(err.exit_code());
    }
}

fn print_help() {
    println!("imgfscmd [COMMAND] [ARGUMENTS]");
    println!("  help: displays this help.");
    println!("  list <imgFS_filename>: list imgFS content.");
    println!("  create <imgFS_filename> [options]: create a new imgFS.");
    println!("      options are:");
    println!("          -max_files <MAX_FILES>: maximum number of files.");
    println!("                                  default value is {}", ops::DEFAULT_MAX_FILES);
    println!("          -thumb_res <X_RES> <Y_RES>: resolution for thumbnail images.");
    println!(
        "                                  default value is {0}x{0}, maximum value is {1}x{1}",
        ops::DEFAULT_THUMB_RES,
        MAX_THUMB_RES
    );
    println!("          -small_res <X_RES> <Y_RES>: resolution for small images.");
    println!(
        "                                  default value is {0}x{0}, maximum value is {1}x{1}",
        ops::DEFAULT_SMALL_RES,
        MAX_SMALL_RES
    );
    println!("  read <imgFS_filename> <imgID> [original|orig|thumbnail|thumb|small]:");
    println!("      read an image from the imgFS and save it to a file.");
    println!("      default resolution is \"original\".");
    println!("  insert <imgFS_filename> <imgID> <filename>: insert a new image in the imgFS.");
    println!("  delete <imgFS_filename> <imgID>: delete image imgID from imgFS.");
}

fn do_list(file: &PathBuf) -> Result<()> {
    let store = Store::open(file, false)?;
    print!("{}", ops::list(&store, ListMode::Stdout));
    store.close();
    Ok(())
}

/// Manually scans `-max_files`/`-thumb_res`/`-small_res` tokens, mirroring
/// the original's `do_create_cmd` argv loop rather than clap's `--long`
/// convention (the source's options are single-dash).
fn do_create(file: &PathBuf, opts: &[String]) -> Result<()> {
    let mut create_opts = CreateOptions::default();

    let mut i = 0;
    while i < opts.len() {
        match opts[i].as_str() {
            "-max_files" => {
                let value = opts.get(i + 1).ok_or(ImgFsError::NotEnoughArguments)?;
                create_opts.max_files = value.parse().map_err(|_| ImgFsError::MaxFiles)?;
                if create_opts.max_files == 0 {
                    return Err(ImgFsError::MaxFiles);
                }
                i += 2;
            }
            "-thumb_res" => {
                let w = opts.get(i + 1).ok_or(ImgFsError::NotEnoughArguments)?;
                let h = opts.get(i + 2).ok_or(ImgFsError::NotEnoughArguments)?;
                create_opts.thumb_res = (
                    w.parse().map_err(|_| ImgFsError::Resolutions)?,
                    h.parse().map_err(|_| ImgFsError::Resolutions)?,
                );
                i += 3;
            }
            "-small_res" => {
                let w = opts.get(i + 1).ok_or(ImgFsError::NotEnoughArguments)?;
                let h = opts.get(i + 2).ok_or(ImgFsError::NotEnoughArguments)?;
                create_opts.small_res = (
                    w.parse().map_err(|_| ImgFsError::Resolutions)?,
                    h.parse().map_err(|_| ImgFsError::Resolutions)?,
                );
                i += 3;
            }
            _ => return Err(ImgFsError::InvalidArgument),
        }
    }

    let store = ops::create(file, create_opts)?;
    store.close();
    Ok(())
}

fn do_read(file: &PathBuf, img_id: &str, resolution: Option<&str>) -> Result<()> {
    let resolution = match resolution {
        Some(s) => Resolution::parse(s).ok_or(ImgFsError::Resolutions)?,
        None => Resolution::Orig,
    };

    let mut store = Store::open(file, true)?;
    let bytes = ops::read(&mut store, img_id, resolution)?;
    store.close();

    let suffix = match resolution {
        Resolution::Thumb => "thumb",
        Resolution::Small => "small",
        Resolution::Orig => "orig",
    };
    let out_name = format!("{}_{}.jpg", img_id, suffix);
    std::fs::write(&out_name, &bytes)?;
    Ok(())
}

fn do_insert(file: &PathBuf, img_id: &str, source_image_path: &PathBuf) -> Result<()> {
    let bytes = std::fs::read(source_image_path)?;
    let mut store = Store::open(file, true)?;
    let result = ops::insert(&mut store, img_id, &bytes);
    store.close();
    result
}

fn do_delete(file: &PathBuf, img_id: &str) -> Result<()> {
    let mut store = Store::open(file, true)?;
    let result = ops::delete(&mut store, img_id);
    store.close();
    result
}
