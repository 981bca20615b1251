use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand, ValueEnum};
use eyre::eyre;
use stdset::{constants::SHAPE_ROWS, SpriteSet, ViewMode, Viewer};

use crate::{
    config::{parse_config, parse_config_from_file, Config, ExportFormat, PaletteName, PolicyName},
    modules::{export::export_sprites, thumbnails::thumbnail_sheet},
    source::{step_base_name, DirectorySource},
};

#[derive(Debug, Parser)]
#[command(version, about = "Viewer and converter for STD sprite sets", long_about = None)]
pub struct StdViewCli {
    /// Repeat for more logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Config file. Defaults to stdview.toml next to the binary
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, global = true)]
    pub palette: Option<PaletteName>,
    #[arg(long, value_enum, global = true)]
    pub index_policy: Option<PolicyName>,
    /// 1 to 16
    #[arg(long, global = true)]
    pub zoom: Option<u32>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Args)]
pub struct SetArgs {
    /// Directory holding the file set
    pub dir: PathBuf,
    /// Base name without extension. Defaults to the first set in the directory
    pub base: Option<String>,
    /// Move this many sets forward (or back) from `base`, wrapping around
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub step: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Sprite,
    Grid,
    Layout,
}

impl From<View> for ViewMode {
    fn from(value: View) -> Self {
        match value {
            View::Sprite => ViewMode::Sprite,
            View::Grid => ViewMode::Grid,
            View::Layout => ViewMode::Layout,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lists the sprite sets in a directory
    List { dir: PathBuf },
    /// Prints what a sprite set holds
    Info {
        #[command(flatten)]
        set: SetArgs,
    },
    /// Renders a view to an image file
    Render {
        #[command(flatten)]
        set: SetArgs,
        #[arg(long, value_enum, default_value_t = View::Sprite)]
        view: View,
        /// Render all three views to `<out>_sprite`, `<out>_grid` and `<out>_layout`
        #[arg(long)]
        all: bool,
        #[arg(long, default_value_t = 0)]
        row: usize,
        #[arg(long, default_value_t = 0)]
        column: usize,
        /// Layout window offset in cells
        #[arg(short, default_value_t = 0)]
        x: usize,
        #[arg(short, default_value_t = 0)]
        y: usize,
        #[arg(long)]
        rows: Option<usize>,
        #[arg(long)]
        columns: Option<usize>,
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        height: Option<usize>,
        #[arg(long)]
        no_grid_lines: bool,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Writes every sprite to its own image
    Export {
        #[command(flatten)]
        set: SetArgs,
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },
    /// One sheet with the first sprite of every set in a directory
    Thumbnails {
        dir: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
}

pub fn config_from_cli(cli: &StdViewCli) -> eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => parse_config_from_file(path)?,
        None => parse_config()?,
    };

    if let Some(palette) = cli.palette {
        config.palette = palette;
    }

    if let Some(index_policy) = cli.index_policy {
        config.index_policy = index_policy;
    }

    if let Some(zoom) = cli.zoom {
        config.zoom = zoom;
    }

    Ok(config)
}

pub fn run(cli: StdViewCli) -> eyre::Result<()> {
    let config = config_from_cli(&cli)?;

    match cli.command {
        Commands::List { dir } => {
            let names = DirectorySource::new(&dir).base_names();

            if names.is_empty() {
                return Err(eyre!("No .std files found in {}", dir.display()));
            }

            println!("Found {} .std files", names.len());
            names.iter().for_each(|name| println!("{name}"));
        }
        Commands::Info { set } => {
            let viewer = load_set(&set, &config)?;
            let sprite_set = viewer
                .current()
                .ok_or_else(|| eyre!("No sprite set loaded"))?;

            print_info(&sprite_set);
        }
        Commands::Render {
            set,
            view,
            all,
            row,
            column,
            x,
            y,
            rows,
            columns,
            width,
            height,
            no_grid_lines,
            out,
        } => {
            let viewer = load_set(&set, &config)?;

            let mut options = config.render_options();
            options.grid_lines &= !no_grid_lines;

            let compositor = viewer
                .compositor(options)
                .ok_or_else(|| eyre!("No sprite set loaded"))?;

            let render = |mode: ViewMode| match mode {
                ViewMode::Sprite => compositor.render_sprite(row, column),
                ViewMode::Grid => compositor.render_grid(
                    rows.unwrap_or(config.grid_rows),
                    columns.unwrap_or(config.grid_columns),
                ),
                ViewMode::Layout => compositor.render_layout_window(
                    x,
                    y,
                    width.unwrap_or(config.layout_width),
                    height.unwrap_or(config.layout_height),
                ),
            };

            let targets = if all {
                let mut mode = ViewMode::Sprite;
                let mut targets = vec![];

                for _ in 0..3 {
                    targets.push((mode, suffixed_path(&out, view_name(mode))));
                    mode = mode.next();
                }

                targets
            } else {
                vec![(ViewMode::from(view), out)]
            };

            for (mode, path) in targets {
                let image = render(mode);

                if image.width() == 0 || image.height() == 0 {
                    return Err(eyre!("Nothing to render for the {} view", view_name(mode)));
                }

                image.save(&path)?;
                println!("Saved {} view to {}", view_name(mode), path.display());
            }
        }
        Commands::Export { set, out, format } => {
            let viewer = load_set(&set, &config)?;
            let compositor = viewer
                .compositor(stdset::RenderOptions::new(1, false))
                .ok_or_else(|| eyre!("No sprite set loaded"))?;

            let format = format.unwrap_or(config.export_format);
            let count = export_sprites(&compositor, &out, format)?;

            println!("Saved {count} images in {}", out.display());
        }
        Commands::Thumbnails { dir, out } => {
            let source = DirectorySource::new(&dir);
            let palette = Arc::new(config.palette.build());

            let (sheet, names) = thumbnail_sheet(&source, palette, config.index_policy.into())?;

            if names.is_empty() {
                return Err(eyre!("No .std files with a complete sprite in {}", dir.display()));
            }

            sheet.save(&out)?;
            println!("Saved {} thumbnails to {}", names.len(), out.display());
        }
    }

    Ok(())
}

fn load_set(args: &SetArgs, config: &Config) -> eyre::Result<Viewer> {
    let source = DirectorySource::new(&args.dir);
    let names = source.base_names();

    let current = match &args.base {
        Some(base) => base.clone(),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| eyre!("No .std files found in {}", args.dir.display()))?,
    };

    let base_name = if args.step != 0 {
        step_base_name(&names, &current, args.step)
            .ok_or_else(|| eyre!("No .std files found in {}", args.dir.display()))?
    } else {
        current
    };

    let mut viewer = Viewer::new(config.palette.build(), config.index_policy.into());

    viewer
        .load(&source, &base_name)
        .map_err(|op| eyre!("Cannot load `{base_name}` from {}: {op}", args.dir.display()))?;

    Ok(viewer)
}

fn print_info(set: &SpriteSet) {
    println!("File: {}", set.base_name);
    println!("Sprites: {}", set.sprites.len());
    println!(
        "Shape rows: {}/{SHAPE_ROWS}",
        set.shapes.populated_rows()
    );

    (0..SHAPE_ROWS).for_each(|row| {
        let Some(max) = set.shapes.row(row).and_then(|summary| summary.max) else {
            return;
        };

        let records = set.shapes.row_records(row).count();
        let active = set
            .shapes
            .row_records(row)
            .filter(|record| record.is_active())
            .count();

        println!("  Row {row}: max {max}, {records} records, {active} active");
    });

    println!("Layout cells: {}", set.layout.occupied_cells());
    println!("Animation data: {} bytes", set.anim_data_length());
}

fn view_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Sprite => "sprite",
        ViewMode::Grid => "grid",
        ViewMode::Layout => "layout",
    }
}

fn suffixed_path(path: &std::path::Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_else(|| "png".to_string());

    path.with_file_name(format!("{stem}_{suffix}.{extension}"))
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn write_set(dir: &std::path::Path, base: &str) {
        fs::write(dir.join(format!("{base}.std")), [2u8; 256 * 4]).unwrap();
    }

    #[test]
    fn load_set_defaults_to_first_name() {
        let dir = tempfile::tempdir().unwrap();
        write_set(dir.path(), "beta");
        write_set(dir.path(), "alpha");

        let args = SetArgs {
            dir: dir.path().to_path_buf(),
            base: None,
            step: 0,
        };

        let viewer = load_set(&args, &Config::default()).unwrap();
        assert_eq!(viewer.current().unwrap().base_name, "alpha");

        let args = SetArgs { step: -1, ..args };
        let viewer = load_set(&args, &Config::default()).unwrap();
        assert_eq!(viewer.current().unwrap().base_name, "beta");
    }

    #[test]
    fn load_set_missing_base() {
        let dir = tempfile::tempdir().unwrap();
        write_set(dir.path(), "alpha");

        let args = SetArgs {
            dir: dir.path().to_path_buf(),
            base: Some("gamma".to_string()),
            step: 0,
        };

        assert!(load_set(&args, &Config::default()).is_err());
    }

    #[test]
    fn render_all_views() {
        let dir = tempfile::tempdir().unwrap();
        write_set(dir.path(), "alpha");
        fs::write(dir.path().join("alpha.map"), b"1\n2\n").unwrap();

        let out = dir.path().join("view.png");
        let cli = StdViewCli::parse_from([
            "stdview",
            "--zoom",
            "2",
            "render",
            dir.path().to_str().unwrap(),
            "--all",
            "--width",
            "4",
            "--height",
            "2",
            "-o",
            out.to_str().unwrap(),
        ]);

        run(cli).unwrap();

        let layout = image::open(dir.path().join("view_layout.png")).unwrap();
        assert_eq!((layout.width(), layout.height()), (4 * 32, 2 * 32));
        assert!(dir.path().join("view_sprite.png").exists());
        assert!(dir.path().join("view_grid.png").exists());
    }

    #[test]
    fn suffixed_paths() {
        assert_eq!(
            suffixed_path(std::path::Path::new("/tmp/out.bmp"), "grid"),
            PathBuf::from("/tmp/out_grid.bmp")
        );
        assert_eq!(
            suffixed_path(std::path::Path::new("out"), "sprite"),
            PathBuf::from("out_sprite.png")
        );
    }

    #[test]
    fn cli_definition() {
        use clap::CommandFactory;

        StdViewCli::command().debug_assert();
    }
}
