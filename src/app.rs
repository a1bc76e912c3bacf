use {
    crate::{
        bitmap::PackedBitmap,
        capacity::{format_bytes, runtime_budget, storage_budget, DEVICE_PROFILES},
        error::GrainError,
        noise::{FieldConfig, FractalField},
        patterns::{self, GradientDirection},
        render::{analyze, ascii_preview, export_png, hex_dump, LevelHistogram},
    },
    clap::{Parser, Subcommand},
    std::{fs, path::PathBuf},
};

const LEVEL_NAMES: [&str; 4] = ["white", "light gray", "dark gray", "black"];

#[derive(Parser)]
#[command(about = "2-bpp fractal noise rasters for 4-gray e-paper panels")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a fractal noise field into a packed raster file
    Generate {
        /// Output filename
        #[arg(long, default_value = "noise_200x200_2bpp.bin")]
        out: PathBuf,
        /// Permutation seed
        #[arg(long, default_value_t = 1337)]
        seed: u64,
        /// Feature scale, bigger is smoother
        #[arg(long, default_value_t = 40.0)]
        scale: f64,
        /// Number of fBm octaves
        #[arg(long, default_value_t = 4)]
        octaves: usize,
        /// Amplitude multiplier per octave
        #[arg(long, default_value_t = 0.5)]
        gain: f64,
        /// Frequency multiplier per octave
        #[arg(long, default_value_t = 2.0)]
        lacunarity: f64,
        #[arg(long, default_value_t = 200)]
        width: usize,
        #[arg(long, default_value_t = 200)]
        height: usize,
    },
    /// Inspect a packed raster file
    View {
        /// Input raster
        input: PathBuf,
        /// Show an ASCII art preview
        #[arg(long)]
        ascii: bool,
        /// ASCII preview downsampling factor
        #[arg(long, default_value_t = 4)]
        scale: usize,
        /// Save a grayscale PNG preview here
        #[arg(long)]
        png: Option<PathBuf>,
        /// Probe the raster for degenerate content
        #[arg(long)]
        analyze: bool,
        /// Skip the statistics block
        #[arg(long)]
        no_stats: bool,
        #[arg(long, default_value_t = 200)]
        width: usize,
        #[arg(long, default_value_t = 200)]
        height: usize,
    },
    /// Write deterministic test rasters
    Patterns {
        /// Where the pattern files go
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Generate every pattern
        #[arg(long)]
        all: bool,
        #[arg(long)]
        gradient: bool,
        #[arg(long)]
        calibration: bool,
        #[arg(long)]
        steps: bool,
        #[arg(long)]
        checkerboard: bool,
        #[arg(long)]
        dots: bool,
        #[arg(long)]
        showcase: bool,
        #[arg(long, default_value_t = 200)]
        width: usize,
        #[arg(long, default_value_t = 200)]
        height: usize,
    },
    /// Estimate on-device storage for packed rasters
    Capacity {
        #[arg(long, default_value_t = 200)]
        width: usize,
        #[arg(long, default_value_t = 200)]
        height: usize,
    },
}

impl Cli {
    pub fn run(self) -> Result<(), GrainError> {
        match self.command {
            Command::Generate {
                out,
                seed,
                scale,
                octaves,
                gain,
                lacunarity,
                width,
                height,
            } => {
                let config = FieldConfig {
                    octaves,
                    lacunarity,
                    gain,
                    scale,
                };
                run_generate(&out, seed, config, width, height)
            }
            Command::View {
                input,
                ascii,
                scale,
                png,
                analyze,
                no_stats,
                width,
                height,
            } => run_view(&input, ascii, scale, png, analyze, no_stats, width, height),
            Command::Patterns {
                output_dir,
                all,
                gradient,
                calibration,
                steps,
                checkerboard,
                dots,
                showcase,
                width,
                height,
            } => {
                let selection = PatternSelection {
                    gradient: all || gradient,
                    calibration: all || calibration,
                    steps: all || steps,
                    checkerboard: all || checkerboard,
                    dots: all || dots,
                    showcase: all || showcase,
                };
                run_patterns(&output_dir, selection, width, height)
            }
            Command::Capacity { width, height } => run_capacity(width, height),
        }
    }
}

fn run_generate(
    out: &PathBuf,
    seed: u64,
    config: FieldConfig,
    width: usize,
    height: usize,
) -> Result<(), GrainError> {
    log::info!("generating {width}x{height} field, seed {seed}, {config:?}");

    let field = FractalField::new(seed, config);
    let bitmap = field.render(width, height)?;
    fs::write(out, bitmap.as_bytes())?;

    println!(
        "Wrote {} bytes to {} (CRC32 0x{:08X})",
        bitmap.as_bytes().len(),
        out.display(),
        bitmap.crc32()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
fn run_view(
    input: &PathBuf,
    ascii: bool,
    scale: usize,
    png: Option<PathBuf>,
    probe: bool,
    no_stats: bool,
    width: usize,
    height: usize,
) -> Result<(), GrainError> {
    let bytes = fs::read(input)?;
    let expected = PackedBitmap::packed_len(width, height);

    println!("File: {}", input.display());
    println!("Size: {} bytes (expected: {expected} bytes)", bytes.len());

    if !no_stats {
        let histogram = LevelHistogram::of_bytes(&bytes);
        println!("\nPixel statistics ({} pixels):", histogram.total());
        for (level, count) in histogram.counts().into_iter().enumerate() {
            println!(
                "  level {level} ({:>10}): {count:6} pixels ({:5.1}%)",
                LEVEL_NAMES[level],
                histogram.percentage(level)
            );
        }

        println!("\nCRC32: 0x{:08X}", crc32fast::hash(&bytes));
        println!("\nHex dump (first {} bytes):", bytes.len().min(128));
        print!("{}", hex_dump(&bytes, 128));
    }

    if probe {
        let analysis = analyze(&bytes);
        println!("\nPattern analysis:");
        if analysis.uniform {
            println!("  WARNING: content appears uniform (one byte value)");
        }
        match analysis.repeating_period {
            Some(period) => println!("  WARNING: repeating {period}-byte pattern"),
            None => println!("  no short repeating pattern found"),
        }
        println!(
            "  unique byte values in sample: {}/256 ({:.1}%)",
            analysis.unique_bytes,
            analysis.unique_bytes as f64 * 100.0 / 256.0
        );
    }

    if ascii || png.is_some() {
        if bytes.len() != expected {
            log::warn!(
                "size mismatch: got {}, expected {expected} for {width}x{height}",
                bytes.len()
            );
        }
        let bitmap = PackedBitmap::from_bytes(bytes, width, height)?;

        if let Some(path) = png {
            export_png(&bitmap, &path)?;
            println!("\nSaved PNG preview to {}", path.display());
        }
        if ascii {
            print!("\n{}", ascii_preview(&bitmap, scale));
        }
    }

    Ok(())
}

struct PatternSelection {
    gradient: bool,
    calibration: bool,
    steps: bool,
    checkerboard: bool,
    dots: bool,
    showcase: bool,
}

impl PatternSelection {
    fn any(&self) -> bool {
        self.gradient
            || self.calibration
            || self.steps
            || self.checkerboard
            || self.dots
            || self.showcase
    }
}

fn run_patterns(
    output_dir: &PathBuf,
    selection: PatternSelection,
    width: usize,
    height: usize,
) -> Result<(), GrainError> {
    if !selection.any() {
        println!("No patterns selected. Use --all or any of --gradient --calibration --steps --checkerboard --dots --showcase.");
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;

    let write = |name: &str, bitmap: PackedBitmap| -> Result<(), GrainError> {
        let path = output_dir.join(name);
        fs::write(&path, bitmap.as_bytes())?;
        println!(
            "Wrote {} bytes to {} (CRC32 0x{:08X})",
            bitmap.as_bytes().len(),
            path.display(),
            bitmap.crc32()
        );
        Ok(())
    };

    if selection.gradient {
        write(
            "gradient_horizontal.bin",
            patterns::gradient(width, height, GradientDirection::Horizontal)?,
        )?;
        write(
            "gradient_vertical.bin",
            patterns::gradient(width, height, GradientDirection::Vertical)?,
        )?;
        write(
            "gradient_diagonal.bin",
            patterns::gradient(width, height, GradientDirection::Diagonal)?,
        )?;
        write(
            "gradient_radial.bin",
            patterns::gradient(width, height, GradientDirection::Radial)?,
        )?;
    }
    if selection.calibration {
        write(
            "calibration_strips.bin",
            patterns::calibration_strips(width, height)?,
        )?;
    }
    if selection.steps {
        write("steps_16.bin", patterns::steps(width, height, 16)?)?;
        write("steps_8.bin", patterns::steps(width, height, 8)?)?;
    }
    if selection.checkerboard {
        write(
            "checkerboard_8x8.bin",
            patterns::checkerboard(width, height, 8)?,
        )?;
        write(
            "checkerboard_4x4.bin",
            patterns::checkerboard(width, height, 4)?,
        )?;
    }
    if selection.dots {
        write("dot_pattern.bin", patterns::dots(width, height)?)?;
    }
    if selection.showcase {
        write("showcase.bin", patterns::showcase(width, height)?)?;
    }

    Ok(())
}

fn run_capacity(width: usize, height: usize) -> Result<(), GrainError> {
    let image_len = PackedBitmap::packed_len(width, height);
    if image_len == 0 {
        return Err(GrainError::Dimension { width, height });
    }

    println!(
        "Packed raster: {width}x{height}, 2 bpp, {} per image",
        format_bytes(image_len)
    );

    for profile in DEVICE_PROFILES {
        println!("\n{} - {}", profile.name, profile.description);

        for &flash in profile.flash_sizes {
            let storage = storage_budget(flash, image_len);
            println!(
                "  flash {:>8}: {:>8} usable, {:5} images, {} left over",
                format_bytes(flash),
                format_bytes(storage.usable),
                storage.max_images,
                format_bytes(storage.leftover)
            );
        }

        let runtime = runtime_budget(profile, width, height);
        println!(
            "  sram  {:>8}: {} per decode, {}",
            format_bytes(runtime.sram_total),
            format_bytes(runtime.per_image),
            if runtime.fits_in_sram {
                format!("{} rasters at once", runtime.simultaneous_sram)
            } else {
                "does not fit".to_string()
            }
        );
        if runtime.psram_total > 0 {
            println!(
                "  psram {:>8}: {} rasters at once",
                format_bytes(runtime.psram_total),
                runtime.simultaneous_psram
            );
        }
    }

    Ok(())
}
