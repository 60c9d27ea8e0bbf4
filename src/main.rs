//! adsweep-pdf - Advertisement removal for scanned PDFs
//!
//! CLI entry point

use adsweep_pdf::{
    exit_codes,
    // Cache module
    should_skip_processing, CacheDigest, ProcessingCache,
    // CLI
    CacheInfoArgs, Cli, CleanArgs, Commands,
    // Config
    CliOverrides, Config,
    // Document cleaning
    CleanOptions, DocumentCleaner, ProgressCallback,
    // Progress tracking
    ProgressTracker,
    // Regions
    PageKeepMap,
};
use clap::Parser;
use indicatif::ProgressBar;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean(args) => run_clean(&args),
        Commands::Info => run_info(),
        Commands::CacheInfo(args) => run_cache_info(&args),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

// ============ Progress Callback Implementation ============

/// Verbose progress callback for CLI output
struct VerboseProgress {
    verbose_level: u8,
}

impl VerboseProgress {
    fn new(verbose_level: u8) -> Self {
        Self { verbose_level }
    }
}

impl ProgressCallback for VerboseProgress {
    fn on_step_start(&self, step: &str) {
        if self.verbose_level > 0 {
            println!("  {}", step);
        }
    }

    fn on_step_progress(&self, current: usize, total: usize) {
        if self.verbose_level > 0 {
            print!("\r    Progress: {}/{}", current, total);
            std::io::stdout().flush().ok();
        }
    }

    fn on_step_complete(&self, step: &str, message: &str) {
        if self.verbose_level > 0 {
            println!("    {}: {}", step, message);
        }
    }

    fn on_debug(&self, message: &str) {
        if self.verbose_level > 1 {
            println!("    [DEBUG] {}", message);
        }
    }
}

// ============ Clean Command ============

/// Image file extensions accepted as standalone inputs
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

fn run_clean(args: &CleanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    init_logging(args.verbose, args.quiet);

    // Validate input path
    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    // Collect files to process
    let input_files = collect_input_files(&args.input)?;
    if input_files.is_empty() {
        eprintln!("Error: No PDF or image files found in input path");
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    // Load config file if specified, otherwise use default
    let file_config = match &args.config {
        Some(config_path) => match Config::load_from_path(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                Config::default()
            }
        },
        None => Config::load().unwrap_or_default(),
    };

    // Merge config file with CLI arguments (CLI takes precedence)
    let config = file_config.merge_with_cli(&create_cli_overrides(args));
    config.validate()?;

    // Configure the worker thread pool before any parallel work
    if let Some(threads) = config.processing.threads {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global();
    }

    // Keep regions: explicit map file, repeated --keep flags, or none
    let keep_map = if let Some(map_path) = &args.keep_map {
        PageKeepMap::load_from_path(map_path)?
    } else if !args.keep.is_empty() {
        PageKeepMap::for_all_pages(args.keep.clone())
    } else {
        PageKeepMap::new()
    };

    let mut options = config.clean_options();
    options.keep_map = keep_map;
    options.max_pages = args.max_pages;

    if args.dry_run {
        print_execution_plan(args, &input_files, &config, &options);
        return Ok(());
    }

    // Pre-compute options JSON for caching
    let options_json = serde_json::to_string(&(&config, &options.keep_map))?;

    let cleaner = DocumentCleaner::new(options)?;

    let multi = input_files.len() > 1;
    if let Some(out) = &args.output {
        if multi || out.is_dir() {
            std::fs::create_dir_all(out)?;
        }
    }

    let verbose = args.verbose > 0;
    let progress = VerboseProgress::new(args.verbose);

    // Batch progress bar for multi-file runs in normal mode
    let bar = if multi && !verbose && !args.quiet {
        Some(ProgressBar::new(input_files.len() as u64))
    } else {
        None
    };

    // Track processing results
    let mut ok_count = 0usize;
    let mut skip_count = 0usize;
    let mut error_count = 0usize;

    for (idx, input_file) in input_files.iter().enumerate() {
        let is_pdf = has_extension(input_file, "pdf");
        let output_path = resolve_output_path(args, input_file, multi, is_pdf);

        if let Some(bar) = &bar {
            bar.set_message(
                input_file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        // Check cache for smart skipping
        if args.skip_existing && !args.force {
            if output_path.exists() {
                if verbose {
                    println!(
                        "[{}/{}] Skipping (exists): {}",
                        idx + 1,
                        input_files.len(),
                        input_file.display()
                    );
                }
                skip_count += 1;
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
                continue;
            }
        } else if !args.force && is_pdf && !args.images {
            if let Some(cache) =
                should_skip_processing(input_file, &output_path, &options_json, false)
            {
                if verbose {
                    println!(
                        "[{}/{}] Skipping (cached, {} pages): {}",
                        idx + 1,
                        input_files.len(),
                        cache.result.page_count,
                        input_file.display()
                    );
                }
                skip_count += 1;
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
                continue;
            }
        }

        if verbose {
            println!(
                "[{}/{}] Processing: {}",
                idx + 1,
                input_files.len(),
                input_file.display()
            );
        }

        let result = if !is_pdf {
            cleaner.clean_image(input_file, &output_path)
        } else if args.images {
            cleaner.clean_pdf_to_images(input_file, &output_path, &progress)
        } else {
            cleaner.clean_pdf_with_progress(input_file, &output_path, &progress)
        };

        match result {
            Ok(summary) => {
                ok_count += 1;

                // Save cache after successful processing
                if is_pdf && !args.images {
                    if let Ok(digest) = CacheDigest::new(input_file, &options_json) {
                        let cache = ProcessingCache::new(digest, summary.clone());
                        let _ = cache.save(&output_path);
                    }
                }

                if verbose {
                    println!(
                        "    Completed: {} pages ({} masked, {} blanked), {:.2}s, {} bytes",
                        summary.page_count,
                        summary.pages_masked,
                        summary.pages_blanked,
                        summary.elapsed_seconds,
                        summary.output_size
                    );
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {}", input_file.display(), e);
                error_count += 1;
            }
        }

        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let elapsed = start_time.elapsed();

    // Print summary
    if !args.quiet {
        ProgressTracker::print_summary(input_files.len(), ok_count, skip_count, error_count);
        println!("Total time: {:.2}s", elapsed.as_secs_f64());
    }

    if error_count > 0 {
        return Err(format!("{} file(s) failed to process", error_count).into());
    }

    Ok(())
}

// ============ Helper Functions ============

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

/// Create CLI overrides from CleanArgs
///
/// Flags the user did not pass stay `None`, so config file values survive.
fn create_cli_overrides(args: &CleanArgs) -> CliOverrides {
    let mut overrides = CliOverrides::new();
    overrides.footer_fraction = args.footer_fraction;
    if args.no_trim {
        overrides.trim_margins = Some(false);
    }
    overrides.background_threshold = args.background_threshold;
    overrides.dpi = args.dpi;
    overrides.jpeg_quality = args.jpeg_quality;
    overrides.threads = args.threads;
    overrides
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn is_image_file(path: &Path) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

/// Collect input files: a single PDF or image, or all PDFs in a directory
fn collect_input_files(input: &PathBuf) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();

    if input.is_file() {
        if has_extension(input, "pdf") || is_image_file(input) {
            files.push(input.clone());
        }
    } else if input.is_dir() {
        for entry in std::fs::read_dir(input)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, "pdf") {
                files.push(path);
            }
        }
        files.sort();
    }

    Ok(files)
}

/// Resolve the output path for one input file
fn resolve_output_path(args: &CleanArgs, input: &Path, multi: bool, is_pdf: bool) -> PathBuf {
    let parent = input.parent().unwrap_or(Path::new("."));

    match &args.output {
        Some(out) if multi || out.is_dir() => {
            if is_pdf && args.images {
                DocumentCleaner::image_dir_for(input, out)
            } else if is_pdf {
                DocumentCleaner::output_path_for(input, out)
            } else {
                out.join(default_image_name(input))
            }
        }
        Some(out) => out.clone(),
        None => {
            if is_pdf && args.images {
                DocumentCleaner::image_dir_for(input, parent)
            } else if is_pdf {
                DocumentCleaner::output_path_for(input, parent)
            } else {
                parent.join(default_image_name(input))
            }
        }
    }
}

/// Default output filename for a standalone image input
fn default_image_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = input
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    format!("{}_clean.{}", stem, ext)
}

/// Print execution plan for dry-run mode
fn print_execution_plan(
    args: &CleanArgs,
    input_files: &[PathBuf],
    config: &Config,
    options: &CleanOptions,
) {
    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input: {}", args.input.display());
    match &args.output {
        Some(out) => println!("Output: {}", out.display()),
        None => println!("Output: next to each input file"),
    }
    println!("Files to process: {}", input_files.len());
    println!();
    println!("Pipeline Configuration:");
    println!("  1. Rasterization (DPI: {})", options.dpi);
    if options.keep_map.is_empty() {
        println!(
            "  2. Footer ad detection (bottom {:.0}% of each page)",
            f64::from(options.pipeline.footer_fraction) * 100.0
        );
    } else if let Some(all) = options.keep_map.all_pages() {
        println!(
            "  2. Keep-region masking ({} region(s) on every page)",
            all.len()
        );
    } else {
        println!(
            "  2. Keep-region masking ({} page entr{})",
            options.keep_map.page_count(),
            if options.keep_map.page_count() == 1 {
                "y"
            } else {
                "ies"
            }
        );
    }
    if options.pipeline.trim_margins {
        println!(
            "  3. Margin trim: ENABLED (background threshold {})",
            options.pipeline.background_threshold
        );
    } else {
        println!("  3. Margin trim: DISABLED");
    }
    if args.images {
        println!("  4. Output: PNG page images");
    } else {
        println!(
            "  4. PDF generation (JPEG quality: {})",
            options.jpeg_quality
        );
    }
    println!();
    println!("Processing Options:");
    println!(
        "  Threads: {}",
        config.processing.threads.unwrap_or_else(num_cpus::get)
    );
    println!(
        "  Skip existing: {}",
        if args.skip_existing { "YES" } else { "NO" }
    );
    println!("  Force re-process: {}", if args.force { "YES" } else { "NO" });
    if let Some(max) = options.max_pages {
        println!("  Max pages: {}", max);
    } else {
        println!("  Max pages: unlimited");
    }
    println!();
    println!("Files:");
    for (i, file) in input_files.iter().enumerate() {
        println!("  {}. {}", i + 1, file.display());
    }
}

// ============ Info Command ============

fn run_info() -> Result<(), Box<dyn std::error::Error>> {
    println!("adsweep-pdf v{}", env!("CARGO_PKG_VERSION"));
    println!();

    // System Information
    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    // Memory info (Linux)
    if let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") {
        if let Some(line) = meminfo.lines().find(|l| l.starts_with("MemTotal:")) {
            if let Some(kb) = line.split_whitespace().nth(1) {
                if let Ok(kb_val) = kb.parse::<u64>() {
                    println!("  Memory: {:.1} GB", kb_val as f64 / 1_048_576.0);
                }
            }
        }
    }

    // External Tools
    println!();
    println!("External Tools:");
    check_tool_with_version("pdftoppm", "Poppler", &["-v"]);

    // Config File Locations
    println!();
    println!("Config File Locations:");
    println!("  Local: ./{}", adsweep_pdf::config::LOCAL_CONFIG_FILE);
    if let Some(user_path) = Config::config_path() {
        println!("  User:  {}", user_path.display());
    }

    Ok(())
}

fn check_tool_with_version(cmd: &str, name: &str, version_args: &[&str]) {
    match which::which(cmd) {
        Ok(path) => {
            // pdftoppm prints its version banner on stderr
            if let Ok(output) = std::process::Command::new(&path).args(version_args).output() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let first_line = stdout
                    .lines()
                    .chain(stderr.lines())
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("");
                if !first_line.is_empty() && first_line.len() < 80 {
                    println!("  {}: {} ({})", name, first_line.trim(), path.display());
                } else {
                    println!("  {}: {} (found)", name, path.display());
                }
            } else {
                println!("  {}: {} (found)", name, path.display());
            }
        }
        Err(_) => println!("  {}: Not found", name),
    }
}

// ============ Cache Info Command ============

fn run_cache_info(args: &CacheInfoArgs) -> Result<(), Box<dyn std::error::Error>> {
    use chrono::{DateTime, Local, TimeZone};

    let output_path = &args.output_pdf;

    if !output_path.exists() {
        return Err(format!("Output file not found: {}", output_path.display()).into());
    }

    match ProcessingCache::load(output_path) {
        Ok(cache) => {
            println!("=== Cache Information ===");
            println!();
            println!("Output file: {}", output_path.display());
            println!(
                "Cache file:  {}",
                ProcessingCache::cache_path(output_path).display()
            );
            println!();
            println!("Cache Version: {}", cache.version);
            let processed_dt: DateTime<Local> = Local
                .timestamp_opt(cache.processed_at as i64, 0)
                .single()
                .unwrap_or_else(Local::now);
            println!("Processed at:  {}", processed_dt.format("%Y-%m-%d %H:%M:%S"));
            println!();
            println!("Source Digest:");
            println!("  Modified: {}", cache.digest.source_modified);
            println!("  Size:     {} bytes", cache.digest.source_size);
            println!("  Options:  {}", cache.digest.options_hash);
            println!();
            println!("Processing Result:");
            println!("  Page count:    {}", cache.result.page_count);
            println!("  Pages masked:  {}", cache.result.pages_masked);
            println!("  Pages blanked: {}", cache.result.pages_blanked);
            println!("  Elapsed:       {:.2}s", cache.result.elapsed_seconds);
            println!(
                "  Output size:   {} bytes ({:.2} MB)",
                cache.result.output_size,
                cache.result.output_size as f64 / 1_048_576.0
            );
        }
        Err(e) => {
            println!("No cache found for: {}", output_path.display());
            println!(
                "Cache file would be: {}",
                ProcessingCache::cache_path(output_path).display()
            );
            println!();
            println!("Reason: {}", e);
        }
    }

    Ok(())
}
