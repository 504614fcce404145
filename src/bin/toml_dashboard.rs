use clap::Parser;
use demografia::core::ConfigProvider;
use demografia::utils::{logger, validation::Validate};
use demografia::{DashboardConfig, DashboardEngine, DashboardPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-dashboard")]
#[command(about = "Demographic dashboard generator driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be rendered without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based dashboard generator");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match DashboardConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = DashboardPipeline::new(storage, config);
    let engine = DashboardEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Dashboard generated successfully!");
            println!("✅ Dashboard generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Dashboard generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &DashboardConfig, args: &Args) {
    let sections: Vec<&str> = config.sections().iter().map(|s| s.slug()).collect();

    println!("📋 Configuration Summary:");
    println!("  Title: {}", config.title());
    println!("  Sections: {}", sections.join(", "));
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!(
        "  Boundary: {}",
        config.geo.boundary.as_deref().unwrap_or("(none, maps disabled)")
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &DashboardConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📑 Sections:");
    for (i, section) in config.sections().iter().enumerate() {
        let marker = if i == 0 { " (initial view)" } else { "" };
        println!("  {}{}", section.label(), marker);
    }

    let geo = config.geo_settings();
    println!();
    println!("🗺️ Maps:");
    match &geo.source {
        Some(source) => {
            println!("  Boundary: {}", source);
            println!("  Name field: {}", geo.name_field);
            println!("  Encoding: {:?}", geo.encoding);
            println!("  Duplicate policy: {:?}", geo.duplicate_policy);
            println!(
                "  View: [{}, {}] zoom {}",
                geo.view.center[0], geo.view.center[1], geo.view.zoom
            );
        }
        None => println!("  No boundary configured; migration maps will show a notice"),
    }

    let buckets = config.age_buckets();
    println!();
    println!("🧮 Age buckets:");
    println!("  0-14: {}", buckets.youth.join(", "));
    println!("  15-64: {}", buckets.working.join(", "));
    println!("  65+: {}", buckets.elderly.join(", "));

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
