use azure_diag_audit::azure::{AzCli, RecordingProvider, SnapshotProvider};
use azure_diag_audit::config::AuditArgs;
use azure_diag_audit::output;
use azure_diag_audit::processing::{run_audit, AuditRun};
use clap::Parser;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    dotenv::dotenv().ok();

    let args = AuditArgs::parse();
    let options = args.options();
    log::info!("#Start main()");

    let run: AuditRun = match &args.snapshot {
        Some(path) if path.exists() => {
            let provider = SnapshotProvider::load(path)?;
            run_audit(&provider, &options)?
        }
        Some(path) => {
            log::warn!("snapshot file not found, recording one: {}", path.display());
            let provider = RecordingProvider::new(AzCli);
            let run = run_audit(&provider, &options)?;
            provider.into_snapshot().save(path)?;
            run
        }
        None => run_audit(&AzCli, &options)?,
    };

    output::print_summary(&run.summary);

    let report = output::write_report(&run.records, &args.output_path, &args.scope_label())?;
    println!("report written to {}", report.display());

    Ok(())
}

fn init_logging() {
    if log4rs::init_file("log4rs.yml", Default::default()).is_ok() {
        return;
    }

    // No log4rs.yml next to the invocation; fall back to plain stderr.
    use log4rs::append::console::{ConsoleAppender, Target};
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(log::LevelFilter::Info))
        .expect("Error building default log config");
    log4rs::init_config(config).expect("Error initializing log4rs");
}
