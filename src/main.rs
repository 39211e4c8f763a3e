#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "avro2json", about = "Convert Avro container files to JSON")]
struct Cli {
    /// Avro container files, converted in the given order
    #[arg(value_name = "AVRO", required = true)]
    inputs: Vec<std::path::PathBuf>,

    /// Write the JSON to this file instead of stdout
    #[arg(short, long, value_name = "JSON")]
    output: Option<std::path::PathBuf>,
}

#[cfg(feature = "cli")]
fn main() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    #[cfg(feature = "trace")]
    let fmt_layer = fmt_layer.with_span_events(
        tracing_subscriber::fmt::format::FmtSpan::ENTER
            | tracing_subscriber::fmt::format::FmtSpan::EXIT,
    );

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    let cli = Cli::parse();

    let mut options = avro2json::ConvertOptions::new(cli.inputs);
    options.output = cli.output;

    match avro2json::convert(&options) {
        Ok(avro2json::Conversion::Json(json)) => println!("{json}"),
        Ok(conversion) => {
            if let Some(message) = conversion.confirmation() {
                println!("{message}");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary is only available with the `cli` feature enabled.");
    std::process::exit(1);
}
