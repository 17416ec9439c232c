use alarm_slots::*;
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode one alarm record and print its bytes
    Encode {
        /// Id from the timer/alarm library
        #[arg(short, long, default_value_t = 0)]
        alarm_id: u8,
        /// Slot index
        #[arg(short, long, default_value_t = 0)]
        id: u8,
        /// Days (mon,tue,wed,thu,fri,sat,sun,all,weekdays,weekend,none or a number)
        #[arg(short, long, default_value = "all")]
        days: String,
        /// Hour (0-23)
        #[arg(long, default_value_t = 7)]
        hour: u8,
        /// Minute (0-59)
        #[arg(short, long, default_value_t = 0)]
        minute: u8,
        /// Second (0-59)
        #[arg(short, long, default_value_t = 0)]
        second: u8,
        /// Function selector
        #[arg(short, long, default_value_t = 0)]
        function: u8,
        /// Store the alarm disabled
        #[arg(long)]
        inactive: bool,
    },
    /// Decode 8 hex bytes into an alarm record
    Decode {
        /// Record bytes, e.g. "01 00 02 07 1e 00 05 01"
        hex: String,
    },
    /// Validate a TOML alarm file and list its slots
    Check {
        /// Alarm file
        file: PathBuf,
    },
    /// Build the raw table image from a TOML alarm file
    Image {
        /// Alarm file
        file: PathBuf,
        /// Write the image here instead of printing hex
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Turn a raw table image back into a TOML alarm file
    ReadImage {
        /// Raw image
        image: PathBuf,
        /// Write the alarm file here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("alarm_slots=info,alarmctl=info")),
        )
        .compact()
        .init();

    color_eyre::install()?;

    let cli = Cli::parse();
    debug!("Parsed command line arguments");

    match cli.command {
        Commands::Encode {
            alarm_id,
            id,
            days,
            hour,
            minute,
            second,
            function,
            inactive,
        } => {
            let day_of_week = parse_days(&days)?;
            debug!("Days value: {:#04x}", day_of_week);

            let record = AlarmRecord::new(
                alarm_id,
                id,
                day_of_week,
                hour,
                minute,
                second,
                function,
                !inactive,
            );
            warn_if_invalid(&record);
            println!("{}", encode_hex(&record.to_bytes()));
        }
        Commands::Decode { hex } => {
            let bytes = decode_hex(&hex)?;
            let record = AlarmRecord::try_from(bytes.as_slice())?;
            warn_if_invalid(&record);
            println!("{record}");
        }
        Commands::Check { file } => {
            let table = AlarmFile::load(&file)?.into_validated_table()?;
            for record in table.iter() {
                println!("{record}");
            }
            println!(
                "{} of {} slots used, {} active",
                table.len(),
                table.capacity(),
                table.active().count()
            );
        }
        Commands::Image { file, output } => {
            let image = AlarmFile::load(&file)?.into_validated_table()?.to_image();
            match output {
                Some(path) => {
                    std::fs::write(&path, &image)?;
                    info!("Wrote {} bytes to {}", image.len(), path.display());
                }
                None => {
                    for chunk in image.chunks(RECORD_SIZE) {
                        println!("{}", encode_hex(chunk));
                    }
                }
            }
        }
        Commands::ReadImage { image, output } => {
            let bytes = std::fs::read(&image)?;
            let file = AlarmFile::from_image(&bytes)?;
            match output {
                Some(path) => file.save(&path)?,
                None => print!("{}", file.to_toml()?),
            }
        }
    }

    Ok(())
}

fn warn_if_invalid(record: &AlarmRecord) {
    if let Err(e) = record.validate() {
        warn!("Record is stored as given but is not a valid time: {}", e);
    }
}
