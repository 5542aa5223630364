use clap::{Parser, Subcommand};
use flatback::backup::activity_log::FileActivityLog;
use flatback::backup::backup_job::BackupJob;
use flatback::backup::policy::parse_name_list;
use flatback::backup::result_error::error::Error;
use flatback::backup::result_error::result::Result;
use flatback::backup::result_error::WithMsg;
use flatback::backup::settings::Settings;
use flatback::backup::share::ShareRequest;
use std::path::PathBuf;
use std::process::exit;
use tracing::{error, info};
use validator::Validate;

/// Copy a directory tree into a backup root, optionally encrypting files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML file holding `root_dir` and `logger_format`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory for the backup [default: ./backup]
    #[arg(long, global = true)]
    root_dir: Option<PathBuf>,

    /// strftime format of the backup log timestamps [default: %Y-%m-%dT%H:%M:%S]
    #[arg(long, global = true)]
    logger_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Back up a directory
    Backup {
        /// Source directory to backup
        #[arg(long)]
        src: PathBuf,
        /// Encrypt files during backup
        #[arg(long)]
        encrypt: bool,
        /// Recursively encrypt files
        #[arg(long)]
        recursive: bool,
        /// Selectively encrypt files (comma-separated)
        #[arg(long, default_value = "")]
        selective: String,
    },
    /// Copy backup contents into another directory
    Share {
        /// Directory to share into
        #[arg(long)]
        dir: PathBuf,
        /// Backed up files to send (comma-separated)
        #[arg(long, default_value = "")]
        files: String,
        /// Share the backup log
        #[arg(long)]
        prev_versions: bool,
    },
    /// Print the effective settings
    Config,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let settings = match &args.config {
        Some(path) => Settings::from_yaml_file(path)?,
        None => Settings::default(),
    }
    .with_overrides(args.root_dir.clone(), args.logger_format.clone());

    settings
        .validate()
        .map_err(Error::from)
        .map(|_| settings)
        .with_msg("Settings validation failed")
}

fn run(args: Args) -> Result<()> {
    let settings = load_settings(&args)?;

    match args.command {
        Command::Backup {
            src,
            encrypt,
            recursive,
            selective,
        } => {
            let job = BackupJob::builder()
                .source_root(src)
                .destination_root(settings.root_dir())
                .encrypt_all(encrypt)
                .recursive_encrypt(recursive)
                .selective(parse_name_list(selective))
                .build();

            job.validate()
                .map_err(Error::from)
                .with_msg("Invalid backup arguments")?;

            FileActivityLog::open(settings.root_dir(), settings.logger_format().as_str())
                .and_then(|mut log| job.run(&mut log))
                .map(|summary| info!("Backup complete: {summary}"))
                .with_msg("Backup failed")
        }
        Command::Share {
            dir,
            files,
            prev_versions,
        } => ShareRequest::builder()
            .dir(dir)
            .files(parse_name_list(files))
            .prev_versions(prev_versions)
            .build()
            .run(&settings)
            .map(|shared| info!("Shared {shared} file(s)"))
            .with_msg("Sharing failed"),
        Command::Config => {
            println!("{settings}");
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::try_parse().unwrap_or_else(|e| {
        if !e.use_stderr() {
            let _ = e.print();
            exit(0)
        }
        // Argument errors go to stdout like every other message of the tool.
        print!("{}", e.render());
        exit(1)
    });

    if let Err(e) = run(args) {
        error!("{e}");
        exit(1);
    }
}
