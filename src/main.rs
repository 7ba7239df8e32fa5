use chrono::Local;
use cli_neyxt::{cli, utils::config};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::{fs::OpenOptions, io::Write, sync::Mutex};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logger
    init_logger();

    // Initialize config
    if let Err(e) = config::init() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    cli::run().await;
}

fn init_logger() {
    // Open or create the log file in append mode
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("app.log")
        .expect("Failed to open log file");

    let log_file = Mutex::new(log_file);

    Builder::new()
        .filter(None, LevelFilter::Info)
        .target(Target::Stdout)
        .format(move |buf, record| {
            // Lock the log file for writing
            let mut log_file = log_file.lock().unwrap();

            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let log_message = format!("{} [{}] {}\n", timestamp, record.level(), record.args());

            // Write to the log file
            log_file
                .write_all(log_message.as_bytes())
                .expect("Failed to write log");

            // Also write to the default logger output (stdout by default)
            writeln!(buf, "{}", log_message.trim_end())
        })
        .init();
}
