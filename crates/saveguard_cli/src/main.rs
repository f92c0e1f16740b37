use std::path::PathBuf;
use std::process;

use chrono::DateTime;
use clap::Parser;
use saveguard_core::data::GameData;
use saveguard_core::engine::FileDataHandler;
use serde_json::{Map as JsonMap, Value as JsonValue};

const DEFAULT_FILE_NAME: &str = "game.json";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Save directory; defaults to the platform data dir plus "saveguard".
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,
    /// Save file name inside the directory.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_FILE_NAME)]
    file: String,
    /// Read and write the file without the obfuscation layer.
    #[arg(long)]
    plaintext: bool,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    level: bool,
    #[arg(long)]
    xp: bool,
    #[arg(long)]
    highscore: bool,
    #[arg(long)]
    deaths: bool,
    #[arg(long = "last-updated")]
    last_updated: bool,
    #[arg(long)]
    json: bool,
    #[arg(long = "set-name")]
    set_name: Option<String>,
    #[arg(long = "set-level")]
    set_level: Option<i32>,
    #[arg(long = "set-xp")]
    set_xp: Option<i32>,
    #[arg(long = "set-highscore")]
    set_highscore: Option<i32>,
    #[arg(long = "set-deaths")]
    set_deaths: Option<i32>,
    /// Write a fresh default record, replacing any existing save.
    #[arg(long)]
    new: bool,
    /// Load the save and report whether it verifies.
    #[arg(long)]
    verify: bool,
    /// Delete the save data for a profile id.
    #[arg(long, value_name = "PROFILE_ID")]
    delete: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
struct FieldSelection {
    name: bool,
    level: bool,
    xp: bool,
    highscore: bool,
    deaths: bool,
    last_updated: bool,
}

impl FieldSelection {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            name: cli.name,
            level: cli.level,
            xp: cli.xp,
            highscore: cli.highscore,
            deaths: cli.deaths,
            last_updated: cli.last_updated,
        }
    }

    fn is_field_mode(&self) -> bool {
        self.name || self.level || self.xp || self.highscore || self.deaths || self.last_updated
    }

    fn selected_pairs(&self, data: &GameData) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        if self.name {
            out.push(("name", data.name.clone()));
        }
        if self.level {
            out.push(("level", data.level.to_string()));
        }
        if self.xp {
            out.push(("xp", data.exp.to_string()));
        }
        if self.highscore {
            out.push(("highscore", data.highscore.to_string()));
        }
        if self.deaths {
            out.push(("deaths", data.death_count.to_string()));
        }
        if self.last_updated {
            out.push(("last_updated", format_timestamp(data.last_updated)));
        }

        out
    }
}

fn format_timestamp(millis: i64) -> String {
    if millis == 0 {
        return "never".to_string();
    }
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("invalid ({millis})"),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("saveguard")
}

fn record_json(data: &GameData) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert("name".to_string(), JsonValue::String(data.name.clone()));
    out.insert("level".to_string(), JsonValue::from(data.level));
    out.insert("xp".to_string(), JsonValue::from(data.exp));
    out.insert("deaths".to_string(), JsonValue::from(data.death_count));
    out.insert("highscore".to_string(), JsonValue::from(data.highscore));
    out.insert(
        "last_updated".to_string(),
        JsonValue::String(format_timestamp(data.last_updated)),
    );
    out.insert(
        "coins_collected".to_string(),
        JsonValue::from(data.coins_collected.len()),
    );
    out
}

fn print_record_sheet(data: &GameData) {
    let name = if data.name.is_empty() {
        "(unnamed)"
    } else {
        &data.name
    };
    println!("{name}");
    println!("  level:        {}", data.level);
    println!("  xp:           {}", data.exp);
    println!("  deaths:       {}", data.death_count);
    println!("  highscore:    {}", data.highscore);
    println!("  coins:        {}", data.coins_collected.len());
    println!("  last updated: {}", format_timestamp(data.last_updated));
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let data_dir = cli.dir.clone().unwrap_or_else(default_data_dir);
    let handler = FileDataHandler::new(&data_dir, cli.file.clone(), !cli.plaintext);

    if let Some(profile_id) = cli.delete.as_deref() {
        handler.delete(Some(profile_id));
        println!("Deleted save data for profile {profile_id}");
        return;
    }

    if cli.new {
        let mut data = GameData::new();
        data.stamp_last_updated();
        if let Err(e) = handler.save(&data) {
            eprintln!("Error creating new save: {e}");
            process::exit(1);
        }
        println!("Wrote new save to {}", handler.primary_path().display());
        return;
    }

    if cli.verify {
        match handler.load() {
            Some(data) => {
                println!(
                    "OK: {} verified, last updated {}",
                    handler.primary_path().display(),
                    format_timestamp(data.last_updated)
                );
            }
            None => {
                eprintln!(
                    "Error: {} is missing or could not be verified",
                    handler.primary_path().display()
                );
                process::exit(1);
            }
        }
        return;
    }

    let has_edits = cli.set_name.is_some()
        || cli.set_level.is_some()
        || cli.set_xp.is_some()
        || cli.set_highscore.is_some()
        || cli.set_deaths.is_some();

    // Edits start from the existing save when there is one, otherwise from
    // a fresh record; a read-only run requires the save to exist.
    let mut data = match handler.load() {
        Some(data) => data,
        None if has_edits => GameData::new(),
        None => {
            eprintln!(
                "Error: no save data at {}",
                handler.primary_path().display()
            );
            process::exit(1);
        }
    };

    if has_edits {
        if let Some(name) = cli.set_name.clone() {
            data.name = name;
        }
        if let Some(level) = cli.set_level {
            data.level = level;
        }
        if let Some(xp) = cli.set_xp {
            data.exp = xp;
        }
        if let Some(highscore) = cli.set_highscore {
            data.highscore = highscore;
        }
        if let Some(deaths) = cli.set_deaths {
            data.death_count = deaths;
        }

        data.stamp_last_updated();
        if let Err(e) = handler.save(&data) {
            eprintln!("Error saving {}: {e}", handler.primary_path().display());
            process::exit(1);
        }
    }

    let fields = FieldSelection::from_cli(&cli);

    if cli.json {
        let rendered = serde_json::to_string_pretty(&JsonValue::Object(record_json(&data)))
            .unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
        println!("{rendered}");
        return;
    }

    if fields.is_field_mode() {
        for (key, value) in fields.selected_pairs(&data) {
            println!("{key}={value}");
        }
        return;
    }

    if has_edits {
        println!("Wrote save to {}", handler.primary_path().display());
        return;
    }

    print_record_sheet(&data);
}
