//! # CardForge CLI
//!
//! ```bash
//! # Render the front of a template as SVG
//! cardforge render card.json --side front -o front.svg
//!
//! # Fill in a record and print both sides on one sheet
//! cardforge print card.json --data employee.json --photo face.jpg -o sheet.svg
//!
//! # Replay recorded pointer and keyboard input, then save the result
//! cardforge edit card.json --events session.json -o edited.json
//!
//! # Keep templates in the local library
//! cardforge library save head-office card.json
//! cardforge library list
//! ```

use cardforge_app::{App, AppConfig, AppError, write};
use cardforge_core::storage::TemplateSummary;
use cardforge_core::{ImageSlot, Side};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// CardForge - identity card designer
#[derive(Parser, Debug)]
#[command(name = "cardforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Template library directory (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "DIR")]
    library: Option<PathBuf>,

    /// Editor settings as JSON
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overwrite without asking
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one side of a card to SVG
    Render {
        #[command(flatten)]
        card: CardInput,

        #[arg(long, value_enum, default_value = "front")]
        side: SideArg,

        /// Output pixels per card unit
        #[arg(long, default_value = "1.0")]
        scale: f64,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Lay out both sides on one printable SVG sheet
    Print {
        #[command(flatten)]
        card: CardInput,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Replay a recorded input script against a card and save the result
    Edit {
        #[command(flatten)]
        card: CardInput,

        /// JSON array of timed pointer, key and text events
        #[arg(long, value_name = "FILE")]
        events: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Write an empty template with the default layout
    New {
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
    /// Manage saved templates
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(Subcommand, Debug)]
enum LibraryAction {
    /// List saved templates
    List,
    /// Store a template file under a name
    Save {
        name: String,
        template: PathBuf,
    },
    /// Export a saved template to a file
    Load {
        name: String,
        output: PathBuf,
    },
    /// Remove a saved template
    Delete { name: String },
}

/// Where the card comes from and what to fill into it.
#[derive(Args, Debug)]
struct CardInput {
    /// Template file; a library name when prefixed with `@`
    template: Option<String>,

    /// Card fields as a JSON object, merged over the template's record
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    #[arg(long, value_name = "IMAGE")]
    photo: Option<PathBuf>,

    #[arg(long, value_name = "IMAGE")]
    front_background: Option<PathBuf>,

    #[arg(long, value_name = "IMAGE")]
    back_background: Option<PathBuf>,

    #[arg(long, value_name = "IMAGE")]
    holder_signature: Option<PathBuf>,

    #[arg(long, value_name = "IMAGE")]
    authority_signature: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SideArg {
    Front,
    Back,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Front => Side::Front,
            SideArg::Back => Side::Back,
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig {
        library_dir: cli.library,
        ..Default::default()
    };
    if let Some(path) = &cli.config {
        config = config.with_editor_file(path)?;
    }

    match cli.command {
        Commands::Render { card, side, scale, output } => {
            let mut app = App::new(AppConfig { scale, ..config });
            load_card(&mut app, &card)?;
            write(&output, &app.render_side(side.into())?)?;
            println!("Rendered {} side to {}", Side::from(side).name(), output.display());
        }
        Commands::Print { card, output } => {
            let mut app = App::new(config);
            load_card(&mut app, &card)?;
            write(&output, &app.print_sheet()?)?;
            println!("Print sheet written to {}", output.display());
        }
        Commands::Edit { card, events, output } => {
            let mut app = App::new(config);
            load_card(&mut app, &card)?;
            let replayed = app.replay_events(&events)?;
            if !may_replace(&output, cli.yes) {
                println!("Left {} unchanged", output.display());
                return Ok(());
            }
            app.save_template(&output)?;
            println!("Replayed {replayed} events into {}", output.display());
        }
        Commands::New { output } => {
            App::new(config).save_template(&output)?;
            println!("Created {}", output.display());
        }
        Commands::Library { action } => run_library(App::new(config), action, cli.yes)?,
    }

    Ok(())
}

fn run_library(mut app: App, action: LibraryAction, assume_yes: bool) -> Result<(), AppError> {
    match action {
        LibraryAction::List => {
            let entries = app.list_library()?;
            if entries.is_empty() {
                println!("No saved templates");
            }
            for entry in entries {
                println!("  {}", describe(&entry));
            }
        }
        LibraryAction::Save { name, template } => {
            // A fresh session has no card to lose.
            app.open_template(&template, |_| true)?;
            let saved = app.save_to_library(&name, |existing| {
                confirm(&format!("Replace {}?", describe(existing)), assume_yes)
            })?;
            match saved {
                Some(entry) => println!("Saved {}", describe(&entry)),
                None => println!("Kept the existing {name}"),
            }
        }
        LibraryAction::Load { name, output } => {
            let exported = app.load_from_library(&name, |_| may_replace(&output, assume_yes))?;
            if !exported {
                println!("Left {} unchanged", output.display());
                return Ok(());
            }
            app.save_template(&output)?;
            println!("Exported {name} to {}", output.display());
        }
        LibraryAction::Delete { name } => {
            app.delete_from_library(&name)?;
            println!("Deleted {name}");
        }
    }
    Ok(())
}

fn load_card(app: &mut App, card: &CardInput) -> Result<(), AppError> {
    // Cards are loaded into a fresh session, so there is nothing to confirm.
    if let Some(template) = card.template.as_deref() {
        match template.strip_prefix('@') {
            Some(name) => app.load_from_library(name, |_| true)?,
            None => app.open_template(Path::new(template), |_| true)?,
        };
    }
    if let Some(data) = &card.data {
        app.merge_card_data(data)?;
    }
    let images = [
        (ImageSlot::ProfilePhoto, &card.photo),
        (ImageSlot::FrontBackground, &card.front_background),
        (ImageSlot::BackBackground, &card.back_background),
        (ImageSlot::HolderSignature, &card.holder_signature),
        (ImageSlot::AuthoritySignature, &card.authority_signature),
    ];
    for (slot, path) in images {
        if let Some(path) = path {
            app.set_image(slot, path)?;
        }
    }
    Ok(())
}

fn describe(entry: &TemplateSummary) -> String {
    let holder = match (entry.full_name.as_str(), entry.nic.as_str()) {
        ("", "") => "no holder".to_string(),
        (name, "") => name.to_string(),
        ("", nic) => nic.to_string(),
        (name, nic) => format!("{name}, {nic}"),
    };
    format!("{} ({holder}; {} elements)", entry.key, entry.element_count)
}

/// Whether `path` may be written: it is new, or the user agreed to replace it.
fn may_replace(path: &Path, assume_yes: bool) -> bool {
    !path.exists() || confirm(&format!("Overwrite {}?", path.display()), assume_yes)
}

/// Ask a yes/no question on the terminal. Anything but "y" or "yes" declines.
fn confirm(question: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            log::warn!("Could not read answer: {e}");
            false
        }
    }
}
