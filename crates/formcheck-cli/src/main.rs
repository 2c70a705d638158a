// File: src/main.rs
// Purpose: Command-line driver: run rule files against captured forms

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use formcheck::checksum::{
    is_valid_excise_reference, is_valid_payment_card, is_valid_tax_reference,
    is_valid_vat_registration,
};
use formcheck::{config, Form, FormValidator, Language, PageView};

#[derive(Parser)]
#[command(name = "formcheck", about = "Rule-based form field validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a captured form against a rule file
    Validate {
        /// Form snapshot (TOML: name plus [[control]] entries)
        form: PathBuf,
        /// Rule configuration file (default: ./formcheck.toml)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Language for the page-level messages
        #[arg(long, value_enum, default_value_t = LanguageArg::English)]
        language: LanguageArg,
        /// Pin "today" for relative date-range bounds (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Check a single reference number or card number
    Check {
        #[command(subcommand)]
        kind: CheckCommands,
    },
}

#[derive(Subcommand)]
enum CheckCommands {
    /// 10-digit taxpayer reference
    Tax { value: String },
    /// 14-character excise reference
    Excise { value: String },
    /// 9-digit VAT registration number
    Vat { value: String },
    /// Payment card number (Luhn)
    Card { value: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    English,
    Welsh,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => Language::English,
            LanguageArg::Welsh => Language::Welsh,
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            form,
            rules,
            language,
            today,
        } => validate(&form, rules.as_deref(), language.into(), today),
        Commands::Check { kind } => Ok(check(&kind)),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn validate(
    form_path: &std::path::Path,
    rules_path: Option<&std::path::Path>,
    language: Language,
    today: Option<NaiveDate>,
) -> Result<bool> {
    let registry = match rules_path {
        Some(path) => config::load(path)?,
        None => config::load_default()?,
    };

    let form = load_form(form_path)?;
    let mut view = PageView::for_form(&form);

    let mut validator = FormValidator::new(&registry).with_language(language);
    if let Some(today) = today {
        validator = validator.with_today(today);
    }

    let pass = validator.validate(&form, &mut view);

    if pass {
        println!("{} Form '{}' is valid.", "✓".green(), form.name());
        return Ok(true);
    }

    println!("{} Form '{}' has errors:", "✗".red(), form.name());
    for entry in view.summary_entries() {
        println!("  {} {}", format!("{}:", entry.field_id).bold(), entry.message);
    }

    Ok(false)
}

fn load_form(path: &std::path::Path) -> Result<Form> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read form snapshot: {:?}", path))?;

    let mut form: Form = toml::from_str(&content)
        .with_context(|| format!("Failed to parse form snapshot: {:?}", path))?;

    // Snapshots may omit ids; they default to the control name, as in markup
    // generated by the portal.
    for control in &mut form.controls {
        if control.id.is_empty() {
            control.id = control.name.clone();
        }
    }

    Ok(form)
}

fn check(kind: &CheckCommands) -> bool {
    let (label, valid) = match kind {
        CheckCommands::Tax { value } => ("tax reference", is_valid_tax_reference(value)),
        CheckCommands::Excise { value } => ("excise reference", is_valid_excise_reference(value)),
        CheckCommands::Vat { value } => ("VAT registration", is_valid_vat_registration(value)),
        CheckCommands::Card { value } => ("card number", is_valid_payment_card(value)),
    };

    if valid {
        println!("{} Valid {label}.", "✓".green());
    } else {
        println!("{} Invalid {label}.", "✗".red());
    }

    valid
}
