//! Subcommands and their execution against the console state.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Subcommand;
use payconsole_common::{Amount, CountrySelection, Currency, MerchantSelection};
use payconsole_fx::{ConvertOptions, FetchOutcome};
use payconsole_store::ConsoleState;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current selections and rate cache
    Status,

    /// Load a country list (JSON array) and default to its first entry
    Countries {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Select a country; clears the display currency and merchant filter
    SelectCountry {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// ISO 3166 alpha-2 code
        #[arg(long)]
        iso: String,
        /// Native currency of the country
        #[arg(long)]
        currency: String,
    },

    /// Narrow reports to one merchant
    SelectMerchant {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Drop the merchant filter
    ClearMerchant,

    /// Choose the display currency, or go back to the native one
    Display {
        /// Currency code to display amounts in
        #[arg(required_unless_present = "native", conflicts_with = "native")]
        currency: Option<String>,

        /// Use the selected country's currency
        #[arg(long)]
        native: bool,
    },

    /// Make sure rates are cached for a base currency
    Refresh {
        /// Base currency (defaults to the selected country's currency)
        #[arg(long)]
        base: Option<String>,
    },

    /// Convert an amount into the display currency
    Convert {
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Leave out the currency code
        #[arg(long)]
        no_label: bool,

        /// Print the unformatted product
        #[arg(long)]
        raw: bool,
    },

    /// Forget all cached rates
    ClearRates,
}

fn describe_outcome(outcome: FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::CacheHit => "rates already fresh",
        FetchOutcome::Refreshed => "rates refreshed",
        FetchOutcome::Superseded => "response superseded by a newer request",
        FetchOutcome::FallbackInstalled => "rate service unavailable, using built-in rates",
        FetchOutcome::KeptExisting => "rate service unavailable, keeping cached rates",
    }
}

/// Run `command` and return what should be printed.
pub async fn execute(command: Command, state: &ConsoleState) -> anyhow::Result<String> {
    let mut out = String::new();

    match command {
        Command::Status => {
            write_status(&mut out, state)?;
        }

        Command::Countries { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading country list {}", file.display()))?;
            let countries: Vec<CountrySelection> =
                serde_json::from_str(&raw).context("parsing country list")?;

            match state.apply_country_list(&countries).await? {
                Some(country) => writeln!(out, "Selected {} ({})", country.country_name, country.iso_code)?,
                None => writeln!(out, "Loaded {} countries, selection unchanged", countries.len())?,
            }
        }

        Command::SelectCountry { id, name, iso, currency } => {
            let currency = Currency::parse(&currency)?;
            let country = CountrySelection::new(id.as_str(), name, iso, currency);
            let outcome = state.select_country(country.clone()).await?;
            writeln!(out, "Selected {} ({}); {}", country.country_name, country.iso_code, describe_outcome(outcome))?;
        }

        Command::SelectMerchant { id, name } => {
            state.select_merchant(MerchantSelection::new(id.as_str(), name))?;
            writeln!(out, "Merchant filter set to {id}")?;
        }

        Command::ClearMerchant => {
            state.clear_merchant()?;
            writeln!(out, "Merchant filter cleared")?;
        }

        Command::Display { currency, native } => {
            let currency = match (currency, native) {
                (_, true) => None,
                (Some(code), false) => Some(Currency::parse_display(&code)?),
                (None, false) => bail!("give a currency code or --native"),
            };
            state.set_display_currency(currency.clone())?;
            match currency {
                Some(c) => writeln!(out, "Displaying amounts in {c}")?,
                None => writeln!(out, "Displaying amounts in the native currency")?,
            }
        }

        Command::Refresh { base } => {
            let outcome = match base {
                Some(code) => state.ensure_rates(&Currency::parse(&code)?).await,
                None => state.ensure_rates_for_selection().await,
            };
            writeln!(out, "{}", describe_outcome(outcome))?;
        }

        Command::Convert { amount, no_label, raw } => {
            state.ensure_rates_for_selection().await;
            let options = ConvertOptions {
                currency_label: !no_label,
                formatted: !raw,
            };
            let converted: Amount = state.convert_with(amount, options);
            writeln!(out, "{converted}")?;
        }

        Command::ClearRates => {
            state.clear_rates();
            writeln!(out, "Rate cache cleared")?;
        }
    }

    Ok(out)
}

fn write_status(out: &mut String, state: &ConsoleState) -> std::fmt::Result {
    match state.selected_country() {
        Some(c) => writeln!(out, "Country:   {} ({}, {})", c.country_name, c.iso_code, c.native_currency)?,
        None => writeln!(out, "Country:   none")?,
    }
    match state.selected_merchant() {
        Some(m) => writeln!(out, "Merchant:  {} {}", m.id, m.merchant_name)?,
        None => writeln!(out, "Merchant:  all")?,
    }
    match state.display_currency() {
        Some(c) => writeln!(out, "Display:   {c}")?,
        None => writeln!(out, "Display:   native")?,
    }

    let rates = state.rates();
    if rates.is_populated() {
        let fetched = rates
            .last_fetch_time
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "built-in".to_string());
        writeln!(out, "Rates:     {} currencies vs {} ({})", rates.rates.len(), rates.base_currency, fetched)?;
    } else {
        writeln!(out, "Rates:     none cached")?;
    }
    Ok(())
}
