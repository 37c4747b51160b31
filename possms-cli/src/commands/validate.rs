//! `possms validate <PHONE>`

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use possms_core::{canonicalize, validate, Validity};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Phone number as the cashier would type it.
    pub phone: String,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let phone = self.phone.trim();
        match validate(phone) {
            Validity::Valid => {
                println!("{} {phone}", "✓ valid".green().bold());
                match canonicalize(phone) {
                    Some(canonical) => println!("  gateway form: {canonical}"),
                    None => println!(
                        "  {}",
                        "gateway may reject this number (expected 7-15 digits)".yellow()
                    ),
                }
                Ok(())
            }
            Validity::Missing => bail!("missing phone number"),
            Validity::InvalidFormat => bail!("invalid phone number format: '{phone}'"),
        }
    }
}
