use tracing_subscriber::EnvFilter;
use vatcheck::*;

fn main() -> Result<(), VatError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // VAT ID format validation (no network required)
    println!("=== VAT ID Format Validation ===\n");

    let test_ids = [
        "DE123456789",
        "ATU12345678",
        "BE 0123.456.789",
        "NL123456789B01",
        "IE1234567WA",
        "DE12345678",  // too short
        "XX999999999", // unknown country
    ];

    for id in &test_ids {
        match validate_vat_format(id) {
            Ok(vat) => println!("  {id} => valid ({vat})"),
            Err(e) => println!("  {id} => INVALID [{}]: {e}", e.code()),
        }
    }

    // Remote checks: pass VAT numbers on the command line
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("\nPass VAT numbers as arguments to check them against VIES / HMRC.");
        return Ok(());
    }

    println!("\n=== Remote Check ===\n");
    let mut validator = VatValidator::new()?;
    for arg in &args {
        match validator.check(arg, None)? {
            Some(id) => {
                println!("  {arg} => {id} is valid");
                let info = validator.information();
                println!("    name:    {}", info.name.as_deref().unwrap_or("—"));
                println!("    address: {}", info.address.as_deref().unwrap_or("—"));
            }
            None => {
                let kind = validator.last_error_kind();
                let advice = if kind.is_transient() {
                    "retry later"
                } else {
                    "rejected"
                };
                println!(
                    "  {arg} => {advice} [{}]: {}",
                    validator.last_error_code(),
                    validator.last_error()
                );
            }
        }
    }

    Ok(())
}
