//! # Grocer Pricing Demo
//!
//! Prints totals for the standard customer scenarios, a dynamically
//! extended catalog, and every discount profile with the bulk discount.
//!
//! ## Usage
//! ```bash
//! cargo run -p grocer-service --bin grocer-demo
//!
//! # Use a specific config file
//! cargo run -p grocer-service --bin grocer-demo -- --config ./pricing.toml
//!
//! # More logging
//! RUST_LOG=debug cargo run -p grocer-service --bin grocer-demo
//! ```

use std::env;
use std::path::PathBuf;

use grocer_core::{DiscountConfiguration, Money, Product, PromotionPricing};
use grocer_service::{init_tracing, PricingConfig, PricingService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Grocer Pricing Demo");
                println!();
                println!("Usage: grocer-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Pricing config file (default: $GROCER_CONFIG or pricing.toml)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = PricingConfig::load_or_default(config_path);
    let mut service = PricingService::from_config(&config)?;

    println!("Grocer Pricing Demo");
    println!("===================");
    println!(
        "Catalog: {} products, bulk {} off from {}",
        service.catalog().count(),
        service.bulk_rebate(),
        service.bulk_threshold()
    );
    println!();

    println!("Scenarios");
    println!(
        "  Standard (2 apples, 1 strawberry):               {}",
        service.standard_customer_total(2, 1)?
    );
    println!(
        "  Extended (1 apple, 2 strawberries, 1 mango):     {}",
        service.extended_customer_total(1, 2, 1)?
    );
    println!(
        "  Promotional (1 apple, 2 strawberries, 1 mango):  {}",
        service.promotional_customer_total(1, 2, 1)?
    );
    println!(
        "  Bulk (10 apples, 5 strawberries, 2 mangoes):     {}",
        service.bulk_customer_total(10, 5, 2)?
    );
    println!();

    println!("Dynamic catalog");
    service.catalog_mut().add_product(
        Product::new("DURIAN", "Durian", Money::from_cents(5000))?.with_local_name("榴莲")?,
    );
    service
        .catalog_mut()
        .add_product(Product::new("BLUEBERRY", "Blueberry", Money::from_cents(4500))?);

    let purchase = service.fruit_purchase(&[("DURIAN", 1), ("BLUEBERRY", 1)])?;
    let no_discount = PromotionPricing::new(DiscountConfiguration::new("No discounts"));
    println!(
        "  Durian + blueberry:                              {}",
        service.calculate_with_rule(&purchase, &no_discount)?
    );
    println!(
        "  Durian + blueberry with bulk:                    {}",
        service.calculate_with_rule(&purchase, &service.bulk_rule(no_discount.clone())?)?
    );
    println!();

    println!("Promotions with bulk discount (10 apples, 5 strawberries, 2 mangoes)");
    let purchase = service.fruit_purchase(&[("APPLE", 10), ("STRAWBERRY", 5), ("MANGO", 2)])?;
    for name in service.promotion_names() {
        let rule = service.bulk_rule(service.promotion_rule(name)?)?;
        println!(
            "  {:<14} {:>10}   {}",
            name,
            service.calculate_with_rule(&purchase, &rule)?.to_string(),
            rule.inner().discounts()
        );
    }

    Ok(())
}
