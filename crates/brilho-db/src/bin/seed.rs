//! # Seed Data Loader
//!
//! Populates the database with the sample jewelry catalog and seller
//! directory for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p brilho-db --bin seed
//!
//! # Specify database path
//! cargo run -p brilho-db --bin seed -- --db ./data/brilho.db
//! ```

use std::env;

use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use brilho_core::{Category, Product, Seller, SellerStatus};
use brilho_db::{Database, DbConfig};

/// The sample catalog: (barcode, name, category, subcategory,
/// raw cost, plating cost, stock, location).
const PRODUCTS: &[(&str, &str, Category, &str, i64, i64, i64, &str)] = &[
    (
        "12345678",
        "Anel Solitário Diamante",
        Category::Aneis,
        "solitario",
        25000,
        5000,
        5,
        "Vitrine 1, Prateleira A",
    ),
    (
        "23456789",
        "Brinco Argola Ouro",
        Category::Brincos,
        "argola",
        18000,
        4000,
        8,
        "Vitrine 1, Prateleira B",
    ),
    (
        "34567890",
        "Colar Gargantilha Prata",
        Category::Colares,
        "gargantilha",
        12000,
        3000,
        3,
        "Vitrine 2, Prateleira A",
    ),
    (
        "45678901",
        "Pulseira Tennis Ouro",
        Category::Pulseiras,
        "tennis",
        32000,
        6000,
        4,
        "Vitrine 2, Prateleira B",
    ),
];

/// The sample seller directory: (id, name, position, commission bps, status).
const SELLERS: &[(&str, &str, &str, u32, SellerStatus)] = &[
    ("1", "Pedro Almeida", "vendedor", 800, SellerStatus::Active),
    ("2", "Carla Souza", "vendedor", 500, SellerStatus::Active),
    ("3", "Roberto Ferreira", "consultor", 500, SellerStatus::Vacation),
    ("4", "Juliana Costa", "vendedor", 600, SellerStatus::Active),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./brilho_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Brilho Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./brilho_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Brilho Seed Data Loader");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    for (id, name, position, commission_bps, status) in SELLERS {
        let seller = Seller {
            id: id.to_string(),
            name: name.to_string(),
            email: Some(format!(
                "{}@brilho.example",
                name.to_lowercase().replace(' ', ".")
            )),
            phone: None,
            position: Some(position.to_string()),
            commission_bps: *commission_bps,
            status: *status,
            created_at: now,
            updated_at: now,
        };
        db.sellers().insert(&seller).await?;
    }
    println!("✓ Seeded {} sellers", SELLERS.len());

    for (barcode, name, category, subcategory, raw, plating, stock, location) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            barcode: barcode.to_string(),
            name: name.to_string(),
            description: None,
            category: *category,
            subcategory: Some(subcategory.to_string()),
            raw_cost_cents: *raw,
            plating_cost_cents: *plating,
            stock_quantity: *stock,
            min_stock_quantity: 2,
            stock_location: Some(location.to_string()),
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
    }
    println!("✓ Seeded {} products", PRODUCTS.len());

    println!();
    println!("Done.");
    Ok(())
}
