//! Database seeder for Terralot development and testing.
//!
//! Seeds the initial admin account, the service catalog, and the public
//! company info entries.
//!
//! Usage: cargo run --bin seeder

use sea_orm::DatabaseConnection;
use terralot_core::auth::hash_password;
use terralot_db::repositories::{UpsertCompanyInfoInput, UpsertServiceInput};
use terralot_db::{ContentRepository, ServiceRepository, UserRepository};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = terralot_db::connect(&database_url, 5, 1)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin(&db).await;

    println!("Seeding services...");
    seed_services(&db).await;

    println!("Seeding company info...");
    seed_company_info(&db).await;

    println!("Seeding complete!");
}

/// Seeds the initial admin account from `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
async fn seed_admin(db: &DatabaseConnection) {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@terralot.dev".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin1234".to_string());

    let repo = UserRepository::new(db.clone());
    if repo
        .email_exists(&email)
        .await
        .expect("Failed to check admin email")
    {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let hash = hash_password(&password).expect("Failed to hash admin password");
    repo.create(&email, &hash, Some("Administrateur"), Some("admin"), true)
        .await
        .expect("Failed to create admin user");
    println!("  Admin user created: {email}");
}

/// Seeds the default service catalog.
async fn seed_services(db: &DatabaseConnection) {
    let repo = ServiceRepository::new(db.clone());
    let existing = repo.list().await.expect("Failed to list services");
    if !existing.is_empty() {
        println!("  Services already exist, skipping...");
        return;
    }

    let services = [
        (
            "vente-terrains",
            "Vente de terrains",
            "Terrains viabilisés et titrés, prêts à bâtir.",
        ),
        (
            "lotissement",
            "Lotissement",
            "Conception et aménagement de lotissements résidentiels.",
        ),
        (
            "accompagnement",
            "Accompagnement administratif",
            "Suivi des démarches foncières jusqu'au titre de propriété.",
        ),
    ];

    for (slug, title, description) in services {
        repo.create(UpsertServiceInput {
            name: Some(title.to_string()),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            slug: Some(slug.to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create service");
    }
    println!("  {} services created", services.len());
}

/// Seeds the public company info entries.
async fn seed_company_info(db: &DatabaseConnection) {
    let repo = ContentRepository::new(db.clone());

    let entries = [
        ("phone", "+241 01 00 00 00", "contact", "Téléphone", 1),
        ("email", "contact@terralot.dev", "contact", "Email", 2),
        ("address", "Libreville, Gabon", "contact", "Adresse", 3),
        ("hours", "Lun-Ven 8h-17h", "general", "Horaires", 1),
    ];

    for (key, value, category, label, sort_order) in entries {
        if repo
            .find_company_info(key)
            .await
            .expect("Failed to check company info")
            .is_some()
        {
            continue;
        }
        repo.create_company_info(
            key.to_string(),
            UpsertCompanyInfoInput {
                value: Some(value.to_string()),
                category: Some(category.to_string()),
                label: Some(label.to_string()),
                sort_order: Some(sort_order),
                is_active: Some(true),
            },
        )
        .await
        .expect("Failed to create company info entry");
    }
    println!("  Company info seeded");
}
