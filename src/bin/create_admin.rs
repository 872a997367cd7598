use std::process::ExitCode;

use inventory_store::config::Config;
use inventory_store::{init_logging, open, Model, Role, User, UserStatus};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();
    let _guard = init_logging(&config);

    let mut args = std::env::args().skip(1);
    let email = args.next().unwrap_or_else(|| "admin@example.com".to_string());
    let password = args.next().unwrap_or_else(|| "admin123".to_string());
    let name = args.next().unwrap_or_else(|| "Admin User".to_string());

    let db = open(&config);

    match User::find_one(&db, email.as_str()).max_time_ms(1000).await {
        Ok(Some(_)) => {
            eprintln!("Admin user already exists with this email");
            return ExitCode::FAILURE;
        }
        Ok(None) => {}
        Err(e) => {
            error!("Admin lookup failed: {}", e);
            eprintln!("Error creating admin: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut admin = User::new(name, email.clone(), password.clone());
    admin.role = Role::Admin;
    admin.is_premium = true;
    admin.status = UserStatus::Offline;

    if let Err(e) = admin.save(&db).await {
        error!("Admin creation failed: {}", e);
        eprintln!("Error creating admin: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Created admin user {}", admin.id().unwrap_or_default());
    println!("Admin user created successfully!");
    println!("   Email: {}", email);
    println!("   Password: {}", password);
    println!("   Role: {}", admin.role.as_str());
    ExitCode::SUCCESS
}
