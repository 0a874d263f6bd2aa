use anyhow::Context;
use campus_cli::seeder::{self, SuperAdminSeed};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "campus-cli")]
#[command(about = "Campus CLI - Administrative tools for the Campus API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or refresh the STUDENT and SUPER ADMIN roles
    SeedRoles,
    /// Create the super admin employee
    CreateSuperadmin {
        /// First name of the super admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the super admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed fake students
    SeedStudents {
        /// Number of students to create
        #[arg(short = 'c', long, default_value = "50")]
        count: usize,

        /// Password shared by every seeded student
        #[arg(long, default_value = "changeme")]
        password: String,
    },
    /// Remove seeded students (keeps roles and the super admin)
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::SeedRoles => handle_seed_roles(&pool).await,
        Commands::CreateSuperadmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_superadmin(&pool, first_name, last_name, email, password).await,
        Commands::SeedStudents { count, password } => {
            handle_seed_students(&pool, count, &password).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn handle_seed_roles(pool: &PgPool) -> anyhow::Result<()> {
    let count = seeder::seed_roles(pool).await?;
    println!("✅ Seeded {count} roles");
    Ok(())
}

async fn handle_create_superadmin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let first_name = match first_name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("First name")
            .default(SuperAdminSeed::DEFAULT_FIRST_NAME.to_string())
            .interact_text()
            .context("Failed to read first name")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .default(SuperAdminSeed::DEFAULT_EMAIL.to_string())
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let seed = SuperAdminSeed {
        first_name,
        last_name,
        username: SuperAdminSeed::DEFAULT_USERNAME.to_string(),
        email,
        mobile: SuperAdminSeed::DEFAULT_MOBILE.to_string(),
        password,
    };

    let id = seeder::seed_super_admin(pool, &seed).await?;

    println!("\n✅ Super admin ready");
    println!("   Id: {id}");
    println!("   Username: {}", seed.username);
    println!("   Email: {}", seed.email.to_lowercase());
    Ok(())
}

async fn handle_seed_students(pool: &PgPool, count: usize, password: &str) -> anyhow::Result<()> {
    let inserted = seeder::seed_students(pool, count, password).await?;
    println!("✅ Created {inserted} students");
    Ok(())
}

async fn handle_clear_seed(pool: &PgPool) -> anyhow::Result<()> {
    let removed = seeder::clear_seed(pool).await?;
    println!("✅ Removed {removed} seeded students");
    Ok(())
}
